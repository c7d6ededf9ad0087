use rand::seq::SliceRandom;
use rand::Rng;
use rbush::{Envelope, RBush, RBushConfig, SpatialDatabase, SpatialError};
use rbush_int_test::test_util::{random_boxes, run_test, small_node_tree, sorted};

#[test]
fn test_integrity_report_of_valid_tree() {
    run_test(small_node_tree, |tree| {
        let report = tree.check_integrity();
        let stats = tree.stats();

        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert_eq!(report.nodes_checked, stats.node_count);
        assert_eq!(stats.total_entries, 48);
        assert_eq!(stats.tree_height, 3);
        Ok(())
    });
}

#[test]
fn test_config_is_clamped() {
    let tree: RBush<Envelope> = RBush::with_max_entries(1);
    assert_eq!(tree.max_entries(), 4);
    assert_eq!(tree.min_entries(), 2);

    let tree: RBush<Envelope> = RBush::with_config(RBushConfig::new(16));
    assert_eq!(tree.max_entries(), 16);
    assert_eq!(tree.min_entries(), 7);
    assert_eq!(tree.config(), RBushConfig::new(16));
}

#[test]
fn test_node_capacities_hold_for_all_configs() {
    for max_entries in [4, 5, 9, 16, 32] {
        run_test(
            || Ok(RBush::<Envelope>::with_max_entries(max_entries)),
            |tree| {
                let boxes = random_boxes(800, 10.0, max_entries as u64);
                let (incremental, batch) = boxes.split_at(300);
                for envelope in incremental {
                    tree.insert(*envelope);
                }
                tree.bulk_load(batch.to_vec());
                for envelope in boxes.iter().step_by(4) {
                    tree.delete(envelope);
                }

                assert_eq!(tree.len(), 800 - 200);
                Ok(())
            },
        );
    }
}

#[test]
fn test_interleaved_operations_stay_consistent() {
    let mut rng = rand::rng();
    let mut tree: RBush<Envelope> = RBush::with_max_entries(6);
    let mut stored: Vec<Envelope> = Vec::new();

    for round in 0..200 {
        match rng.random_range(0..4) {
            0 | 1 => {
                let batch = random_boxes(rng.random_range(1..20), 10.0, round);
                for envelope in &batch {
                    tree.insert(*envelope);
                }
                stored.extend(batch);
            }
            2 => {
                let batch = random_boxes(rng.random_range(1..60), 10.0, 1000 + round);
                tree.bulk_load(batch.clone());
                stored.extend(batch);
            }
            _ => {
                stored.shuffle(&mut rng);
                let count = rng.random_range(0..=stored.len().min(25));
                for envelope in stored.drain(..count) {
                    assert!(tree.delete(&envelope));
                }
            }
        }

        if let Err(e) = tree.validate() {
            panic!("round {}: {}", round, e);
        }
        assert_eq!(tree.len(), stored.len());
    }

    assert_eq!(sorted(tree.search()), sorted(&stored));
}

fn fill_generic<D: SpatialDatabase<Envelope>>(db: &mut D, boxes: &[Envelope]) {
    db.bulk_load(boxes[..100].to_vec());
    for envelope in &boxes[100..] {
        db.insert(*envelope);
    }
    for envelope in &boxes[..50] {
        db.delete(envelope);
    }
}

#[test]
fn test_maintenance_through_trait() {
    run_test(
        || Ok(RBush::<Envelope>::new()),
        |tree| {
            let boxes = random_boxes(150, 5.0, 51);
            fill_generic(tree, &boxes);

            assert_eq!(tree.len(), 100);
            assert_eq!(sorted(tree.search()), sorted(&boxes[50..]));
            Ok(())
        },
    );
}

#[test]
fn test_validation_error_display() {
    let error = SpatialError::IntegrityViolation("Node [0] is empty".to_string());
    assert_eq!(error.to_string(), "Integrity violation: Node [0] is empty");

    let error = Envelope::try_new(5.0, 0.0, 1.0, 1.0);
    assert!(matches!(error, Err(SpatialError::InvalidEnvelope { .. })));
}
