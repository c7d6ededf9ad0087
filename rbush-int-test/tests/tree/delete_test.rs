use rbush::{Envelope, RBush};
use rbush_int_test::test_util::{
    empty_tree, grid_points, random_boxes, run_test, small_node_tree, sorted, TestItem,
};

#[test]
fn test_basic_remove() {
    run_test(empty_tree, |tree| {
        let points = grid_points();
        tree.bulk_load(points.clone());

        let len = points.len();
        for point in points[..3].iter().chain(&points[len - 3..]) {
            assert!(tree.delete(point));
        }

        assert_eq!(tree.len(), len - 6);
        assert_eq!(sorted(tree.search()), sorted(&points[3..len - 3]));
        Ok(())
    });
}

#[test]
fn test_delete_missing_item_is_noop() {
    run_test(small_node_tree, |tree| {
        let before = sorted(tree.search());

        assert!(!tree.delete(&Envelope::from_point(13.0, 13.0)));

        assert_eq!(tree.len(), 48);
        assert_eq!(sorted(tree.search()), before);
        Ok(())
    });
}

#[test]
fn test_delete_from_empty_tree() {
    run_test(empty_tree, |tree| {
        assert!(!tree.delete(&Envelope::new(0.0, 0.0, 1.0, 1.0)));
        assert!(tree.is_empty());
        Ok(())
    });
}

#[test]
fn test_delete_everything_resets_root() {
    run_test(small_node_tree, |tree| {
        for point in grid_points() {
            assert!(tree.delete(&point));
        }

        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert!(tree.root().children().is_empty());
        assert!(tree.search().is_empty());

        tree.insert(Envelope::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(tree.len(), 1);
        Ok(())
    });
}

#[test]
fn test_delete_removes_all_equal_items() {
    run_test(empty_tree, |tree| {
        let duplicate = Envelope::new(10.0, 10.0, 11.0, 11.0);
        tree.bulk_load(grid_points());
        for _ in 0..5 {
            tree.insert(duplicate);
        }

        assert!(tree.delete(&duplicate));
        assert_eq!(tree.len(), 48);
        assert!(!tree.search().contains(&&duplicate));
        // the grid point (10, 10) touches the removed box and must survive
        assert_eq!(
            tree.search_envelope(&duplicate),
            vec![&Envelope::from_point(10.0, 10.0)]
        );
        Ok(())
    });
}

#[test]
fn test_delete_with_custom_comparer() {
    let same_id = |a: &TestItem, b: &TestItem| a.id == b.id;
    let mut tree: RBush<TestItem, _> = RBush::with_comparer(same_id);
    for (id, envelope) in random_boxes(200, 5.0, 31).into_iter().enumerate() {
        tree.insert(TestItem::new(id, envelope));
    }

    let target = tree
        .iter()
        .find(|item| item.id == 42)
        .map(|item| TestItem::new(item.id, item.envelope));
    let Some(target) = target else {
        panic!("item 42 was not stored");
    };

    assert!(tree.delete(&target));
    assert!(!tree.delete(&target));
    assert_eq!(tree.len(), 199);
    assert!(tree.iter().all(|item| item.id != 42));
    assert!(tree.validate().is_ok());
}

#[test]
fn test_comparer_ignores_non_identity_fields() {
    let same_id = |a: &TestItem, b: &TestItem| a.id == b.id;
    let mut tree: RBush<TestItem, _> = RBush::with_comparer(same_id);
    tree.insert(TestItem::new(1, Envelope::new(0.0, 0.0, 10.0, 10.0)));
    tree.insert(TestItem::new(2, Envelope::new(2.0, 2.0, 3.0, 3.0)));

    // a query box inside the stored envelope still reaches the leaf
    assert!(tree.delete(&TestItem::new(1, Envelope::new(4.0, 4.0, 5.0, 5.0))));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.search()[0].id, 2);
}

#[test]
fn test_random_deletes_keep_tree_consistent() {
    run_test(
        || Ok(RBush::<Envelope>::with_max_entries(6)),
        |tree| {
            let boxes = random_boxes(1500, 8.0, 32);
            tree.bulk_load(boxes.clone());

            for (i, envelope) in boxes.iter().enumerate() {
                if i % 3 != 0 {
                    assert!(tree.delete(envelope));
                }
            }
            tree.validate()?;

            let kept: Vec<Envelope> = boxes.iter().step_by(3).copied().collect();
            assert_eq!(tree.len(), kept.len());
            assert_eq!(sorted(tree.search()), sorted(&kept));
            Ok(())
        },
    );
}

#[test]
fn test_clear() {
    run_test(small_node_tree, |tree| {
        tree.clear();

        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert!(tree.root().children().is_empty());
        assert!(tree.search().is_empty());
        Ok(())
    });
}
