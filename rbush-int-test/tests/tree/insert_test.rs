use rbush::{Envelope, RBush};
use rbush_int_test::test_util::{
    brute_force_search, diagonal_points, empty_tree, random_boxes, run_test, sorted, TestItem,
};

#[test]
fn test_root_leaf_splits_after_max_entries() {
    run_test(empty_tree, |tree| {
        let points = diagonal_points(10);
        for point in &points[..9] {
            tree.insert(*point);
        }

        assert_eq!(tree.height(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.envelope(), Envelope::new(0.0, 0.0, 8.0, 8.0));

        tree.insert(points[9]);

        assert_eq!(tree.height(), 2);
        assert_eq!(tree.root().children().len(), 2);
        assert_eq!(tree.envelope(), Envelope::new(0.0, 0.0, 9.0, 9.0));
        assert_eq!(tree.len(), 10);
        Ok(())
    });
}

#[test]
fn test_insert_keeps_every_item_reachable() {
    run_test(empty_tree, |tree| {
        let boxes = random_boxes(1000, 10.0, 11);
        for envelope in &boxes {
            tree.insert(*envelope);
        }

        assert_eq!(tree.len(), 1000);
        assert_eq!(sorted(tree.search()), sorted(&boxes));
        assert_eq!(sorted(tree.iter()), sorted(&boxes));
        Ok(())
    });
}

#[test]
fn test_insert_with_small_nodes_matches_linear_scan() {
    run_test(
        || Ok(RBush::<Envelope>::with_max_entries(4)),
        |tree| {
            let boxes = random_boxes(500, 20.0, 12);
            for envelope in &boxes {
                tree.insert(*envelope);
            }

            assert!(tree.height() > 3);
            let query = Envelope::new(200.0, 300.0, 450.0, 500.0);
            assert_eq!(
                sorted(tree.search_envelope(&query)),
                brute_force_search(&boxes, &query)
            );
            Ok(())
        },
    );
}

#[test]
fn test_insert_duplicates() {
    run_test(empty_tree, |tree| {
        let envelope = Envelope::new(5.0, 5.0, 6.0, 6.0);
        for _ in 0..30 {
            tree.insert(envelope);
        }

        assert_eq!(tree.len(), 30);
        assert_eq!(tree.search_envelope(&envelope).len(), 30);
        Ok(())
    });
}

#[test]
fn test_insert_custom_items() {
    run_test(
        || Ok(RBush::<TestItem>::new()),
        |tree| {
            for (id, envelope) in random_boxes(50, 5.0, 13).into_iter().enumerate() {
                tree.insert(TestItem::new(id, envelope));
            }

            let mut ids: Vec<usize> = tree.iter().map(|item| item.id).collect();
            ids.sort_unstable();
            assert_eq!(ids, (0..50).collect::<Vec<_>>());
            Ok(())
        },
    );
}

#[test]
fn test_stats_after_inserts() {
    run_test(empty_tree, |tree| {
        for point in diagonal_points(100) {
            tree.insert(point);
        }

        let stats = tree.stats();
        assert_eq!(stats.total_entries, 100);
        assert_eq!(stats.tree_height, tree.height());
        assert!(stats.leaf_count >= 100 / tree.max_entries());
        assert!(stats.node_count > stats.leaf_count);
        Ok(())
    });
}
