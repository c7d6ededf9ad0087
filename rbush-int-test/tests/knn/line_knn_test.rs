use rbush::{Envelope, KnnTarget, Point, RBush, Segment};
use rbush_int_test::test_util::{brute_force_knn_distances, map_boxes, run_test, sorted};

fn map_tree() -> rbush::SpatialResult<RBush<Envelope>> {
    let mut tree = RBush::new();
    tree.bulk_load(map_boxes());
    Ok(tree)
}

fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
    Segment::new(Point::new(x1, y1), Point::new(x2, y2))
}

fn collected(items: Vec<&Envelope>) -> Vec<Envelope> {
    items.into_iter().copied().collect()
}

#[test]
fn test_nearest_to_short_segment() {
    run_test(map_tree, |tree| {
        let line = segment(6362.0, 3343.5, 6360.75, 3344.0);
        let result = collected(tree.knn(10, line));

        assert_eq!(result.len(), 10);
        assert_eq!(
            result[..3],
            [
                Envelope::new(6359.0, 3343.0, 6362.5, 3345.0),
                Envelope::new(6357.0, 3342.0, 6363.5, 3343.0),
                Envelope::new(6360.5, 3340.0, 6361.5, 3342.0),
            ]
        );
        // two boxes tie at distance 2
        assert_eq!(
            sorted(&result[3..5]),
            sorted(&[
                Envelope::new(6364.0, 3342.0, 6365.0, 3344.5),
                Envelope::new(6362.0, 3340.5, 6363.0, 3341.5),
            ])
        );
        assert_eq!(
            result[5..],
            [
                Envelope::new(6358.5, 3337.5, 6360.5, 3341.5),
                Envelope::new(6361.0, 3339.0, 6363.0, 3340.0),
                Envelope::new(6364.5, 3340.5, 6368.0, 3341.0),
                Envelope::new(6363.5, 3337.5, 6365.0, 3340.0),
                Envelope::new(6367.0, 3342.0, 6368.0, 3344.0),
            ]
        );
        Ok(())
    });
}

#[test]
fn test_nearest_points_to_segment() {
    run_test(map_tree, |tree| {
        let line = segment(6361.5, 3352.5, 6367.0, 3354.0);
        let result = collected(tree.knn(6, line));

        assert_eq!(
            result,
            vec![
                Envelope::from_point(6361.0, 3352.5),
                Envelope::from_point(6362.5, 3353.5),
                Envelope::from_point(6364.0, 3354.0),
                Envelope::from_point(6363.5, 3352.0),
                Envelope::from_point(6363.0, 3351.0),
                Envelope::from_point(6365.0, 3351.5),
            ]
        );
        Ok(())
    });
}

#[test]
fn test_segment_with_max_distance() {
    run_test(map_tree, |tree| {
        let line = segment(6377.5, 3351.5, 6379.0, 3350.5);
        let result = tree.knn_query(line).max_distance(4.0).execute_with_distance();

        let items: Vec<Envelope> = result.iter().map(|(item, _)| **item).collect();
        assert_eq!(
            items,
            vec![
                Envelope::new(6378.5, 3348.5, 6379.5, 3351.0),
                Envelope::new(6375.5, 3348.5, 6378.0, 3350.0),
                Envelope::new(6379.5, 3343.5, 6382.0, 3349.0),
                Envelope::new(6378.0, 3345.5, 6379.5, 3348.0),
                Envelope::new(6372.5, 3347.5, 6377.0, 3348.0),
                Envelope::new(6375.0, 3344.0, 6377.5, 3347.0),
            ]
        );
        assert_eq!(result[0].1, 0.0);
        assert!(result.iter().all(|(_, distance)| *distance <= 4.0));
        Ok(())
    });
}

#[test]
fn test_long_segment_with_max_distance_and_k() {
    run_test(map_tree, |tree| {
        let line = segment(6373.0, 3324.0, 6396.5, 3336.0);
        let expected = vec![
            Envelope::new(6374.5, 3327.0, 6380.5, 3329.5),
            Envelope::new(6385.0, 3332.5, 6388.0, 3335.0),
            Envelope::new(6377.5, 3330.5, 6380.0, 3332.5),
            Envelope::new(6388.5, 3338.5, 6390.5, 3342.5),
            Envelope::new(6362.5, 3329.5, 6369.0, 3332.5),
            Envelope::new(6379.5, 3336.0, 6381.5, 3339.0),
            Envelope::new(6371.5, 3332.0, 6373.5, 3333.0),
            Envelope::new(6374.5, 3333.5, 6375.0, 3335.5),
        ];

        let all = collected(tree.knn_query(line).max_distance(8.0).execute());
        assert_eq!(all, expected);

        let first = collected(tree.knn_query(line).k(3).max_distance(8.0).execute());
        assert_eq!(first, expected[..3]);
        Ok(())
    });
}

#[test]
fn test_segment_knn_matches_linear_scan() {
    run_test(map_tree, |tree| {
        let boxes = map_boxes();
        for line in [
            segment(6350.0, 3320.0, 6400.0, 3360.0),
            segment(6390.0, 3325.0, 6355.0, 3350.0),
            segment(6370.0, 3345.0, 6370.0, 3345.0),
        ] {
            let target = KnnTarget::from(line);
            let distances: Vec<f64> = tree
                .knn(0, line)
                .into_iter()
                .map(|item| target.squared_distance_to(item))
                .collect();

            assert_eq!(distances, brute_force_knn_distances(&boxes, &target, 0, None));
        }
        Ok(())
    });
}

#[test]
fn test_segment_crossing_box_has_zero_distance() {
    let mut tree = RBush::new();
    tree.insert(Envelope::new(0.0, 0.0, 10.0, 10.0));
    tree.insert(Envelope::new(20.0, 0.0, 30.0, 10.0));

    let result = tree.knn_with_distance(0, segment(-5.0, 5.0, 15.0, 5.0));

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].0, &Envelope::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(result[0].1, 0.0);
    assert_eq!(result[1].1, 5.0);
}
