use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rbush::{Envelope, KnnTarget, RBush, SpatialData, SpatialResult};
use std::cmp::Ordering;

/// Runs a test against a freshly prepared tree, then checks the tree's integrity.
pub fn run_test<T, C, B, F>(before: B, test: F)
where
    T: SpatialData,
    B: Fn() -> SpatialResult<RBush<T, C>>,
    F: Fn(&mut RBush<T, C>) -> SpatialResult<()>,
{
    let mut tree = match before() {
        Ok(tree) => tree,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    if let Err(e) = test(&mut tree) {
        panic!("Test failed: {:?}", e);
    }

    if let Err(e) = tree.validate() {
        panic!("Integrity check failed after test: {:?}", e);
    }
}

/// An empty tree with the default capacity.
pub fn empty_tree() -> SpatialResult<RBush<Envelope>> {
    Ok(RBush::new())
}

/// A tree with `max_entries = 4` bulk loaded with [`grid_points`].
pub fn small_node_tree() -> SpatialResult<RBush<Envelope>> {
    let mut tree = RBush::with_max_entries(4);
    tree.bulk_load(grid_points());
    Ok(tree)
}

/// An item carrying an identity separate from its envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct TestItem {
    pub id: usize,
    pub envelope: Envelope,
}

impl TestItem {
    pub fn new(id: usize, envelope: Envelope) -> Self {
        Self { id, envelope }
    }
}

impl SpatialData for TestItem {
    fn envelope(&self) -> Envelope {
        self.envelope
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn envelopes(data: &[[f64; 4]]) -> Vec<Envelope> {
    data.iter()
        .map(|b| Envelope::new(b[0], b[1], b[2], b[3]))
        .collect()
}

/// 48 points laid out in four 50x50 quadrants.
pub fn grid_points() -> Vec<Envelope> {
    envelopes(&[
        [0.0, 0.0, 0.0, 0.0], [10.0, 10.0, 10.0, 10.0], [20.0, 20.0, 20.0, 20.0], [25.0, 0.0, 25.0, 0.0],
        [35.0, 10.0, 35.0, 10.0], [45.0, 20.0, 45.0, 20.0], [0.0, 25.0, 0.0, 25.0], [10.0, 35.0, 10.0, 35.0],
        [20.0, 45.0, 20.0, 45.0], [25.0, 25.0, 25.0, 25.0], [35.0, 35.0, 35.0, 35.0], [45.0, 45.0, 45.0, 45.0],
        [50.0, 0.0, 50.0, 0.0], [60.0, 10.0, 60.0, 10.0], [70.0, 20.0, 70.0, 20.0], [75.0, 0.0, 75.0, 0.0],
        [85.0, 10.0, 85.0, 10.0], [95.0, 20.0, 95.0, 20.0], [50.0, 25.0, 50.0, 25.0], [60.0, 35.0, 60.0, 35.0],
        [70.0, 45.0, 70.0, 45.0], [75.0, 25.0, 75.0, 25.0], [85.0, 35.0, 85.0, 35.0], [95.0, 45.0, 95.0, 45.0],
        [0.0, 50.0, 0.0, 50.0], [10.0, 60.0, 10.0, 60.0], [20.0, 70.0, 20.0, 70.0], [25.0, 50.0, 25.0, 50.0],
        [35.0, 60.0, 35.0, 60.0], [45.0, 70.0, 45.0, 70.0], [0.0, 75.0, 0.0, 75.0], [10.0, 85.0, 10.0, 85.0],
        [20.0, 95.0, 20.0, 95.0], [25.0, 75.0, 25.0, 75.0], [35.0, 85.0, 35.0, 85.0], [45.0, 95.0, 45.0, 95.0],
        [50.0, 50.0, 50.0, 50.0], [60.0, 60.0, 60.0, 60.0], [70.0, 70.0, 70.0, 70.0], [75.0, 50.0, 75.0, 50.0],
        [85.0, 60.0, 85.0, 60.0], [95.0, 70.0, 95.0, 70.0], [50.0, 75.0, 50.0, 75.0], [60.0, 85.0, 60.0, 85.0],
        [70.0, 95.0, 70.0, 95.0], [75.0, 75.0, 75.0, 75.0], [85.0, 85.0, 85.0, 85.0], [95.0, 95.0, 95.0, 95.0],
    ])
}

/// Points `(i, i)` for `i` in `0..count`.
pub fn diagonal_points(count: usize) -> Vec<Envelope> {
    (0..count)
        .map(|i| Envelope::from_point(i as f64, i as f64))
        .collect()
}

/// 100 small boxes scattered over `[0, 103] x [0, 99]`.
pub fn scattered_boxes() -> Vec<Envelope> {
    envelopes(&[
        [87.0, 55.0, 87.0, 56.0], [38.0, 13.0, 39.0, 16.0], [7.0, 47.0, 8.0, 47.0], [89.0, 9.0, 91.0, 12.0],
        [4.0, 58.0, 5.0, 60.0], [0.0, 11.0, 1.0, 12.0], [0.0, 5.0, 0.0, 6.0], [69.0, 78.0, 73.0, 78.0],
        [56.0, 77.0, 57.0, 81.0], [23.0, 7.0, 24.0, 9.0], [68.0, 24.0, 70.0, 26.0], [31.0, 47.0, 33.0, 50.0],
        [11.0, 13.0, 14.0, 15.0], [1.0, 80.0, 1.0, 80.0], [72.0, 90.0, 72.0, 91.0], [59.0, 79.0, 61.0, 83.0],
        [98.0, 77.0, 101.0, 77.0], [11.0, 55.0, 14.0, 56.0], [98.0, 4.0, 100.0, 6.0], [21.0, 54.0, 23.0, 58.0],
        [44.0, 74.0, 48.0, 74.0], [70.0, 57.0, 70.0, 61.0], [32.0, 9.0, 33.0, 12.0], [43.0, 87.0, 44.0, 91.0],
        [38.0, 60.0, 38.0, 60.0], [62.0, 48.0, 66.0, 50.0], [16.0, 87.0, 19.0, 91.0], [5.0, 98.0, 9.0, 99.0],
        [9.0, 89.0, 10.0, 90.0], [89.0, 2.0, 92.0, 6.0], [41.0, 95.0, 45.0, 98.0], [57.0, 36.0, 61.0, 40.0],
        [50.0, 1.0, 52.0, 1.0], [93.0, 87.0, 96.0, 88.0], [29.0, 42.0, 33.0, 42.0], [34.0, 43.0, 36.0, 44.0],
        [41.0, 64.0, 42.0, 65.0], [87.0, 3.0, 88.0, 4.0], [56.0, 50.0, 56.0, 52.0], [32.0, 13.0, 35.0, 15.0],
        [3.0, 8.0, 5.0, 11.0], [16.0, 33.0, 18.0, 33.0], [35.0, 39.0, 38.0, 40.0], [74.0, 54.0, 78.0, 56.0],
        [92.0, 87.0, 95.0, 90.0], [12.0, 97.0, 16.0, 98.0], [76.0, 39.0, 78.0, 40.0], [16.0, 93.0, 18.0, 95.0],
        [62.0, 40.0, 64.0, 42.0], [71.0, 87.0, 71.0, 88.0], [60.0, 85.0, 63.0, 86.0], [39.0, 52.0, 39.0, 56.0],
        [15.0, 18.0, 19.0, 18.0], [91.0, 62.0, 94.0, 63.0], [10.0, 16.0, 10.0, 18.0], [5.0, 86.0, 8.0, 87.0],
        [85.0, 85.0, 88.0, 86.0], [44.0, 84.0, 44.0, 88.0], [3.0, 94.0, 3.0, 97.0], [79.0, 74.0, 81.0, 78.0],
        [21.0, 63.0, 24.0, 66.0], [16.0, 22.0, 16.0, 22.0], [68.0, 97.0, 72.0, 97.0], [39.0, 65.0, 42.0, 65.0],
        [51.0, 68.0, 52.0, 69.0], [61.0, 38.0, 61.0, 42.0], [31.0, 65.0, 31.0, 65.0], [16.0, 6.0, 19.0, 6.0],
        [66.0, 39.0, 66.0, 41.0], [57.0, 32.0, 59.0, 35.0], [54.0, 80.0, 58.0, 84.0], [5.0, 67.0, 7.0, 71.0],
        [49.0, 96.0, 51.0, 98.0], [29.0, 45.0, 31.0, 47.0], [31.0, 72.0, 33.0, 74.0], [94.0, 25.0, 95.0, 26.0],
        [14.0, 7.0, 18.0, 8.0], [29.0, 0.0, 31.0, 1.0], [48.0, 38.0, 48.0, 40.0], [34.0, 29.0, 34.0, 32.0],
        [99.0, 21.0, 100.0, 25.0], [79.0, 3.0, 79.0, 4.0], [87.0, 1.0, 87.0, 5.0], [9.0, 77.0, 9.0, 81.0],
        [23.0, 25.0, 25.0, 29.0], [83.0, 48.0, 86.0, 51.0], [79.0, 94.0, 79.0, 95.0], [33.0, 95.0, 33.0, 99.0],
        [1.0, 14.0, 1.0, 14.0], [33.0, 77.0, 34.0, 77.0], [94.0, 56.0, 98.0, 59.0], [75.0, 25.0, 78.0, 26.0],
        [17.0, 73.0, 20.0, 74.0], [11.0, 3.0, 12.0, 4.0], [45.0, 12.0, 47.0, 12.0], [38.0, 39.0, 39.0, 39.0],
        [99.0, 3.0, 103.0, 5.0], [41.0, 92.0, 44.0, 96.0], [79.0, 40.0, 79.0, 41.0], [29.0, 2.0, 29.0, 4.0],
    ])
}

/// 32 boxes of a small map sheet, used with segment targets.
pub fn map_boxes() -> Vec<Envelope> {
    envelopes(&[
        [6377.5, 3330.5, 6380.0, 3332.5], [6374.5, 3333.5, 6375.0, 3335.5], [6371.5, 3332.0, 6373.5, 3333.0],
        [6362.5, 3329.5, 6369.0, 3332.5], [6374.5, 3327.0, 6380.5, 3329.5], [6385.0, 3332.5, 6388.0, 3335.0],
        [6388.5, 3338.5, 6390.5, 3342.5], [6379.5, 3336.0, 6381.5, 3339.0], [6375.5, 3339.5, 6377.5, 3342.0],
        [6364.0, 3354.0, 6364.0, 3354.0], [6362.5, 3353.5, 6362.5, 3353.5], [6361.0, 3352.5, 6361.0, 3352.5],
        [6363.0, 3351.0, 6363.0, 3351.0], [6365.0, 3351.5, 6365.0, 3351.5], [6363.5, 3352.0, 6363.5, 3352.0],
        [6379.5, 3343.5, 6382.0, 3349.0], [6372.5, 3347.5, 6377.0, 3348.0], [6378.5, 3348.5, 6379.5, 3351.0],
        [6378.0, 3345.5, 6379.5, 3348.0], [6375.5, 3348.5, 6378.0, 3350.0], [6375.0, 3344.0, 6377.5, 3347.0],
        [6371.0, 3336.5, 6372.0, 3340.0], [6367.0, 3342.0, 6368.0, 3344.0], [6364.5, 3340.5, 6368.0, 3341.0],
        [6360.5, 3340.0, 6361.5, 3342.0], [6361.0, 3339.0, 6363.0, 3340.0], [6363.5, 3337.5, 6365.0, 3340.0],
        [6357.0, 3342.0, 6363.5, 3343.0], [6364.0, 3342.0, 6365.0, 3344.5], [6359.0, 3343.0, 6362.5, 3345.0],
        [6362.0, 3340.5, 6363.0, 3341.5], [6358.5, 3337.5, 6360.5, 3341.5],
    ])
}

/// Deterministic random boxes with sides up to `max_size` inside `[0, 1000]^2`.
pub fn random_boxes(count: usize, max_size: f64, seed: u64) -> Vec<Envelope> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.random_range(0.0..1000.0);
            let y = rng.random_range(0.0..1000.0);
            let w = rng.random_range(0.0..=max_size);
            let h = rng.random_range(0.0..=max_size);
            Envelope::new(x, y, x + w, y + h)
        })
        .collect()
}

// ============================================================================
// Reference implementations
// ============================================================================

/// Envelopes sorted by `(min_x, min_y, max_x, max_y)`, for order-free comparison.
pub fn sorted<'a>(items: impl IntoIterator<Item = &'a Envelope>) -> Vec<Envelope> {
    let mut items: Vec<Envelope> = items.into_iter().copied().collect();
    items.sort_by(|a, b| {
        let a = [a.min_x, a.min_y, a.max_x, a.max_y];
        let b = [b.min_x, b.min_y, b.max_x, b.max_y];
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    });
    items
}

/// Linear scan for items intersecting `query`.
pub fn brute_force_search(items: &[Envelope], query: &Envelope) -> Vec<Envelope> {
    sorted(items.iter().filter(|item| item.intersects(query)))
}

/// Squared distances of the `k` nearest items (all when `k == 0`) within `max_distance`.
pub fn brute_force_knn_distances(
    items: &[Envelope],
    target: &KnnTarget,
    k: usize,
    max_distance: Option<f64>,
) -> Vec<f64> {
    let mut distances: Vec<f64> = items
        .iter()
        .map(|item| target.squared_distance_to(item))
        .filter(|d| max_distance.map_or(true, |max| *d <= max * max))
        .collect();
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    if k > 0 {
        distances.truncate(k);
    }
    distances
}

pub fn is_sorted(values: &[f64], ascending: bool) -> bool {
    values.windows(2).all(|pair| {
        if ascending {
            pair[0] <= pair[1]
        } else {
            pair[0] >= pair[1]
        }
    })
}
