use rand::Rng;
use rbush::{Envelope, Point, RBush, SpatialResult};
use rbush_int_test::test_util::random_boxes;

fn main() -> SpatialResult<()> {
    colog::init();
    log::info!("Starting stress test...");

    let count = 1_000_000;
    let boxes = random_boxes(count, 5.0, 7);

    let start = std::time::Instant::now();
    let mut tree = RBush::new();
    for envelope in &boxes[..count / 2] {
        tree.insert(*envelope);
    }
    log::info!("Inserted {} items in {:?}", count / 2, start.elapsed());

    let start = std::time::Instant::now();
    tree.bulk_load(boxes[count / 2..].to_vec());
    log::info!(
        "Bulk loaded {} items in {:?}, height {}",
        count - count / 2,
        start.elapsed(),
        tree.height()
    );

    let mut rng = rand::rng();
    let start = std::time::Instant::now();
    let mut hits = 0;
    for _ in 0..10_000 {
        let x = rng.random_range(0.0..990.0);
        let y = rng.random_range(0.0..990.0);
        hits += tree.search_envelope(&Envelope::new(x, y, x + 10.0, y + 10.0)).len();
    }
    log::info!("Ran 10000 searches ({} hits) in {:?}", hits, start.elapsed());

    let start = std::time::Instant::now();
    for _ in 0..10_000 {
        let target = Point::new(rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0));
        tree.knn(10, target);
    }
    log::info!("Ran 10000 knn queries in {:?}", start.elapsed());

    let start = std::time::Instant::now();
    let mut removed = 0;
    for envelope in boxes.iter().step_by(10) {
        if tree.delete(envelope) {
            removed += 1;
        }
    }
    log::info!("Deleted {} items in {:?}", removed, start.elapsed());

    tree.validate()?;
    log::info!("Tree holds {} items, stats {:?}", tree.len(), tree.stats());
    Ok(())
}
