use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::prelude::SmallRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use toolbox_rs::entities::{ContainerKey, ContainerKind, ItemId, Session, Toolbox};
use toolbox_rs::geometry::primitives::{Point, Rect};
use toolbox_rs::util::PlacementConfig;

criterion_main!(benches);
criterion_group!(benches, validate_bench, find_nearby_bench);

const N_SAMPLES: usize = 1000;
const FILL_ATTEMPTS: [usize; 3] = [10, 100, 1000];

/// Fills a single 40 x 2 drawer by dropping small items at random positions
fn filled_drawer(n_attempts: usize, rng: &mut SmallRng) -> (Session, ContainerKey, Vec<ItemId>) {
    let toolbox = Toolbox::new(40.0, 12.0, 6.0).unwrap();
    let mut session = Session::new(toolbox, PlacementConfig::default()).unwrap();
    let items = (0..5)
        .map(|i| {
            let size = 0.5 + 0.25 * i as f32;
            session.catalog_mut().add_item(format!("Part {i}"), size, size).unwrap()
        })
        .collect::<Vec<_>>();
    let key = session.add_container(ContainerKind::Drawer);
    session.select_container(key).unwrap();

    for _ in 0..n_attempts {
        let item = items[rng.random_range(0..items.len())];
        let requested = Point(rng.random_range(0.0..40.0), rng.random_range(0.0..2.0));
        let _ = session.place_item(item, requested);
    }
    (session, key, items)
}

fn sample_rects(session: &Session, items: &[ItemId], rng: &mut SmallRng) -> Vec<Rect> {
    (0..N_SAMPLES)
        .map(|_| {
            let item = session.catalog().item(items[rng.random_range(0..items.len())]).unwrap();
            item.rect_at(Point(rng.random_range(0.0..40.0), rng.random_range(0.0..2.0)))
        })
        .collect()
}

/// Validates 1000 random requests against drawers of increasing density
fn validate_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_bench");
    for n_attempts in FILL_ATTEMPTS {
        let mut rng = SmallRng::seed_from_u64(0);
        let (session, key, items) = filled_drawer(n_attempts, &mut rng);
        let rects = sample_rects(&session, &items, &mut rng);
        let n_placed = session.container(key).unwrap().placements().len();

        group.bench_function(BenchmarkId::from_parameter(n_placed), |b| {
            b.iter(|| {
                for rect in &rects {
                    black_box(session.validate_placement(key, rect, None).unwrap());
                }
            })
        });
    }
    group.finish();
}

/// Searches a nearby position for 1000 random requests against drawers of increasing density
fn find_nearby_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_nearby_bench");
    for n_attempts in FILL_ATTEMPTS {
        let mut rng = SmallRng::seed_from_u64(0);
        let (session, key, items) = filled_drawer(n_attempts, &mut rng);
        let rects = sample_rects(&session, &items, &mut rng);
        let n_placed = session.container(key).unwrap().placements().len();

        group.bench_function(BenchmarkId::from_parameter(n_placed), |b| {
            b.iter(|| {
                for rect in &rects {
                    black_box(session.find_nearby_valid_position(key, rect, None).unwrap());
                }
            })
        });
    }
    group.finish();
}
