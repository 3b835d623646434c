use std::time::Duration;

use cellstore::{PoiStore, Region, Room};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn benchmark_store_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_operations");

    // Benchmark single store (one write transaction per call)
    let dir = tempfile::tempdir().unwrap();
    let store = PoiStore::open(dir.path().join("poi.redb")).unwrap();
    group.bench_function("single_store", |b| {
        let mut counter = 0u64;
        b.iter(|| {
            let lat = 39.578967 + ((counter % 1000) as f64) * 0.0001;
            let lng = 3.098145 + ((counter % 1000) as f64) * 0.0001;
            let room = Room::new(counter, "EUR", format!("room {}", counter), lat, lng);
            counter += 1;
            store.store(black_box(room), black_box(lat), black_box(lng)).unwrap()
        })
    });

    // Benchmark store with relocation (the room hops between two cells)
    let dir = tempfile::tempdir().unwrap();
    let store = PoiStore::open(dir.path().join("poi.redb")).unwrap();
    group.bench_function("store_relocation", |b| {
        let mut counter = 0u64;
        b.iter(|| {
            let lng = if counter % 2 == 0 { 3.098145 } else { 3.198145 };
            counter += 1;
            let room = Room::new(1, "EUR", "hopper", 39.578967, lng);
            store.store(black_box(room), black_box(39.578967), black_box(lng)).unwrap()
        })
    });

    group.finish();
}

fn benchmark_query_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_operations");

    let dir = tempfile::tempdir().unwrap();
    let store = PoiStore::open(dir.path().join("poi.redb")).unwrap();

    // Setup data for queries
    let base_lat = 39.578967;
    let base_lng = 3.098145;
    for i in 0..1000u64 {
        let lng = base_lng + (i as f64) * 0.0001;
        store
            .store(Room::new(i, "EUR", format!("room {}", i), base_lat, lng), base_lat, lng)
            .unwrap();
    }

    group.bench_function("radius_query_15km", |b| {
        b.iter(|| {
            store
                .find_in_radius(black_box(base_lat), black_box(base_lng), black_box(15_000.0))
                .unwrap()
        })
    });

    group.bench_function("radius_query_cold_cache", |b| {
        b.iter(|| {
            store.clear_cache();
            store
                .find_in_radius(black_box(base_lat), black_box(base_lng), black_box(15_000.0))
                .unwrap()
        })
    });

    group.bench_function("rect_query", |b| {
        b.iter(|| {
            store
                .find_in_rect(black_box((39.57, 3.09)), black_box((39.59, 3.21)))
                .unwrap()
        })
    });

    group.bench_function("nearest_10", |b| {
        b.iter(|| {
            store
                .find_nearest(
                    black_box(base_lat),
                    black_box(base_lng),
                    black_box(15_000.0),
                    black_box(10),
                )
                .unwrap()
        })
    });

    group.bench_function("full_scan", |b| b.iter(|| store.find_all().unwrap()));

    group.bench_function("display_covering", |b| {
        let region = Region::circle(base_lat, base_lng, 15_000.0);
        b.iter(|| store.display_covering(black_box(&region)).unwrap())
    });

    group.finish();
}

fn benchmark_dataset_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("dataset_scaling");
    group.sample_size(10); // Fewer samples for large datasets
    group.measurement_time(Duration::from_secs(20));

    for dataset_size in [100u64, 1000, 5000].iter() {
        let dir = tempfile::tempdir().unwrap();
        let store = PoiStore::open(dir.path().join("poi.redb")).unwrap();

        // Pre-populate with rooms along a line
        for i in 0..*dataset_size {
            let lat = 40.0 + (i as f64) * 0.00001;
            let lng = -74.0 + (i as f64) * 0.00001;
            store
                .store(Room::new(i, "USD", format!("room {}", i), lat, lng), lat, lng)
                .unwrap();
        }

        group.bench_with_input(
            BenchmarkId::new("radius_query", dataset_size),
            dataset_size,
            |b, &_size| {
                b.iter(|| {
                    store
                        .find_in_radius(black_box(40.0), black_box(-74.0), black_box(10_000.0))
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_store_operations,
    benchmark_query_operations,
    benchmark_dataset_scaling
);

criterion_main!(benches);
