// Criterion benchmarks for Kovari Algo

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kovari_algo::core::{calculate_compatibility, haversine_distance, Matcher, ScoringWeights};
use kovari_algo::models::{BoostKey, Coordinates, Destination, FilterBoost, StaticAttributes, TripProfile};
use kovari_algo::training::extract_features;

fn create_candidate(id: usize, lat: f64, lon: f64) -> TripProfile {
    TripProfile {
        user_id: id.to_string(),
        destination: Some(Destination::new("Goa", lat, lon)),
        home_location: Some(Coordinates::new(19.0760, 72.8777)),
        budget: 10000.0 + (id % 20) as f64 * 1500.0,
        trip_start: Some(Utc.with_ymd_and_hms(2025, 12, 1 + (id % 10) as u32, 0, 0, 0).unwrap()),
        trip_end: Some(Utc.with_ymd_and_hms(2025, 12, 15 + (id % 10) as u32, 0, 0, 0).unwrap()),
        attributes: StaticAttributes {
            age: Some(21.0 + (id % 15) as f64),
            interests: vec!["beaches".to_string(), if id % 2 == 0 { "nightlife" } else { "food" }.to_string()],
            ..Default::default()
        },
    }
}

fn create_user() -> TripProfile {
    TripProfile {
        user_id: "current_user".to_string(),
        home_location: Some(Coordinates::new(12.9716, 77.5946)),
        ..create_candidate(0, 15.2993, 74.1240)
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(15.2993),
                black_box(74.1240),
                black_box(15.4909),
                black_box(73.8278),
            )
        });
    });
}

fn bench_pair_scoring(c: &mut Criterion) {
    let user = create_user();
    let candidate = create_candidate(7, 15.49, 73.82);
    let weights = ScoringWeights::default();

    c.bench_function("calculate_compatibility", |b| {
        b.iter(|| calculate_compatibility(black_box(&user), black_box(&candidate), &weights));
    });

    c.bench_function("extract_features", |b| {
        b.iter(|| extract_features(black_box(&user), black_box(&candidate)));
    });
}

fn bench_find_matches(c: &mut Criterion) {
    let matcher = Matcher::default();
    let user = create_user();
    let boost = FilterBoost::new().with(BoostKey::Interests, None, 1.5);

    let mut group = c.benchmark_group("find_matches");

    for size in [100, 1000, 5000].iter() {
        let candidates: Vec<TripProfile> = (0..*size)
            .map(|i| {
                // Spread candidates over ~4 degrees so some fall outside the radius
                let lat = 13.3 + (i % 100) as f64 * 0.04;
                let lon = 73.1 + (i / 100 % 50) as f64 * 0.04;
                create_candidate(i, lat, lon)
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| matcher.find_matches(black_box(&user), black_box(&candidates), Some(&boost), 20));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_haversine_distance, bench_pair_scoring, bench_find_matches);
criterion_main!(benches);
