// Criterion benchmarks for WonderCare Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wondercare_match::core::{normalize::extract_expertise, normalize::extract_services, Matcher};
use wondercare_match::models::{Availability, Day, Expertise, MatchQuery, Provider, Service};

fn create_provider(id: usize) -> Provider {
    let services = [Service::WoundCare, Service::Medication, Service::HomeCare, Service::Stoma];
    Provider {
        id: format!("n-{}", id),
        name: format!("Nurse {}", id),
        city: "Tel Aviv".to_string(),
        lat: if id % 7 == 0 { None } else { Some(32.0 + (id % 100) as f64 * 0.005) },
        lng: if id % 7 == 0 { None } else { Some(34.7 + (id % 50) as f64 * 0.005) },
        rating: 3.0 + (id % 20) as f64 * 0.1,
        reviews_count: (id % 300) as u32,
        services: vec![services[id % 4], services[(id + 1) % 4]],
        expertise: if id % 2 == 0 { vec![Expertise::NightShift] } else { vec![Expertise::DayShift] },
        availability: vec![Availability {
            day: Day::ALL[id % 7],
            slots: vec!["morning".to_string(), "evening".to_string()],
        }],
    }
}

fn create_query() -> MatchQuery {
    MatchQuery {
        lat: Some(32.0853),
        lng: Some(34.7818),
        radius_km: Some(25.0),
        services: vec![Service::WoundCare, Service::HomeCare],
        expertise: vec![Expertise::NightShift],
        day: Some(Day::Mon),
        slot: Some("morning".to_string()),
        min_rating: Some(3.5),
        ..Default::default()
    }
}

fn bench_normalizer(c: &mut Criterion) {
    c.bench_function("extract_services", |b| {
        b.iter(|| {
            extract_services(
                black_box(Some("DAY_NIGHT_CIRCUMCISION_NURSE")),
                black_box(Some("Home nurse Dana")),
                black_box(Some("wound dressing and meds, urgent at night")),
            )
        });
    });

    c.bench_function("extract_expertise", |b| {
        b.iter(|| {
            extract_expertise(
                black_box(Some("WHEELCHAIR")),
                black_box(Some("ACTIVE")),
                black_box(Some("daytime urgent transfer at night")),
            )
        });
    });
}

fn bench_rank(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let query = create_query();
    let mut group = c.benchmark_group("rank");

    for size in [100usize, 1_000, 10_000] {
        let providers: Vec<Provider> = (0..size).map(create_provider).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &providers, |b, providers| {
            b.iter(|| matcher.rank(black_box(&query), black_box(providers)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalizer, bench_rank);
criterion_main!(benches);
