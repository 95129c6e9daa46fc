use criterion::{black_box, criterion_group, criterion_main, Criterion};
use growth_screening::{Age, EngineConfig, Gender, ScreeningRequest, Screener};
use std::path::PathBuf;

fn fixture_screener() -> Screener {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/who");
    Screener::from_config(&EngineConfig::default().with_data_dir(dir))
        .unwrap_or_else(|e| panic!("fixture tables failed to load: {}", e))
}

fn make_requests(n: usize) -> Vec<ScreeningRequest> {
    (0..n)
        .map(|i| {
            let age = (i % 61) as f64;
            ScreeningRequest {
                name: None,
                gender: if i % 2 == 0 { Gender::Male } else { Gender::Female },
                age: Age::months(age),
                // Spread around the medians so every rule fires somewhere
                height_cm: 48.0 + age * 0.75 + (i % 7) as f64 - 3.0,
                weight_kg: 3.2 + age * 0.2 + ((i % 5) as f64 - 2.0) * 0.6,
            }
        })
        .collect()
}

fn bench_screening(c: &mut Criterion) {
    let screener = fixture_screener();

    c.bench_function("screen single child", |b| {
        b.iter(|| screener.screen(black_box(Gender::Female), black_box(24.0), black_box(80.0), black_box(10.5)))
    });

    c.bench_function("screen_z inference only", |b| {
        b.iter(|| screener.screen_z(black_box(-2.4), black_box(-1.8)))
    });

    let requests = make_requests(10_000);
    c.bench_function("screen_batch 10k requests", |b| {
        b.iter(|| screener.screen_batch(black_box(&requests)))
    });
}

criterion_group!(benches, bench_screening);
criterion_main!(benches);
