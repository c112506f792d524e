use criterion::{black_box, criterion_group, criterion_main, Criterion};

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use hams_cache::{
    AsyncHealthProbe, CachedHealthProbe, HealthCheckContext, HealthCheckRegistration, Manual,
    ManualClock,
};
use tokio_util::sync::CancellationToken;

fn cached_benchmark(c: &mut Criterion) {
    let mut cached_group = c.benchmark_group("Cached");
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");

    let context = HealthCheckContext::new(HealthCheckRegistration::new("bench"));
    let cancel = CancellationToken::new();

    cached_group.bench_function("inner probe", |b| {
        let probe = Manual::new("bench", true);

        b.to_async(&rt)
            .iter(|| async { black_box(&probe).check(&context, &cancel).await });
    });

    cached_group.bench_function("cache hit", |b| {
        let clock = ManualClock::new(SystemTime::UNIX_EPOCH);
        let cached = CachedHealthProbe::new(
            Manual::new("bench", true),
            Duration::from_secs(30),
            Arc::new(clock),
        );

        b.to_async(&rt)
            .iter(|| async { black_box(&cached).check(&context, &cancel).await });
    });

    cached_group.bench_function("cache miss", |b| {
        let clock = ManualClock::new(SystemTime::UNIX_EPOCH);
        let cached = CachedHealthProbe::new(Manual::new("bench", true), Duration::ZERO, Arc::new(clock));

        b.to_async(&rt)
            .iter(|| async { black_box(&cached).check(&context, &cancel).await });
    });

    cached_group.finish();
}

criterion_group!(benches, cached_benchmark);
criterion_main!(benches);
