use criterion::{black_box, criterion_group, criterion_main, Criterion};
use page_bench::measurement::MonotonicClock;
use page_bench::routines::DEFAULT_CASES;
use page_bench::{measure, ActiveSource, Harness, Registry, TimeSource};

fn bench_marks(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_source");

    let mut active = ActiveSource::default();
    active.enable().expect("active source should enable");
    group.bench_function(format!("mark/{}", active.name()), |b| {
        b.iter(|| black_box(active.mark()))
    });
    group.bench_function(format!("bracket/{}", active.name()), |b| {
        b.iter(|| black_box(measure(&active, || {}).elapsed(&active)))
    });

    let clock = MonotonicClock::new();
    group.bench_function("mark/monotonic", |b| b.iter(|| black_box(clock.mark())));
    group.finish();
}

fn bench_harness(c: &mut Criterion) {
    let registry = Registry::from_cases(DEFAULT_CASES).expect("built-in registry is valid");
    let harness = Harness::new().system_checks(false);

    let mut group = c.benchmark_group("harness");
    group.sample_size(20);
    group.bench_function("default_registry", |b| {
        b.iter(|| {
            // Output goes to a sink; only the harness overhead is of interest.
            let report = harness
                .run(&registry, &mut std::io::sink())
                .expect("run should succeed");
            black_box(report.records.len())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_marks, bench_harness);
criterion_main!(benches);
