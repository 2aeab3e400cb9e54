//! Document building and identity benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seriesdoc_bench::synthetic_points;
use seriesdoc_core::{identity, DocumentBuilder, MergeLabel, OutputModes};

/// Benchmark building one point per output mode combination.
fn bench_build_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_modes");
    let point = &synthetic_points("prs", 1, 4, 8)[0];

    let cases = [
        ("wide", OutputModes::none().with_wide(true)),
        ("array", OutputModes::none().with_array(true)),
        ("flat", OutputModes::none().with_flat(true)),
        ("all", OutputModes::all()),
    ];
    for (name, modes) in cases {
        let builder = DocumentBuilder::new(modes, None);
        group.bench_function(name, |b| {
            b.iter(|| black_box(builder.build(black_box(point)).unwrap()));
        });
    }

    let merged = DocumentBuilder::new(OutputModes::all(), MergeLabel::new("all").ok());
    group.bench_function("all_merged", |b| {
        b.iter(|| black_box(merged.build(black_box(point)).unwrap()));
    });

    group.finish();
}

/// Benchmark building batches of points.
fn bench_build_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_batch");
    let builder = DocumentBuilder::new(OutputModes::all(), None);

    for count in [10, 100, 1000].iter() {
        let points = synthetic_points("prs", *count, 2, 4);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| black_box(builder.build_all(points.iter()).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark identity hashing per key field count.
fn bench_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity");
    let point = &synthetic_points("prs", 1, 2, 4)[0];
    let docs = DocumentBuilder::new(OutputModes::all(), MergeLabel::new("all").ok())
        .build(point)
        .unwrap();

    for keyed in &docs {
        let id = BenchmarkId::new(format!("{:?}", keyed.kind), keyed.keys.len());
        group.bench_with_input(id, keyed, |b, keyed| {
            b.iter(|| black_box(identity(black_box(&keyed.document), keyed.keys).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_modes, bench_build_batch, bench_identity);

criterion_main!(benches);
