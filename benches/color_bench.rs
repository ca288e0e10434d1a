//! Benchmarks for heatmap color mapping and grid layout
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use heatwatch::heatmap::{color_scale, HeatmapGrid};

fn create_test_values(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| ((i as f64) * 0.37).sin() * 100.0)
        .collect()
}

fn bench_color_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("color_scale");

    for size in [100, 1000, 10000] {
        let values = create_test_values(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("scale_{}", size), |b| {
            b.iter(|| color_scale(black_box(&values)))
        });
    }

    group.finish();
}

fn bench_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");

    for size in [100, 1000] {
        let values = create_test_values(size);
        let raw: Vec<f64> = values.iter().map(|v| v.abs() * 1000.0).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("build_{}", size), |b| {
            b.iter(|| HeatmapGrid::build(black_box(&values), black_box(&raw), 5))
        });
    }

    group.finish();
}

fn bench_rgb(c: &mut Criterion) {
    let colors = color_scale(&create_test_values(1000));

    c.bench_function("to_rgb_1000", |b| {
        b.iter(|| {
            colors
                .iter()
                .map(|c| black_box(c).to_rgb())
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, bench_color_scale, bench_grid_build, bench_rgb);
criterion_main!(benches);
