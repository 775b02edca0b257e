//! Benchmarks for variant generation and scan buffering
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use depot::scanner::{Key, ScanBuffer, DEFAULT_INTER_KEY_TIMEOUT, DEFAULT_SCAN_TIMEOUT};
use depot::variants::{cartesian_values, regenerate, VariantMatrix, VariationAxis};
use std::time::Duration;
use tokio::time::Instant;

fn axes(per_axis: usize) -> Vec<VariationAxis> {
    ["Size", "Color", "Material"]
        .iter()
        .map(|name| {
            VariationAxis::new(*name, (0..per_axis).map(|i| format!("{}{}", name, i)))
        })
        .collect()
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("variants");

    for per_axis in [3, 6, 10] {
        let axes = axes(per_axis);
        let combos = per_axis.pow(3) as u64;
        group.throughput(Throughput::Elements(combos));

        group.bench_function(format!("cartesian_{}", combos), |b| {
            b.iter(|| cartesian_values(black_box(&axes)))
        });

        let previous = regenerate(&axes, &[]);
        let mut narrowed = axes.clone();
        narrowed[1].options.pop();

        group.bench_function(format!("regenerate_preserving_{}", combos), |b| {
            b.iter(|| regenerate(black_box(&narrowed), black_box(&previous)))
        });
    }

    group.finish();
}

fn bench_matrix_validation(c: &mut Criterion) {
    let mut matrix = VariantMatrix::new();
    matrix.add_axis("Size", ["XS", "S", "M", "L", "XL"]);
    matrix.add_axis("Color", ["Red", "Blue", "Green", "Black"]);
    for (i, combo) in matrix.combinations_mut().iter_mut().enumerate() {
        combo.fields.description = format!("Generated variant number {}", i);
        combo.fields.price = Some(9.99);
        combo.fields.barcodes[0] = format!("0000000{:05}", i);
    }

    let universal_barcodes: Vec<String> = Vec::new();
    c.bench_function("validate_20_combinations", |b| {
        b.iter(|| matrix.validate(black_box(&universal_barcodes)))
    });
}

fn bench_scan_buffer(c: &mut Criterion) {
    let barcode = "012345678905";

    c.bench_function("scan_buffer_burst", |b| {
        let mut buffer = ScanBuffer::new(DEFAULT_INTER_KEY_TIMEOUT, DEFAULT_SCAN_TIMEOUT);
        let start = Instant::now();
        b.iter(|| {
            buffer.start(start);
            let mut now = start;
            for ch in barcode.chars() {
                now += Duration::from_millis(5);
                buffer.key(Key::Char(ch), now);
            }
            buffer.key(Key::Enter, now + Duration::from_millis(5))
        })
    });
}

criterion_group!(benches, bench_generation, bench_matrix_validation, bench_scan_buffer);
criterion_main!(benches);
