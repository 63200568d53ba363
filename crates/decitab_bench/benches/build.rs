//! Table construction benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use decitab_bench::{generate_rows, rate_schema};
use decitab_core::{IndexBuilder, LookupTable};

/// Benchmark building tables of increasing size.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for (regions, bands) in [(10, 10), (100, 100), (1000, 100)].iter() {
        let rows = generate_rows(*regions, *bands);
        group.throughput(Throughput::Elements(rows.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(rows.len()),
            &rows,
            |b, rows| {
                b.iter(|| {
                    let table = LookupTable::build(rate_schema(), black_box(rows.clone())).unwrap();
                    black_box(table);
                });
            },
        );
    }
    group.finish();
}

/// Benchmark many bands under a single region, which stresses range inserts.
fn bench_build_single_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_single_region");

    for bands in [100, 1000, 10_000].iter() {
        let rows = generate_rows(1, *bands);
        group.throughput(Throughput::Elements(*bands as u64));
        group.bench_with_input(BenchmarkId::from_parameter(bands), &rows, |b, rows| {
            b.iter(|| {
                let mut builder = IndexBuilder::new(rate_schema()).unwrap();
                builder.extend(black_box(rows.clone())).unwrap();
                black_box(builder.build().unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_build_single_region);
criterion_main!(benches);
