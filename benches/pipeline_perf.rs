
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use claimscope::config::EngineConfig;
use claimscope::pipeline::run_analysis;
use claimscope::recommend::generate_recommendations;
use claimscope::summary::calculate_summary;

use fixtures::{LARGE, MEDIUM, SMALL, build_table};

// ── Group 1: summary — single-pass aggregation over the claims table ────────

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary");
    for &n in &[SMALL, MEDIUM, LARGE] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || build_table(n),
                |table| calculate_summary(&table),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

// ── Group 2: recommendations — group, rank, and price mitigation actions ────

fn bench_recommendations(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommendations");
    let config = EngineConfig::canonical();
    for &n in &[SMALL, MEDIUM, LARGE] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let table = build_table(n);
            let summary = calculate_summary(&table).unwrap();
            b.iter(|| generate_recommendations(&table, &summary, &config))
        });
    }
    group.finish();
}

// ── Group 3: full_analysis — summary → risk → recommendations ───────────────

fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis");
    let config = EngineConfig::canonical();
    for &n in &[SMALL, MEDIUM, LARGE] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let table = build_table(n);
            b.iter(|| run_analysis(&table, &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_summary, bench_recommendations, bench_full_analysis);
criterion_main!(benches);
