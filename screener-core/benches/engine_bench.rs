//! Criterion benchmarks for screener hot paths.
//!
//! Benchmarks:
//! 1. Strategy evaluation over a single bundle
//! 2. Full engine run over a fixture universe

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use screener_core::data::FixtureProvider;
use screener_core::domain::MetricsBundle;
use screener_core::engine::{NoProgress, ScreeningEngine};
use screener_core::strategy::StrategyRegistry;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bundles(n: usize) -> Vec<MetricsBundle> {
    (0..n)
        .map(|i| {
            let wave = (i as f64 * 0.37).sin();
            MetricsBundle::builder(format!("S{i:05}"))
                .latest_eps(wave * 3.0)
                .market_cap(50_000_000.0 + (i % 40) as f64 * 25_000_000.0)
                .last_price(10.0 + wave.abs() * 40.0)
                .shares_outstanding(5_000_000.0)
                .largest_trade(1_000.0 + (i % 50) as f64 * 1_000.0, Some("NASDAQ"))
                .news_story_count((i % 3) as u32)
                .eps_surprise_pct(wave * 10.0)
                .debt(if i % 4 == 0 { 0.0 } else { 1.0e6 })
                .short_ratio((i % 15) as f64)
                .build()
                .unwrap()
        })
        .collect()
}

// ── 1. Strategy evaluation ───────────────────────────────────────────

fn bench_evaluate(c: &mut Criterion) {
    let bundles = make_bundles(1_000);
    let registry = StrategyRegistry::builtin();
    let mut group = c.benchmark_group("evaluate");

    for strategy in registry.iter() {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                bundles
                    .iter()
                    .filter(|bundle| strategy.evaluate(black_box(bundle)).is_some())
                    .count()
            })
        });
    }
    group.finish();
}

// ── 2. Engine run ────────────────────────────────────────────────────

fn bench_engine_run(c: &mut Criterion) {
    let registry = StrategyRegistry::builtin();
    let mut group = c.benchmark_group("engine_run");

    for n in [100usize, 1_000, 5_000] {
        let bundles = make_bundles(n);
        let symbols: Vec<String> = bundles.iter().map(|b| b.symbol().to_string()).collect();
        let provider = FixtureProvider::from_bundles(bundles);
        let strategy = registry.get("small_cap_value").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &symbols, |b, symbols| {
            b.iter(|| {
                ScreeningEngine::new().run_observed(
                    black_box(symbols),
                    strategy,
                    &provider,
                    &NoProgress,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_engine_run);
criterion_main!(benches);
