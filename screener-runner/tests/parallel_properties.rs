//! Property tests for the worker pool.
//!
//! For any mix of hits, misses, lookup failures and outages, and any thread
//! count, the pool yields the same report and failure sequence as the
//! sequential engine.

use proptest::prelude::*;
use screener_core::data::FixtureProvider;
use screener_core::domain::MetricsBundle;
use screener_core::engine::FailureLog;
use screener_core::strategy::ValueScreen;
use screener_runner::run_with_threads;

#[derive(Debug, Clone, Copy)]
enum Shape {
    Hit,
    Miss,
    Missing,
    Down,
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::Hit),
        Just(Shape::Miss),
        Just(Shape::Missing),
        Just(Shape::Down),
    ]
}

fn build(shapes: &[Shape]) -> (Vec<String>, FixtureProvider) {
    let mut provider = FixtureProvider::new();
    let mut symbols = Vec::new();
    for (i, shape) in shapes.iter().enumerate() {
        let symbol = format!("S{i:03}");
        match shape {
            Shape::Hit | Shape::Miss => {
                let eps = if matches!(shape, Shape::Hit) { 1.0 } else { -1.0 };
                provider.insert(
                    MetricsBundle::builder(&symbol)
                        .latest_eps(eps)
                        .market_cap(250_000_000.0)
                        .last_price(12.0)
                        .build()
                        .unwrap(),
                );
            }
            Shape::Missing => {}
            Shape::Down => provider = provider.with_unavailable(&symbol),
        }
        symbols.push(symbol);
    }
    (symbols, provider)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pool_matches_sequential(
        shapes in proptest::collection::vec(arb_shape(), 0..40),
        threads in 2usize..8,
    ) {
        let (symbols, provider) = build(&shapes);
        let strategy = ValueScreen::micro_cap();

        let seq_log = FailureLog::new();
        let seq = run_with_threads(&symbols, &strategy, &provider, &seq_log, 1).unwrap();
        let par_log = FailureLog::new();
        let par = run_with_threads(&symbols, &strategy, &provider, &par_log, threads).unwrap();

        prop_assert_eq!(seq.entries(), par.entries());
        prop_assert_eq!(seq.attempted(), symbols.len());
        prop_assert_eq!(par.attempted(), symbols.len());
        prop_assert_eq!(seq.failed(), par.failed());
        prop_assert_eq!(seq_log.into_failures(), par_log.into_failures());

        let expected_hits = shapes.iter().filter(|s| matches!(s, Shape::Hit)).count();
        prop_assert_eq!(par.len(), expected_hits);
    }
}
