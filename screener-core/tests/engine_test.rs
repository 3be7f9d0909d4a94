//! End-to-end screening tests against in-memory providers.
//!
//! Covers the documented batch examples, fault isolation, call counts and
//! fail-fast strategy selection.

use std::sync::atomic::{AtomicUsize, Ordering};

use mockall::mock;
use screener_core::data::{FetchError, FixtureProvider, MetricsProvider};
use screener_core::domain::{HitDetails, MetricsBundle};
use screener_core::engine::{FailureLog, NoProgress, ScreeningEngine};
use screener_core::strategy::{
    LargeTradeScreen, ScreenStrategy, StrategyError, StrategyRegistry, ValueScreen,
};

mock! {
    pub Provider {}

    impl MetricsProvider for Provider {
        fn name(&self) -> &str;
        fn fetch(&self, symbol: &str) -> Result<MetricsBundle, FetchError>;
    }
}

/// Provider that counts fetches and fails on one chosen symbol.
struct CountingProvider {
    inner: FixtureProvider,
    fail_on: Option<&'static str>,
    calls: AtomicUsize,
}

impl CountingProvider {
    fn new(inner: FixtureProvider) -> Self {
        Self {
            inner,
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_on(mut self, symbol: &'static str) -> Self {
        self.fail_on = Some(symbol);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn fetch(&self, symbol: &str) -> Result<MetricsBundle, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == Some(symbol) {
            return Err(FetchError::unavailable("upstream timed out"));
        }
        self.inner.fetch(symbol)
    }
}

fn value_fixture() -> FixtureProvider {
    FixtureProvider::from_bundles([
        MetricsBundle::builder("AAA")
            .latest_eps(2.0)
            .market_cap(200_000_000.0)
            .last_price(20.0)
            .build()
            .unwrap(),
        MetricsBundle::builder("BBB")
            .latest_eps(-1.0)
            .market_cap(150_000_000.0)
            .last_price(5.0)
            .build()
            .unwrap(),
        MetricsBundle::builder("CCC")
            .latest_eps(0.5)
            .market_cap(300_000_000.0)
            .last_price(4.0)
            .build()
            .unwrap(),
    ])
}

fn trade_fixture() -> FixtureProvider {
    FixtureProvider::from_bundles([
        MetricsBundle::builder("X")
            .shares_outstanding(1_000_000.0)
            .largest_trade(6_000.0, Some("NASDAQ"))
            .build()
            .unwrap(),
        MetricsBundle::builder("Y")
            .shares_outstanding(1_000_000.0)
            .largest_trade(4_000.0, Some("NYSE"))
            .build()
            .unwrap(),
    ])
}

#[test]
fn micro_cap_value_batch() {
    let report = ScreeningEngine::new().run(
        &["AAA", "BBB"],
        &ValueScreen::micro_cap(),
        &value_fixture(),
    );

    assert_eq!(report.len(), 1);
    let entry = &report.entries()[0];
    assert_eq!(entry.symbol, "AAA");
    match &entry.details {
        HitDetails::Value {
            market_cap,
            last_price,
            multiple,
        } => {
            assert_eq!(*market_cap, 200_000_000.0);
            assert_eq!(*last_price, 20.0);
            assert!((multiple - 10.0).abs() < 1e-12);
        }
        other => panic!("unexpected details {other:?}"),
    }
}

#[test]
fn large_trade_batch() {
    let report =
        ScreeningEngine::new().run(&["X", "Y"], &LargeTradeScreen::default(), &trade_fixture());

    assert_eq!(report.symbols(), vec!["X"]);
    match &report.entries()[0].details {
        HitDetails::LargeTrade {
            magnitude, venue, ..
        } => {
            assert!((magnitude - 0.006).abs() < 1e-12);
            assert_eq!(venue.as_deref(), Some("NASDAQ"));
        }
        other => panic!("unexpected details {other:?}"),
    }
}

#[test]
fn failure_in_the_middle_does_not_stop_the_batch() {
    let provider = CountingProvider::new(value_fixture()).failing_on("BBB");
    let log = FailureLog::new();

    let report = ScreeningEngine::new().run_observed(
        &["AAA", "BBB", "CCC"],
        &ValueScreen::micro_cap(),
        &provider,
        &log,
    );

    assert_eq!(provider.calls(), 3);
    assert_eq!(report.symbols(), vec!["AAA", "CCC"]);
    assert_eq!(report.attempted(), 3);
    assert_eq!(report.failed(), 1);

    let failures = log.into_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].symbol, "BBB");
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].error.kind(), "provider_unavailable");
}

#[test]
fn every_symbol_is_fetched_exactly_once() {
    let provider = CountingProvider::new(value_fixture());
    let symbols = ["AAA", "BBB", "CCC", "MISSING", "AAA"];

    let report = ScreeningEngine::new().run_observed(
        &symbols,
        &ValueScreen::small_cap(),
        &provider,
        &NoProgress,
    );

    assert_eq!(provider.calls(), symbols.len());
    assert_eq!(report.attempted(), symbols.len());
    // Duplicates in the input are screened twice and kept twice.
    assert_eq!(report.symbols(), vec!["AAA", "CCC", "AAA"]);
}

#[test]
fn entries_keep_input_order() {
    let report = ScreeningEngine::new().run(
        &["CCC", "BBB", "AAA"],
        &ValueScreen::micro_cap(),
        &value_fixture(),
    );
    assert_eq!(report.symbols(), vec!["CCC", "AAA"]);
}

#[test]
fn repeated_runs_give_equal_reports() {
    let engine = ScreeningEngine::new();
    let provider = value_fixture();
    let symbols = ["AAA", "BBB", "CCC", "NOPE"];

    let first = engine.run(&symbols, &ValueScreen::micro_cap(), &provider);
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = engine.run(&symbols, &ValueScreen::micro_cap(), &provider);
    assert_eq!(first, second);
}

#[test]
fn mocked_provider_called_once_per_symbol() {
    let mut provider = MockProvider::new();
    provider
        .expect_fetch()
        .withf(|symbol: &str| symbol == "AAA")
        .times(1)
        .returning(|_| {
            Ok(MetricsBundle::builder("AAA")
                .latest_eps(1.0)
                .market_cap(1_000_000_000.0)
                .last_price(12.5)
                .build()
                .unwrap())
        });

    let report = ScreeningEngine::new().run(&["AAA"], &ValueScreen::small_cap(), &provider);
    assert_eq!(report.symbols(), vec!["AAA"]);
}

#[test]
fn mocked_lookup_failure_is_skipped() {
    let mut provider = MockProvider::new();
    provider
        .expect_fetch()
        .times(2)
        .returning(|symbol| Err(FetchError::lookup(symbol, "unknown ticker")));

    let report = ScreeningEngine::new().run(&["NOPE", "NADA"], &ValueScreen::micro_cap(), &provider);
    assert!(report.is_empty());
    assert_eq!(report.failed(), 2);
}

#[test]
fn unknown_strategy_makes_no_fetches() {
    let provider = CountingProvider::new(value_fixture());
    let result = ScreeningEngine::new().run_named(
        &["AAA", "BBB"],
        &StrategyRegistry::builtin(),
        "mega_cap_growth",
        &provider,
    );

    assert_eq!(
        result.unwrap_err(),
        StrategyError::UnknownStrategy("mega_cap_growth".into())
    );
    assert_eq!(provider.calls(), 0);
}

#[test]
fn run_named_uses_registered_strategy() {
    let registry = StrategyRegistry::builtin();
    let strategy = registry.get("micro_cap_value").unwrap();
    assert!(!strategy.description().is_empty());

    let report = ScreeningEngine::new()
        .run_named(&["AAA", "BBB"], &registry, "micro_cap_value", &value_fixture())
        .unwrap();
    assert_eq!(report.strategy(), "micro_cap_value");
    assert_eq!(report.symbols(), vec!["AAA"]);
}
