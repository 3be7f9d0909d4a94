//! Screening engine: fetch → evaluate → collect over one symbol batch.
//!
//! The loop is strictly sequential and attempts every symbol exactly once.
//! A fetch failure is reported to the observer and the loop moves on; it can
//! never abort the batch. Bundles are dropped as soon as the strategy has
//! looked at them, so only hit entries outlive an iteration.
//!
//! `screen_symbol` and `ReportAccumulator` are public so other executors
//! (the runner's worker pool) produce byte-for-byte the same report.

pub mod progress;

pub use progress::{
    FailureLog, NoProgress, ScreenProgress, ScreenSummary, SymbolFailure, TracingProgress,
};

use crate::data::{FetchError, MetricsProvider};
use crate::domain::{HitEntry, HitReport};
use crate::strategy::{ScreenStrategy, StrategyError, StrategyRegistry};

/// Result of screening one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Hit(HitEntry),
    Miss,
    Failed(FetchError),
}

/// Fetch one symbol and evaluate it. Never panics, never retries.
pub fn screen_symbol(
    symbol: &str,
    strategy: &dyn ScreenStrategy,
    provider: &dyn MetricsProvider,
) -> SymbolOutcome {
    match provider.fetch(symbol) {
        Ok(bundle) => match strategy.evaluate(&bundle) {
            Some(entry) => SymbolOutcome::Hit(entry),
            None => SymbolOutcome::Miss,
        },
        Err(e) => SymbolOutcome::Failed(e),
    }
}

/// Folds per-symbol outcomes, in input order, into a `HitReport`.
pub struct ReportAccumulator<'a> {
    strategy: String,
    total: usize,
    seen: usize,
    misses: usize,
    failed: usize,
    entries: Vec<HitEntry>,
    progress: &'a dyn ScreenProgress,
}

impl<'a> ReportAccumulator<'a> {
    pub fn new(strategy: &str, total: usize, progress: &'a dyn ScreenProgress) -> Self {
        Self {
            strategy: strategy.to_string(),
            total,
            seen: 0,
            misses: 0,
            failed: 0,
            entries: Vec::new(),
            progress,
        }
    }

    /// Record the outcome for the next symbol in input order.
    pub fn record(&mut self, symbol: &str, outcome: SymbolOutcome) {
        let index = self.seen;
        self.seen += 1;
        match outcome {
            SymbolOutcome::Hit(entry) => {
                self.progress.on_hit(&entry, index, self.total);
                self.entries.push(entry);
            }
            SymbolOutcome::Miss => {
                self.misses += 1;
                self.progress.on_miss(symbol, index, self.total);
            }
            SymbolOutcome::Failed(error) => {
                self.failed += 1;
                self.progress.on_failure(symbol, index, self.total, &error);
            }
        }
    }

    /// Close the run and hand back the immutable report.
    pub fn finish(self) -> HitReport {
        let summary = ScreenSummary {
            strategy: self.strategy.clone(),
            total: self.seen,
            hits: self.entries.len(),
            misses: self.misses,
            failed: self.failed,
        };
        self.progress.on_batch_complete(&summary);
        HitReport::new(self.strategy, self.seen, self.failed, self.entries)
    }
}

/// Sequential screening engine.
///
/// Holds no state: the provider and strategy are passed per call, so the same
/// engine can serve any number of runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreeningEngine;

impl ScreeningEngine {
    pub fn new() -> Self {
        Self
    }

    /// Screen `symbols` in order, logging failures through `tracing`.
    pub fn run<S: AsRef<str>>(
        &self,
        symbols: &[S],
        strategy: &dyn ScreenStrategy,
        provider: &dyn MetricsProvider,
    ) -> HitReport {
        self.run_observed(symbols, strategy, provider, &TracingProgress)
    }

    /// Screen `symbols` in order, reporting every step to `progress`.
    pub fn run_observed<S: AsRef<str>>(
        &self,
        symbols: &[S],
        strategy: &dyn ScreenStrategy,
        provider: &dyn MetricsProvider,
        progress: &dyn ScreenProgress,
    ) -> HitReport {
        let total = symbols.len();
        let mut acc = ReportAccumulator::new(strategy.name(), total, progress);

        for (i, symbol) in symbols.iter().enumerate() {
            let symbol = symbol.as_ref();
            progress.on_start(symbol, i, total);
            let outcome = screen_symbol(symbol, strategy, provider);
            acc.record(symbol, outcome);
        }

        acc.finish()
    }

    /// Look the strategy up by name first; an unknown name fails before any
    /// fetch is made.
    pub fn run_named<S: AsRef<str>>(
        &self,
        symbols: &[S],
        registry: &StrategyRegistry,
        strategy_name: &str,
        provider: &dyn MetricsProvider,
    ) -> Result<HitReport, StrategyError> {
        let strategy = registry.get(strategy_name)?;
        Ok(self.run(symbols, strategy, provider))
    }
}
