//! Worker-pool execution of a screen.
//!
//! Symbols are fanned out over a private rayon pool; each worker runs the
//! same `screen_symbol` the sequential engine uses. Outcomes are collected in
//! input order and folded by `ReportAccumulator`, so the report and the
//! failure sequence match a sequential run exactly. No lock is held across a
//! fetch.

use rayon::prelude::*;

use screener_core::data::MetricsProvider;
use screener_core::domain::HitReport;
use screener_core::engine::{screen_symbol, ReportAccumulator, ScreenProgress, ScreeningEngine};
use screener_core::strategy::ScreenStrategy;

/// Screen `symbols` on `threads` workers. `threads <= 1` runs sequentially.
pub fn run_with_threads<S: AsRef<str> + Sync>(
    symbols: &[S],
    strategy: &dyn ScreenStrategy,
    provider: &dyn MetricsProvider,
    progress: &dyn ScreenProgress,
    threads: usize,
) -> Result<HitReport, rayon::ThreadPoolBuildError> {
    if threads <= 1 {
        return Ok(ScreeningEngine::new().run_observed(symbols, strategy, provider, progress));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("screener-worker-{i}"))
        .build()?;

    let total = symbols.len();
    let outcomes: Vec<_> = pool.install(|| {
        symbols
            .par_iter()
            .enumerate()
            .map(|(i, symbol)| {
                let symbol = symbol.as_ref();
                progress.on_start(symbol, i, total);
                screen_symbol(symbol, strategy, provider)
            })
            .collect()
    });

    let mut acc = ReportAccumulator::new(strategy.name(), total, progress);
    for (symbol, outcome) in symbols.iter().zip(outcomes) {
        acc.record(symbol.as_ref(), outcome);
    }
    Ok(acc.finish())
}
