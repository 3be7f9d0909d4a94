//! Observers for a screening run.
//!
//! The engine never prints. Everything a caller may want to see about a run
//! (fetch failures in particular) flows through a `ScreenProgress` observer.
//! Observers compose as tuples: `(TracingProgress, &failure_log)`.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::data::FetchError;
use crate::domain::HitEntry;

/// Counters for a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenSummary {
    pub strategy: String,
    pub total: usize,
    pub hits: usize,
    pub misses: usize,
    pub failed: usize,
}

/// One symbol skipped because its fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFailure {
    /// Position of the symbol in the input sequence.
    pub index: usize,
    pub symbol: String,
    pub error: FetchError,
}

/// Callbacks fired while a run progresses.
///
/// `on_start` may be called from worker threads in parallel mode; the other
/// callbacks always fire on the calling thread, in input order.
pub trait ScreenProgress: Send + Sync {
    /// Called before a symbol is fetched.
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    /// Called when a symbol passes the strategy.
    fn on_hit(&self, _entry: &HitEntry, _index: usize, _total: usize) {}

    /// Called when a symbol was fetched but did not pass.
    fn on_miss(&self, _symbol: &str, _index: usize, _total: usize) {}

    /// Called when a fetch failed and the symbol was skipped.
    fn on_failure(&self, _symbol: &str, _index: usize, _total: usize, _error: &FetchError) {}

    /// Called once after the last symbol.
    fn on_batch_complete(&self, _summary: &ScreenSummary) {}
}

/// Observer that ignores everything.
pub struct NoProgress;

impl ScreenProgress for NoProgress {}

/// Observer that logs through `tracing`.
pub struct TracingProgress;

impl ScreenProgress for TracingProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        debug!(symbol, "[{}/{}] fetching", index + 1, total);
    }

    fn on_hit(&self, entry: &HitEntry, _index: usize, _total: usize) {
        info!(symbol = %entry.symbol, details = ?entry.details, "hit");
    }

    fn on_miss(&self, symbol: &str, _index: usize, _total: usize) {
        debug!(symbol, "no hit");
    }

    fn on_failure(&self, symbol: &str, _index: usize, _total: usize, error: &FetchError) {
        warn!(symbol, kind = error.kind(), error = %error, "skipping symbol");
    }

    fn on_batch_complete(&self, summary: &ScreenSummary) {
        info!(
            strategy = %summary.strategy,
            total = summary.total,
            hits = summary.hits,
            failed = summary.failed,
            "screen complete"
        );
    }
}

/// Observer that keeps every fetch failure for the caller.
#[derive(Debug, Default)]
pub struct FailureLog {
    failures: Mutex<Vec<SymbolFailure>>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded failures in input order.
    pub fn into_failures(self) -> Vec<SymbolFailure> {
        self.failures
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the failures recorded so far.
    pub fn failures(&self) -> Vec<SymbolFailure> {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ScreenProgress for FailureLog {
    fn on_failure(&self, symbol: &str, index: usize, _total: usize, error: &FetchError) {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SymbolFailure {
                index,
                symbol: symbol.to_string(),
                error: error.clone(),
            });
    }
}

impl<T: ScreenProgress + ?Sized> ScreenProgress for &T {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        (**self).on_start(symbol, index, total)
    }

    fn on_hit(&self, entry: &HitEntry, index: usize, total: usize) {
        (**self).on_hit(entry, index, total)
    }

    fn on_miss(&self, symbol: &str, index: usize, total: usize) {
        (**self).on_miss(symbol, index, total)
    }

    fn on_failure(&self, symbol: &str, index: usize, total: usize, error: &FetchError) {
        (**self).on_failure(symbol, index, total, error)
    }

    fn on_batch_complete(&self, summary: &ScreenSummary) {
        (**self).on_batch_complete(summary)
    }
}

impl<A: ScreenProgress, B: ScreenProgress> ScreenProgress for (A, B) {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        self.0.on_start(symbol, index, total);
        self.1.on_start(symbol, index, total);
    }

    fn on_hit(&self, entry: &HitEntry, index: usize, total: usize) {
        self.0.on_hit(entry, index, total);
        self.1.on_hit(entry, index, total);
    }

    fn on_miss(&self, symbol: &str, index: usize, total: usize) {
        self.0.on_miss(symbol, index, total);
        self.1.on_miss(symbol, index, total);
    }

    fn on_failure(&self, symbol: &str, index: usize, total: usize, error: &FetchError) {
        self.0.on_failure(symbol, index, total, error);
        self.1.on_failure(symbol, index, total, error);
    }

    fn on_batch_complete(&self, summary: &ScreenSummary) {
        self.0.on_batch_complete(summary);
        self.1.on_batch_complete(summary);
    }
}
