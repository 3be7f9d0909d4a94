//! Screening strategies.
//!
//! A strategy is a named, stateless predicate + extractor over one
//! `MetricsBundle`. Any required field that is absent makes the predicate
//! false; strategies never panic and never divide by a non-positive number.
//!
//! Thresholds are plain fields so the registry can build variants (the micro
//! and small cap value screens share one type) and config files can override
//! them.

pub mod earnings_surprise;
pub mod large_trade;
pub mod registry;
pub mod value;

pub use earnings_surprise::LowBuzzSurpriseScreen;
pub use large_trade::LargeTradeScreen;
pub use registry::{create_strategy, StrategyConfig, StrategyError, StrategyRegistry};
pub use value::ValueScreen;

use crate::domain::{HitEntry, MetricsBundle};

/// Stable keys of the built-in strategies.
pub const MICRO_CAP_VALUE: &str = "micro_cap_value";
pub const SMALL_CAP_VALUE: &str = "small_cap_value";
pub const LARGE_TRADE_SIGNAL: &str = "large_trade_signal";
pub const LOW_BUZZ_HIGH_SURPRISE: &str = "low_buzz_high_surprise";

/// Trait for screening strategies.
///
/// # Architecture invariant
/// `evaluate` is a pure function of the bundle: no I/O, no interior state.
/// That is what lets the runner fan symbols out over a worker pool.
pub trait ScreenStrategy: Send + Sync {
    /// Stable identifier used for selection and reporting.
    fn name(&self) -> &str;

    /// One-line human description.
    fn description(&self) -> &str;

    /// `Some(entry)` if the bundle passes, `None` otherwise.
    fn evaluate(&self, bundle: &MetricsBundle) -> Option<HitEntry>;
}
