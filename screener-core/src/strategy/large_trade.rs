//! Large single trade relative to the float.

use crate::domain::{HitDetails, HitEntry, MetricsBundle};

use super::{ScreenStrategy, LARGE_TRADE_SIGNAL};

/// Default magnitude a trade must exceed (0.5% of shares outstanding).
pub const MIN_MAGNITUDE: f64 = 0.005;

/// Passes when `largest_trade_size / shares_outstanding > min_magnitude`.
///
/// Needs positive shares outstanding and a non-empty trade history; the venue
/// is reported when known but never required.
#[derive(Debug, Clone, PartialEq)]
pub struct LargeTradeScreen {
    pub min_magnitude: f64,
}

impl LargeTradeScreen {
    pub fn new(min_magnitude: f64) -> Self {
        Self { min_magnitude }
    }
}

impl Default for LargeTradeScreen {
    fn default() -> Self {
        Self::new(MIN_MAGNITUDE)
    }
}

impl ScreenStrategy for LargeTradeScreen {
    fn name(&self) -> &str {
        LARGE_TRADE_SIGNAL
    }

    fn description(&self) -> &str {
        "largest trade above 0.5% of shares outstanding"
    }

    fn evaluate(&self, bundle: &MetricsBundle) -> Option<HitEntry> {
        let shares_outstanding = bundle.shares_outstanding().filter(|&s| s > 0.0)?;
        let largest_trade_size = bundle.largest_trade_size()?;

        let magnitude = largest_trade_size / shares_outstanding;
        if magnitude <= self.min_magnitude {
            return None;
        }

        Some(HitEntry::new(
            bundle.symbol(),
            HitDetails::LargeTrade {
                shares_outstanding,
                largest_trade_size,
                magnitude,
                venue: bundle.largest_trade_venue().map(str::to_string),
            },
        ))
    }
}
