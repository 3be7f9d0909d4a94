//! Value screens: profitable companies inside a market-cap band.

use crate::domain::{HitDetails, HitEntry, MetricsBundle};

use super::{ScreenStrategy, MICRO_CAP_VALUE, SMALL_CAP_VALUE};

/// Exclusive lower bound shared by the value screens.
pub const CAP_FLOOR: f64 = 100_000_000.0;
/// Inclusive upper bound of `micro_cap_value`.
pub const MICRO_CAP_CEILING: f64 = 400_000_000.0;
/// Inclusive upper bound of `small_cap_value`.
pub const SMALL_CAP_CEILING: f64 = 2_000_000_000.0;

/// Passes when `latest_eps > 0` and `cap_floor < market_cap <= cap_ceiling`.
///
/// Emits market cap, last price and the P/E multiple, so `last_price` is
/// required as well.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueScreen {
    name: String,
    pub cap_floor: f64,
    pub cap_ceiling: f64,
}

impl ValueScreen {
    pub fn new(name: impl Into<String>, cap_floor: f64, cap_ceiling: f64) -> Self {
        Self {
            name: name.into(),
            cap_floor,
            cap_ceiling,
        }
    }

    pub fn micro_cap() -> Self {
        Self::new(MICRO_CAP_VALUE, CAP_FLOOR, MICRO_CAP_CEILING)
    }

    pub fn small_cap() -> Self {
        Self::new(SMALL_CAP_VALUE, CAP_FLOOR, SMALL_CAP_CEILING)
    }
}

impl ScreenStrategy for ValueScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        if self.name == MICRO_CAP_VALUE {
            "positive EPS, market cap in (100M, 400M]"
        } else if self.name == SMALL_CAP_VALUE {
            "positive EPS, market cap in (100M, 2B]"
        } else {
            "positive EPS inside a custom market-cap band"
        }
    }

    fn evaluate(&self, bundle: &MetricsBundle) -> Option<HitEntry> {
        let eps = bundle.latest_eps().filter(|&eps| eps > 0.0)?;
        let market_cap = bundle
            .market_cap()
            .filter(|&cap| cap > self.cap_floor && cap <= self.cap_ceiling)?;
        let last_price = bundle.last_price()?;

        Some(HitEntry::new(
            bundle.symbol(),
            HitDetails::Value {
                market_cap,
                last_price,
                multiple: last_price / eps,
            },
        ))
    }
}
