//! Per-symbol metrics snapshot.
//!
//! A `MetricsBundle` is the only view of a company a strategy ever gets. Every
//! field except the symbol is optional. Values outside their valid range are
//! dropped to `None` when the bundle is built, so strategies never re-validate
//! and a malformed upstream number can only ever make a symbol *not* pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while building a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    #[error("metrics bundle requires a non-empty symbol")]
    EmptySymbol,
}

/// Immutable snapshot of one symbol's metrics at fetch time.
///
/// Built through [`MetricsBundleBuilder`]; there are no setters. Serializes as a
/// flat JSON object and deserialization runs the same validation as `build()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetricsBundleBuilder", into = "MetricsBundleBuilder")]
pub struct MetricsBundle {
    symbol: String,
    company_name: Option<String>,
    market_cap: Option<f64>,
    latest_eps: Option<f64>,
    eps_surprise_pct: Option<f64>,
    last_price: Option<f64>,
    shares_outstanding: Option<f64>,
    largest_trade_size: Option<f64>,
    largest_trade_venue: Option<String>,
    news_story_count: Option<u32>,
    debt: Option<f64>,
    short_ratio: Option<f64>,
}

impl MetricsBundle {
    /// Start building a bundle for `symbol`.
    pub fn builder(symbol: impl Into<String>) -> MetricsBundleBuilder {
        MetricsBundleBuilder::new(symbol)
    }

    /// Uppercase ticker, never empty.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    /// Market capitalisation in dollars (>= 0).
    pub fn market_cap(&self) -> Option<f64> {
        self.market_cap
    }

    pub fn latest_eps(&self) -> Option<f64> {
        self.latest_eps
    }

    /// Earnings surprise as a fraction (1.0 = 100%).
    pub fn eps_surprise_pct(&self) -> Option<f64> {
        self.eps_surprise_pct
    }

    /// Last traded price (> 0).
    pub fn last_price(&self) -> Option<f64> {
        self.last_price
    }

    /// Shares outstanding (>= 0).
    pub fn shares_outstanding(&self) -> Option<f64> {
        self.shares_outstanding
    }

    /// Size of the largest single trade in the fetched history.
    ///
    /// `None` means the trade history was empty or unavailable.
    pub fn largest_trade_size(&self) -> Option<f64> {
        self.largest_trade_size
    }

    pub fn largest_trade_venue(&self) -> Option<&str> {
        self.largest_trade_venue.as_deref()
    }

    pub fn news_story_count(&self) -> Option<u32> {
        self.news_story_count
    }

    pub fn debt(&self) -> Option<f64> {
        self.debt
    }

    pub fn short_ratio(&self) -> Option<f64> {
        self.short_ratio
    }
}

/// Builder and wire shape for [`MetricsBundle`].
///
/// Fields are public so providers can fill them from whatever upstream shape
/// they parse; nothing is checked until [`build`](Self::build).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsBundleBuilder {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_eps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps_surprise_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_trade_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_trade_venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_story_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_ratio: Option<f64>,
}

impl MetricsBundleBuilder {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    pub fn market_cap(mut self, value: f64) -> Self {
        self.market_cap = Some(value);
        self
    }

    pub fn latest_eps(mut self, value: f64) -> Self {
        self.latest_eps = Some(value);
        self
    }

    pub fn eps_surprise_pct(mut self, value: f64) -> Self {
        self.eps_surprise_pct = Some(value);
        self
    }

    pub fn last_price(mut self, value: f64) -> Self {
        self.last_price = Some(value);
        self
    }

    pub fn shares_outstanding(mut self, value: f64) -> Self {
        self.shares_outstanding = Some(value);
        self
    }

    /// Record the largest trade; an empty venue string is treated as unknown.
    pub fn largest_trade(mut self, size: f64, venue: Option<&str>) -> Self {
        self.largest_trade_size = Some(size);
        self.largest_trade_venue = venue.map(str::to_string);
        self
    }

    pub fn news_story_count(mut self, count: u32) -> Self {
        self.news_story_count = Some(count);
        self
    }

    pub fn debt(mut self, value: f64) -> Self {
        self.debt = Some(value);
        self
    }

    pub fn short_ratio(mut self, value: f64) -> Self {
        self.short_ratio = Some(value);
        self
    }

    /// Validate and freeze the bundle.
    ///
    /// The symbol is trimmed and uppercased. Non-finite numbers and values
    /// outside their documented range become `None`.
    pub fn build(self) -> Result<MetricsBundle, BundleError> {
        let symbol = self.symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(BundleError::EmptySymbol);
        }

        let any = |_: f64| true;
        Ok(MetricsBundle {
            company_name: non_blank(self.company_name),
            market_cap: checked(&symbol, "market_cap", self.market_cap, |v| v >= 0.0),
            latest_eps: checked(&symbol, "latest_eps", self.latest_eps, any),
            eps_surprise_pct: checked(&symbol, "eps_surprise_pct", self.eps_surprise_pct, any),
            last_price: checked(&symbol, "last_price", self.last_price, |v| v > 0.0),
            shares_outstanding: checked(
                &symbol,
                "shares_outstanding",
                self.shares_outstanding,
                |v| v >= 0.0,
            ),
            largest_trade_size: checked(
                &symbol,
                "largest_trade_size",
                self.largest_trade_size,
                any,
            ),
            largest_trade_venue: non_blank(self.largest_trade_venue),
            news_story_count: self.news_story_count,
            debt: checked(&symbol, "debt", self.debt, any),
            short_ratio: checked(&symbol, "short_ratio", self.short_ratio, any),
            symbol,
        })
    }
}

impl TryFrom<MetricsBundleBuilder> for MetricsBundle {
    type Error = BundleError;

    fn try_from(builder: MetricsBundleBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<MetricsBundle> for MetricsBundleBuilder {
    fn from(bundle: MetricsBundle) -> Self {
        Self {
            symbol: bundle.symbol,
            company_name: bundle.company_name,
            market_cap: bundle.market_cap,
            latest_eps: bundle.latest_eps,
            eps_surprise_pct: bundle.eps_surprise_pct,
            last_price: bundle.last_price,
            shares_outstanding: bundle.shares_outstanding,
            largest_trade_size: bundle.largest_trade_size,
            largest_trade_venue: bundle.largest_trade_venue,
            news_story_count: bundle.news_story_count,
            debt: bundle.debt,
            short_ratio: bundle.short_ratio,
        }
    }
}

fn checked(
    symbol: &str,
    field: &'static str,
    value: Option<f64>,
    in_range: impl Fn(f64) -> bool,
) -> Option<f64> {
    let v = value?;
    if v.is_finite() && in_range(v) {
        Some(v)
    } else {
        debug!(symbol, field, value = v, "dropping out-of-range metric");
        None
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
