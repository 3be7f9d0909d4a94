//! Data-point HTTP provider.
//!
//! Builds a `MetricsBundle` from a REST/JSON market-data API that exposes one
//! endpoint per metric ("data point"), a company profile, a news feed and a
//! trade tape. A symbol costs several requests; each one goes through the
//! same retry + circuit-breaker path.
//!
//! Only the company profile decides whether a symbol exists. A missing or
//! null data point just leaves that field absent in the bundle.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::circuit_breaker::CircuitBreaker;
use super::provider::{FetchError, MetricsProvider};
use crate::domain::{MetricsBundle, MetricsBundleBuilder};

/// Upstream tag names for each numeric metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricTags {
    pub market_cap: String,
    pub latest_eps: String,
    pub eps_surprise_pct: String,
    pub last_price: String,
    pub shares_outstanding: String,
    pub debt: String,
    pub short_ratio: String,
}

impl Default for MetricTags {
    fn default() -> Self {
        Self {
            market_cap: "marketcap".into(),
            latest_eps: "basiceps".into(),
            eps_surprise_pct: "eps_surprise_pct".into(),
            last_price: "last_price".into(),
            shares_outstanding: "weightedavebasicsharesos".into(),
            debt: "debt".into(),
            short_ratio: "short_ratio".into(),
        }
    }
}

/// Connection settings for [`DataPointProvider`].
#[derive(Debug, Clone)]
pub struct DataPointConfig {
    pub base_url: String,
    pub api_key: String,
    pub tags: MetricTags,
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl DataPointConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            tags: MetricTags::default(),
            timeout: Duration::from_secs(15),
            max_retries: 2,
            base_delay: Duration::from_millis(250),
        }
    }
}

/// Longest pause between two attempts.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Exponential backoff before retry `attempt` (1-based), capped at
/// [`MAX_RETRY_DELAY`].
fn retry_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.checked_mul(factor)
        .map_or(MAX_RETRY_DELAY, |d| d.min(MAX_RETRY_DELAY))
}

/// Blocking HTTP provider for a data-point style API.
pub struct DataPointProvider {
    client: reqwest::blocking::Client,
    config: DataPointConfig,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl DataPointProvider {
    pub fn new(
        config: DataPointConfig,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("screener/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            circuit_breaker,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET a JSON document. `Ok(None)` means the upstream answered 404.
    fn get_json(&self, path: &str) -> Result<Option<Value>, FetchError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(breaker_open(&self.circuit_breaker));
        }

        let url = self.url(path);
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                std::thread::sleep(retry_delay(self.config.base_delay, attempt));
                if !self.circuit_breaker.is_allowed() {
                    return Err(breaker_open(&self.circuit_breaker));
                }
            }

            let resp = match self
                .client
                .get(&url)
                .query(&[("api_key", self.config.api_key.as_str())])
                .send()
            {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(FetchError::unavailable(format!("{path}: {e}")));
                    continue;
                }
                Err(e) => return Err(FetchError::unavailable(format!("{path}: {e}"))),
            };

            let status = resp.status();
            match status {
                StatusCode::NOT_FOUND => {
                    self.circuit_breaker.record_success();
                    return Ok(None);
                }
                StatusCode::FORBIDDEN => {
                    self.circuit_breaker.trip();
                    return Err(FetchError::unavailable(format!(
                        "{path}: access forbidden, circuit breaker tripped"
                    )));
                }
                StatusCode::UNAUTHORIZED => {
                    return Err(FetchError::unavailable(format!(
                        "{path}: API key rejected"
                    )));
                }
                s if s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(FetchError::unavailable(format!("{path}: HTTP {s}")));
                    continue;
                }
                s if !s.is_success() => {
                    return Err(FetchError::unavailable(format!("{path}: HTTP {s}")));
                }
                _ => {}
            }

            let body: Value = resp.json().map_err(|e| {
                FetchError::unavailable(format!("{path}: malformed JSON response: {e}"))
            })?;
            self.circuit_breaker.record_success();
            return Ok(Some(body));
        }

        Err(last_error.unwrap_or_else(|| FetchError::unavailable("max retries exceeded")))
    }

    fn data_point(&self, symbol: &str, tag: &str) -> Result<Option<f64>, FetchError> {
        let path = format!("companies/{symbol}/data_point/{tag}/number");
        let value = self.get_json(&path)?;
        let parsed = value.as_ref().and_then(parse_data_point);
        if parsed.is_none() {
            debug!(symbol, tag, "no data point");
        }
        Ok(parsed)
    }
}

impl MetricsProvider for DataPointProvider {
    fn name(&self) -> &str {
        "data_point_api"
    }

    fn fetch(&self, symbol: &str) -> Result<MetricsBundle, FetchError> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(FetchError::lookup(symbol, "empty symbol"));
        }

        let company = self
            .get_json(&format!("companies/{symbol}"))?
            .ok_or_else(|| FetchError::lookup(&symbol, "unknown company"))?;

        let tags = &self.config.tags;
        let mut builder = MetricsBundleBuilder::new(&symbol);
        builder.company_name = parse_company_name(&company);
        builder.market_cap = self.data_point(&symbol, &tags.market_cap)?;
        builder.latest_eps = self.data_point(&symbol, &tags.latest_eps)?;
        builder.eps_surprise_pct = self.data_point(&symbol, &tags.eps_surprise_pct)?;
        builder.last_price = self.data_point(&symbol, &tags.last_price)?;
        builder.shares_outstanding = self.data_point(&symbol, &tags.shares_outstanding)?;
        builder.debt = self.data_point(&symbol, &tags.debt)?;
        builder.short_ratio = self.data_point(&symbol, &tags.short_ratio)?;

        builder.news_story_count = self
            .get_json(&format!("companies/{symbol}/news"))?
            .as_ref()
            .and_then(parse_news_count);

        if let Some((size, venue)) = self
            .get_json(&format!("securities/{symbol}/trades"))?
            .as_ref()
            .and_then(parse_largest_trade)
        {
            builder.largest_trade_size = Some(size);
            builder.largest_trade_venue = venue;
        }

        builder.build().map_err(|e| {
            warn!(%symbol, error = %e, "upstream returned an unusable bundle");
            FetchError::lookup(symbol.as_str(), e.to_string())
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

fn breaker_open(cb: &CircuitBreaker) -> FetchError {
    FetchError::unavailable(format!(
        "circuit breaker open ({}s cooldown remaining)",
        cb.remaining_cooldown().as_secs()
    ))
}

/// A data point is a bare number, a numeric string, or a "no data" marker
/// (`null`, `"na"`, `"nm"`).
pub fn parse_data_point(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

/// Company profile: `{"name": "...", ...}`.
pub fn parse_company_name(value: &Value) -> Option<String> {
    value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// News feed: `{"news": [ ... ]}`. A missing array means no count, not zero.
pub fn parse_news_count(value: &Value) -> Option<u32> {
    let stories = value.get("news")?.as_array()?;
    u32::try_from(stories.len()).ok()
}

/// Trade tape: `{"trades": [{"size": 100, "exchange": "NYSE"}, ...]}`.
///
/// Returns the largest trade (first one on ties) with its venue, or `None`
/// when the tape is empty.
pub fn parse_largest_trade(value: &Value) -> Option<(f64, Option<String>)> {
    let trades = value.get("trades")?.as_array()?;
    let mut best: Option<(f64, Option<String>)> = None;

    for trade in trades {
        let Some(size) = trade.get("size").and_then(parse_data_point) else {
            continue;
        };
        if best.as_ref().map_or(true, |(b, _)| size > *b) {
            let venue = trade
                .get("exchange")
                .or_else(|| trade.get("market_center"))
                .and_then(Value::as_str)
                .map(str::to_string);
            best = Some((size, venue));
        }
    }

    best
}
