//! Hit entries and the per-run hit report.

use serde::{Deserialize, Serialize};

/// One symbol that passed a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitEntry {
    pub symbol: String,
    #[serde(flatten)]
    pub details: HitDetails,
}

impl HitEntry {
    pub fn new(symbol: impl Into<String>, details: HitDetails) -> Self {
        Self {
            symbol: symbol.into(),
            details,
        }
    }
}

/// Strategy-declared payload of a hit.
///
/// Each strategy emits exactly one of these shapes; the set is closed so a
/// report's columns are always known up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitDetails {
    /// Value screens: cap band plus price-to-earnings multiple.
    Value {
        market_cap: f64,
        last_price: f64,
        multiple: f64,
    },
    /// Largest single trade relative to shares outstanding.
    LargeTrade {
        shares_outstanding: f64,
        largest_trade_size: f64,
        magnitude: f64,
        venue: Option<String>,
    },
    /// Quiet news flow with a positive earnings surprise.
    EarningsSurprise {
        eps_surprise_pct: f64,
        latest_eps: f64,
        news_story_count: u32,
    },
}

impl HitDetails {
    /// Column names for this payload shape, in display order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            HitDetails::Value { .. } => &["market_cap", "last_price", "multiple"],
            HitDetails::LargeTrade { .. } => &[
                "shares_outstanding",
                "largest_trade_size",
                "magnitude",
                "venue",
            ],
            HitDetails::EarningsSurprise { .. } => {
                &["eps_surprise_pct", "latest_eps", "news_story_count"]
            }
        }
    }

    /// Formatted values matching [`columns`](Self::columns).
    pub fn values(&self) -> Vec<String> {
        match self {
            HitDetails::Value {
                market_cap,
                last_price,
                multiple,
            } => vec![
                format!("{market_cap:.0}"),
                format!("{last_price:.2}"),
                format!("{multiple:.2}"),
            ],
            HitDetails::LargeTrade {
                shares_outstanding,
                largest_trade_size,
                magnitude,
                venue,
            } => vec![
                format!("{shares_outstanding:.0}"),
                format!("{largest_trade_size:.0}"),
                format!("{magnitude:.6}"),
                venue.clone().unwrap_or_default(),
            ],
            HitDetails::EarningsSurprise {
                eps_surprise_pct,
                latest_eps,
                news_story_count,
            } => vec![
                format!("{eps_surprise_pct:.4}"),
                format!("{latest_eps:.2}"),
                news_story_count.to_string(),
            ],
        }
    }
}

/// Ordered hits of one screening run.
///
/// Entries keep evaluation order over the input symbols; nothing is sorted or
/// de-duplicated. There are no mutators: a report is complete when built.
/// A report carries no timestamp, so equal inputs give equal reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitReport {
    strategy: String,
    attempted: usize,
    failed: usize,
    entries: Vec<HitEntry>,
}

impl HitReport {
    pub fn new(
        strategy: impl Into<String>,
        attempted: usize,
        failed: usize,
        entries: Vec<HitEntry>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            attempted,
            failed,
            entries,
        }
    }

    /// Name of the strategy that produced the report.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Number of fetch attempts (one per input symbol).
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Number of symbols skipped because the fetch failed.
    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn entries(&self) -> &[HitEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.symbol.as_str()).collect()
    }

    /// Column names shared by every entry, `symbol` first.
    ///
    /// Returns just `["symbol"]` for an empty report.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut cols = vec!["symbol"];
        if let Some(first) = self.entries.first() {
            cols.extend_from_slice(first.details.columns());
        }
        cols
    }
}

impl<'a> IntoIterator for &'a HitReport {
    type Item = &'a HitEntry;
    type IntoIter = std::slice::Iter<'a, HitEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_hit(symbol: &str) -> HitEntry {
        HitEntry::new(
            symbol,
            HitDetails::Value {
                market_cap: 200_000_000.0,
                last_price: 20.0,
                multiple: 10.0,
            },
        )
    }

    #[test]
    fn entry_serializes_flat() {
        let value = serde_json::to_value(value_hit("AAA")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "symbol": "AAA",
                "kind": "value",
                "market_cap": 200_000_000.0,
                "last_price": 20.0,
                "multiple": 10.0,
            })
        );
    }

    #[test]
    fn entry_json_roundtrip() {
        let entry = HitEntry::new(
            "BBB",
            HitDetails::LargeTrade {
                shares_outstanding: 1_000_000.0,
                largest_trade_size: 6_000.0,
                magnitude: 0.006,
                venue: Some("NASDAQ".into()),
            },
        );
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: HitEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn report_preserves_insertion_order() {
        let report = HitReport::new("micro_cap_value", 3, 0, vec![value_hit("ZZZ"), value_hit("AAA")]);
        assert_eq!(report.symbols(), vec!["ZZZ", "AAA"]);
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.columns(),
            vec!["symbol", "market_cap", "last_price", "multiple"]
        );
    }

    #[test]
    fn empty_report_columns() {
        let report = HitReport::new("small_cap_value", 0, 0, Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.columns(), vec!["symbol"]);
    }

    #[test]
    fn values_align_with_columns() {
        let details = HitDetails::EarningsSurprise {
            eps_surprise_pct: 0.25,
            latest_eps: 1.1,
            news_story_count: 0,
        };
        assert_eq!(details.columns().len(), details.values().len());
        assert_eq!(details.values(), vec!["0.2500", "1.10", "0"]);
    }
}
