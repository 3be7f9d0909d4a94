//! Metrics provider trait and structured fetch errors.
//!
//! The `MetricsProvider` trait abstracts over market-data sources (the HTTP
//! data-point API, JSON fixtures) so the engine can swap implementations and
//! tests can inject doubles. Providers own retries, timeouts and rate limiting;
//! the engine calls `fetch` exactly once per symbol.

use thiserror::Error;

use crate::domain::MetricsBundle;

/// Why a symbol could not be fetched.
///
/// The engine recovers from both variants identically (skip the symbol); the
/// split exists for observability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("symbol lookup failed for {symbol}: {reason}")]
    SymbolLookup { symbol: String, reason: String },

    #[error("provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },
}

impl FetchError {
    pub fn lookup(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        FetchError::SymbolLookup {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        FetchError::ProviderUnavailable {
            reason: reason.into(),
        }
    }

    /// Short stable label, used as a CSV column and log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::SymbolLookup { .. } => "symbol_lookup",
            FetchError::ProviderUnavailable { .. } => "provider_unavailable",
        }
    }
}

/// Source of per-symbol metrics.
///
/// Implementations may make several upstream calls per symbol (price, key
/// statistics, trades, news) but always hand back one normalized bundle.
pub trait MetricsProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the metrics bundle for one symbol.
    fn fetch(&self, symbol: &str) -> Result<MetricsBundle, FetchError>;

    /// Whether the provider is currently accepting requests.
    ///
    /// Informational only; the engine still attempts every symbol.
    fn is_available(&self) -> bool {
        true
    }
}

impl<P: MetricsProvider + ?Sized> MetricsProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, symbol: &str) -> Result<MetricsBundle, FetchError> {
        (**self).fetch(symbol)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
