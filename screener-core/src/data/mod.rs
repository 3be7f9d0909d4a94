//! Market-data access: provider contract, HTTP and fixture providers,
//! circuit breaker, and the symbol universe.

pub mod circuit_breaker;
pub mod fixture;
pub mod http;
pub mod provider;
pub mod universe;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use fixture::{FixtureError, FixtureProvider};
pub use http::{DataPointConfig, DataPointProvider, MetricTags};
pub use provider::{FetchError, MetricsProvider};
pub use universe::{normalize_symbols, Universe, UniverseError};
