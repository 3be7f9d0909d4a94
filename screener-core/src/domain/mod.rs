//! Domain types: the per-symbol metrics bundle and screening hits.

pub mod bundle;
pub mod hit;

pub use bundle::{BundleError, MetricsBundle, MetricsBundleBuilder};
pub use hit::{HitDetails, HitEntry, HitReport};
