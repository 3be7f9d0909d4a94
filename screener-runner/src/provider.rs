//! Provider construction from `[provider]` config.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use screener_core::data::{
    CircuitBreaker, DataPointConfig, DataPointProvider, FixtureProvider, MetricsProvider,
};

use crate::config::{ConfigError, ProviderConfig, ProviderKind};
use crate::runner::RunError;

/// Build the provider a config asks for.
///
/// The HTTP provider reads its API key from the environment variable named in
/// `api_key_env`; a missing variable is a config error, reported before any
/// request is made.
pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn MetricsProvider>, RunError> {
    match config.kind {
        ProviderKind::Http => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                ConfigError::Invalid(format!(
                    "environment variable {} is not set",
                    config.api_key_env
                ))
            })?;

            let mut http = DataPointConfig::new(&config.base_url, api_key);
            http.timeout = Duration::from_secs(config.timeout_secs);
            http.max_retries = config.max_retries;
            http.tags = config.tags.clone();

            let provider =
                DataPointProvider::new(http, Arc::new(CircuitBreaker::default_provider()))
                    .map_err(RunError::Provider)?;
            info!(base_url = %config.base_url, "using HTTP data-point provider");
            Ok(Box::new(provider))
        }
        ProviderKind::Fixture => {
            let path = config.fixture_path.as_deref().ok_or_else(|| {
                ConfigError::Invalid("provider.fixture_path is required".into())
            })?;
            let provider = FixtureProvider::from_file(path)?;
            info!(path = %path.display(), bundles = provider.len(), "using fixture provider");
            Ok(Box::new(provider))
        }
    }
}
