//! Serializable screen configuration.
//!
//! One TOML file describes a run: which strategy (with optional threshold
//! overrides), which symbols, which provider and where artifacts go. Every
//! section and field has a default, so an empty file is a valid config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use screener_core::data::MetricTags;
use screener_core::strategy::{StrategyConfig, MICRO_CAP_VALUE};

/// Unique identifier for a screen run (content-addressable hash).
pub type RunId = String;

/// Environment variable holding the API key unless the config names another.
pub const DEFAULT_API_KEY_ENV: &str = "SCREENER_API_KEY";

/// Upper bound on `provider.max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// Errors loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration of one screen run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub screen: ScreenSection,
    pub strategy: StrategyParams,
    pub provider: ProviderConfig,
    pub output: OutputConfig,
}

/// `[screen]`: what to run and over which symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSection {
    pub strategy: String,
    /// Worker threads; `1` runs the sequential engine.
    pub threads: usize,
    /// Universe TOML file or CSV directory. `None` uses the built-in universe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe: Option<PathBuf>,
    /// Sector filter; empty means every sector.
    pub sectors: Vec<String>,
    /// Explicit symbols; when non-empty the universe is ignored.
    pub symbols: Vec<String>,
}

impl Default for ScreenSection {
    fn default() -> Self {
        Self {
            strategy: MICRO_CAP_VALUE.to_string(),
            threads: 1,
            universe: None,
            sectors: Vec::new(),
            symbols: Vec::new(),
        }
    }
}

/// `[strategy.params]`: threshold overrides passed to the factory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    pub params: BTreeMap<String, f64>,
}

/// Which provider backs the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Http,
    Fixture,
}

/// `[provider]`: connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture_path: Option<PathBuf>,
    pub tags: MetricTags,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Http,
            base_url: "https://api-v2.intrinio.com".to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 15,
            max_retries: 2,
            fixture_path: None,
            tags: MetricTags::default(),
        }
    }
}

/// `[output]`: where artifacts go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub export: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            export: true,
        }
    }
}

impl ScreenConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.strategy.trim().is_empty() {
            return Err(ConfigError::Invalid("screen.strategy is empty".into()));
        }
        if self.screen.threads == 0 {
            return Err(ConfigError::Invalid("screen.threads must be at least 1".into()));
        }
        if let Some((key, value)) = self
            .strategy
            .params
            .iter()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "strategy.params.{key} is not finite ({value})"
            )));
        }
        match self.provider.kind {
            ProviderKind::Http => {
                if self.provider.base_url.trim().is_empty() {
                    return Err(ConfigError::Invalid("provider.base_url is empty".into()));
                }
                if self.provider.timeout_secs == 0 {
                    return Err(ConfigError::Invalid(
                        "provider.timeout_secs must be positive".into(),
                    ));
                }
                if self.provider.max_retries > MAX_RETRIES {
                    return Err(ConfigError::Invalid(format!(
                        "provider.max_retries must be at most {MAX_RETRIES}"
                    )));
                }
            }
            ProviderKind::Fixture => {
                if self.provider.fixture_path.is_none() {
                    return Err(ConfigError::Invalid(
                        "provider.kind = \"fixture\" needs provider.fixture_path".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Strategy selection handed to the factory.
    pub fn strategy_config(&self) -> StrategyConfig {
        StrategyConfig {
            name: self.screen.strategy.trim().to_string(),
            params: self.strategy.params.clone(),
        }
    }

    /// Deterministic fingerprint of this config plus the resolved symbols.
    ///
    /// Two runs with identical inputs share a run id and therefore an
    /// artifact directory.
    pub fn run_id(&self, symbols: &[String]) -> Result<RunId, ConfigError> {
        let json = serde_json::to_string(&(self, symbols))?;
        let hash = blake3::hash(json.as_bytes());
        Ok(hash.to_hex()[..16].to_string())
    }
}
