//! In-memory provider backed by pre-built bundles.
//!
//! Used for offline runs (`--fixtures file.json`) and as the test double for
//! engine tests. The JSON file is either a bare array of bundles or an object
//! with `bundles` plus an optional `unavailable` list of symbols that should
//! fail with `ProviderUnavailable`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::provider::{FetchError, MetricsProvider};
use crate::domain::MetricsBundle;

/// Errors loading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("read fixture file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse fixture JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Bundles(Vec<MetricsBundle>),
    Full {
        bundles: Vec<MetricsBundle>,
        #[serde(default)]
        unavailable: Vec<String>,
    },
}

/// Provider answering from a fixed symbol → bundle map.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    bundles: HashMap<String, MetricsBundle>,
    unavailable: HashSet<String>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from bundles; a later bundle for the same symbol wins.
    pub fn from_bundles(bundles: impl IntoIterator<Item = MetricsBundle>) -> Self {
        let mut provider = Self::new();
        for bundle in bundles {
            provider.insert(bundle);
        }
        provider
    }

    pub fn from_json(content: &str) -> Result<Self, FixtureError> {
        let (bundles, unavailable) = match serde_json::from_str(content)? {
            FixtureFile::Bundles(bundles) => (bundles, Vec::new()),
            FixtureFile::Full {
                bundles,
                unavailable,
            } => (bundles, unavailable),
        };

        let mut provider = Self::from_bundles(bundles);
        for symbol in unavailable {
            provider = provider.with_unavailable(&symbol);
        }
        Ok(provider)
    }

    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn insert(&mut self, bundle: MetricsBundle) {
        self.bundles.insert(bundle.symbol().to_string(), bundle);
    }

    /// Make `symbol` fail with `ProviderUnavailable`.
    pub fn with_unavailable(mut self, symbol: &str) -> Self {
        self.unavailable.insert(normalize(symbol));
        self
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

impl MetricsProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch(&self, symbol: &str) -> Result<MetricsBundle, FetchError> {
        let key = normalize(symbol);
        if self.unavailable.contains(&key) {
            return Err(FetchError::unavailable(format!("fixture marks {key} unavailable")));
        }
        self.bundles
            .get(&key)
            .cloned()
            .ok_or_else(|| FetchError::lookup(key, "no fixture data"))
    }
}
