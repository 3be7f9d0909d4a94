//! Run manifest export (JSON).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ScreenConfig;
use crate::runner::ScreenRun;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub strategy: String,
    pub provider: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub duration_secs: f64,
    pub symbols: usize,
    pub hits: usize,
    pub failed: usize,
    pub config: ScreenConfig,
}

impl RunManifest {
    pub fn from_run(run: &ScreenRun) -> Self {
        Self {
            run_id: run.run_id.clone(),
            strategy: run.report.strategy().to_string(),
            provider: run.provider.clone(),
            timestamp: run.started_at,
            duration_secs: run.duration_secs,
            symbols: run.report.attempted(),
            hits: run.report.len(),
            failed: run.report.failed(),
            config: run.config.clone(),
        }
    }
}

pub fn write_manifest(path: &Path, run: &ScreenRun) -> Result<()> {
    let json = serde_json::to_string_pretty(&RunManifest::from_run(run))
        .context("Failed to serialize run manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(())
}
