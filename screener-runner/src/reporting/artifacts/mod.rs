//! Artifact manager for persisting run outputs.

mod failures;
mod hits;
mod manifest;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::runner::ScreenRun;

pub use hits::hits_csv;
pub use manifest::RunManifest;

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub run_dir: PathBuf,
    pub manifest: PathBuf,
    pub hits_json: PathBuf,
    pub hits_csv: PathBuf,
    pub failures_csv: PathBuf,
}

/// Manages writing all artifacts for a run.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .context("Failed to create artifact output directory")?;
        Ok(Self { output_dir })
    }

    /// Save complete run artifacts under `<output_dir>/<run_id>/`.
    pub fn save_run(&self, run: &ScreenRun) -> Result<ArtifactPaths> {
        let run_dir = self.output_dir.join(&run.run_id);
        std::fs::create_dir_all(&run_dir)
            .context("Failed to create run artifact directory")?;

        let manifest_path = run_dir.join("manifest.json");
        manifest::write_manifest(&manifest_path, run)?;

        let hits_json = run_dir.join("hits.json");
        let hits_csv = run_dir.join("hits.csv");
        hits::write_hits_json(&hits_json, &run.report)?;
        hits::write_hits_csv(&hits_csv, &run.report)?;

        let failures_csv = run_dir.join("failures.csv");
        failures::write_failures_csv(&failures_csv, &run.failures)?;

        Ok(ArtifactPaths {
            run_dir,
            manifest: manifest_path,
            hits_json,
            hits_csv,
            failures_csv,
        })
    }
}
