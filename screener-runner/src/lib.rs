//! Screener Runner: screen orchestration, worker pool, report artifacts.
//!
//! This crate builds on `screener-core` to provide:
//! - TOML run configuration with validation and run fingerprinting
//! - Provider construction (HTTP data-point API or JSON fixtures)
//! - Optional parallel execution on a private rayon pool
//! - Artifact export (hits JSON/CSV, failure log, manifest) and console summary

pub mod config;
pub mod parallel;
pub mod provider;
pub mod reporting;
pub mod runner;

pub use config::{ConfigError, OutputConfig, ProviderConfig, ProviderKind, RunId, ScreenConfig};
pub use parallel::run_with_threads;
pub use provider::build_provider;
pub use reporting::{render_summary, ArtifactManager, ArtifactPaths, RunManifest};
pub use runner::{resolve_symbols, run_screen, run_screen_with, RunError, ScreenRun};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ScreenConfig>();
        assert_sync::<ScreenConfig>();
        assert_send::<ProviderConfig>();
        assert_sync::<ProviderConfig>();
    }

    #[test]
    fn screen_run_is_send_sync() {
        assert_send::<ScreenRun>();
        assert_sync::<ScreenRun>();
    }

    #[test]
    fn run_error_is_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }

    #[test]
    fn manifest_is_send_sync() {
        assert_send::<RunManifest>();
        assert_sync::<RunManifest>();
    }
}
