//! Reporting and artifact export pipeline.

pub mod artifacts;
pub mod summary;

pub use artifacts::{ArtifactManager, ArtifactPaths, RunManifest};
pub use summary::render_summary;
