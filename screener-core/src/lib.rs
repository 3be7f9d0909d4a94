//! Screener Core: metrics bundles, screening strategies, providers, engine.
//!
//! This crate contains the heart of the stock screener:
//! - Domain types (metrics bundles, hit entries, hit reports)
//! - Metrics providers (HTTP data-point API, JSON fixtures) behind one trait
//! - Symbol universe loading (TOML sector map or CSV exports)
//! - Screening strategies and the name-keyed registry
//! - The fetch → evaluate → collect engine with progress observers

pub mod data;
pub mod domain;
pub mod engine;
pub mod strategy;

pub use data::{FetchError, MetricsProvider};
pub use domain::{HitDetails, HitEntry, HitReport, MetricsBundle};
pub use engine::{ScreenProgress, ScreeningEngine};
pub use strategy::{ScreenStrategy, StrategyRegistry};
