//! Screen runner: wires config, universe, strategy, provider and engine.
//!
//! Two entry points:
//! - `run_screen()`: builds the provider from config. Used by the CLI.
//! - `run_screen_with()`: takes an already-built provider. Used by tests and
//!   callers that share one provider across runs.
//!
//! Configuration problems (bad config, unknown strategy, unreadable
//! universe) are errors. Per-symbol fetch failures are not: they end up in
//! `ScreenRun::failures`.

use std::time::Instant;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use screener_core::data::{
    normalize_symbols, FetchError, FixtureError, MetricsProvider, Universe, UniverseError,
};
use screener_core::domain::HitReport;
use screener_core::engine::{FailureLog, SymbolFailure, TracingProgress};
use screener_core::strategy::{create_strategy, ScreenStrategy, StrategyError};

use crate::config::{ConfigError, RunId, ScreenConfig};
use crate::parallel::run_with_threads;
use crate::provider::build_provider;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),
    #[error("universe error: {0}")]
    Universe(#[from] UniverseError),
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),
    #[error("provider error: {0}")]
    Provider(FetchError),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("no symbols to screen")]
    NoSymbols,
}

/// Complete result of one screen run.
#[derive(Debug, Clone)]
pub struct ScreenRun {
    pub run_id: RunId,
    pub config: ScreenConfig,
    pub symbols: Vec<String>,
    pub provider: String,
    pub report: HitReport,
    pub failures: Vec<SymbolFailure>,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
}

/// Resolve the symbol list: explicit symbols win, otherwise the universe
/// (configured or built-in) filtered by sector.
pub fn resolve_symbols(config: &ScreenConfig) -> Result<Vec<String>, RunError> {
    let symbols = if !config.screen.symbols.is_empty() {
        normalize_symbols(&config.screen.symbols)
    } else {
        let universe = match &config.screen.universe {
            Some(path) => Universe::load(path)?,
            None => Universe::default_us(),
        };
        universe.select(&config.screen.sectors)?
    };

    if symbols.is_empty() {
        return Err(RunError::NoSymbols);
    }
    Ok(symbols)
}

/// Run a screen, building the provider from `config.provider`.
pub fn run_screen(config: &ScreenConfig) -> Result<ScreenRun, RunError> {
    config.validate()?;
    // Strategy and symbols are resolved before the provider exists, so a typo
    // never costs a request.
    let strategy = create_strategy(&config.strategy_config())?;
    let symbols = resolve_symbols(config)?;

    let provider = build_provider(&config.provider)?;
    screen_resolved(config, strategy.as_ref(), symbols, provider.as_ref())
}

/// Run a screen against an already-built provider.
pub fn run_screen_with(
    config: &ScreenConfig,
    provider: &dyn MetricsProvider,
) -> Result<ScreenRun, RunError> {
    config.validate()?;
    let strategy = create_strategy(&config.strategy_config())?;
    let symbols = resolve_symbols(config)?;
    screen_resolved(config, strategy.as_ref(), symbols, provider)
}

fn screen_resolved(
    config: &ScreenConfig,
    strategy: &dyn ScreenStrategy,
    symbols: Vec<String>,
    provider: &dyn MetricsProvider,
) -> Result<ScreenRun, RunError> {
    let run_id = config.run_id(&symbols)?;

    info!(
        run_id = %run_id,
        strategy = strategy.name(),
        provider = provider.name(),
        symbols = symbols.len(),
        threads = config.screen.threads,
        "starting screen"
    );

    let started_at = Utc::now();
    let start = Instant::now();
    let failure_log = FailureLog::new();
    let report = run_with_threads(
        &symbols,
        strategy,
        provider,
        &(TracingProgress, &failure_log),
        config.screen.threads,
    )?;
    let duration_secs = start.elapsed().as_secs_f64();

    Ok(ScreenRun {
        run_id,
        config: config.clone(),
        symbols,
        provider: provider.name().to_string(),
        report,
        failures: failure_log.into_failures(),
        started_at,
        duration_secs,
    })
}
