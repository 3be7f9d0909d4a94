//! Screener CLI: screen, strategies, and universe commands.
//!
//! Commands:
//! - `screen`: run one strategy over a universe or explicit symbols
//! - `strategies`: list the registered strategies
//! - `universe`: show sectors and ticker counts, or write a starter universe

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use screener_core::data::Universe;
use screener_core::strategy::StrategyRegistry;
use screener_runner::{
    render_summary, run_screen, ArtifactManager, ProviderKind, ScreenConfig,
};

#[derive(Parser)]
#[command(name = "screener", about = "Screener CLI: rule-based stock screening")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one strategy over a universe or an explicit symbol list.
    Screen {
        /// Strategy name (see `screener strategies`). Overrides the config file.
        #[arg(long)]
        strategy: Option<String>,

        /// Path to a TOML run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Universe TOML file or directory of per-industry CSV files.
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Restrict to these sectors (repeatable).
        #[arg(long = "sector")]
        sectors: Vec<String>,

        /// Screen these symbols instead of the universe.
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Answer from a JSON fixture file instead of the HTTP API.
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Worker threads; 1 runs sequentially.
        #[arg(long)]
        threads: Option<usize>,

        /// Output directory for run artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the summary only; write no artifacts.
        #[arg(long, default_value_t = false)]
        no_export: bool,
    },
    /// List the registered strategies with descriptions.
    Strategies,
    /// Show universe sectors and ticker counts.
    Universe {
        /// Universe TOML file or CSV directory. Defaults to the built-in universe.
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Write the built-in universe as TOML to this path and exit.
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

/// Overrides collected from `screen` flags.
struct ScreenArgs {
    strategy: Option<String>,
    config: Option<PathBuf>,
    universe: Option<PathBuf>,
    sectors: Vec<String>,
    symbols: Vec<String>,
    fixtures: Option<PathBuf>,
    threads: Option<usize>,
    output_dir: Option<PathBuf>,
    no_export: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Screen {
            strategy,
            config,
            universe,
            sectors,
            symbols,
            fixtures,
            threads,
            output_dir,
            no_export,
        } => run_screen_cmd(ScreenArgs {
            strategy,
            config,
            universe,
            sectors,
            symbols,
            fixtures,
            threads,
            output_dir,
            no_export,
        }),
        Commands::Strategies => run_strategies(),
        Commands::Universe { universe, init } => match init {
            Some(path) => run_universe_init(&path),
            None => run_universe_show(universe.as_deref()),
        },
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_screen_cmd(args: ScreenArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ScreenConfig::from_file(path)?,
        None => ScreenConfig::default(),
    };

    // Flags override file values.
    if let Some(strategy) = args.strategy {
        config.screen.strategy = strategy;
    }
    if let Some(universe) = args.universe {
        config.screen.universe = Some(universe);
    }
    if !args.sectors.is_empty() {
        config.screen.sectors = args.sectors;
    }
    if !args.symbols.is_empty() {
        config.screen.symbols = args.symbols;
    }
    if let Some(path) = args.fixtures {
        config.provider.kind = ProviderKind::Fixture;
        config.provider.fixture_path = Some(path);
    }
    if let Some(threads) = args.threads {
        config.screen.threads = threads;
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if args.no_export {
        config.output.export = false;
    }
    debug!(
        strategy = %config.screen.strategy,
        provider = ?config.provider.kind,
        threads = config.screen.threads,
        "resolved screen config"
    );

    let run = run_screen(&config)?;
    print!("{}", render_summary(&run));

    if config.output.export {
        let paths = ArtifactManager::new(&config.output.dir)?.save_run(&run)?;
        println!("Artifacts saved to: {}", paths.run_dir.display());
    }

    Ok(())
}

fn run_strategies() -> Result<()> {
    let registry = StrategyRegistry::builtin();
    let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);
    for strategy in registry.iter() {
        println!("{:<width$}  {}", strategy.name(), strategy.description());
    }
    Ok(())
}

fn run_universe_show(path: Option<&Path>) -> Result<()> {
    let universe = match path {
        Some(path) => Universe::load(path)
            .with_context(|| format!("failed to load universe from {}", path.display()))?,
        None => Universe::default_us(),
    };

    let width = universe
        .sector_names()
        .iter()
        .map(|n| n.len())
        .max()
        .unwrap_or(0);
    for name in universe.sector_names() {
        let count = universe.sector_tickers(name).map_or(0, |t| t.len());
        println!("{name:<width$}  {count:>4}");
    }
    println!(
        "{} sectors, {} tickers ({} unique)",
        universe.sectors.len(),
        universe.ticker_count(),
        universe.all_tickers().len()
    );
    Ok(())
}

fn run_universe_init(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists; not overwriting", path.display());
    }
    let toml = Universe::default_us().to_toml()?;
    std::fs::write(path, toml)
        .with_context(|| format!("failed to write universe to {}", path.display()))?;
    println!("Wrote default universe to: {}", path.display());
    Ok(())
}
