//! End-to-end runs through config, fixture provider, worker pool and export.

use std::path::Path;

use screener_core::strategy::StrategyError;
use screener_runner::{
    run_screen, ArtifactManager, ConfigError, ProviderKind, RunError, ScreenConfig,
};

const FIXTURES: &str = r#"{
  "bundles": [
    { "symbol": "AAA", "latest_eps": 2.0, "market_cap": 200000000.0, "last_price": 20.0 },
    { "symbol": "BBB", "latest_eps": -1.0, "market_cap": 150000000.0 },
    { "symbol": "CCC", "latest_eps": 0.5, "market_cap": 300000000.0, "last_price": 4.0 },
    { "symbol": "DDD", "latest_eps": 1.0, "market_cap": 900000000.0, "last_price": 15.0 },
    { "symbol": "X", "shares_outstanding": 1000000.0, "largest_trade_size": 6000.0,
      "largest_trade_venue": "NASDAQ" },
    { "symbol": "Y", "shares_outstanding": 1000000.0, "largest_trade_size": 4000.0 }
  ],
  "unavailable": ["EEE"]
}"#;

fn write_fixtures(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("fixtures.json");
    std::fs::write(&path, FIXTURES).unwrap();
    path
}

fn fixture_config(dir: &Path, strategy: &str, symbols: &[&str], threads: usize) -> ScreenConfig {
    let mut config = ScreenConfig::default();
    config.screen.strategy = strategy.to_string();
    config.screen.symbols = symbols.iter().map(|s| s.to_string()).collect();
    config.screen.threads = threads;
    config.provider.kind = ProviderKind::Fixture;
    config.provider.fixture_path = Some(write_fixtures(dir));
    config.output.dir = dir.join("results");
    config
}

#[test]
fn micro_cap_run_from_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path(), "micro_cap_value", &["AAA", "BBB", "EEE", "CCC"], 1);

    let run = run_screen(&config).unwrap();
    assert_eq!(run.report.symbols(), vec!["AAA", "CCC"]);
    assert_eq!(run.report.attempted(), 4);
    assert_eq!(run.failures.len(), 1);
    assert_eq!(run.failures[0].symbol, "EEE");
    assert_eq!(run.failures[0].error.kind(), "provider_unavailable");
}

#[test]
fn parallel_run_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let symbols = ["AAA", "BBB", "NOPE", "CCC", "DDD", "EEE", "X", "Y"];

    let seq = run_screen(&fixture_config(dir.path(), "small_cap_value", &symbols, 1)).unwrap();
    let par = run_screen(&fixture_config(dir.path(), "small_cap_value", &symbols, 4)).unwrap();

    assert_eq!(seq.report, par.report);
    assert_eq!(seq.report.symbols(), vec!["AAA", "CCC", "DDD"]);
    assert_eq!(seq.failures, par.failures);
    assert_eq!(seq.failures.len(), 2);
}

#[test]
fn strategy_params_override_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture_config(dir.path(), "large_trade_signal", &["X", "Y"], 1);
    config
        .strategy
        .params
        .insert("min_magnitude".into(), 0.003);

    let run = run_screen(&config).unwrap();
    assert_eq!(run.report.symbols(), vec!["X", "Y"]);
}

#[test]
fn unknown_strategy_is_config_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path(), "mega_cap_growth", &["AAA"], 1);
    assert!(matches!(
        run_screen(&config),
        Err(RunError::Strategy(StrategyError::UnknownStrategy(_)))
    ));
}

#[test]
fn config_file_drives_a_run_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = write_fixtures(dir.path());
    let out = dir.path().join("out");
    let toml = format!(
        r#"
[screen]
strategy = "micro_cap_value"
symbols = ["aaa", "bbb"]

[provider]
kind = "fixture"
fixture_path = {fixtures:?}

[output]
dir = {out:?}
"#,
        fixtures = fixtures.display().to_string(),
        out = out.display().to_string(),
    );
    let config_path = dir.path().join("screen.toml");
    std::fs::write(&config_path, toml).unwrap();

    let config = ScreenConfig::from_file(&config_path).unwrap();
    let run = run_screen(&config).unwrap();
    assert_eq!(run.symbols, vec!["AAA", "BBB"]);
    assert_eq!(run.report.symbols(), vec!["AAA"]);

    let paths = ArtifactManager::new(&config.output.dir)
        .unwrap()
        .save_run(&run)
        .unwrap();
    assert!(paths.run_dir.starts_with(&out));
    assert!(paths.hits_csv.exists());

    // Same inputs, same fingerprint.
    let again = run_screen(&config).unwrap();
    assert_eq!(again.run_id, run.run_id);
    assert_eq!(again.report.entries(), run.report.entries());
}

#[test]
fn universe_csv_directory_feeds_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let universe = dir.path().join("universe");
    std::fs::create_dir_all(&universe).unwrap();
    std::fs::write(universe.join("value_names.csv"), "Symbol,Name\nAAA,A\nBBB,B\n").unwrap();
    std::fs::write(universe.join("other.csv"), "Symbol\nCCC\n").unwrap();

    let mut config = fixture_config(dir.path(), "micro_cap_value", &[], 1);
    config.screen.universe = Some(universe);
    config.screen.sectors = vec!["value names".into()];

    let run = run_screen(&config).unwrap();
    assert_eq!(run.symbols, vec!["AAA", "BBB"]);
    assert_eq!(run.report.symbols(), vec!["AAA"]);
}

#[test]
fn missing_config_file_is_read_error() {
    assert!(matches!(
        ScreenConfig::from_file(Path::new("no/such/screen.toml")),
        Err(ConfigError::Read { .. })
    ));
}
