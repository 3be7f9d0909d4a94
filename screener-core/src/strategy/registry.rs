//! Strategy registry and factory.
//!
//! `create_strategy` turns a serializable `StrategyConfig` (name + optional
//! threshold overrides) into a boxed strategy; `StrategyRegistry` holds the
//! built-in set for lookup by name. Both fail fast on an unknown name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::earnings_surprise::LowBuzzSurpriseScreen;
use super::large_trade::LargeTradeScreen;
use super::value::ValueScreen;
use super::{
    ScreenStrategy, LARGE_TRADE_SIGNAL, LOW_BUZZ_HIGH_SURPRISE, MICRO_CAP_VALUE, SMALL_CAP_VALUE,
};

// ─── Error type ──────────────────────────────────────────────────────

/// Errors that can occur while selecting or building a strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("unknown strategy '{0}'. Valid: micro_cap_value, small_cap_value, large_trade_signal, low_buzz_high_surprise")]
    UnknownStrategy(String),
    #[error("strategy '{strategy}' has no parameter '{param}'")]
    UnknownParam { strategy: String, param: String },
    #[error("strategy '{strategy}': invalid '{param}': {reason}")]
    InvalidParam {
        strategy: String,
        param: String,
        reason: String,
    },
}

// ─── Config ──────────────────────────────────────────────────────────

/// Serializable strategy selection.
///
/// `BTreeMap` keeps parameter order deterministic for run fingerprints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl StrategyConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Reject parameter keys the strategy does not understand.
fn check_params(config: &StrategyConfig, allowed: &[&str]) -> Result<(), StrategyError> {
    match config.params.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(param) => Err(StrategyError::UnknownParam {
            strategy: config.name.clone(),
            param: param.clone(),
        }),
        None => Ok(()),
    }
}

fn invalid(config: &StrategyConfig, param: &str, reason: impl Into<String>) -> StrategyError {
    StrategyError::InvalidParam {
        strategy: config.name.clone(),
        param: param.to_string(),
        reason: reason.into(),
    }
}

/// Extract a named f64 parameter, falling back to `default`.
fn param(config: &StrategyConfig, name: &str, default: f64) -> Result<f64, StrategyError> {
    match config.params.get(name).copied() {
        Some(value) if !value.is_finite() => Err(invalid(config, name, "must be finite")),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

/// Extract a whole, non-negative count that fits in `u32`.
fn count_param(config: &StrategyConfig, name: &str, default: u32) -> Result<u32, StrategyError> {
    let value = param(config, name, f64::from(default))?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(invalid(
            config,
            name,
            format!("{value} is not a whole count"),
        ));
    }
    Ok(value as u32)
}

// ─── Factory ─────────────────────────────────────────────────────────

/// Build a strategy from its config.
pub fn create_strategy(config: &StrategyConfig) -> Result<Box<dyn ScreenStrategy>, StrategyError> {
    match config.name.as_str() {
        MICRO_CAP_VALUE | SMALL_CAP_VALUE => {
            check_params(config, &["cap_floor", "cap_ceiling"])?;
            let base = if config.name == MICRO_CAP_VALUE {
                ValueScreen::micro_cap()
            } else {
                ValueScreen::small_cap()
            };
            let cap_floor = param(config, "cap_floor", base.cap_floor)?;
            let cap_ceiling = param(config, "cap_ceiling", base.cap_ceiling)?;
            if cap_floor >= cap_ceiling {
                return Err(invalid(
                    config,
                    "cap_floor",
                    format!("{cap_floor} is not below cap_ceiling {cap_ceiling}"),
                ));
            }
            Ok(Box::new(ValueScreen::new(
                config.name.as_str(),
                cap_floor,
                cap_ceiling,
            )))
        }
        LARGE_TRADE_SIGNAL => {
            check_params(config, &["min_magnitude"])?;
            let base = LargeTradeScreen::default();
            Ok(Box::new(LargeTradeScreen::new(param(
                config,
                "min_magnitude",
                base.min_magnitude,
            )?)))
        }
        LOW_BUZZ_HIGH_SURPRISE => {
            check_params(config, &["max_news_stories", "max_debt", "max_short_ratio"])?;
            let base = LowBuzzSurpriseScreen::default();
            Ok(Box::new(LowBuzzSurpriseScreen {
                max_news_stories: count_param(config, "max_news_stories", base.max_news_stories)?,
                max_debt: param(config, "max_debt", base.max_debt)?,
                max_short_ratio: param(config, "max_short_ratio", base.max_short_ratio)?,
            }))
        }
        other => Err(StrategyError::UnknownStrategy(other.to_string())),
    }
}

// ─── Registry ────────────────────────────────────────────────────────

/// Named set of strategies, looked up by stable key.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn ScreenStrategy>>,
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// The four built-in strategies with default thresholds.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ValueScreen::micro_cap()));
        registry.register(Box::new(ValueScreen::small_cap()));
        registry.register(Box::new(LargeTradeScreen::default()));
        registry.register(Box::new(LowBuzzSurpriseScreen::default()));
        registry
    }

    /// Add a strategy, replacing any existing one with the same name.
    pub fn register(&mut self, strategy: Box<dyn ScreenStrategy>) {
        match self
            .strategies
            .iter()
            .position(|s| s.name() == strategy.name())
        {
            Some(i) => self.strategies[i] = strategy,
            None => self.strategies.push(strategy),
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn ScreenStrategy, StrategyError> {
        self.strategies
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
            .ok_or_else(|| StrategyError::UnknownStrategy(name.to_string()))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ScreenStrategy> {
        self.strategies.iter().map(|s| s.as_ref())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
