//! Application configuration management.
//!
//! Every field carries a default, so an empty configuration is valid and
//! reproduces the engine's documented policies.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Engine tolerances and thresholds.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Absolute tolerance for `assets == liabilities + equity`.
    #[serde(default = "default_tolerance")]
    pub balance_tolerance: Decimal,
    /// Aging classifier settings.
    #[serde(default)]
    pub aging: AgingConfig,
    /// Ratio status thresholds.
    #[serde(default)]
    pub ratios: RatioConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_tolerance(),
            aging: AgingConfig::default(),
            ratios: RatioConfig::default(),
        }
    }
}

/// Aging classifier configuration.
///
/// Day boundaries are inclusive upper bounds: with the defaults, 30 days past
/// due is still `overdue_30` and 61 days is the first `overdue_90_plus` day.
#[derive(Debug, Clone, Deserialize)]
pub struct AgingConfig {
    /// Allowed absolute gap between the bucket sum and the owning total.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    /// Last day (inclusive) that falls into the `overdue_30` bucket.
    #[serde(default = "default_overdue_30_max_days")]
    pub overdue_30_max_days: u32,
    /// Last day (inclusive) that falls into the `overdue_60` bucket.
    #[serde(default = "default_overdue_60_max_days")]
    pub overdue_60_max_days: u32,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            overdue_30_max_days: default_overdue_30_max_days(),
            overdue_60_max_days: default_overdue_60_max_days(),
        }
    }
}

/// Ratio status thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct RatioConfig {
    /// Current ratio below this value is `low`.
    #[serde(default = "default_current_ratio_low")]
    pub current_ratio_low: Decimal,
    /// Current ratio above this value is `high`.
    #[serde(default = "default_current_ratio_high")]
    pub current_ratio_high: Decimal,
    /// Debt-to-equity at or above this value is `high`.
    #[serde(default = "default_debt_to_equity_high")]
    pub debt_to_equity_high: Decimal,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            current_ratio_low: default_current_ratio_low(),
            current_ratio_high: default_current_ratio_high(),
            debt_to_equity_high: default_debt_to_equity_high(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

const fn default_tolerance() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 2) // 0.01
}

const fn default_overdue_30_max_days() -> u32 {
    30
}

const fn default_overdue_60_max_days() -> u32 {
    60
}

const fn default_current_ratio_low() -> Decimal {
    Decimal::from_parts(15, 0, 0, false, 1) // 1.5
}

const fn default_current_ratio_high() -> Decimal {
    Decimal::from_parts(3, 0, 0, false, 0)
}

const fn default_debt_to_equity_high() -> Decimal {
    Decimal::from_parts(2, 0, 0, false, 0)
}

fn default_log_level() -> String {
    "finstat=info".to_string()
}

impl EngineConfig {
    /// Checks that tolerances are non-negative and thresholds are ordered.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` describing the first offending setting.
    pub fn validate(&self) -> AppResult<()> {
        if self.balance_tolerance < Decimal::ZERO {
            return Err(AppError::Config(
                "engine.balance_tolerance must not be negative".to_string(),
            ));
        }
        self.aging.validate()?;
        self.ratios.validate()
    }
}

impl AgingConfig {
    /// Checks that the tolerance is non-negative and
    /// `0 < overdue_30_max_days < overdue_60_max_days`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` describing the first offending setting.
    pub fn validate(&self) -> AppResult<()> {
        if self.tolerance < Decimal::ZERO {
            return Err(AppError::Config(
                "engine.aging.tolerance must not be negative".to_string(),
            ));
        }
        if self.overdue_30_max_days == 0 || self.overdue_30_max_days >= self.overdue_60_max_days {
            return Err(AppError::Config(format!(
                "engine.aging thresholds must satisfy 0 < {} < {}",
                self.overdue_30_max_days, self.overdue_60_max_days
            )));
        }
        Ok(())
    }
}

impl RatioConfig {
    /// Checks that the current ratio band is not inverted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `current_ratio_low > current_ratio_high`.
    pub fn validate(&self) -> AppResult<()> {
        if self.current_ratio_low > self.current_ratio_high {
            return Err(AppError::Config(format!(
                "engine.ratios.current_ratio_low ({}) exceeds current_ratio_high ({})",
                self.current_ratio_low, self.current_ratio_high
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> AppResult<Self> {
        Self::load_with(None)
    }

    /// Loads configuration, layering an explicit file between the run-mode
    /// files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file is missing, a source cannot be
    /// parsed, or the result fails validation.
    pub fn load_with(explicit_file: Option<&str>) -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        if let Some(path) = explicit_file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config: Self = builder
            .add_source(config::Environment::with_prefix("FINSTAT").separator("__"))
            .build()?
            .try_deserialize()?;

        config.engine.validate()?;
        Ok(config)
    }
}
