use crate::error::ConfigError;
use core_types::{CostSchedule, MetricsInput, UnitEconomics};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub offer: UnitEconomics,
    pub scenario: Scenario,
    #[serde(default)]
    pub costs: CostSchedule,
    #[serde(default)]
    pub break_even: BreakEvenSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Config {
    /// The scenario described by the `[offer]` and `[scenario]` sections.
    pub fn metrics_input(&self) -> MetricsInput {
        self.offer.with_stock(self.scenario.available_stock)
    }

    /// Checks every section, failing on the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.offer.validate()?;
        self.costs.validate()?;
        self.break_even.validate()?;
        Ok(())
    }
}

/// The stock level evaluated by default.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub available_stock: u32,
}

/// Parameters for the break-even stock search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakEvenSettings {
    /// The smallest stock level the search considers.
    pub lower_bound: u32,
    /// The largest stock level the search considers.
    pub upper_bound: u32,
    /// Maximum number of profit evaluations before giving up.
    pub max_iterations: u32,
    /// A profit within this distance of the target counts as a hit (e.g., 0.01).
    pub tolerance: Decimal,
}

impl BreakEvenSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lower_bound > self.upper_bound {
            return Err(ConfigError::ValidationError(format!(
                "break_even.lower_bound ({}) must not exceed break_even.upper_bound ({})",
                self.lower_bound, self.upper_bound
            )));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "break_even.max_iterations must be greater than 0".to_string(),
            ));
        }
        if self.tolerance < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "break_even.tolerance cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BreakEvenSettings {
    fn default() -> Self {
        Self {
            lower_bound: 0,
            upper_bound: 10_000,
            max_iterations: 50,
            tolerance: dec!(0.01),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `analytics=debug`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}
