use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{BreakEvenSettings, Config, LogFormat, LoggingSettings, Scenario};

/// The file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pricewise.toml";

/// Prefix for environment overrides, e.g. `PRICEWISE__COSTS__DELIVERY_FEE=6`.
pub const ENV_PREFIX: &str = "PRICEWISE";

/// Loads and validates the application configuration.
///
/// This function is the primary entry point for this crate. It reads the TOML
/// file, layers `PRICEWISE__*` environment variables on top, deserializes the
/// result into our strongly-typed `Config` struct and validates it.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
