//! Configuration for the demonstration runner.
//!
//! Load from environment via [`from_env`] and validate with [`Config::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use constants::{DEFAULT_INPUT, DEFAULT_LOG_LEVEL, LOG_LEVELS};

pub use builder::{env_key, env_parsed, env_string, from_env};
pub use error::ConfigError;

use crate::expr::Scenario;

/// Settings for one demonstration run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Value of the root variable.
    pub input: f64,
    /// Which expression to build.
    pub scenario: Scenario,
    /// Log filter level (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT,
            scenario: Scenario::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    ///
    /// Ensures the input is finite and the log level is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input.is_finite() {
            return Err(ConfigError::Validation(format!(
                "input must be finite, got {}",
                self.input
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of {LOG_LEVELS:?}, got {:?}",
                self.log_level
            )));
        }
        Ok(())
    }
}
