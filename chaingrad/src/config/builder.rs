//! Build [`Config`] from environment variables.
//!
//! Uses [`env_string`] and [`env_parsed`] to read env vars with a single place for key names
//! (the `constants` submodule) and typed errors ([`ConfigError`]).

use super::constants::{ENV_INPUT, ENV_LOG_LEVEL, ENV_PREFIX, ENV_SCENARIO};
use super::Config;
use super::ConfigError;
use crate::expr::Scenario;

/// Returns the full environment variable key for a given suffix (e.g. `INPUT` → `CHAINGRAD_INPUT`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string.
///
/// Returns `Some(value)` if the variable is set and valid UTF-8, `None` if unset.
/// Returns `Err(ConfigError::EnvVar)` if the variable is set but invalid (e.g. not Unicode).
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads an environment variable and parses it into type `T`.
///
/// Returns `Ok(Some(value))` if set and parse succeeds, `Ok(None)` if unset, and
/// `Err(ConfigError::Parse)` if set but parsing fails (e.g. `CHAINGRAD_INPUT=abc`).
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    match s.parse() {
        Ok(t) => Ok(Some(t)),
        Err(e) => Err(ConfigError::Parse {
            key: key.to_string(),
            value: s,
            message: e.to_string(),
        }),
    }
}

/// Builds [`Config`] from environment variables, falling back to [`Config::default`] for unset values.
///
/// Returns [`ConfigError`] if any *set* variable fails to parse (e.g. `CHAINGRAD_SCENARIO=cubic`).
pub fn from_env() -> Result<Config, ConfigError> {
    let default = Config::default();

    let input = env_parsed::<f64>(&env_key(ENV_INPUT))?.unwrap_or(default.input);
    let scenario = env_parsed::<Scenario>(&env_key(ENV_SCENARIO))?.unwrap_or(default.scenario);
    let log_level = env_string(&env_key(ENV_LOG_LEVEL))?
        .map(|s| s.trim().to_ascii_lowercase())
        .unwrap_or(default.log_level);

    Ok(Config {
        input,
        scenario,
        log_level,
    })
}
