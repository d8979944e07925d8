//! Configuration constants: defaults and environment variable key names.

/// Environment variable prefix for chaingrad (e.g. `CHAINGRAD_INPUT`).
pub(crate) const ENV_PREFIX: &str = "CHAINGRAD_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_INPUT: &str = "INPUT";
pub(crate) const ENV_SCENARIO: &str = "SCENARIO";
pub(crate) const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

// --- Default values ---

pub(crate) const DEFAULT_INPUT: f64 = 3.0;
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

/// Levels accepted by [`Config::validate`](super::Config::validate).
pub(crate) const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
