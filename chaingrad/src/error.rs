//! Error types for chaingrad.
//!
//! Every fallible construction in [`crate::autograd`] returns [`AutogradError`].
//! Configuration has its own error type, [`crate::config::ConfigError`].

use thiserror::Error;

/// Result type alias using chaingrad's [`AutogradError`].
pub type Result<T> = std::result::Result<T, AutogradError>;

/// Errors produced while extending a chain.
///
/// # Variants
///
/// - **Domain**: The operation is undefined in real double-precision arithmetic at the
///   producer's value (e.g. `ln(x)` for `x <= 0`, or a negative base raised to a
///   non-integer power).
///   *When*: At construction time, before the new node exists.
///   *Recovery*: None within the chain; the producer stays valid and can be extended
///   with a different operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutogradError {
    /// The operation has no real result at this input.
    #[error("domain error in {}: input {}{}: {}", .op, .input, fmt_operand(.operand), .reason)]
    Domain {
        /// Operation name (see [`crate::ops::Operation::name`]).
        op: &'static str,
        /// The producer's value the operation was applied to.
        input: f64,
        /// The constant operand, for binary operations.
        operand: Option<f64>,
        /// Which rule was violated.
        reason: &'static str,
    },
}

fn fmt_operand(operand: &Option<f64>) -> String {
    match operand {
        Some(n) => format!(", operand {n}"),
        None => String::new(),
    }
}

impl AutogradError {
    /// Returns the name of the operation that failed.
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            AutogradError::Domain { op, .. } => op,
        }
    }
}
