//! Operation catalog: the elementary functions a chain is built from.
//!
//! Each [`Operation`] carries exactly the constant it needs and, given the producer's
//! value `x`, yields a forward value and the local derivative `d(forward)/dx`.
//! Operations are plain data; they never see or mutate the producer node.

use std::fmt;

use crate::error::{AutogradError, Result};

/// One elementary transformation of the tracked value `x`.
///
/// Binary variants hold the untracked constant operand `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// `x + n`
    Add(f64),
    /// `x * n`
    Multiply(f64),
    /// `x ^ n`
    Power(f64),
    /// `e ^ x`
    Exp,
    /// `ln(x)`
    Log,
    /// `sin(x)`, radians.
    Sin,
}

impl Operation {
    /// Short lowercase name, used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add(_) => "add",
            Operation::Multiply(_) => "mul",
            Operation::Power(_) => "pow",
            Operation::Exp => "exp",
            Operation::Log => "log",
            Operation::Sin => "sin",
        }
    }

    /// The constant operand, or `None` for unary operations.
    #[must_use]
    pub fn operand(&self) -> Option<f64> {
        match *self {
            Operation::Add(n) | Operation::Multiply(n) | Operation::Power(n) => Some(n),
            Operation::Exp | Operation::Log | Operation::Sin => None,
        }
    }

    /// Forward value at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`AutogradError::Domain`] when the result is not a real number:
    /// `Log` with `x <= 0` (or NaN), `Power` with a NaN base or exponent, `Power` with a
    /// negative base and a non-integer exponent, and `Power` with a zero base and an
    /// exponent below 1 other than 0 (a pole in the value or in the derivative).
    pub fn forward(&self, x: f64) -> Result<f64> {
        self.check_domain(x)?;
        Ok(self.evaluate(x))
    }

    /// Checks that `x` lies in the operation's real domain.
    pub(crate) fn check_domain(&self, x: f64) -> Result<()> {
        match *self {
            Operation::Power(n) if x.is_nan() || n.is_nan() => {
                Err(self.domain(x, "NaN base or exponent"))
            }
            Operation::Power(n) if x < 0.0 && n.fract() != 0.0 => {
                Err(self.domain(x, "negative base with non-integer exponent"))
            }
            Operation::Power(n) if x == 0.0 && n < 0.0 => {
                Err(self.domain(x, "zero base with negative exponent"))
            }
            Operation::Power(n) if x == 0.0 && n > 0.0 && n < 1.0 => {
                Err(self.domain(x, "derivative is unbounded at zero base"))
            }
            Operation::Log if x <= 0.0 || x.is_nan() => {
                Err(self.domain(x, "input must be positive"))
            }
            _ => Ok(()),
        }
    }

    /// Forward value without the domain check. `x` must already be in domain.
    pub(crate) fn evaluate(&self, x: f64) -> f64 {
        match *self {
            Operation::Add(n) => x + n,
            Operation::Multiply(n) => x * n,
            Operation::Power(n) => x.powf(n),
            Operation::Exp => x.exp(),
            Operation::Log => x.ln(),
            Operation::Sin => x.sin(),
        }
    }

    /// Whether [`Operation::forward`] succeeds for every non-NaN input.
    #[must_use]
    pub fn is_total(&self) -> bool {
        match *self {
            Operation::Add(_) | Operation::Multiply(_) | Operation::Exp | Operation::Sin => true,
            // Non-negative integer exponents are defined on the whole real line.
            Operation::Power(n) => n >= 0.0 && n.fract() == 0.0,
            Operation::Log => false,
        }
    }

    /// Local derivative `d(forward)/dx` at `x`.
    ///
    /// Only meaningful where [`Operation::forward`] succeeds.
    #[must_use]
    pub fn local_derivative(&self, x: f64) -> f64 {
        match *self {
            Operation::Add(_) => 1.0,
            Operation::Multiply(n) => n,
            // d/dx x^0 is 0 everywhere, including x = 0 where n * x^(n-1) is 0 * inf.
            Operation::Power(n) if n == 0.0 => 0.0,
            Operation::Power(n) => n * x.powf(n - 1.0),
            Operation::Exp => x.exp(),
            Operation::Log => 1.0 / x,
            Operation::Sin => x.cos(),
        }
    }

    fn domain(&self, input: f64, reason: &'static str) -> AutogradError {
        AutogradError::Domain {
            op: self.name(),
            input,
            operand: self.operand(),
            reason,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand() {
            Some(n) => write!(f, "{}({n})", self.name()),
            None => f.write_str(self.name()),
        }
    }
}
