//! Demonstration expressions built on [`Variable`].
//!
//! Each [`Scenario`] builds a chain from a root and knows the derivative that
//! backward should produce at that root.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::autograd::Variable;
use crate::error::Result;

/// A named expression of one tracked variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// `log(((x + 2)(x + 2))^3)`, derivative `6 / (x + 2)`.
    #[default]
    Composite,
    /// `a = exp(x); b = a^2; c = a + b; d = exp(c); out = d + sin(d)`.
    ///
    /// `b` and `sin(d)` are separate nodes and enter `c` and `out` as constants, so
    /// only `x -> a -> c -> d -> out` carries gradient.
    NestedExp,
}

/// Returned when parsing an unknown scenario name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scenario {0:?} (expected one of: composite, nested-exp)")]
pub struct UnknownScenario(pub String);

impl Scenario {
    /// All scenarios, in display order.
    pub const ALL: [Scenario; 2] = [Scenario::Composite, Scenario::NestedExp];

    /// Name used on the command line and in the environment.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Composite => "composite",
            Scenario::NestedExp => "nested-exp",
        }
    }

    /// Builds the expression from root `x` and returns its terminal node.
    ///
    /// # Errors
    ///
    /// Propagates [`AutogradError::Domain`](crate::AutogradError::Domain) from any step,
    /// e.g. `Composite` at `x = -2` takes the log of zero.
    pub fn build(&self, x: &Variable) -> Result<Variable> {
        match self {
            Scenario::Composite => {
                let y = x.add(2.0);
                let z = y.multiply(&y);
                let w = z.raise_to_power(3.0)?;
                w.natural_log()
            }
            Scenario::NestedExp => {
                let a = x.exponential();
                let b = a.raise_to_power(2.0)?;
                let c = a.add(&b);
                let d = c.exponential();
                let e = d.sine();
                Ok(d.add(&e))
            }
        }
    }

    /// Derivative of the tracked lineage at `x`, in closed form.
    #[must_use]
    pub fn expected_grad(&self, x: f64) -> f64 {
        match self {
            Scenario::Composite => 6.0 / (x + 2.0),
            // d(out)/dx = d * a with a = e^x and d = e^(a + a^2)
            Scenario::NestedExp => {
                let a = x.exp();
                a * (a + a * a).exp()
            }
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}
