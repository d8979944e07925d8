//! Autograd: a chain of scalar values with reverse-mode differentiation.
//!
//! Each construction on a [`Variable`] eagerly computes a value and links the new node
//! to the one it came from. [`Variable::backward`] walks that chain from the terminal
//! node to the root, applying the chain rule one link at a time.
//!
//! Only one lineage is tracked per chain: a second [`Variable`] passed as an operand
//! contributes its value as a constant. Multiplying a node by itself is the one case
//! that is rewritten (to squaring) so its derivative stays correct.

pub mod impls;
#[cfg(test)]
mod tests;

pub use impls::variable::{Lineage, Operand, Variable};

/// Trait for raising a node to a power (e.g. `(&x).pow(2.0)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// Trait for the exponential of a node (e.g. `(&x).exp()`).
pub trait Exp {
    /// Result of the exponential.
    type Output;

    /// Returns `exp(self)` with gradient tracking.
    #[must_use]
    fn exp(self) -> Self::Output;
}

/// Trait for the natural log of a node (e.g. `(&x).log()`).
pub trait Log {
    /// Result of the log.
    type Output;

    /// Returns `ln(self)` with gradient tracking.
    #[must_use]
    fn log(self) -> Self::Output;
}

/// Trait for the sine of a node (e.g. `(&x).sin()`).
pub trait Sin {
    /// Result of the sine.
    type Output;

    /// Returns `sin(self)` with gradient tracking.
    #[must_use]
    fn sin(self) -> Self::Output;
}
