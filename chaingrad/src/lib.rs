//! # chaingrad
//!
//! Minimal reverse-mode automatic differentiation over a linear chain of scalar
//! operations: wrap a number in a [`Variable`], extend it with `add`, `multiply`,
//! `raise_to_power`, `exponential`, `natural_log` and `sine`, then call
//! [`Variable::backward`] on the result to get the derivative at the root.
//!
//! ```
//! use chaingrad::Variable;
//!
//! // log(((x + 2)(x + 2))^3), derivative 6 / (x + 2)
//! let x = Variable::new(3.0);
//! let y = x.add(2.0);
//! let z = y.multiply(&y);
//! let w = z.raise_to_power(3.0)?;
//! let g = w.natural_log()?;
//! g.backward();
//! assert!((x.grad().unwrap() - 1.2).abs() < 1e-12);
//! # Ok::<(), chaingrad::AutogradError>(())
//! ```

pub mod autograd;
pub mod config;
pub mod error;
pub mod expr;
pub mod ops;

pub use autograd::{Exp, Lineage, Log, Operand, Pow, Sin, Variable};
pub use error::{AutogradError, Result};
pub use expr::Scenario;
pub use ops::Operation;
