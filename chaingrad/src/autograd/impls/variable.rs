//! Scalar autograd: a chain of float values, each linked to the one it was computed from.

use crate::autograd::{Exp, Log, Pow, Sin};
use crate::error::Result;
use crate::ops::Operation;
use log::{debug, trace};
use std::cell::Cell;
use std::fmt;
use std::ops::{Add, Mul};
use std::rc::Rc;

/// Internal node: forward value, gradient, and the link back to its producer.
struct Node {
    /// Forward pass value, fixed at construction.
    value: f64,
    /// How this value was produced; `None` for a root.
    link: Option<Link>,
    /// Set by backward. For a root, d(terminal)/d(root); for any other node, the
    /// upstream gradient times the local derivative of `link.op`.
    grad: Cell<Option<f64>>,
}

/// One step of the chain: `op` applied to `producer.value` yields the owning node's value.
struct Link {
    op: Operation,
    producer: Variable,
}

impl Drop for Node {
    // Unlink iteratively so that dropping a long chain does not recurse once per node.
    fn drop(&mut self) {
        let mut next = self.link.take();
        while let Some(link) = next {
            next = match Rc::try_unwrap(link.producer.0) {
                Ok(mut node) => node.link.take(),
                Err(_) => None,
            };
        }
    }
}

/// Handle to a node in the chain.
///
/// Cloning is cheap and yields another handle to the same node. Two handles are the
/// same node iff [`Variable::ptr_eq`] holds; equal values alone mean nothing.
#[derive(Clone)]
pub struct Variable(Rc<Node>);

/// Right-hand side of a binary construction.
///
/// Only the value is used: a [`Variable`] operand is read once and stored as a constant,
/// so no gradient flows into it. The one exception is `x.multiply(&x)`, which
/// [`Variable::multiply`] rewrites to `x.raise_to_power(2.0)`.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    /// A raw number.
    Constant(f64),
    /// Another node, contributing only its current value.
    Node(&'a Variable),
}

impl Operand<'_> {
    /// The numeric value this operand contributes.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Operand::Constant(n) => *n,
            Operand::Node(v) => v.value(),
        }
    }
}

impl From<f64> for Operand<'_> {
    fn from(n: f64) -> Self {
        Operand::Constant(n)
    }
}

impl<'a> From<&'a Variable> for Operand<'a> {
    fn from(v: &'a Variable) -> Self {
        Operand::Node(v)
    }
}

impl Variable {
    /// Creates a root node (no producer, no gradient yet).
    #[must_use]
    pub fn new(value: f64) -> Self {
        Variable(Rc::new(Node {
            value,
            link: None,
            grad: Cell::new(None),
        }))
    }

    /// Forward value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0.value
    }

    /// Gradient set by the most recent backward pass that reached this node.
    #[must_use]
    pub fn grad(&self) -> Option<f64> {
        self.0.grad.get()
    }

    /// `true` if this node was created directly from a number.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.link.is_none()
    }

    /// The node this one was computed from.
    #[must_use]
    pub fn producer(&self) -> Option<&Variable> {
        self.0.link.as_ref().map(|link| &link.producer)
    }

    /// The operation that produced this node from [`Variable::producer`].
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        self.0.link.as_ref().map(|link| link.op)
    }

    /// Reference identity: both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Iterates the chain from this node back to its root, inclusive.
    #[must_use]
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }

    /// Number of operations between this node and its root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lineage().count() - 1
    }

    /// Applies `op` to this node's value. Fails if the value lies outside `op`'s domain.
    fn extend(&self, op: Operation) -> Result<Variable> {
        let value = op.forward(self.value())?;
        Ok(self.link(op, value))
    }

    /// Applies an operation that is defined on the whole real line.
    fn extend_total(&self, op: Operation) -> Variable {
        debug_assert!(op.is_total(), "{op} is not total");
        self.link(op, op.evaluate(self.value()))
    }

    fn link(&self, op: Operation, value: f64) -> Variable {
        debug!("{op}: {} -> {value}", self.value());
        Variable(Rc::new(Node {
            value,
            link: Some(Link {
                op,
                producer: self.clone(),
            }),
            grad: Cell::new(None),
        }))
    }

    /// `self + operand`. Local derivative 1.
    #[must_use]
    pub fn add<'a>(&self, operand: impl Into<Operand<'a>>) -> Variable {
        self.extend_total(Operation::Add(operand.into().value()))
    }

    /// `self * operand`. Local derivative is the operand's value.
    ///
    /// Multiplying a node by itself (same handle, not merely an equal value) builds
    /// `self ^ 2` instead, so the local derivative is `2 * self`. Squaring is defined on
    /// the whole real line, so unlike [`Variable::raise_to_power`] this never fails; a NaN
    /// node stays NaN, as it would under `add`.
    #[must_use]
    pub fn multiply<'a>(&self, operand: impl Into<Operand<'a>>) -> Variable {
        match operand.into() {
            Operand::Node(other) if self.ptr_eq(other) => {
                self.extend_total(Operation::Power(2.0))
            }
            operand => self.extend_total(Operation::Multiply(operand.value())),
        }
    }

    /// `self ^ operand`. Local derivative `n * self^(n-1)`.
    ///
    /// # Errors
    ///
    /// Returns [`AutogradError::Domain`](crate::AutogradError::Domain) for a NaN base or
    /// exponent, a negative base with a non-integer exponent, or a zero base with an
    /// exponent below 1 other than 0 (where the value or the derivative is unbounded).
    pub fn raise_to_power<'a>(&self, operand: impl Into<Operand<'a>>) -> Result<Variable> {
        self.extend(Operation::Power(operand.into().value()))
    }

    /// `e ^ self`.
    #[must_use]
    pub fn exponential(&self) -> Variable {
        self.extend_total(Operation::Exp)
    }

    /// `ln(self)`. Local derivative `1 / self`.
    ///
    /// # Errors
    ///
    /// Returns [`AutogradError::Domain`](crate::AutogradError::Domain) if `self <= 0`.
    pub fn natural_log(&self) -> Result<Variable> {
        self.extend(Operation::Log)
    }

    /// `sin(self)`, radians.
    #[must_use]
    pub fn sine(&self) -> Variable {
        self.extend_total(Operation::Sin)
    }

    /// Runs the backward pass from this node to its root.
    ///
    /// Every node on the way stores the gradient it receives times the local derivative
    /// of the operation that produced it, then hands that product to its producer. The
    /// terminal starts with no upstream gradient, so it stores the bare local derivative;
    /// the root stores what it receives, which is d(terminal)/d(root). A root called as
    /// its own terminal keeps `grad == None`.
    ///
    /// Gradients are overwritten, not accumulated, so repeating the call gives the same
    /// values.
    pub fn backward(&self) {
        let mut node = self;
        let mut upstream: Option<f64> = None;
        loop {
            let grad = match (&node.0.link, upstream) {
                (Some(link), up) => {
                    let local = link.op.local_derivative(link.producer.value());
                    Some(up.map_or(local, |up| up * local))
                }
                (None, up) => up,
            };
            node.0.grad.set(grad);
            match &node.0.link {
                Some(link) => {
                    trace!("backward {}: grad {grad:?}", link.op);
                    upstream = grad;
                    node = &link.producer;
                }
                None => break,
            }
        }
        debug!(
            "backward from {} reached root {} with grad {:?}",
            self.value(),
            node.value(),
            node.grad()
        );
    }
}

/// Iterator over a chain, terminal first, root last. See [`Variable::lineage`].
pub struct Lineage<'a> {
    next: Option<&'a Variable>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a Variable;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.producer();
        Some(current)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("value", &self.value())
            .field("grad", &self.grad())
            .field("op", &self.operation())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// std::ops — x + n, x + y, n + x, x * n, x * y, n * x
// -----------------------------------------------------------------------------

impl Add<f64> for &Variable {
    type Output = Variable;

    fn add(self, rhs: f64) -> Variable {
        Variable::add(self, rhs)
    }
}

impl Add<&Variable> for &Variable {
    type Output = Variable;

    fn add(self, rhs: &Variable) -> Variable {
        Variable::add(self, rhs)
    }
}

impl Add<&Variable> for f64 {
    type Output = Variable;

    fn add(self, rhs: &Variable) -> Variable {
        Variable::add(rhs, self)
    }
}

impl Mul<f64> for &Variable {
    type Output = Variable;

    fn mul(self, rhs: f64) -> Variable {
        self.multiply(rhs)
    }
}

impl Mul<&Variable> for &Variable {
    type Output = Variable;

    fn mul(self, rhs: &Variable) -> Variable {
        self.multiply(rhs)
    }
}

impl Mul<&Variable> for f64 {
    type Output = Variable;

    fn mul(self, rhs: &Variable) -> Variable {
        rhs.multiply(self)
    }
}

// -----------------------------------------------------------------------------
// Pow, Exp, Log, Sin — (&x).pow(n), (&x).exp(), (&x).log(), (&x).sin()
// -----------------------------------------------------------------------------

impl Pow<f64> for &Variable {
    type Output = Result<Variable>;

    fn pow(self, exp: f64) -> Result<Variable> {
        self.raise_to_power(exp)
    }
}

impl Pow<&Variable> for &Variable {
    type Output = Result<Variable>;

    fn pow(self, exp: &Variable) -> Result<Variable> {
        self.raise_to_power(exp)
    }
}

impl Exp for &Variable {
    type Output = Variable;

    fn exp(self) -> Variable {
        self.exponential()
    }
}

impl Log for &Variable {
    type Output = Result<Variable>;

    fn log(self) -> Result<Variable> {
        self.natural_log()
    }
}

impl Sin for &Variable {
    type Output = Variable;

    fn sin(self) -> Variable {
        self.sine()
    }
}
