//! Implementations behind the [`autograd`](super) traits.

pub mod variable;
