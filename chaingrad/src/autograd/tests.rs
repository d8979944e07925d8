//! Tests for the scalar chain.
//!
//! Covers each operation's backward, the self-multiply rewrite, the composite
//! `log(((x + 2)(x + 2))^3)` example, idempotence, fan-out, and very long chains.

use crate::autograd::{Exp, Log, Pow, Sin, Variable};
use crate::error::AutogradError;
use crate::ops::Operation;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::E;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn root_has_no_grad_before_backward() {
    let x = Variable::new(3.0);
    assert_eq!(x.value(), 3.0);
    assert_eq!(x.grad(), None);
    assert!(x.is_root());
    assert!(x.producer().is_none());
    assert!(x.operation().is_none());
    assert_eq!(x.depth(), 0);
}

#[test]
fn backward_on_unused_root_is_noop() {
    let x = Variable::new(1.5);
    x.backward();
    assert_eq!(x.grad(), None);
}

#[test]
fn constructed_node_links_to_producer() {
    let x = Variable::new(3.0);
    let y = x.add(2.0);
    assert!(!y.is_root());
    assert!(y.producer().unwrap().ptr_eq(&x));
    assert_eq!(y.operation(), Some(Operation::Add(2.0)));
    assert_eq!(y.grad(), None);
}

#[test]
fn add_backward() {
    let x = Variable::new(3.0);
    let y = x.add(2.0);
    assert_eq!(y.value(), 5.0);
    y.backward();
    assert_eq!(y.grad(), Some(1.0));
    assert_eq!(x.grad(), Some(1.0));
}

#[test]
fn add_backward_is_one_for_any_constant() {
    for c in [-100.0, -1.5, 0.0, 2.0, 1e9] {
        let x = Variable::new(0.25);
        let y = x.add(c);
        y.backward();
        assert_eq!(x.grad(), Some(1.0), "c = {c}");
    }
}

#[test]
fn multiply_by_constant_backward() {
    let x = Variable::new(2.0);
    let y = x.multiply(3.0);
    assert_eq!(y.value(), 6.0);
    y.backward();
    assert_eq!(x.grad(), Some(3.0));
}

#[test]
fn self_multiply_is_rewritten_to_square() {
    let x = Variable::new(3.0);
    let y = x.multiply(&x);
    assert_eq!(y.operation(), Some(Operation::Power(2.0)));
    assert_eq!(y.value(), 9.0);
    y.backward();
    assert_eq!(x.grad(), Some(6.0));
}

#[test]
fn self_multiply_through_operator_is_rewritten_to_square() {
    let x = Variable::new(-1.5);
    let y = &x * &x;
    y.backward();
    assert_relative_eq!(x.grad().unwrap(), 2.0 * x.value());
}

#[test]
fn clone_of_node_still_counts_as_self() {
    let x = Variable::new(4.0);
    let same = x.clone();
    let y = x.multiply(&same);
    assert_eq!(y.operation(), Some(Operation::Power(2.0)));
}

#[test]
fn equal_valued_distinct_nodes_are_not_squared() {
    let x = Variable::new(3.0);
    let other = Variable::new(3.0);
    let y = x.multiply(&other);
    assert_eq!(y.operation(), Some(Operation::Multiply(3.0)));
    y.backward();
    assert_eq!(x.grad(), Some(3.0));
    // The operand node is read as a constant and never reached by backward.
    assert_eq!(other.grad(), None);
}

#[test]
fn pow_backward() {
    let x = Variable::new(2.0);
    let y = x.raise_to_power(3.0).unwrap();
    assert_relative_eq!(y.value(), 8.0);
    y.backward();
    // d/dx x^3 = 3x^2 = 12 at x=2
    assert_relative_eq!(x.grad().unwrap(), 12.0);
}

#[test]
fn pow_with_node_operand_uses_its_value() {
    let x = Variable::new(2.0);
    let n = Variable::new(4.0);
    let y = x.raise_to_power(&n).unwrap();
    assert_eq!(y.operation(), Some(Operation::Power(4.0)));
    y.backward();
    assert_relative_eq!(x.grad().unwrap(), 32.0);
    assert_eq!(n.grad(), None);
}

#[test]
fn pow_domain_error_leaves_producer_usable() {
    let x = Variable::new(-8.0).add(0.0);
    let err = x.raise_to_power(1.0 / 3.0).unwrap_err();
    assert!(matches!(err, AutogradError::Domain { op: "pow", .. }));
    assert_eq!(x.depth(), 1);
    let y = x.raise_to_power(3.0).unwrap();
    assert_relative_eq!(y.value(), -512.0);
}

#[test]
fn pow_never_yields_nan_silently() {
    let res = Variable::new(2.0).raise_to_power(f64::NAN);
    assert!(matches!(res, Err(AutogradError::Domain { op: "pow", .. })));
    let res = Variable::new(f64::NAN).raise_to_power(2.0);
    assert!(matches!(res, Err(AutogradError::Domain { op: "pow", .. })));
}

#[test]
fn square_root_at_zero_is_rejected_before_backward() {
    let x = Variable::new(0.0);
    assert!(x.raise_to_power(0.5).is_err());
    // Away from zero the chain, including a zero upstream gradient, stays finite.
    let y = Variable::new(4.0).raise_to_power(0.5).unwrap();
    let z = y.multiply(0.0);
    z.backward();
    assert_eq!(y.grad(), Some(0.0));
}

#[test]
fn exp_backward() {
    let x = Variable::new(1.0);
    let y = x.exponential();
    assert_relative_eq!(y.value(), E);
    y.backward();
    assert_relative_eq!(y.grad().unwrap(), E);
    assert_eq!(y.grad(), Some(y.value()));
    assert_relative_eq!(x.grad().unwrap(), E);
}

#[test]
fn log_backward() {
    let x = Variable::new(E);
    let y = x.natural_log().unwrap();
    assert_relative_eq!(y.value(), 1.0);
    y.backward();
    // d/dx ln(x) = 1/x = 1/e at x=e
    assert_relative_eq!(x.grad().unwrap(), 1.0 / E);
}

#[test]
fn log_of_non_positive_is_domain_error() {
    for v in [0.0, -2.0] {
        let x = Variable::new(v);
        let res = x.natural_log();
        assert!(
            matches!(res, Err(AutogradError::Domain { op: "log", .. })),
            "v = {v}"
        );
    }
}

#[test]
fn sine_backward() {
    let x = Variable::new(0.0);
    let y = x.sine();
    assert_eq!(y.value(), 0.0);
    y.backward();
    assert_eq!(x.grad(), Some(1.0));
}

#[test]
fn composite_log_of_cubed_square() {
    // log(((x + 2)(x + 2))^3) => 6 / (x + 2) = 1.2 at x = 3
    init_logger();
    let x = Variable::new(3.0);
    let y = x.add(2.0);
    let z = y.multiply(&y);
    let w = z.raise_to_power(3.0).unwrap();
    let g = w.natural_log().unwrap();
    g.backward();
    assert_relative_eq!(x.grad().unwrap(), 1.2, epsilon = 1e-12);
    assert_eq!(g.depth(), 4);
}

#[test]
fn backward_sets_grad_on_every_node() {
    let x = Variable::new(0.5);
    let out = x.add(1.0).exponential().sine().multiply(2.0);
    out.backward();
    let nodes: Vec<_> = out.lineage().collect();
    assert_eq!(nodes.len(), 5);
    assert!(nodes.last().unwrap().ptr_eq(&x));
    assert!(nodes.iter().all(|n| n.grad().is_some()));
}

#[test]
fn backward_is_idempotent() {
    let x = Variable::new(1.3);
    let out = x.multiply(&x).add(0.7).natural_log().unwrap().exponential();
    out.backward();
    let first: Vec<_> = out.lineage().map(Variable::grad).collect();
    out.backward();
    let second: Vec<_> = out.lineage().map(Variable::grad).collect();
    assert_eq!(first, second);
}

#[test]
fn zero_upstream_gradient_still_propagates() {
    let x = Variable::new(2.0);
    let a = x.add(1.0);
    let b = a.multiply(0.0);
    let c = b.add(5.0);
    c.backward();
    assert_eq!(c.grad(), Some(1.0));
    assert_eq!(b.grad(), Some(0.0));
    // A supplied zero is still an upstream gradient, not a fresh terminal.
    assert_eq!(a.grad(), Some(0.0));
    assert_eq!(x.grad(), Some(0.0));
}

#[test]
fn fan_out_branches_only_touch_their_own_suffix() {
    let x = Variable::new(2.0);
    let shared = x.add(1.0);
    let left = shared.multiply(10.0);
    let right = shared.raise_to_power(2.0).unwrap();

    left.backward();
    assert_eq!(x.grad(), Some(10.0));
    assert_eq!(right.grad(), None);

    right.backward();
    // Shared prefix is overwritten by the latest pass; left's own node is untouched.
    assert_eq!(x.grad(), Some(6.0));
    assert_eq!(left.grad(), Some(10.0));
}

#[test]
fn std_ops_and_traits() {
    let x = Variable::new(2.0);
    assert_eq!((&x + 1.0).value(), 3.0);
    assert_eq!((1.0 + &x).value(), 3.0);
    assert_eq!((&x * 4.0).value(), 8.0);
    assert_eq!((4.0 * &x).value(), 8.0);
    assert_eq!((&x + &Variable::new(5.0)).value(), 7.0);
    assert_relative_eq!((&x).pow(3.0).unwrap().value(), 8.0);
    assert_relative_eq!((&x).exp().value(), 2.0_f64.exp());
    assert_relative_eq!((&x).log().unwrap().value(), 2.0_f64.ln());
    assert_relative_eq!((&x).sin().value(), 2.0_f64.sin());

    let out = (&(&x * &x) + 1.0).log().unwrap();
    out.backward();
    // d/dx ln(x^2 + 1) = 2x / (x^2 + 1)
    assert_relative_eq!(x.grad().unwrap(), 4.0 / 5.0, epsilon = 1e-12);
}

#[test]
fn long_chain_backward_and_drop() {
    let x = Variable::new(0.0);
    let mut out = x.clone();
    for _ in 0..200_000 {
        out = out.add(1.0);
    }
    assert_eq!(out.value(), 200_000.0);
    out.backward();
    assert_eq!(x.grad(), Some(1.0));
    drop(out);
    // The root outlives the chain through its own handle.
    assert_eq!(x.value(), 0.0);
}

#[test]
fn random_inputs_match_analytic_derivatives() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let v: f64 = rng.random_range(0.1..5.0);
        let n: f64 = rng.random_range(-3.0..3.0);

        let x = Variable::new(v);
        x.raise_to_power(n).unwrap().backward();
        assert_relative_eq!(
            x.grad().unwrap(),
            n * v.powf(n - 1.0),
            max_relative = 1e-12
        );

        let x = Variable::new(v);
        x.natural_log().unwrap().backward();
        assert_relative_eq!(x.grad().unwrap(), 1.0 / v, max_relative = 1e-12);

        let x = Variable::new(v);
        x.sine().backward();
        assert_relative_eq!(x.grad().unwrap(), v.cos(), max_relative = 1e-12);
    }
}

#[test]
fn random_composites_match_finite_differences() {
    fn f(x: &Variable) -> Variable {
        x.multiply(x).add(1.0).natural_log().unwrap().sine().multiply(3.0)
    }

    let mut rng = StdRng::seed_from_u64(7);
    let h = 1e-6;
    for _ in 0..50 {
        let v: f64 = rng.random_range(-2.0..2.0);
        let x = Variable::new(v);
        f(&x).backward();
        let numeric =
            (f(&Variable::new(v + h)).value() - f(&Variable::new(v - h)).value()) / (2.0 * h);
        assert_relative_eq!(x.grad().unwrap(), numeric, epsilon = 1e-6);
    }
}

#[test]
fn debug_shows_value_grad_and_op() {
    let y = Variable::new(1.0).add(2.0);
    let s = format!("{y:?}");
    assert!(s.contains("value: 3.0"));
    assert!(s.contains("grad: None"));
    assert!(s.contains("Add(2.0)"));
}
