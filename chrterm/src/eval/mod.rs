//! Guard evaluation: constant folding and simplification of operator terms.
//!
//! [`evaluate`] rewrites a term bottom-up with a fixed, terminating rule set:
//! - arithmetic and bitwise operators fold when both operands are numbers (`div` and
//!   `mod` come out as `/` and `%` when they cannot be folded);
//! - stacked prefix operators cancel out by parity, and `!` is pushed into a relation;
//! - `>` and `>=` become `<` and `<=` with swapped operands;
//! - relations between constants, and between identical operands, become booleans;
//! - `&&` and `||` short-circuit on a constant side and merge two relations over the
//!   same operands (see [`order`]);
//! - `x in [..]` is decided when the answer does not depend on any variable.
//!
//! Anything else is rebuilt from its evaluated parts. Evaluation never fails: an
//! operation without a defined result stays symbolic.
mod fold;
mod order;

use log::{debug, trace};

use crate::term::{Compound, Term, equal, ops::Operator};

/// Reduce `t` to its simplest form under the guard rewrite rules.
///
/// ```
/// use chrterm::prelude::*;
///
/// let guard = Term::binary(
///     Operator::Or,
///     Term::binary(Operator::Lt, Term::var("a"), Term::int(7)),
///     Term::binary(Operator::Ge, Term::var("a"), Term::int(7)),
/// );
/// assert_eq!(evaluate(&guard), Term::Bool(true));
///
/// let sum = Term::binary(Operator::Add, Term::int(3), Term::float(87.62));
/// assert_eq!(evaluate(&sum).to_string(), "90.62");
/// ```
pub fn evaluate(t: &Term) -> Term {
    match t {
        Term::Compound(c) => match operator_of(c) {
            Some(op) => evaluate_operator(op, c),
            None if c.arity() == 0 => t.clone(),
            None => Term::Compound(c.with_args(c.args().iter().map(evaluate).collect())),
        },
        Term::List(elements) => Term::List(elements.iter().map(evaluate).collect()),
        _ => t.clone(),
    }
}

/// Only compounds written in operator notation are evaluated as operators; `+(1,2)` in
/// functional notation is plain data.
fn operator_of(c: &Compound) -> Option<Operator> {
    if c.precedence() == 0 {
        None
    } else {
        c.as_operator()
    }
}

fn evaluate_operator(op: Operator, c: &Compound) -> Term {
    match (op, c.args()) {
        (_, [operand]) => evaluate_unary(op, operand),
        (Operator::And | Operator::Or, [lhs, rhs]) => evaluate_connective(op, lhs, rhs),
        (Operator::In, [lhs, rhs]) => evaluate_membership(evaluate(lhs), evaluate(rhs)),
        (_, [lhs, rhs]) if op.is_relational() => {
            evaluate_relation(op, evaluate(lhs), evaluate(rhs))
        }
        (_, [lhs, rhs]) => evaluate_arithmetic(op, evaluate(lhs), evaluate(rhs)),
        _ => Term::Compound(c.with_args(c.args().iter().map(evaluate).collect())),
    }
}

fn evaluate_unary(op: Operator, operand: &Term) -> Term {
    let operand = evaluate(operand);
    if let Some(folded) = fold::fold_unary(op, &operand) {
        return folded;
    }
    // Unary plus is the identity, so a chain of `+`/`-` reduces to `x` or `-x` by parity.
    if op == Operator::Plus {
        return operand;
    }
    if let Some((inner, args)) = operand.as_operator() {
        match (op, inner, args) {
            (Operator::Neg, Operator::Neg, [x])
            | (Operator::Complement, Operator::Complement, [x])
            | (
                Operator::Not | Operator::LogicalNot,
                Operator::Not | Operator::LogicalNot,
                [x],
            ) => return x.clone(),
            (Operator::Not | Operator::LogicalNot, _, [lhs, rhs]) => {
                if let Some(negated) = negate_relation(inner, lhs, rhs) {
                    return negated;
                }
            }
            _ => {}
        }
    }
    Term::unary(op, operand)
}

/// `!(a<b)` is `b<=a`, `!(a<=b)` is `b<a`, and `==`/`!=` swap.
fn negate_relation(op: Operator, lhs: &Term, rhs: &Term) -> Option<Term> {
    let (op, lhs, rhs) = match op {
        Operator::Lt => (Operator::Le, rhs, lhs),
        Operator::Le => (Operator::Lt, rhs, lhs),
        Operator::Eq => (Operator::Ne, lhs, rhs),
        Operator::Ne => (Operator::Eq, lhs, rhs),
        _ => return None,
    };
    Some(Term::binary(op, lhs.clone(), rhs.clone()))
}

fn evaluate_connective(op: Operator, lhs: &Term, rhs: &Term) -> Term {
    let left = evaluate(lhs);
    match (op, &left) {
        (Operator::And, Term::Bool(false)) => return Term::Bool(false),
        (Operator::Or, Term::Bool(true)) => return Term::Bool(true),
        (Operator::And, Term::Bool(true)) | (Operator::Or, Term::Bool(false)) => {
            return evaluate(rhs);
        }
        _ => {}
    }

    let right = evaluate(rhs);
    match (op, &right) {
        (Operator::And, Term::Bool(false)) => return Term::Bool(false),
        (Operator::Or, Term::Bool(true)) => return Term::Bool(true),
        (Operator::And, Term::Bool(true)) | (Operator::Or, Term::Bool(false)) => return left,
        _ => {}
    }

    if equal(&left, &right) {
        return left;
    }
    if let Some(merged) = order::combine(op, &left, &right) {
        debug!("Merged {left} {op} {right} into {merged}");
        return merged;
    }
    Term::binary(op, left, right)
}

fn evaluate_relation(op: Operator, lhs: Term, rhs: Term) -> Term {
    let (op, lhs, rhs) = match op {
        Operator::Gt => (Operator::Lt, rhs, lhs),
        Operator::Ge => (Operator::Le, rhs, lhs),
        _ => (op, lhs, rhs),
    };
    if let Some(value) = fold::fold_relation(op, &lhs, &rhs) {
        return Term::Bool(value);
    }
    if equal(&lhs, &rhs) {
        trace!("Reflexive {lhs} {op} {rhs}");
        return Term::Bool(matches!(op, Operator::Eq | Operator::Le));
    }
    Term::binary(op, lhs, rhs)
}

fn evaluate_membership(needle: Term, haystack: Term) -> Term {
    if let Term::List(elements) = &haystack {
        if needle.is_ground() {
            if elements.iter().any(|e| equal(&needle, e)) {
                return Term::Bool(true);
            }
            if haystack.is_ground() && haystack.as_open_list().is_none() {
                return Term::Bool(false);
            }
        }
    }
    Term::binary(Operator::In, needle, haystack)
}

fn evaluate_arithmetic(op: Operator, lhs: Term, rhs: Term) -> Term {
    match fold::fold_arithmetic(op, &lhs, &rhs) {
        Some(value) => value,
        None => Term::binary(op.canonical(), lhs, rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Term {
        Term::var(name)
    }

    fn bin(op: Operator, a: Term, b: Term) -> Term {
        Term::binary(op, a, b)
    }

    fn eval_str(t: Term) -> String {
        evaluate(&t).to_string()
    }

    #[test]
    fn nested_arithmetic_folds() {
        let t = bin(
            Operator::Eq,
            bin(Operator::Mul, Term::int(5), Term::int(8)),
            bin(
                Operator::Sub,
                bin(Operator::Mul, Term::int(6), Term::int(8)),
                Term::int(7),
            ),
        );
        assert_eq!(eval_str(t), "false");
    }

    #[test]
    fn unary_parity() {
        let x = var("X");
        let t = Term::unary(Operator::Neg, Term::unary(Operator::Neg, x.clone()));
        assert_eq!(evaluate(&t), x);
        let t = Term::unary(
            Operator::Neg,
            Term::unary(Operator::Neg, Term::unary(Operator::Neg, x.clone())),
        );
        assert_eq!(eval_str(t), "-X");
        let t = Term::unary(Operator::Not, Term::unary(Operator::LogicalNot, x.clone()));
        assert_eq!(evaluate(&t), x);
    }

    #[test]
    fn mixed_sign_chains_collapse_by_parity() {
        let x = var("X");
        let plus = |t| Term::unary(Operator::Plus, t);
        let neg = |t| Term::unary(Operator::Neg, t);
        assert_eq!(evaluate(&plus(x.clone())), x);
        assert_eq!(eval_str(plus(neg(x.clone()))), "-X");
        assert_eq!(evaluate(&neg(plus(neg(x.clone())))), x);
        assert_eq!(eval_str(neg(plus(plus(x.clone())))), "-X");
    }

    #[test]
    fn not_is_pushed_into_relations() {
        let t = Term::unary(Operator::Not, bin(Operator::Lt, var("a"), var("b")));
        assert_eq!(eval_str(t), "b<=a");
        let t = Term::unary(Operator::Not, bin(Operator::Gt, var("a"), var("b")));
        assert_eq!(eval_str(t), "a<=b");
        let t = Term::unary(Operator::Not, bin(Operator::Eq, var("a"), var("b")));
        assert_eq!(eval_str(t), "a!=b");
    }

    #[test]
    fn greater_than_is_canonicalized() {
        assert_eq!(eval_str(bin(Operator::Gt, var("a"), var("b"))), "b<a");
        assert_eq!(eval_str(bin(Operator::Ge, var("a"), Term::int(7))), "7<=a");
    }

    #[test]
    fn reflexive_relations() {
        assert_eq!(evaluate(&bin(Operator::Le, var("X"), var("X"))), Term::Bool(true));
        assert_eq!(evaluate(&bin(Operator::Eq, var("X"), var("X"))), Term::Bool(true));
        assert_eq!(evaluate(&bin(Operator::Lt, var("X"), var("X"))), Term::Bool(false));
        assert_eq!(evaluate(&bin(Operator::Ne, var("X"), var("X"))), Term::Bool(false));
    }

    #[test]
    fn short_circuit_keeps_symbolic_side() {
        let p = bin(Operator::Lt, var("a"), var("b"));
        assert_eq!(evaluate(&bin(Operator::And, Term::Bool(true), p.clone())), p);
        assert_eq!(evaluate(&bin(Operator::Or, p.clone(), Term::Bool(false))), p);
        assert_eq!(
            evaluate(&bin(Operator::And, p.clone(), Term::Bool(false))),
            Term::Bool(false)
        );
        assert_eq!(evaluate(&bin(Operator::Or, p.clone(), p.clone())), p);
    }

    #[test]
    fn false_conjunct_skips_undefined_right_side() {
        let undefined = bin(Operator::Div, Term::int(1), Term::int(0));
        let t = bin(
            Operator::And,
            Term::Bool(false),
            bin(Operator::Eq, undefined, Term::int(1)),
        );
        assert_eq!(evaluate(&t), Term::Bool(false));
    }

    #[test]
    fn symbolic_division_is_canonicalized() {
        let t = bin(Operator::IntDiv, var("X"), Term::int(2));
        assert_eq!(eval_str(t), "X/2");
        let t = bin(Operator::IntMod, Term::int(3), Term::int(0));
        assert_eq!(eval_str(t), "3%0");
    }

    #[test]
    fn membership() {
        let list = Term::list(vec![Term::int(1), Term::atom("a")]);
        assert_eq!(
            evaluate(&bin(Operator::In, Term::atom("a"), list.clone())),
            Term::Bool(true)
        );
        assert_eq!(
            evaluate(&bin(Operator::In, Term::int(2), list)),
            Term::Bool(false)
        );
        let partial = Term::list(vec![Term::int(1), var("X")]);
        assert_eq!(
            evaluate(&bin(Operator::In, Term::int(1), partial.clone())),
            Term::Bool(true)
        );
        assert_eq!(
            eval_str(bin(Operator::In, Term::int(2), partial)),
            "2 in [1, X]"
        );
    }

    #[test]
    fn functional_compounds_and_lists_are_traversed() {
        let t = Term::compound(
            "p",
            vec![
                bin(Operator::Add, Term::int(1), Term::int(2)),
                Term::list(vec![bin(Operator::Gt, Term::int(2), Term::int(1))]),
            ],
        );
        assert_eq!(eval_str(t), "p(3,[true])");
        let data = Term::compound("+", vec![Term::int(1), Term::int(2)]);
        assert_eq!(eval_str(data), "+(1,2)");
    }
}
