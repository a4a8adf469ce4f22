//! Constant folding over numeric, string and boolean leaves.
use log::warn;

use crate::term::{Term, equal, ops::Operator};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn of(t: &Term) -> Option<Number> {
        match t {
            Term::Int(v) => Some(Number::Int(*v)),
            Term::Float(v) => Some(Number::Float(*v)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

/// Fold a prefix operator applied to a constant.
pub(crate) fn fold_unary(op: Operator, operand: &Term) -> Option<Term> {
    match (op, operand) {
        (Operator::Plus, Term::Int(_) | Term::Float(_)) => Some(operand.clone()),
        (Operator::Neg, Term::Int(v)) => Some(Term::Int(v.wrapping_neg())),
        (Operator::Neg, Term::Float(v)) => Some(Term::Float(-v)),
        (Operator::Complement, Term::Int(v)) => Some(Term::Int(!v)),
        (Operator::Not | Operator::LogicalNot, Term::Bool(b)) => Some(Term::Bool(!b)),
        _ => None,
    }
}

/// Fold an arithmetic or bitwise operator over two numeric constants.
///
/// Returns `None` when either side is not a number, when a bitwise operator meets a
/// float, or when the result is undefined (integer division by zero, negative shift).
pub(crate) fn fold_arithmetic(op: Operator, lhs: &Term, rhs: &Term) -> Option<Term> {
    let (a, b) = (Number::of(lhs)?, Number::of(rhs)?);
    match (a, b) {
        (Number::Int(a), Number::Int(b)) => fold_int(op, a, b).map(Term::Int),
        _ => fold_float(op, a.as_f64(), b.as_f64()).map(Term::Float),
    }
}

fn fold_int(op: Operator, a: i64, b: i64) -> Option<i64> {
    let value = match op.canonical() {
        Operator::Add => a.wrapping_add(b),
        Operator::Sub => a.wrapping_sub(b),
        Operator::Mul => a.wrapping_mul(b),
        Operator::Div | Operator::Rem if b == 0 => {
            warn!("Integer {op} by zero in {a} {op} {b}, left unevaluated");
            return None;
        }
        Operator::Div => a.wrapping_div(b),
        Operator::Rem => a.wrapping_rem(b),
        Operator::BitAnd => a & b,
        Operator::BitOr => a | b,
        Operator::BitXor => a ^ b,
        Operator::BitClear => a & !b,
        Operator::Shl | Operator::Shr if b < 0 => {
            warn!("Negative shift count in {a} {op} {b}, left unevaluated");
            return None;
        }
        Operator::Shl if b >= 64 => 0,
        Operator::Shl => a << b,
        Operator::Shr if b >= 64 => {
            if a < 0 {
                -1
            } else {
                0
            }
        }
        Operator::Shr => a >> b,
        _ => return None,
    };
    Some(value)
}

fn fold_float(op: Operator, a: f64, b: f64) -> Option<f64> {
    match op.canonical() {
        Operator::Add => Some(a + b),
        Operator::Sub => Some(a - b),
        Operator::Mul => Some(a * b),
        Operator::Div => Some(a / b),
        Operator::Rem => Some(a % b),
        Operator::BitAnd
        | Operator::BitOr
        | Operator::BitXor
        | Operator::BitClear
        | Operator::Shl
        | Operator::Shr => {
            warn!("Bitwise `{op}` applied to a float, left unevaluated");
            None
        }
        _ => None,
    }
}

/// Decide a relation between two constants.
///
/// Numbers compare numerically (an int against a float compares as floats), strings
/// lexicographically. `==` and `!=` additionally decide any pair of ground terms by
/// structural equality.
pub(crate) fn fold_relation(op: Operator, lhs: &Term, rhs: &Term) -> Option<bool> {
    if let (Some(a), Some(b)) = (Number::of(lhs), Number::of(rhs)) {
        let ordering = match (a, b) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            _ => a.as_f64().partial_cmp(&b.as_f64()),
        };
        return Some(match op {
            Operator::Eq => ordering.is_some_and(|o| o.is_eq()),
            Operator::Ne => !ordering.is_some_and(|o| o.is_eq()),
            Operator::Lt => ordering.is_some_and(|o| o.is_lt()),
            Operator::Le => ordering.is_some_and(|o| o.is_le()),
            Operator::Gt => ordering.is_some_and(|o| o.is_gt()),
            Operator::Ge => ordering.is_some_and(|o| o.is_ge()),
            _ => return None,
        });
    }
    if let (Term::String(a), Term::String(b)) = (lhs, rhs) {
        let ordering = a.cmp(b);
        return match op {
            Operator::Eq => Some(ordering.is_eq()),
            Operator::Ne => Some(ordering.is_ne()),
            Operator::Lt => Some(ordering.is_lt()),
            Operator::Le => Some(ordering.is_le()),
            Operator::Gt => Some(ordering.is_gt()),
            Operator::Ge => Some(ordering.is_ge()),
            _ => None,
        };
    }
    match op {
        Operator::Eq if lhs.is_ground() && rhs.is_ground() => Some(equal(lhs, rhs)),
        Operator::Ne if lhs.is_ground() && rhs.is_ground() => Some(!equal(lhs, rhs)),
        _ => None,
    }
}
