//! Trichotomy reasoning over pairs of relational atoms.
//!
//! For two operands `x` and `y` exactly one of `x<y`, `x==y`, `y<x` holds. A relational
//! atom over that pair is the set of these outcomes it admits; conjunction and
//! disjunction of two atoms over the same pair become intersection and union.
use crate::term::{Term, equal, ops::Operator};

type Outcomes = u8;

const LESS: Outcomes = 0b001;
const EQUAL: Outcomes = 0b010;
const GREATER: Outcomes = 0b100;
const ALL: Outcomes = LESS | EQUAL | GREATER;

struct Relation<'t> {
    lhs: &'t Term,
    rhs: &'t Term,
    outcomes: Outcomes,
}

impl<'t> Relation<'t> {
    fn of(t: &'t Term) -> Option<Self> {
        let (op, args) = t.as_operator()?;
        let outcomes = match op {
            Operator::Lt => LESS,
            Operator::Le => LESS | EQUAL,
            Operator::Eq => EQUAL,
            Operator::Ne => LESS | GREATER,
            _ => return None,
        };
        match args {
            [lhs, rhs] => Some(Relation { lhs, rhs, outcomes }),
            _ => None,
        }
    }

    /// Outcomes of this atom read in the orientation of `other`.
    fn oriented_like(&self, other: &Relation<'_>) -> Option<Outcomes> {
        if equal(self.lhs, other.lhs) && equal(self.rhs, other.rhs) {
            Some(self.outcomes)
        } else if equal(self.lhs, other.rhs) && equal(self.rhs, other.lhs) {
            Some(mirror(self.outcomes))
        } else {
            None
        }
    }
}

fn mirror(set: Outcomes) -> Outcomes {
    (set & EQUAL) | ((set & LESS) << 2) | ((set & GREATER) >> 2)
}

fn atom(set: Outcomes, x: &Term, y: &Term) -> Term {
    let (op, lhs, rhs) = match set {
        0 => return Term::Bool(false),
        ALL => return Term::Bool(true),
        LESS => (Operator::Lt, x, y),
        GREATER => (Operator::Lt, y, x),
        EQUAL => (Operator::Eq, x, y),
        s if s == LESS | EQUAL => (Operator::Le, x, y),
        s if s == GREATER | EQUAL => (Operator::Le, y, x),
        _ => (Operator::Ne, x, y),
    };
    Term::binary(op, lhs.clone(), rhs.clone())
}

/// Combine `left op right` when both are relational atoms over the same operands.
///
/// `op` must be `&&` or `||`. The result keeps the orientation of `left`.
pub(crate) fn combine(op: Operator, left: &Term, right: &Term) -> Option<Term> {
    let l = Relation::of(left)?;
    let r = Relation::of(right)?;
    let r_outcomes = r.oriented_like(&l)?;
    let set = match op {
        Operator::And => l.outcomes & r_outcomes,
        Operator::Or => l.outcomes | r_outcomes,
        _ => return None,
    };
    Some(atom(set, l.lhs, l.rhs))
}
