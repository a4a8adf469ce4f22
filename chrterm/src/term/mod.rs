//! The term model: one closed sum type for every value the rule engine manipulates.
//!
//! Role
//! - [`Term`] covers ground leaves (atoms, booleans, numbers, strings), compounds, lists
//!   and logical variables.
//! - Terms are immutable and cheap to clone: compounds, lists and strings are shared
//!   through `Arc`. "Changing" a term always builds a new one.
//! - Each term reports its free variables ([`Term::occur_vars`]). Compounds memoize the
//!   result the first time it is asked for; since arguments never change after
//!   construction the cached set cannot go stale.
//!
//! Rendering lives in [`pretty`]; precedence is presentation metadata only and never
//! takes part in equality.
//!
//! Example
//! ```
//! use chrterm::term::{Term, ops::Operator};
//!
//! let sum = Term::binary(Operator::Add, Term::var("X"), Term::int(1));
//! let call = Term::compound("f", vec![sum.clone(), Term::atom("a")]);
//! assert_eq!(call.to_string(), "f(X+1,a)");
//! assert_eq!(call.occur_vars().len(), 1);
//! ```
pub mod ops;
pub mod pretty;

use std::sync::Arc;

use once_cell::sync::OnceCell;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{EnumDiscriminants, EnumIs, EnumTryAs};

use crate::error::{Error, TermResult};
use crate::term::ops::Operator;
use crate::variable::Variable;

/// A set of variables, in order of first occurrence and without duplicates.
pub type Vars = SmallVec<[Variable; 4]>;

/// Functor of the synthetic compound marking the open tail of a list pattern.
pub const TAIL_FUNCTOR: &str = "|";

/// A logical term.
#[derive(Debug, Clone, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(derive(Hash))]
#[strum_discriminants(name(TermType))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    Atom(Arc<str>),
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Arc<str>),
    Compound(Compound),
    /// A list; the last element may be a one-argument `"|"` compound holding the tail.
    List(Arc<[Term]>),
    Variable(Variable),
}

impl Term {
    pub fn atom(name: impl Into<Arc<str>>) -> Self {
        Term::Atom(name.into())
    }

    /// An unrenamed variable.
    pub fn var(name: impl Into<Arc<str>>) -> Self {
        Term::Variable(Variable::new(name))
    }

    pub fn int(value: i64) -> Self {
        Term::Int(value)
    }

    pub fn float(value: f64) -> Self {
        Term::Float(value)
    }

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Term::String(value.into())
    }

    /// A functional compound `functor(args..)`.
    pub fn compound(functor: impl Into<Arc<str>>, args: Vec<Term>) -> Self {
        Term::Compound(Compound::new(functor, args))
    }

    /// A zero-argument compound written with explicit call syntax: `functor()`.
    pub fn call0(functor: impl Into<Arc<str>>) -> Self {
        Term::Compound(Compound::new(functor, Vec::new()))
    }

    pub fn list(elements: Vec<Term>) -> Self {
        Term::List(elements.into())
    }

    /// The open list pattern `[elements.. | tail]`.
    pub fn open_list(mut elements: Vec<Term>, tail: Term) -> Self {
        elements.push(Term::Compound(Compound::new(TAIL_FUNCTOR, vec![tail])));
        Term::List(elements.into())
    }

    /// Apply a prefix operator.
    pub fn unary(op: Operator, operand: Term) -> Self {
        Term::Compound(Compound::operator(op, vec![operand]))
    }

    /// Apply an infix operator.
    pub fn binary(op: Operator, lhs: Term, rhs: Term) -> Self {
        Term::Compound(Compound::operator(op, vec![lhs, rhs]))
    }

    /// The kind of this term.
    #[inline]
    pub fn r#type(&self) -> TermType {
        TermType::from(self)
    }

    /// Returns true for atoms, booleans, numbers and strings.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Term::Atom(_) | Term::Bool(_) | Term::Int(_) | Term::Float(_) | Term::String(_)
        )
    }

    /// Free variables of the term, in order of first occurrence.
    pub fn occur_vars(&self) -> Vars {
        match self {
            Term::Compound(c) => c.occur_vars().clone(),
            _ => {
                let mut vars = Vars::new();
                self.collect_vars(&mut vars);
                vars
            }
        }
    }

    /// Returns true if no variable occurs in the term.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Compound(c) => c.occur_vars().is_empty(),
            Term::List(elements) => elements.iter().all(Term::is_ground),
            _ => true,
        }
    }

    fn collect_vars(&self, out: &mut Vars) {
        match self {
            Term::Variable(v) => push_unique(out, v),
            Term::Compound(c) => {
                for v in c.occur_vars() {
                    push_unique(out, v);
                }
            }
            Term::List(elements) => {
                for e in elements.iter() {
                    e.collect_vars(out);
                }
            }
            _ => {}
        }
    }

    /// Operator and operands if the term is an operator application.
    pub fn as_operator(&self) -> Option<(Operator, &[Term])> {
        match self {
            Term::Compound(c) => c.as_operator().map(|op| (op, c.args())),
            _ => None,
        }
    }

    /// Fixed elements and tail of an open list pattern.
    pub fn as_open_list(&self) -> Option<(&[Term], &Term)> {
        match self {
            Term::List(elements) => split_open_tail(elements),
            _ => None,
        }
    }
}

fn push_unique(out: &mut Vars, v: &Variable) {
    if !out.contains(v) {
        out.push(v.clone());
    }
}

/// Split `[a, b | T]` into `([a, b], T)`. Returns `None` for closed lists.
pub(crate) fn split_open_tail(elements: &[Term]) -> Option<(&[Term], &Term)> {
    let (last, head) = elements.split_last()?;
    match last {
        Term::Compound(c) if c.is_tail_marker() => Some((head, &c.args()[0])),
        _ => None,
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        equal(self, other)
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Term::Bool(value)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Int(value)
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::Float(value)
    }
}

/// Builds a string literal.
impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::String(value.into())
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Term::Variable(value)
    }
}

impl From<Compound> for Term {
    fn from(value: Compound) -> Self {
        Term::Compound(value)
    }
}

/// Application of a functor to arguments.
///
/// The payload is shared: cloning a compound is an `Arc` clone. `precedence` is 0 for
/// functional notation and the operator precedence otherwise.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compound(Arc<CompoundData>);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct CompoundData {
    functor: Arc<str>,
    args: Box<[Term]>,
    precedence: u8,
    has_args: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    occur: OnceCell<Vars>,
}

impl Compound {
    /// A functional compound. With no arguments it renders as `functor()`.
    pub fn new(functor: impl Into<Arc<str>>, args: Vec<Term>) -> Self {
        Self::build(functor.into(), args.into_boxed_slice(), 0, true)
    }

    /// A zero-argument compound rendered as the bare functor.
    pub fn constant(functor: impl Into<Arc<str>>) -> Self {
        Self::build(functor.into(), Box::new([]), 0, false)
    }

    /// An operator application.
    ///
    /// Panics if the number of arguments does not match the operator's arity: such a term
    /// cannot come out of a well-behaved parser and has no rendering.
    pub fn operator(op: Operator, args: Vec<Term>) -> Self {
        assert!(
            args.len() == op.arity(),
            "operator `{op}` expects {} arguments, got {}",
            op.arity(),
            args.len()
        );
        Self::build(op.to_str().into(), args.into_boxed_slice(), op.precedence(), true)
    }

    /// Build a compound with an explicit precedence, rejecting operator compounds that are
    /// neither unary nor binary.
    pub fn try_operator(
        functor: impl Into<Arc<str>>,
        args: Vec<Term>,
        precedence: u8,
    ) -> TermResult<Self> {
        let functor = functor.into();
        if precedence != 0 && !matches!(args.len(), 1 | 2) {
            return Err(Error::MalformedOperator {
                functor: functor.to_string(),
                precedence,
                arity: args.len(),
            });
        }
        Ok(Self::build(functor, args.into_boxed_slice(), precedence, true))
    }

    fn build(functor: Arc<str>, args: Box<[Term]>, precedence: u8, has_args: bool) -> Self {
        Compound(Arc::new(CompoundData {
            functor,
            has_args: has_args || !args.is_empty(),
            args,
            precedence,
            occur: OnceCell::new(),
        }))
    }

    /// Same functor, precedence and call syntax, new arguments.
    pub fn with_args(&self, args: Vec<Term>) -> Self {
        debug_assert_eq!(args.len(), self.arity());
        Self::build(
            Arc::clone(&self.0.functor),
            args.into_boxed_slice(),
            self.0.precedence,
            self.0.has_args,
        )
    }

    pub fn functor(&self) -> &str {
        &self.0.functor
    }

    pub fn args(&self) -> &[Term] {
        &self.0.args
    }

    pub fn arity(&self) -> usize {
        self.0.args.len()
    }

    pub fn precedence(&self) -> u8 {
        self.0.precedence
    }

    /// Whether a zero-argument compound was written `f()` rather than `f`.
    pub fn has_args(&self) -> bool {
        self.0.has_args
    }

    /// The operator this compound applies, identified by functor and arity.
    pub fn as_operator(&self) -> Option<Operator> {
        Operator::from_symbol(self.functor(), self.arity())
    }

    /// Returns true for the `"|"` compound closing an open list pattern.
    pub fn is_tail_marker(&self) -> bool {
        self.functor() == TAIL_FUNCTOR && self.arity() == 1
    }

    /// Free variables of all arguments; computed on first use, then reused.
    pub fn occur_vars(&self) -> &Vars {
        self.0.occur.get_or_init(|| {
            let mut vars = Vars::new();
            for arg in self.args() {
                arg.collect_vars(&mut vars);
            }
            vars
        })
    }

    /// Returns true if both handles point to the same shared payload.
    pub fn ptr_eq(&self, other: &Compound) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Compound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compound")
            .field("functor", &self.functor())
            .field("args", &self.args())
            .field("precedence", &self.precedence())
            .field("has_args", &self.has_args())
            .finish()
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.functor() == other.functor()
                && self.arity() == other.arity()
                && self.args().iter().zip(other.args()).all(|(a, b)| equal(a, b)))
    }
}

/// Structural equality.
///
/// Leaves compare by value, compounds by functor, arity and arguments, lists element by
/// element, variables by name and identity. Precedence and call syntax are ignored.
pub fn equal(t1: &Term, t2: &Term) -> bool {
    match (t1, t2) {
        (Term::Atom(a), Term::Atom(b)) => a == b,
        (Term::Bool(a), Term::Bool(b)) => a == b,
        (Term::Int(a), Term::Int(b)) => a == b,
        (Term::Float(a), Term::Float(b)) => a == b,
        (Term::String(a), Term::String(b)) => a == b,
        (Term::Compound(a), Term::Compound(b)) => a == b,
        (Term::List(a), Term::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| equal(x, y))
        }
        (Term::Variable(a), Term::Variable(b)) => a == b,
        _ => false,
    }
}

/// Number of arguments of a compound; 0 for every other term.
pub fn arity(t: &Term) -> usize {
    match t {
        Term::Compound(c) => c.arity(),
        _ => 0,
    }
}

/// The name of an atom or the functor of a compound.
pub fn functor(t: &Term) -> Option<&str> {
    match t {
        Term::Atom(name) => Some(name.as_ref()),
        Term::Compound(c) => Some(c.functor()),
        _ => None,
    }
}

/// Synonym of [`functor`], reading a binary compound as a `predicate(subject, object)`
/// triple.
pub fn predicate(t: &Term) -> Option<&str> {
    functor(t)
}

/// First argument of a binary compound.
pub fn subject(t: &Term) -> Option<&Term> {
    match t {
        Term::Compound(c) if c.arity() == 2 => Some(&c.args()[0]),
        _ => None,
    }
}

/// Second argument of a binary compound.
pub fn object(t: &Term) -> Option<&Term> {
    match t {
        Term::Compound(c) if c.arity() == 2 => Some(&c.args()[1]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occur_vars_are_deduplicated_in_first_occurrence_order() {
        let t = Term::compound(
            "f",
            vec![
                Term::var("Y"),
                Term::list(vec![Term::var("X"), Term::var("Y")]),
                Term::int(3),
            ],
        );
        let vars = t.occur_vars();
        assert_eq!(vars.as_slice(), &[Variable::new("Y"), Variable::new("X")]);
        assert!(!t.is_ground());
        assert!(Term::compound("g", vec![Term::int(1)]).is_ground());
    }

    #[test]
    fn compound_cache_is_shared_between_clones() {
        let c = Compound::new("f", vec![Term::var("X")]);
        let d = c.clone();
        let first = c.occur_vars() as *const Vars;
        let second = d.occur_vars() as *const Vars;
        assert_eq!(first, second);
    }

    #[test]
    fn equality_ignores_precedence() {
        let op = Term::binary(Operator::Add, Term::int(1), Term::int(2));
        let functional = Term::compound("+", vec![Term::int(1), Term::int(2)]);
        assert_eq!(op, functional);
        assert_ne!(op, Term::compound("+", vec![Term::int(1)]));
        assert_ne!(Term::int(1), Term::float(1.0));
    }

    #[test]
    fn template_variable_never_equals_renamed() {
        let x = Term::var("X");
        let x1 = Term::Variable(Variable::with_identity("X", 1));
        assert_ne!(x, x1);
        assert_eq!(x1, Term::Variable(Variable::with_identity("X", 1)));
    }

    #[test]
    fn triple_accessors() {
        let t = Term::compound("likes", vec![Term::atom("ann"), Term::atom("bob")]);
        assert_eq!(functor(&t), Some("likes"));
        assert_eq!(predicate(&t), Some("likes"));
        assert_eq!(subject(&t), Some(&Term::atom("ann")));
        assert_eq!(object(&t), Some(&Term::atom("bob")));
        assert_eq!(arity(&t), 2);

        let unary = Term::compound("p", vec![Term::int(1)]);
        assert_eq!(subject(&unary), None);
        assert_eq!(functor(&Term::atom("a")), Some("a"));
        assert_eq!(functor(&Term::int(1)), None);
        assert_eq!(arity(&Term::atom("a")), 0);
    }

    #[test]
    fn malformed_operator_is_rejected() {
        let err = Compound::try_operator("+", vec![], 4).unwrap_err();
        assert!(err.is_malformed_operator());
        assert!(Compound::try_operator("f", vec![], 0).is_ok());
    }

    #[test]
    #[should_panic]
    fn operator_arity_mismatch_panics() {
        let _ = Compound::operator(Operator::Add, vec![Term::int(1)]);
    }

    #[test]
    fn operator_is_recovered_from_compounds() {
        let c = Compound::operator(Operator::Le, vec![Term::var("A"), Term::int(1)]);
        assert_eq!(c.as_operator(), Some(Operator::Le));
        let t = Term::from(c);
        assert_eq!(t.as_operator().map(|(op, args)| (op, args.len())), Some((Operator::Le, 2)));
        assert_eq!(Compound::new("f", vec![Term::int(1)]).as_operator(), None);
        assert_eq!(Term::atom("a").as_operator(), None);
    }

    #[test]
    fn open_list_split() {
        let l = Term::open_list(vec![Term::int(1), Term::int(2)], Term::var("T"));
        let (head, tail) = l.as_open_list().unwrap();
        assert_eq!(head.len(), 2);
        assert_eq!(tail, &Term::var("T"));
        assert!(Term::list(vec![Term::int(1)]).as_open_list().is_none());
    }
}
