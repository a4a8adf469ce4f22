//! One-way pattern matching.
//!
//! Only the variables of the pattern get bound; the subject is taken literally, so a
//! variable inside the subject is just another value to compare against.
use log::trace;

use crate::bindings::Bindings;
use crate::term::{Term, equal, split_open_tail};

/// Match `pattern` against `subject`, extending `env`.
///
/// On success the extended environment is returned; on failure `None`, and the caller goes
/// on with the `env` it still holds.
///
/// ```
/// use chrterm::prelude::*;
///
/// let pattern = Term::compound("p", vec![Term::var("X"), Term::var("X")]);
/// let env = Bindings::new();
/// let ok = match_terms(&pattern, &Term::compound("p", vec![Term::int(1), Term::int(1)]), &env);
/// assert_eq!(ok.unwrap().get_binding(&Variable::new("X")), Some(&Term::int(1)));
/// let clash = match_terms(&pattern, &Term::compound("p", vec![Term::int(1), Term::int(2)]), &env);
/// assert!(clash.is_none());
/// ```
pub fn match_terms(pattern: &Term, subject: &Term, env: &Bindings) -> Option<Bindings> {
    match (pattern, subject) {
        (Term::Variable(v), _) => match env.get_binding(v) {
            None => Some(env.add_binding(v.clone(), subject.clone())),
            Some(bound) if equal(bound, subject) => Some(env.clone()),
            Some(bound) => {
                trace!("Variable {v} is bound to {bound}, cannot match {subject}");
                None
            }
        },
        (Term::Compound(p), Term::Compound(s)) => {
            if p.functor() != s.functor() || p.arity() != s.arity() {
                trace!("Functor mismatch: {pattern} against {subject}");
                return None;
            }
            p.args()
                .iter()
                .zip(s.args())
                .try_fold(env.clone(), |acc, (a, b)| match_terms(a, b, &acc))
        }
        (Term::List(p), Term::List(s)) => match_lists(p, s, env, match_terms),
        _ if pattern.r#type() == subject.r#type() => equal(pattern, subject).then(|| env.clone()),
        _ => {
            trace!("Kind mismatch: {pattern} against {subject}");
            None
        }
    }
}

/// Positional list walk shared by matching and unification.
///
/// An empty pattern only accepts an empty subject. A pattern ending in an open tail
/// accepts any subject at least as long as its fixed part; the tail is then handed the
/// remaining suffix (or `[]`). Closed patterns require equal lengths.
pub(crate) fn match_lists<F>(
    pattern: &[Term],
    subject: &[Term],
    env: &Bindings,
    mut step: F,
) -> Option<Bindings>
where
    F: FnMut(&Term, &Term, &Bindings) -> Option<Bindings>,
{
    if let Some((head, tail)) = split_open_tail(pattern) {
        if subject.len() < head.len() {
            trace!(
                "List of {} elements is shorter than the {} fixed elements of the pattern",
                subject.len(),
                head.len()
            );
            return None;
        }
        let mut acc = env.clone();
        for (a, b) in head.iter().zip(subject) {
            acc = step(a, b, &acc)?;
        }
        let rest = Term::List(subject[head.len()..].into());
        return step(tail, &rest, &acc);
    }

    if pattern.len() != subject.len() {
        trace!(
            "List length mismatch: {} against {}",
            pattern.len(),
            subject.len()
        );
        return None;
    }
    let mut acc = env.clone();
    for (a, b) in pattern.iter().zip(subject) {
        acc = step(a, b, &acc)?;
    }
    Some(acc)
}
