//! Two-way unification with occurs-check.
use log::trace;

use crate::bindings::Bindings;
use crate::matching::match_lists;
use crate::term::{Term, Vars, equal};
use crate::variable::Variable;

/// Unify `t1` and `t2` under `env`.
///
/// Variables on either side may get bound. A variable is never bound to a term it occurs
/// in, so the resulting environment never describes an infinite term. Returns `None` on
/// failure; `env` itself is never modified.
pub fn unify(t1: &Term, t2: &Term, env: &Bindings) -> Option<Bindings> {
    unify1(t1, t2, &Vars::new(), env)
}

fn unify1(t1: &Term, t2: &Term, visited: &Vars, env: &Bindings) -> Option<Bindings> {
    let mut visited = visited.clone();
    let t1 = dereference(t1, env, &mut visited);
    let t2 = dereference(t2, env, &mut visited);

    match (t1, t2) {
        (Term::Variable(a), Term::Variable(b)) if a == b => Some(env.clone()),
        (Term::Variable(a), Term::Variable(_)) => Some(env.add_binding(a.clone(), t2.clone())),
        (Term::Variable(a), other) | (other, Term::Variable(a)) => {
            if check_occur(&visited, other, env) {
                trace!("Occurs check failed: {a} in {other}");
                return None;
            }
            Some(env.add_binding(a.clone(), other.clone()))
        }
        (Term::Compound(c1), Term::Compound(c2)) => {
            if c1.functor() != c2.functor() || c1.arity() != c2.arity() {
                trace!("Cannot unify {t1} with {t2}");
                return None;
            }
            let mut acc = env.clone();
            for (a, b) in c1.args().iter().zip(c2.args()) {
                acc = unify1(a, b, &visited, &acc)?;
            }
            Some(acc)
        }
        (Term::List(l1), Term::List(l2)) => {
            match_lists(l1, l2, env, |a, b, acc| unify1(a, b, &visited, acc))
        }
        _ if t1.r#type() == t2.r#type() => equal(t1, t2).then(|| env.clone()),
        _ => {
            trace!("Cannot unify {t1} with {t2}");
            None
        }
    }
}

/// Follow variable bindings until an unbound variable or a non-variable term is reached,
/// recording every variable passed on the way.
fn dereference<'a>(mut t: &'a Term, env: &'a Bindings, visited: &mut Vars) -> &'a Term {
    let start = visited.len();
    while let Term::Variable(v) = t {
        if visited[start..].contains(v) {
            break;
        }
        visited.push(v.clone());
        match env.get_binding(v) {
            Some(bound) => t = bound,
            None => break,
        }
    }
    t
}

/// Returns true if a free variable of `t` was visited, directly or through its current
/// binding. Only one level of bindings is looked through.
pub(crate) fn check_occur(visited: &[Variable], t: &Term, env: &Bindings) -> bool {
    t.occur_vars().iter().any(|v| {
        visited.contains(v)
            || env
                .get_binding(v)
                .is_some_and(|bound| bound.occur_vars().iter().any(|w| visited.contains(w)))
    })
}
