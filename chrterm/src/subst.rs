//! Applying environments to terms.
//!
//! All three entry points rebuild only what they have to: ground compounds are returned
//! as they are, and rebuilt compounds keep their functor, precedence and call syntax.
use smallvec::smallvec;

use crate::bindings::Bindings;
use crate::term::{Term, Vars};

/// Replace every bound variable of `t` by what it is bound to, following chains.
///
/// A chain ending in a non-variable term continues into that term. A variable met again
/// while resolving itself is left in place, so self-referential environments such as
/// `X = f(X)` or `X = Y, Y = X` still give a finite answer.
pub fn substitute(t: &Term, env: &Bindings) -> Term {
    let mut path = Vars::new();
    substitute1(t, &mut path, env)
}

fn substitute1(t: &Term, path: &mut Vars, env: &Bindings) -> Term {
    match t {
        Term::Compound(c) if c.occur_vars().is_empty() => t.clone(),
        Term::Compound(c) => Term::Compound(
            c.with_args(c.args().iter().map(|a| substitute1(a, path, env)).collect()),
        ),
        Term::List(elements) => {
            Term::List(elements.iter().map(|e| substitute1(e, path, env)).collect())
        }
        Term::Variable(v) => {
            if path.contains(v) {
                return t.clone();
            }
            let mark = path.len();
            path.push(v.clone());
            let mut result = t;
            let mut next = env.get_binding(v);
            while let Some(bound) = next {
                match bound {
                    Term::Variable(w) if !path.contains(w) => {
                        path.push(w.clone());
                        result = bound;
                        next = env.get_binding(w);
                    }
                    Term::Variable(_) => {
                        result = bound;
                        break;
                    }
                    _ => {
                        let resolved = substitute1(bound, path, env);
                        path.truncate(mark);
                        return resolved;
                    }
                }
            }
            path.truncate(mark);
            result.clone()
        }
        _ => t.clone(),
    }
}

/// Chain-following replacement that also reports whether anything was replaced.
///
/// Unlike [`substitute`], the term found at the end of a chain is returned as it is.
pub fn substitute_bi_env(t: &Term, env: &Bindings) -> (Term, bool) {
    match t {
        Term::Compound(c) if c.occur_vars().is_empty() => (t.clone(), false),
        Term::Compound(c) => {
            let mut changed = false;
            let args = c
                .args()
                .iter()
                .map(|a| {
                    let (a, replaced) = substitute_bi_env(a, env);
                    changed |= replaced;
                    a
                })
                .collect();
            (Term::Compound(c.with_args(args)), changed)
        }
        Term::List(elements) => {
            let mut changed = false;
            let elements: Vec<Term> = elements
                .iter()
                .map(|e| {
                    let (e, replaced) = substitute_bi_env(e, env);
                    changed |= replaced;
                    e
                })
                .collect();
            (Term::List(elements.into()), changed)
        }
        Term::Variable(v) => {
            let Some(mut bound) = env.get_binding(v) else {
                return (t.clone(), false);
            };
            let mut seen: Vars = smallvec![v.clone()];
            while let Term::Variable(w) = bound {
                if seen.contains(w) {
                    break;
                }
                seen.push(w.clone());
                match env.get_binding(w) {
                    Some(next) => bound = next,
                    None => break,
                }
            }
            (bound.clone(), true)
        }
        _ => (t.clone(), false),
    }
}

/// Substitute bound variables and give the unbound ones the identity `fresh_id`.
///
/// A variable bound in `env` is replaced by its binding. Otherwise it is renamed, and the
/// renamed variable is looked up once more: the rule machinery may already have bound it.
/// Only if that lookup fails does the renamed variable stay in the result.
pub fn rename_and_substitute(t: &Term, fresh_id: u64, env: &Bindings) -> Term {
    match t {
        Term::Compound(c) if c.occur_vars().is_empty() => t.clone(),
        Term::Compound(c) => Term::Compound(
            c.with_args(
                c.args()
                    .iter()
                    .map(|a| rename_and_substitute(a, fresh_id, env))
                    .collect(),
            ),
        ),
        Term::List(elements) => Term::List(
            elements
                .iter()
                .map(|e| rename_and_substitute(e, fresh_id, env))
                .collect(),
        ),
        Term::Variable(v) => match env.get_binding(v) {
            Some(bound) => bound.clone(),
            None => {
                let renamed = v.renamed(fresh_id);
                match env.get_binding(&renamed) {
                    Some(bound) => bound.clone(),
                    None => Term::Variable(renamed),
                }
            }
        },
        _ => t.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::ops::Operator;
    use crate::variable::Variable;

    fn v(name: &str) -> Variable {
        Variable::new(name)
    }

    #[test]
    fn follows_chains_into_structures() {
        let env = Bindings::new()
            .add_binding(v("X"), Term::var("Y"))
            .add_binding(v("Y"), Term::compound("f", vec![Term::var("Z")]))
            .add_binding(v("Z"), Term::int(3));
        let t = Term::list(vec![Term::var("X"), Term::atom("a")]);
        assert_eq!(substitute(&t, &env).to_string(), "[f(3), a]");
    }

    #[test]
    fn self_reference_terminates() {
        let env = Bindings::new().add_binding(v("X"), Term::compound("f", vec![Term::var("X")]));
        assert_eq!(substitute(&Term::var("X"), &env).to_string(), "f(X)");
    }

    #[test]
    fn variable_cycle_terminates() {
        let env = Bindings::new()
            .add_binding(v("X"), Term::var("Y"))
            .add_binding(v("Y"), Term::var("X"));
        assert_eq!(substitute(&Term::var("X"), &env), Term::var("X"));
        assert_eq!(substitute(&Term::var("Y"), &env), Term::var("Y"));
    }

    #[test]
    fn rebuilt_compounds_keep_their_notation() {
        let env = Bindings::new().add_binding(v("A"), Term::int(1));
        let t = Term::binary(Operator::Add, Term::var("A"), Term::var("B"));
        assert_eq!(substitute(&t, &env).to_string(), "1+B");
        let t = Term::Compound(crate::term::Compound::constant("nil"));
        assert_eq!(substitute(&t, &env).to_string(), "nil");
    }

    #[test]
    fn substitution_is_idempotent_on_bound_terms() {
        let env = Bindings::new()
            .add_binding(v("X"), Term::var("Y"))
            .add_binding(v("Y"), Term::int(2));
        let t = Term::compound("p", vec![Term::var("X"), Term::var("Y")]);
        let once = substitute(&t, &env);
        assert_eq!(substitute(&once, &env), once);
        assert!(once.is_ground());
    }

    #[test]
    fn bi_env_reports_replacement() {
        let env = Bindings::new()
            .add_binding(v("X"), Term::var("Y"))
            .add_binding(v("Y"), Term::compound("g", vec![Term::var("Z")]))
            .add_binding(v("Z"), Term::int(1));
        let (t, changed) = substitute_bi_env(&Term::var("X"), &env);
        assert!(changed);
        assert_eq!(t.to_string(), "g(Z)");
        let (t, changed) = substitute_bi_env(&Term::var("W"), &env);
        assert!(!changed);
        assert_eq!(t, Term::var("W"));
        let (_, changed) = substitute_bi_env(&Term::int(4), &env);
        assert!(!changed);
    }

    #[test]
    fn bi_env_cycle_terminates() {
        let env = Bindings::new()
            .add_binding(v("X"), Term::var("Y"))
            .add_binding(v("Y"), Term::var("X"));
        let (t, changed) = substitute_bi_env(&Term::var("X"), &env);
        assert!(changed);
        assert_eq!(t, Term::var("X"));
    }

    #[test]
    fn late_renaming() {
        let renamed = Variable::with_identity("Y", 9);
        let env = Bindings::new()
            .add_binding(v("X"), Term::int(1))
            .add_binding(renamed, Term::atom("b"));
        let t = Term::compound("p", vec![Term::var("X"), Term::var("Y"), Term::var("Z")]);
        assert_eq!(rename_and_substitute(&t, 9, &env).to_string(), "p(1,b,Z9)");
    }
}
