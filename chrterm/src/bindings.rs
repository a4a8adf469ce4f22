//! Persistent binding environments.
//!
//! A [`Bindings`] value is a singly linked chain of `(Variable, Term)` nodes, newest first.
//! Adding a binding allocates one node that points at the previous chain, so every
//! environment produced along a matching attempt shares its tail with the one it came
//! from. Nothing is ever removed: backtracking means dropping the newer handle and going
//! on with the older one.
use std::sync::Arc;

use crate::term::{Term, ops::Operator};
use crate::variable::Variable;

/// An immutable variable-to-term association with structural sharing.
///
/// Lookups scan from the newest binding, so a later binding of a variable shadows
/// earlier ones.
#[derive(Clone, Default)]
pub struct Bindings {
    head: Option<Arc<BindNode>>,
}

struct BindNode {
    var: Variable,
    term: Term,
    next: Bindings,
}

impl Bindings {
    /// The empty environment.
    pub fn new() -> Self {
        Self { head: None }
    }

    /// A new environment with `var` bound to `term` in front of `self`.
    pub fn add_binding(&self, var: Variable, term: Term) -> Bindings {
        Bindings {
            head: Some(Arc::new(BindNode {
                var,
                term,
                next: self.clone(),
            })),
        }
    }

    /// The most recent binding of `var`.
    ///
    /// Both name and identity must match, so a template variable never sees the bindings
    /// of its renamed copies and vice versa.
    pub fn get_binding(&self, var: &Variable) -> Option<&Term> {
        self.iter().find(|(v, _)| *v == var).map(|(_, t)| t)
    }

    /// Returns true if `var` has a binding.
    pub fn is_bound(&self, var: &Variable) -> bool {
        self.get_binding(var).is_some()
    }

    /// Every recorded binding, newest first, shadowed ones included.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            node: self.head.as_deref(),
        }
    }

    /// The bindings a lookup can actually reach, newest first.
    pub fn visible(&self) -> Vec<(&Variable, &Term)> {
        let mut out: Vec<(&Variable, &Term)> = Vec::new();
        for (var, term) in self.iter() {
            if !out.iter().any(|(seen, _)| *seen == var) {
                out.push((var, term));
            }
        }
        out
    }

    /// Number of recorded bindings, shadowed ones included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns true if both handles share the same newest node.
    pub fn ptr_eq(&self, other: &Bindings) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Equalities implied by variable aliasing.
    ///
    /// Variables bound to other variables form alias classes: each class is named by the
    /// variable its chains end at, or by the smallest variable of the cycle they run into. For every class with at least two members this emits
    /// `first == other` for each other member, in the order the members appear from the
    /// newest binding. Classes whose end variable is itself bound to a non-variable term
    /// are left out, as are shadowed bindings. Returns `None` if nothing was found.
    pub fn implicit_equals(&self) -> Option<Vec<Term>> {
        let visible = self.visible();
        let lookup = |v: &Variable| {
            visible
                .iter()
                .find(|(var, _)| *var == v)
                .map(|(_, term)| *term)
        };

        // (end of chain, members in encounter order)
        let mut classes: Vec<(&Variable, Vec<&Variable>)> = Vec::new();
        for (var, term) in &visible {
            let Term::Variable(first) = term else {
                continue;
            };
            let mut end = first;
            let mut path = vec![*var, first];
            let mut aliased = true;
            while let Some(next) = lookup(end) {
                match next {
                    Term::Variable(v) if !path.contains(&v) => {
                        path.push(v);
                        end = v;
                    }
                    // Cycle: every variable on it is an alias of the others; the class is
                    // named by the smallest of them.
                    Term::Variable(v) => {
                        let start = path.iter().position(|p| *p == v).unwrap_or(0);
                        if let Some(least) = path[start..].iter().min() {
                            end = *least;
                        }
                        break;
                    }
                    _ => {
                        aliased = false;
                        break;
                    }
                }
            }
            if !aliased {
                continue;
            }
            match classes.iter_mut().find(|(root, _)| *root == end) {
                Some((_, members)) => members.push(*var),
                None => classes.push((end, vec![*var])),
            }
        }

        let equalities: Vec<Term> = classes
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .flat_map(|(_, members)| {
                let first = members[0];
                members[1..]
                    .iter()
                    .map(|other| {
                        Term::binary(
                            Operator::Eq,
                            Term::Variable(first.clone()),
                            Term::Variable((*other).clone()),
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        (!equalities.is_empty()).then_some(equalities)
    }
}

// Unlink iteratively so dropping a long chain does not recurse once per node.
impl Drop for Bindings {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.next.head.take(),
                Err(_) => break,
            }
        }
    }
}

/// Iterator over `(variable, term)` pairs, newest first.
pub struct Iter<'b> {
    node: Option<&'b BindNode>,
}

impl<'b> Iterator for Iter<'b> {
    type Item = (&'b Variable, &'b Term);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        self.node = node.next.head.as_deref();
        Some((&node.var, &node.term))
    }
}

impl<'b> IntoIterator for &'b Bindings {
    type Item = (&'b Variable, &'b Term);
    type IntoIter = Iter<'b>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.visible()).finish()
    }
}

impl std::fmt::Display for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.visible().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}={term}")?;
        }
        write!(f, "}}")
    }
}
