//! Chrterm: logical terms, unification and guard simplification for a CHR rule engine.
//!
//! The crate is the reasoning core underneath a Constraint-Handling-Rules engine. It
//! provides one closed term language and the algorithms a rule scheduler needs on top of
//! it, without any scheduling of its own:
//!
//! - [`term`]: the [`Term`](term::Term) sum type, operator table, accessors and the
//!   canonical text rendering.
//! - [`bindings`]: persistent, structurally shared variable environments.
//! - [`matching`] and [`unify`]: one-way pattern matching and two-way unification with
//!   occurs-check and open-tail list patterns.
//! - [`subst`]: chain-following substitution and "very late" variable renaming.
//! - [`eval`]: constant folding and sound simplification of guard expressions.
//!
//! Everything is immutable: matching or unifying never changes an existing
//! [`Bindings`](bindings::Bindings); backtracking is done by keeping the old value around.
//!
//! Example
//! ```
//! use chrterm::prelude::*;
//!
//! let x = Variable::new("X");
//! let pattern = Term::compound("p", vec![Term::from(x.clone()), Term::int(2)]);
//! let subject = Term::compound("p", vec![Term::int(1), Term::int(2)]);
//!
//! let env = match_terms(&pattern, &subject, &Bindings::new()).unwrap();
//! assert_eq!(env.get_binding(&x), Some(&Term::int(1)));
//! assert_eq!(substitute(&pattern, &env).to_string(), "p(1,2)");
//!
//! let guard = Term::binary(Operator::Gt, Term::int(7), Term::int(3));
//! assert_eq!(evaluate(&guard), Term::Bool(true));
//! ```

/// Persistent binding environments.
pub mod bindings;
/// Crate-level error type.
pub mod error;
/// Guard expression evaluation and simplification.
pub mod eval;
/// One-way pattern matching.
pub mod matching;
/// Parser for guard expressions.
#[cfg(feature = "chumsky")]
pub mod parser;
/// Substitution and variable renaming.
pub mod subst;
/// Term model, operators and rendering.
pub mod term;
/// Two-way unification with occurs-check.
pub mod unify;
/// Logical variables and the renaming identity source.
pub mod variable;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - `Term`, `Compound`, `Operator` and the accessor functions
    //! - `Bindings` and the matching/unification/substitution entry points
    //! - `evaluate` and, with the `chumsky` feature, `parse`
    pub use crate::bindings::Bindings;
    pub use crate::error::{Error, TermResult};
    pub use crate::eval::evaluate;
    pub use crate::matching::match_terms;
    pub use crate::subst::{rename_and_substitute, substitute, substitute_bi_env};
    pub use crate::term::{
        Compound, Term, TermType, Vars, arity, equal, functor, object, ops::Operator,
        predicate, pretty::PrettyTerm, subject,
    };
    pub use crate::unify::unify;
    pub use crate::variable::{RenameCounter, Variable, next_identity, reset_renaming};

    #[cfg(feature = "chumsky")]
    pub use crate::parser::parse;
}
