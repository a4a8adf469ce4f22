use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

/// Errors reported by the fallible construction and parsing surfaces.
///
/// Matching, unification and evaluation never produce an `Error`: their failures are
/// ordinary results (`None`, or a term left symbolic).
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// An operator compound was built with an arity the printer cannot render.
    #[error(
        "Operator `{functor}` with precedence {precedence} was given {arity} arguments. Operator compounds must be unary or binary."
    )]
    MalformedOperator {
        functor: String,
        precedence: u8,
        arity: usize,
    },

    /// The symbol does not name any known operator.
    #[error("Unknown operator symbol `{0}`.")]
    UnknownOperator(String),

    /// The guard text could not be parsed. Each entry is one rendered diagnostic.
    #[error("Failed to parse expression: {}", .0.join("; "))]
    Parse(Vec<String>),
}

pub type TermResult<T> = Result<T, Error>;
