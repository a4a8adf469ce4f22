//! Operator table shared by the printer, the parser and the evaluator.
//!
//! Precedences follow the guard language: `||` binds loosest (1), then `&&` (2), the
//! relations (3), additive operators (4), multiplicative operators (5), and the prefix
//! operators (6). Functional compounds print as if they had precedence 7.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::error::{Error, TermResult};

/// Precedence assigned to functional compounds `f(..)` when they appear as the operand
/// of a binary operator.
pub const FUNCTIONAL_PRECEDENCE: u8 = 7;

/// Every operator the term language knows about.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// `a || b`
    Or,
    /// `a && b`
    And,
    /// `a == b`
    Eq,
    /// `a != b`
    Ne,
    /// `a < b`
    Lt,
    /// `a <= b`
    Le,
    /// `a > b`, never kept by the evaluator
    Gt,
    /// `a >= b`, never kept by the evaluator
    Ge,
    /// `x in list`
    In,
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a or b`, bitwise or
    BitOr,
    /// `a ^ b`, bitwise exclusive or
    BitXor,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `a % b`
    Rem,
    /// `a div b`, synonym of `/`
    IntDiv,
    /// `a mod b`, synonym of `%`
    IntMod,
    /// `a << b`
    Shl,
    /// `a >> b`
    Shr,
    /// `a & b`
    BitAnd,
    /// `a &^ b`, bit clear (and not)
    BitClear,
    /// `+a`
    Plus,
    /// `-a`
    Neg,
    /// `!a`
    Not,
    /// `¬a`
    LogicalNot,
    /// `^a`, one's complement
    Complement,
}

impl Operator {
    /// Find the operator with the given symbol and arity.
    pub fn from_symbol(symbol: &str, arity: usize) -> Option<Self> {
        Operator::iter().find(|op| op.to_str() == symbol && op.arity() == arity)
    }

    /// Like [`Operator::from_symbol`] but reports unknown symbols as an error.
    pub fn try_from_symbol(symbol: &str, arity: usize) -> TermResult<Self> {
        Self::from_symbol(symbol, arity).ok_or_else(|| Error::UnknownOperator(symbol.to_string()))
    }

    /// Returns the textual form of the operator.
    pub fn to_str(&self) -> &'static str {
        match self {
            Operator::Or => "||",
            Operator::And => "&&",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::In => "in",
            Operator::Add | Operator::Plus => "+",
            Operator::Sub | Operator::Neg => "-",
            Operator::BitOr => "or",
            Operator::BitXor | Operator::Complement => "^",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::IntDiv => "div",
            Operator::IntMod => "mod",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::BitAnd => "&",
            Operator::BitClear => "&^",
            Operator::Not => "!",
            Operator::LogicalNot => "¬",
        }
    }

    pub fn arity(&self) -> usize {
        if self.is_unary() { 1 } else { 2 }
    }

    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Operator::Plus
                | Operator::Neg
                | Operator::Not
                | Operator::LogicalNot
                | Operator::Complement
        )
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Eq
            | Operator::Ne
            | Operator::Lt
            | Operator::Le
            | Operator::Gt
            | Operator::Ge
            | Operator::In => 3,
            Operator::Add | Operator::Sub | Operator::BitOr | Operator::BitXor => 4,
            Operator::Mul
            | Operator::Div
            | Operator::Rem
            | Operator::IntDiv
            | Operator::IntMod
            | Operator::Shl
            | Operator::Shr
            | Operator::BitAnd
            | Operator::BitClear => 5,
            Operator::Plus
            | Operator::Neg
            | Operator::Not
            | Operator::LogicalNot
            | Operator::Complement => 6,
        }
    }

    /// Word-like operators are always printed with a space on each side.
    pub fn is_spaced(&self) -> bool {
        is_spaced_functor(self.to_str())
    }

    /// `<`, `<=`, `>`, `>=`, `==` and `!=`.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Ne
                | Operator::Lt
                | Operator::Le
                | Operator::Gt
                | Operator::Ge
        )
    }

    /// Map synonyms onto the operator the evaluator emits.
    pub fn canonical(&self) -> Operator {
        match self {
            Operator::IntDiv => Operator::Div,
            Operator::IntMod => Operator::Rem,
            other => *other,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Returns true for functors the printer surrounds with spaces regardless of context.
pub(crate) fn is_spaced_functor(functor: &str) -> bool {
    matches!(functor, "||" | "&&" | "in" | "or" | "div" | "mod")
}
