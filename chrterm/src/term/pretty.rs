//! RcDoc-based printer with termcolor annotations for terms.
//!
//! Role
//! - Convert a [`Term`] into an annotated document; the plain rendering of that document is
//!   the canonical text of the term, which is what `Display` produces.
//! - Provide colored output for terminals (TTY-aware) and plain strings for logs/tests.
//!
//! Canonical text
//! - Functional compounds print as `f(a,b)`; `f()` and `f` stay distinct.
//! - Operator compounds print in prefix/infix notation. An operand is parenthesized when it
//!   is an operator compound of lower precedence than its parent. Infix operators are
//!   written without spaces (`b<=a`) unless an operand is parenthesized or the operator is
//!   a word-like one (`||`, `&&`, `in`, `or`, `div`, `mod`).
//! - Lists print as `[a, b]` and open lists as `[a, b | T]`.
//!
//! The document never contains break points, so the rendering width does not change the
//! text, only how it is split into styled fragments.
use std::io::{self, Write};

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::term::ops::{FUNCTIONAL_PRECEDENCE, is_spaced_functor};
use crate::term::{Compound, TAIL_FUNCTOR, Term, split_open_tail};

/// Styles used to annotate parts of the printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct, // commas, list brackets, tail bar
    /// Parentheses are colored by nesting depth so matching pairs share a color.
    Paren(u8),
    Keyword,  // true, false
    Operator, // +, *, &&, ||, <=, ...
    Ident,    // variables
    Literal,  // numbers and strings
    Functor,  // atoms and compound functors
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Paren(depth) => {
                let fg = match depth % 6 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    5 => Color::Magenta,
                    _ => unreachable!(),
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Keyword => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Ident => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Literal => {
                s.set_fg(Some(Color::Magenta));
            }
            Style::Functor => {
                s.set_fg(Some(Color::Cyan));
            }
        }
        s
    }
}

fn styled(style: Style, s: impl ToString) -> RcDoc<'static, Style> {
    RcDoc::as_string(s.to_string()).annotate(style)
}

fn punct(s: &'static str) -> RcDoc<'static, Style> {
    styled(Style::Punct, s)
}

#[inline]
fn lparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string("(").annotate(Style::Paren(depth))
}

#[inline]
fn rparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string(")").annotate(Style::Paren(depth))
}

fn op(s: &str) -> RcDoc<'static, Style> {
    styled(Style::Operator, s)
}

fn join<'t>(
    items: impl IntoIterator<Item = &'t Term>,
    separator: &'static str,
    depth: u8,
) -> RcDoc<'static, Style> {
    let mut doc = RcDoc::nil();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            doc = doc.append(punct(separator));
        }
        doc = doc.append(to_doc_with_depth(item, depth));
    }
    doc
}

/// Precedence of an operand if it is a compound; functional compounds bind tightest.
fn operand_precedence(t: &Term) -> Option<u8> {
    match t {
        Term::Compound(c) if c.precedence() == 0 => Some(FUNCTIONAL_PRECEDENCE),
        Term::Compound(c) => Some(c.precedence()),
        _ => None,
    }
}

#[inline]
fn requires_parens(operand: &Term, parent_precedence: u8) -> bool {
    operand_precedence(operand).is_some_and(|p| p < parent_precedence)
}

fn to_doc_parenthesized_with_depth(t: &Term, parens: bool, depth: u8) -> RcDoc<'static, Style> {
    if parens {
        lparen(depth)
            .append(to_doc_with_depth(t, depth + 1))
            .append(rparen(depth))
    } else {
        to_doc_with_depth(t, depth)
    }
}

fn list_doc(elements: &[Term], depth: u8) -> RcDoc<'static, Style> {
    let (head, tail) = match split_open_tail(elements) {
        Some((head, tail)) => (head, Some(tail)),
        None => (elements, None),
    };
    let mut doc = punct("[").append(join(head, ", ", depth));
    if let Some(tail) = tail {
        doc = doc
            .append(punct(" | "))
            .append(to_doc_with_depth(tail, depth));
    }
    doc.append(punct("]")).group()
}

fn compound_doc(c: &Compound, depth: u8) -> RcDoc<'static, Style> {
    let prec = c.precedence();
    match (prec, c.args()) {
        (0, _) => {}
        (_, [operand]) => {
            let parens = requires_parens(operand, prec);
            return op(c.functor())
                .append(to_doc_parenthesized_with_depth(operand, parens, depth))
                .group();
        }
        (_, [lhs, rhs]) => {
            let lhs_parens = requires_parens(lhs, prec);
            let rhs_parens = requires_parens(rhs, prec);
            let spaced = lhs_parens || rhs_parens || is_spaced_functor(c.functor());
            let operator = if spaced {
                op(&format!(" {} ", c.functor()))
            } else {
                op(c.functor())
            };
            return to_doc_parenthesized_with_depth(lhs, lhs_parens, depth)
                .append(operator)
                .append(to_doc_parenthesized_with_depth(rhs, rhs_parens, depth))
                .group();
        }
        _ => unreachable!("operator compounds are unary or binary by construction"),
    }

    if c.functor() == TAIL_FUNCTOR {
        // A stray tail marker prints as the open list it came from.
        return match c.args().split_last() {
            Some((tail, head)) => punct("[")
                .append(join(head, ",", depth))
                .append(punct(" | "))
                .append(to_doc_with_depth(tail, depth))
                .append(punct("]"))
                .group(),
            None => punct("[]"),
        };
    }

    let functor = styled(Style::Functor, c.functor());
    if c.arity() == 0 && !c.has_args() {
        return functor;
    }
    functor
        .append(lparen(depth))
        .append(join(c.args(), ",", depth + 1))
        .append(rparen(depth))
        .group()
}

/// Shortest fixed-point text that reads back as the same `f64`, always with a fractional
/// part. Never uses exponent notation.
pub fn format_float(value: f64) -> String {
    let mut text = format!("{value}");
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Depth-aware conversion that colors parentheses by nesting level.
fn to_doc_with_depth(t: &Term, depth: u8) -> RcDoc<'static, Style> {
    match t {
        Term::Atom(name) => styled(Style::Functor, name),
        Term::Bool(true) => styled(Style::Keyword, "true"),
        Term::Bool(false) => styled(Style::Keyword, "false"),
        Term::Int(v) => styled(Style::Literal, v),
        Term::Float(v) => styled(Style::Literal, format_float(*v)),
        Term::String(s) => styled(Style::Literal, s),
        Term::Compound(c) => compound_doc(c, depth),
        Term::List(elements) => list_doc(elements, depth),
        Term::Variable(v) => styled(Style::Ident, v),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

/// Render a document to a `termcolor::WriteColor`.
fn render_to<W: WriteColor + Write>(
    doc: &RcDoc<'_, Style>,
    width: usize,
    out: &mut W,
) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

/// Convenience: retrieve the width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Printing conveniences for terms and compounds.
pub trait PrettyTerm {
    /// Build an RcDoc representation with style annotations.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render with colors to any termcolor writer.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    /// Print to stdout with colors (TTY-aware).
    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        render_to(&self.pretty_doc(), terminal_width(), &mut stdout)
    }

    /// Format into a plain string (no colors). Same text as `Display`.
    fn pretty_string(&self) -> String {
        let mut buf = String::new();
        let _ = self.pretty_doc().render_fmt(80, &mut buf);
        buf
    }
}

impl PrettyTerm for Term {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc_with_depth(self, 0)
    }
}

impl PrettyTerm for Compound {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        compound_doc(self, 0)
    }
}

macro_rules! impl_display_for_type {
    ($($t:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $t {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    let mut w = FmtWrite::new(f);
                    self.pretty_doc().render_raw(80, &mut w)
                }
            }
        )*
    };
}

impl_display_for_type!(Term, Compound);
