//! Parser for guard expressions.
//!
//! Accepted syntax
//! - Literals: integers `42`, floats `4.2`, strings `"text"`, `true`, `false`.
//! - Names: identifiers starting with an uppercase letter or `_` are variables, other
//!   identifiers are atoms; `'any text'` is a quoted atom.
//! - Compounds in call syntax: `f(a, b)` and `f()`.
//! - Lists `[a, b]` and open lists `[a, b | T]`.
//! - Prefix operators `+ - ! ¬ ^`.
//! - Infix operators, loosest first: `||`; `&&`; `== != < <= > >= in`;
//!   `+ - or ^`; `* / % div mod << >> & &^`. All infix operators are left-associative.
//!
//! Parentheses can wrap any expression. The precedences are the ones the printer uses.
use chumsky::{input::ValueInput, prelude::*};

use crate::error::{Error, TermResult};
use crate::term::{Term, ops::Operator};

type Span = SimpleSpan;
type Spanned<T> = (T, Span);

#[derive(Clone, Debug, PartialEq)]
enum Token {
    // Delimiters & punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Bar,

    // Operators, including the word operators `div`, `mod`, `or` and `in`
    Sym(&'static str),

    // Literals
    True,
    False,
    Int(i64),
    Float(f64),
    Str(String),
    Quoted(String),

    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Bar => write!(f, "|"),
            Token::Sym(s) => write!(f, "{s}"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Int(v) => write!(f, "{v}"),
            Token::Float(v) => write!(f, "{v:?}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Quoted(s) => write!(f, "'{s}'"),
            Token::Ident(s) => write!(f, "{s}"),
        }
    }
}

// ---------------- Lexer ----------------

fn sym<'a>(
    s: &'static str,
) -> impl Parser<'a, &'a str, Token, extra::Err<Rich<'a, char>>> + Clone {
    just(s).to(Token::Sym(s))
}

fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<Spanned<Token>>, extra::Err<Rich<'a, char>>> {
    let number = text::int(10)
        .then(just('.').then(text::digits(10).at_least(1)).or_not())
        .to_slice()
        .try_map(|s: &str, span| -> Result<Token, Rich<char>> {
            if s.contains('.') {
                s.parse::<f64>()
                    .map(Token::Float)
                    .map_err(|e| Rich::custom(span, format!("invalid float literal '{s}': {e}")))
            } else {
                s.parse::<i64>()
                    .map(Token::Int)
                    .map_err(|e| Rich::custom(span, format!("invalid integer literal '{s}': {e}")))
            }
        })
        .labelled("number");

    let string = just('"')
        .ignore_then(any().filter(|c: &char| *c != '"').repeated().to_slice())
        .then_ignore(just('"'))
        .map(|s: &str| Token::Str(s.to_string()))
        .labelled("string");

    let quoted = just('\'')
        .ignore_then(any().filter(|c: &char| *c != '\'').repeated().to_slice())
        .then_ignore(just('\''))
        .map(|s: &str| Token::Quoted(s.to_string()))
        .labelled("quoted atom");

    let word = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
        .map(|s: &str| match s {
            "true" => Token::True,
            "false" => Token::False,
            "div" => Token::Sym("div"),
            "mod" => Token::Sym("mod"),
            "or" => Token::Sym("or"),
            "in" => Token::Sym("in"),
            _ => Token::Ident(s.to_string()),
        });

    // Longest first so that `<=` is not read as `<` followed by `=`.
    let operator = choice((
        sym("&&"),
        sym("&^"),
        sym("||"),
        sym("<<"),
        sym(">>"),
        sym("<="),
        sym(">="),
        sym("=="),
        sym("!="),
        sym("+"),
        sym("-"),
        sym("*"),
        sym("/"),
        sym("%"),
        sym("&"),
        sym("^"),
        sym("!"),
        sym("¬"),
        sym("<"),
        sym(">"),
    ));

    let punct = choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('[').to(Token::LBracket),
        just(']').to(Token::RBracket),
        just(',').to(Token::Comma),
        just('|').to(Token::Bar),
    ));

    let token = choice((number, string, quoted, word, operator, punct));

    token
        .map_with(|tok, e| (tok, e.span()))
        .padded()
        .repeated()
        .collect()
        .then_ignore(end())
}

// ---------------- Parser over tokens ----------------

fn is_variable_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase() || c == '_')
}

fn term_parser<'tokens, I>()
-> impl Parser<'tokens, I, Term, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    recursive(|expr| {
        let literal = select! {
            Token::Int(v) => Term::Int(v),
            Token::Float(v) => Term::Float(v),
            Token::Str(s) => Term::string(s),
            Token::Quoted(s) => Term::atom(s),
            Token::True => Term::Bool(true),
            Token::False => Term::Bool(false),
        }
        .labelled("literal");

        let args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .labelled("arguments");

        let name = select! { Token::Ident(name) => name };
        let named = name
            .then(args.or_not())
            .map(|(name, args)| match args {
                Some(args) => Term::compound(name, args),
                None if is_variable_name(&name) => Term::var(name),
                None => Term::atom(name),
            })
            .labelled("name");

        let list = expr
            .clone()
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .then(just(Token::Bar).ignore_then(expr.clone()).or_not())
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(|(elements, tail)| match tail {
                Some(tail) => Term::open_list(elements, tail),
                None => Term::list(elements),
            })
            .labelled("list");

        let paren = expr
            .clone()
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .labelled("parentheses");

        let atom = literal.or(named).or(list).or(paren).labelled("atom");

        // Prefix operators bind tighter than any infix operator.
        let prefix_op = select! {
            Token::Sym("+") => Operator::Plus,
            Token::Sym("-") => Operator::Neg,
            Token::Sym("!") => Operator::Not,
            Token::Sym("¬") => Operator::LogicalNot,
            Token::Sym("^") => Operator::Complement,
        };
        let unary = prefix_op
            .repeated()
            .foldr(atom, |op, rhs| Term::unary(op, rhs))
            .labelled("prefix expression");

        let product_op = select! {
            Token::Sym("*") => Operator::Mul,
            Token::Sym("/") => Operator::Div,
            Token::Sym("%") => Operator::Rem,
            Token::Sym("div") => Operator::IntDiv,
            Token::Sym("mod") => Operator::IntMod,
            Token::Sym("<<") => Operator::Shl,
            Token::Sym(">>") => Operator::Shr,
            Token::Sym("&") => Operator::BitAnd,
            Token::Sym("&^") => Operator::BitClear,
        };
        let product = unary
            .clone()
            .foldl(product_op.then(unary).repeated(), |a, (op, b)| {
                Term::binary(op, a, b)
            })
            .labelled("product");

        let sum_op = select! {
            Token::Sym("+") => Operator::Add,
            Token::Sym("-") => Operator::Sub,
            Token::Sym("or") => Operator::BitOr,
            Token::Sym("^") => Operator::BitXor,
        };
        let sum = product
            .clone()
            .foldl(sum_op.then(product).repeated(), |a, (op, b)| {
                Term::binary(op, a, b)
            })
            .labelled("sum");

        let relation_op = select! {
            Token::Sym("==") => Operator::Eq,
            Token::Sym("!=") => Operator::Ne,
            Token::Sym("<") => Operator::Lt,
            Token::Sym("<=") => Operator::Le,
            Token::Sym(">") => Operator::Gt,
            Token::Sym(">=") => Operator::Ge,
            Token::Sym("in") => Operator::In,
        };
        let relation = sum
            .clone()
            .foldl(relation_op.then(sum).repeated(), |a, (op, b)| {
                Term::binary(op, a, b)
            })
            .labelled("relation");

        let conjunction = relation
            .clone()
            .foldl(
                just(Token::Sym("&&")).ignore_then(relation).repeated(),
                |a, b| Term::binary(Operator::And, a, b),
            )
            .labelled("conjunction");

        conjunction
            .clone()
            .foldl(
                just(Token::Sym("||")).ignore_then(conjunction).repeated(),
                |a, b| Term::binary(Operator::Or, a, b),
            )
            .labelled("disjunction")
    })
}

// ---------------- Public API ----------------

/// Parse a guard expression into a [`Term`].
///
/// Variables come out unrenamed. On failure the error carries one human-readable
/// diagnostic per problem found.
///
/// Example
/// ```
/// use chrterm::prelude::*;
///
/// let t = parse("X >= 3 && member(X, [1, 2 | T])").unwrap();
/// assert_eq!(t.to_string(), "X>=3 && member(X,[1, 2 | T])");
/// assert!(parse("3 +").unwrap_err().is_parse());
/// ```
pub fn parse(src: &str) -> TermResult<Term> {
    // 1) Lexing
    let (tokens, lex_errs) = lexer().parse(src).into_output_errors();
    let mut errors: Vec<String> = lex_errs
        .into_iter()
        .map(|e| format!("lexing error: {e}"))
        .collect();

    let tokens = match tokens {
        Some(toks) => toks,
        None => return Err(Error::Parse(errors)),
    };

    // 2) Parsing over the plain token stream
    let plain: Vec<Token> = tokens.into_iter().map(|(t, _s)| t).collect();
    let (term, parse_errs) = term_parser()
        .then_ignore(end())
        .parse(plain.as_slice())
        .into_output_errors();
    errors.extend(parse_errs.into_iter().map(|e| format!("parse error: {e}")));

    match term {
        Some(term) if errors.is_empty() => Ok(term),
        _ => Err(Error::Parse(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    #[test]
    fn literals() {
        assert_eq!(parse("42").unwrap(), Term::int(42));
        assert_eq!(parse("4.25").unwrap(), Term::float(4.25));
        assert_eq!(parse("\"hi there\"").unwrap(), Term::string("hi there"));
        assert_eq!(parse("'Quoted'").unwrap(), Term::atom("Quoted"));
        assert_eq!(parse("true").unwrap(), Term::Bool(true));
    }

    #[test]
    fn names() {
        assert_eq!(parse("Foo").unwrap(), Term::Variable(Variable::new("Foo")));
        assert_eq!(parse("_x").unwrap(), Term::var("_x"));
        assert_eq!(parse("foo").unwrap(), Term::atom("foo"));
        assert_eq!(parse("f()").unwrap().to_string(), "f()");
        assert_eq!(parse("f(a, X)").unwrap().to_string(), "f(a,X)");
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(parse("1 + 2 * 3").unwrap().to_string(), "1+2*3");
        assert_eq!(parse("(1 + 2) * 3").unwrap().to_string(), "(1+2) * 3");
        assert_eq!(parse("10 - 4 - 3").unwrap().to_string(), "10-4-3");
        assert_eq!(parse("a || b && c").unwrap().to_string(), "a || b && c");
        assert_eq!(parse("-(-726)").unwrap().to_string(), "--726");
    }

    #[test]
    fn word_operators() {
        let t = parse("25 div 7").unwrap();
        assert_eq!(t.as_operator().map(|(op, _)| op), Some(Operator::IntDiv));
        assert_eq!(parse("X in [1, 2]").unwrap().to_string(), "X in [1, 2]");
        assert_eq!(parse("10 or 20").unwrap().to_string(), "10 or 20");
    }

    #[test]
    fn lists() {
        assert_eq!(parse("[]").unwrap(), Term::list(vec![]));
        let open = parse("[H | T]").unwrap();
        let (head, tail) = open.as_open_list().unwrap();
        assert_eq!(head, &[Term::var("H")]);
        assert_eq!(tail, &Term::var("T"));
    }

    #[test]
    fn errors_are_reported() {
        assert!(parse("3 +").unwrap_err().is_parse());
        assert!(parse("f(1,").is_err());
        assert!(parse("1 @ 2").is_err());
        assert!(parse("99999999999999999999").is_err());
    }
}
