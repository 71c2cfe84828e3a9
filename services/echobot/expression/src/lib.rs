//! Arithmetic over real numbers for the `calc` command.
//!
//! Input is screened in two independent stages: [`lex`] rejects any
//! character outside digits, `.`, `+ - * / ( )` and whitespace, then
//! [`parse_tokens`] admits only the fixed grammar
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := NUMBER | '(' expr ')' | '-' factor
//! ```
//!
//! and [`evaluate`] folds the resulting tree into a number.
//!
//! [`parse`] and [`calculate`] refuse input longer than [`MAX_INPUT_CHARS`],
//! which bounds the size of the tree. Nesting depth is bounded separately by
//! [`MAX_NESTING`].

use derive_more::Display;

use telemetry::IsErr;

pub use evaluator::{evaluate, EvalFailure, EvalResult, MAGNITUDE_LIMIT};
pub use format::{format_number, DECIMAL_DIGITS};
pub use lexer::{lex, LexError, Token};
pub use parser::{parse_tokens, ParseError, MAX_NESTING};

mod evaluator;
mod format;
mod lexer;
mod parser;

/// Longest expression, in characters after trimming, that [`parse`] accepts
pub const MAX_INPUT_CHARS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operator {
    #[display(fmt = "+")]
    Add,
    #[display(fmt = "-")]
    Sub,
    #[display(fmt = "*")]
    Mul,
    #[display(fmt = "/")]
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    BinaryOp(Operator, Box<Expr>, Box<Expr>),
}

/// Failure at any stage of [`calculate`]
#[derive(Debug, Clone, PartialEq, Display)]
pub enum CalcError {
    #[display(fmt = "{}", _0)]
    Lex(LexError),

    #[display(fmt = "{}", _0)]
    Parse(ParseError),

    #[display(fmt = "{}", _0)]
    Eval(EvalFailure),

    #[display(fmt = "expression longer than {} characters", limit)]
    TooLong { limit: usize },
}

impl std::error::Error for CalcError {}

// A rejected expression is the user's mistake, not ours
impl IsErr for CalcError {
    fn is_err(&self) -> bool {
        false
    }
}

impl From<LexError> for CalcError {
    fn from(e: LexError) -> Self {
        CalcError::Lex(e)
    }
}

impl From<ParseError> for CalcError {
    fn from(e: ParseError) -> Self {
        CalcError::Parse(e)
    }
}

impl From<EvalFailure> for CalcError {
    fn from(e: EvalFailure) -> Self {
        CalcError::Eval(e)
    }
}

pub fn parse(input: &str) -> Result<Expr, CalcError> {
    if input.trim().chars().count() > MAX_INPUT_CHARS {
        return Err(CalcError::TooLong {
            limit: MAX_INPUT_CHARS,
        });
    }
    let tokens = lex(input)?;
    Ok(parse_tokens(&tokens)?)
}

pub fn calculate(input: &str) -> Result<f64, CalcError> {
    let expr = parse(input)?;
    Ok(evaluate(&expr)?)
}
