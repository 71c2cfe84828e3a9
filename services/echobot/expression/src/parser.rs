use derive_more::Display;

use super::lexer::Token;
use super::{Expr, Operator};

/// Deepest chain of open parentheses and unary minus signs a factor may
/// sit under. Parsing and evaluation recurse once per level.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum ParseError {
    #[display(fmt = "unbalanced parentheses")]
    UnbalancedParens,

    #[display(fmt = "unexpected input after the end of the expression")]
    TrailingInput,

    #[display(fmt = "missing operand")]
    MissingOperand,

    #[display(fmt = "unexpected token '{}'", _0)]
    UnexpectedToken(Token),

    #[display(fmt = "parentheses and signs nested deeper than {} levels", limit)]
    TooDeep { limit: usize },
}

impl std::error::Error for ParseError {}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    // Open parentheses only
    depth: usize,
    // Open parentheses plus pending unary minus signs
    nesting: usize,
}

fn additive(t: Token) -> Option<Operator> {
    match t {
        Token::Plus => Some(Operator::Add),
        Token::Minus => Some(Operator::Sub),
        _ => None,
    }
}

fn multiplicative(t: Token) -> Option<Operator> {
    match t {
        Token::Star => Some(Operator::Mul),
        Token::Slash => Some(Operator::Div),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.peek();
        if t.is_some() {
            self.position += 1;
        }
        t
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(ParseError::TooDeep { limit: MAX_NESTING });
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let mut acc = self.term()?;
        while let Some(op) = self.peek().and_then(additive) {
            self.position += 1;
            let r = self.term()?;
            acc = Expr::BinaryOp(op, Box::new(acc), Box::new(r));
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut acc = self.factor()?;
        while let Some(op) = self.peek().and_then(multiplicative) {
            self.position += 1;
            let r = self.factor()?;
            acc = Expr::BinaryOp(op, Box::new(acc), Box::new(r));
        }
        Ok(acc)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Token::Number(v)) => Ok(Expr::Literal(v)),
            Some(Token::LParen) => {
                self.enter()?;
                self.depth += 1;
                let inner = self.expression()?;
                match self.advance() {
                    Some(Token::RParen) => {
                        self.depth -= 1;
                        self.nesting -= 1;
                        Ok(inner)
                    }
                    Some(t) => Err(ParseError::UnexpectedToken(t)),
                    None => Err(ParseError::UnbalancedParens),
                }
            }
            // Unary minus is sugar for `0 - x`
            Some(Token::Minus) => {
                self.enter()?;
                let operand = self.factor()?;
                self.nesting -= 1;
                Ok(Expr::BinaryOp(
                    Operator::Sub,
                    Box::new(Expr::Literal(0.)),
                    Box::new(operand),
                ))
            }
            Some(Token::RParen) if self.depth == 0 => Err(ParseError::UnbalancedParens),
            Some(Token::RParen) | None => Err(ParseError::MissingOperand),
            Some(t) => Err(ParseError::UnexpectedToken(t)),
        }
    }
}

/// Builds the tree for a complete token sequence, rejecting anything the
/// grammar does not admit.
pub fn parse_tokens(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        tokens,
        position: 0,
        depth: 0,
        nesting: 0,
    };

    let expr = parser.expression()?;
    if parser.peek().is_some() {
        return Err(ParseError::TrailingInput);
    }
    Ok(expr)
}
