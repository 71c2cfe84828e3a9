use derive_more::Display;
use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1},
    combinator::{map, map_res, opt, recognize, value},
    sequence::pair,
    IResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum Token {
    #[display(fmt = "{}", _0)]
    Number(f64),
    #[display(fmt = "+")]
    Plus,
    #[display(fmt = "-")]
    Minus,
    #[display(fmt = "*")]
    Star,
    #[display(fmt = "/")]
    Slash,
    #[display(fmt = "(")]
    LParen,
    #[display(fmt = ")")]
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LexError {
    #[display(fmt = "invalid character '{}' at position {}", character, position)]
    InvalidCharacter { character: char, position: usize },

    #[display(fmt = "empty expression")]
    EmptyInput,
}

impl std::error::Error for LexError {}

fn number(i: &str) -> IResult<&str, f64> {
    let integral = recognize(pair(digit1, opt(pair(char('.'), digit0))));
    let fractional = recognize(pair(char('.'), digit1));

    map_res(alt((integral, fractional)), |digit_str: &str| {
        digit_str.parse::<f64>()
    })(i)
}

fn symbol(i: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Plus, char('+')),
        value(Token::Minus, char('-')),
        value(Token::Star, char('*')),
        value(Token::Slash, char('/')),
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
    ))(i)
}

fn token(i: &str) -> IResult<&str, Token> {
    alt((map(number, Token::Number), symbol))(i)
}

/// Splits `input` into tokens. Positions in errors are zero-based
/// character offsets into the trimmed input.
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let source = input.trim();
    if source.is_empty() {
        return Err(LexError::EmptyInput);
    }

    let offset = |rest: &str| source[..source.len() - rest.len()].chars().count();

    let mut tokens = Vec::new();
    let mut rest = source;
    while !rest.is_empty() {
        let (remaining, t) = match token(rest) {
            Ok(r) => r,
            Err(_) => {
                return Err(LexError::InvalidCharacter {
                    character: rest.chars().next().unwrap_or_default(),
                    position: offset(rest),
                })
            }
        };

        // A second decimal point can only follow a literal directly
        if matches!(t, Token::Number(_)) && remaining.starts_with('.') {
            return Err(LexError::InvalidCharacter {
                character: '.',
                position: offset(remaining),
            });
        }

        tokens.push(t);
        rest = remaining.trim_start();
    }

    Ok(tokens)
}
