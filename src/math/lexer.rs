//! Tokenizer for calculator expressions.
//!
//! Accepts both the ASCII operators typed on a keyboard and the symbols
//! printed on calculator keys (`×`, `÷`, `−`, `π`).

use crate::error::ParseError;
use std::fmt;

/// A lexical token with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte offset of the first character.
    pub offset: usize,
}

/// Expression tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal.
    Number(f64),
    /// Function name, constant or variable.
    Ident(String),
    /// `+`
    Plus,
    /// `-` or `−`
    Minus,
    /// `*` or `×`
    Star,
    /// `/` or `÷`
    Slash,
    /// `^` or `**`
    Caret,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Ident(name) => f.write_str(name),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Caret => f.write_str("^"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

/// Splits an expression into tokens.
///
/// # Errors
///
/// Returns [`ParseError::UnexpectedChar`] for characters outside the
/// expression alphabet.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match ch {
            '0'..='9' | '.' => {
                let mut end = offset;
                let mut seen_point = false;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || (c == '.' && !seen_point) {
                        seen_point |= c == '.';
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &input[offset..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::UnexpectedToken {
                        found: text.to_string(),
                        offset,
                    })?;
                Token::Number(value)
            }
            c if c.is_alphabetic() || c == '_' => {
                if c == 'π' {
                    chars.next();
                    Token::Ident("pi".to_string())
                } else {
                    let mut end = offset;
                    while let Some(&(i, c)) = chars.peek() {
                        if (c.is_alphanumeric() || c == '_') && c != 'π' {
                            end = i + c.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    Token::Ident(input[offset..end].to_string())
                }
            }
            '*' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '*'))) {
                    chars.next();
                    Token::Caret
                } else {
                    Token::Star
                }
            }
            _ => {
                chars.next();
                match ch {
                    '+' => Token::Plus,
                    '-' | '−' => Token::Minus,
                    '×' => Token::Star,
                    '/' | '÷' => Token::Slash,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    other => return Err(ParseError::UnexpectedChar { ch: other, offset }),
                }
            }
        };

        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

/// Reports whether `variable` appears as a standalone identifier.
///
/// Runs of letters are compared whole, so `exp` does not count as a
/// mention of `x`. Works on unparseable input too.
#[must_use]
pub fn mentions_identifier(input: &str, variable: &str) -> bool {
    input
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .map(|word| word.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.'))
        .any(|word| word == variable)
}
