//! Recursive-descent parser.
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := ('-' | '+') unary | power
//! power := atom ('^' unary)?
//! atom  := NUMBER | CONSTANT | VARIABLE | FUNCTION '(' expr ')' | '(' expr ')'
//! ```
//!
//! Every parenthesis, call, sign, exponent and chained operator counts
//! toward [`MAX_DEPTH`], which bounds both the parser's recursion and the
//! depth of the resulting [`Expr`] tree.

use crate::error::ParseError;
use crate::math::expr::{BinaryOp, Expr, Function, constant};
use crate::math::lexer::{Spanned, Token, tokenize};

/// Deepest nesting the parser accepts before failing with [`ParseError::TooDeep`].
pub const MAX_DEPTH: usize = 256;

/// Parses `input`, treating `variable` as the only free identifier.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
pub fn parse(input: &str, variable: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        variable,
    };
    let expr = parser.expr()?;

    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some(extra) => Err(unexpected(extra)),
    }
}

struct Parser<'v> {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
    variable: &'v str,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    /// Runs `parse` one level deeper.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.descend()?;
        let parsed = parse(self)?;
        self.depth -= 1;
        Ok(parsed)
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let entry = self.depth;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = entry;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let entry = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = entry;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let operand = self.nested(Self::unary)?;
                Ok(Expr::Neg(Box::new(operand)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.atom()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.pos += 1;
            let exponent = self.nested(Self::unary)?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        let Some(spanned) = self.next() else {
            return Err(ParseError::UnexpectedEnd);
        };

        match spanned.token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::LParen => self.nested(|p| {
                let inner = p.expr()?;
                p.expect_close()?;
                Ok(inner)
            }),
            Token::Ident(name) => self.identifier(name),
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                offset: spanned.offset,
            }),
        }
    }

    fn identifier(&mut self, name: String) -> Result<Expr, ParseError> {
        if let Some(function) = Function::from_name(&name) {
            if !matches!(self.peek(), Some(Token::LParen)) {
                return Err(ParseError::MissingArgument { function: name });
            }
            self.pos += 1;
            let arg = self.nested(|p| {
                let arg = p.expr()?;
                p.expect_close()?;
                Ok(arg)
            })?;
            return Ok(Expr::Call {
                function,
                arg: Box::new(arg),
            });
        }

        if let Some(value) = constant(&name) {
            return Ok(Expr::Number(value));
        }

        if name == self.variable {
            return Ok(Expr::Variable(name));
        }

        Err(ParseError::UnknownIdentifier { name })
    }

    fn expect_close(&mut self) -> Result<(), ParseError> {
        match self.next() {
            Some(Spanned {
                token: Token::RParen,
                ..
            }) => Ok(()),
            Some(other) => Err(unexpected(&other)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn unexpected(spanned: &Spanned) -> ParseError {
    ParseError::UnexpectedToken {
        found: spanned.token.to_string(),
        offset: spanned.offset,
    }
}
