//! Expression tree and evaluation.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::f64::consts::{E, PI};
use std::fmt;

/// Unary functions available on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    /// Sine (radians).
    Sin,
    /// Cosine (radians).
    Cos,
    /// Tangent (radians).
    Tan,
    /// Inverse sine.
    Arcsin,
    /// Inverse cosine.
    Arccos,
    /// Inverse tangent.
    Arctan,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
    /// Logarithm; natural, like `ln`.
    Log,
    /// Square root.
    Sqrt,
}

impl Function {
    /// Every function, in keypad order.
    pub const ALL: [Self; 10] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Arcsin,
        Self::Arccos,
        Self::Arctan,
        Self::Exp,
        Self::Ln,
        Self::Log,
        Self::Sqrt,
    ];

    /// Canonical name, as appended to the input buffer.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
        }
    }

    /// Looks up a function by name, accepting the short inverse aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "asin" => Some(Self::Arcsin),
            "acos" => Some(Self::Arccos),
            "atan" => Some(Self::Arctan),
            _ => Self::ALL.into_iter().find(|f| f.name() == name),
        }
    }

    /// Applies the function. Out-of-domain inputs yield `NaN`.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Arcsin => x.asin(),
            Self::Arccos => x.acos(),
            Self::Arctan => x.atan(),
            Self::Exp => x.exp(),
            Self::Ln | Self::Log => x.ln(),
            Self::Sqrt => x.sqrt(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named constants.
#[must_use]
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(PI),
        "e" => Some(E),
        _ => None,
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Exponentiation.
    Pow,
}

impl BinaryOp {
    const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
        }
    }
}

/// Unary minus sits between multiplication and exponentiation.
const NEG_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

/// Parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal or resolved constant.
    Number(f64),
    /// Free variable.
    Variable(String),
    /// Unary negation.
    Neg(Box<Self>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Self>,
        /// Right operand.
        rhs: Box<Self>,
    },
    /// Function application.
    Call {
        /// Function.
        function: Function,
        /// Argument.
        arg: Box<Self>,
    },
}

impl Expr {
    /// Evaluates with no variable bound.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnboundVariable`] if the expression has a free
    /// variable.
    pub fn eval(&self) -> Result<f64, ParseError> {
        self.eval_bound(None)
    }

    /// Evaluates with `variable` bound to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnboundVariable`] if some other variable occurs.
    pub fn eval_with(&self, variable: &str, value: f64) -> Result<f64, ParseError> {
        self.eval_bound(Some((variable, value)))
    }

    fn eval_bound(&self, binding: Option<(&str, f64)>) -> Result<f64, ParseError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Variable(name) => match binding {
                Some((bound, value)) if bound == name => Ok(value),
                _ => Err(ParseError::UnboundVariable { name: name.clone() }),
            },
            Self::Neg(inner) => Ok(-inner.eval_bound(binding)?),
            Self::Binary { op, lhs, rhs } => {
                Ok(op.apply(lhs.eval_bound(binding)?, rhs.eval_bound(binding)?))
            }
            Self::Call { function, arg } => Ok(function.apply(arg.eval_bound(binding)?)),
        }
    }

    /// Reports whether `variable` occurs anywhere in the tree.
    #[must_use]
    pub fn mentions(&self, variable: &str) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Variable(name) => name == variable,
            Self::Neg(inner) => inner.mentions(variable),
            Self::Binary { lhs, rhs, .. } => lhs.mentions(variable) || rhs.mentions(variable),
            Self::Call { arg, .. } => arg.mentions(variable),
        }
    }

    const fn precedence(&self) -> u8 {
        match self {
            Self::Number(_) | Self::Variable(_) | Self::Call { .. } => ATOM_PRECEDENCE,
            Self::Neg(_) => NEG_PRECEDENCE,
            Self::Binary { op, .. } => op.precedence(),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if *n == PI => f.write_str("pi"),
            Self::Number(n) if *n == E => f.write_str("e"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Variable(name) => f.write_str(name),
            Self::Neg(inner) => {
                f.write_str("-")?;
                inner.fmt_operand(f, NEG_PRECEDENCE)
            }
            Self::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                // `^` groups to the right, the rest to the left.
                let (left_min, right_min) = if *op == BinaryOp::Pow {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                lhs.fmt_operand(f, left_min)?;
                f.write_str(op.symbol())?;
                rhs.fmt_operand(f, right_min)
            }
            Self::Call { function, arg } => write!(f, "{function}({arg})"),
        }
    }
}
