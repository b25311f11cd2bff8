//! Keypad buttons.
//!
//! Every button is a [`ButtonToken`]. Input tokens carry the literal text
//! they append to the expression; control tokens drive the session.

use crate::error::ConfigError;
use crate::math::{DEFAULT_VARIABLE, Function};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// A decimal digit key, `0` through `9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    /// Returns the digit key for `n`, or `None` if `n > 9`.
    #[must_use]
    pub const fn new(n: u8) -> Option<Self> {
        if n <= 9 { Some(Self(n)) } else { None }
    }

    /// Numeric value of the key.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    const fn literal(self) -> &'static str {
        DIGITS[self.0 as usize]
    }
}

/// Binary operator keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `^`
    Power,
}

impl Operator {
    /// Text appended to the expression.
    #[must_use]
    pub const fn literal(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
        }
    }
}

/// A single keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonToken {
    /// `0`-`9`
    Digit(Digit),
    /// `.`
    Point,
    /// `+ - * / ^`
    Operator(Operator),
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// A unary function name.
    Function(Function),
    /// The plotting variable `x`.
    Variable,
    /// Empties the expression and the result.
    Clear,
    /// Empties the expression and the memory (`MC`).
    ClearAll,
    /// Computes the expression (`=`).
    Equals,
    /// Computes the expression (`solve`).
    Solve,
    /// Plots the expression.
    Graph,
    /// Copies the expression into memory (`M+`).
    MemoryStore,
    /// Empties the memory (`M-`).
    MemoryClear,
    /// Appends the memory to the expression (`MR`).
    MemoryRecall,
}

impl ButtonToken {
    /// Shorthand for a digit key.
    ///
    /// Returns `None` if `n > 9`.
    #[must_use]
    pub const fn digit(n: u8) -> Option<Self> {
        match Digit::new(n) {
            Some(d) => Some(Self::Digit(d)),
            None => None,
        }
    }

    /// Text this button appends to the expression, or `None` for control
    /// buttons.
    #[must_use]
    pub const fn literal(self) -> Option<&'static str> {
        match self {
            Self::Digit(d) => Some(d.literal()),
            Self::Point => Some("."),
            Self::Operator(op) => Some(op.literal()),
            Self::OpenParen => Some("("),
            Self::CloseParen => Some(")"),
            Self::Function(f) => Some(f.name()),
            Self::Variable => Some(DEFAULT_VARIABLE),
            Self::Clear
            | Self::ClearAll
            | Self::Equals
            | Self::Solve
            | Self::Graph
            | Self::MemoryStore
            | Self::MemoryClear
            | Self::MemoryRecall => None,
        }
    }

    /// The label printed on the key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        if let Some(literal) = self.literal() {
            return literal;
        }
        match self {
            Self::Clear => "Clear",
            Self::ClearAll => "MC",
            Self::Equals => "=",
            Self::Solve => "solve",
            Self::Graph => "graph",
            Self::MemoryStore => "M+",
            Self::MemoryClear => "M-",
            Self::MemoryRecall => "MR",
            _ => "",
        }
    }

    /// Whether this button drives the session rather than typing text.
    #[must_use]
    pub const fn is_control(self) -> bool {
        self.literal().is_none()
    }
}

impl fmt::Display for ButtonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ButtonToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl FromStr for ButtonToken {
    type Err = ConfigError;

    /// Parses a key label. Accepts the printed labels, the keypad symbols
    /// `× ÷ −`, and case-insensitive control names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let mut chars = label.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(n) = c.to_digit(10).and_then(|n| u8::try_from(n).ok())
        {
            return Ok(Self::Digit(Digit(n)));
        }

        let token = match label {
            "." => Self::Point,
            "+" => Self::Operator(Operator::Add),
            "-" | "−" => Self::Operator(Operator::Subtract),
            "*" | "×" => Self::Operator(Operator::Multiply),
            "/" | "÷" => Self::Operator(Operator::Divide),
            "^" => Self::Operator(Operator::Power),
            "(" => Self::OpenParen,
            ")" => Self::CloseParen,
            "=" => Self::Equals,
            other => {
                let lower = other.to_lowercase();
                match lower.as_str() {
                    "x" => Self::Variable,
                    "clear" | "c" => Self::Clear,
                    "mc" => Self::ClearAll,
                    "equals" => Self::Equals,
                    "solve" => Self::Solve,
                    "graph" | "plot" => Self::Graph,
                    "m+" | "ms" => Self::MemoryStore,
                    "m-" => Self::MemoryClear,
                    "mr" => Self::MemoryRecall,
                    name => match Function::from_name(name) {
                        Some(function) => Self::Function(function),
                        None => {
                            return Err(ConfigError::UnknownButton {
                                label: label.to_string(),
                            });
                        }
                    },
                }
            }
        };
        Ok(token)
    }
}

macro_rules! key {
    (d $n:literal) => {
        ButtonToken::Digit(Digit($n))
    };
    (op $op:ident) => {
        ButtonToken::Operator(Operator::$op)
    };
    (f $f:ident) => {
        ButtonToken::Function(Function::$f)
    };
    ($t:ident) => {
        ButtonToken::$t
    };
}

/// The keypad, row by row.
pub const BUTTON_LAYOUT: &[&[ButtonToken]] = &[
    &[key!(d 7), key!(d 8), key!(d 9), key!(op Divide)],
    &[key!(d 4), key!(d 5), key!(d 6), key!(op Multiply)],
    &[key!(d 1), key!(d 2), key!(d 3), key!(op Subtract)],
    &[key!(d 0), key!(Point), key!(op Power), key!(op Add)],
    &[
        key!(OpenParen),
        key!(CloseParen),
        key!(Variable),
        key!(f Sin),
        key!(f Cos),
    ],
    &[key!(f Tan), key!(f Arcsin), key!(f Arccos), key!(f Arctan)],
    &[key!(f Exp), key!(f Ln), key!(f Log), key!(f Sqrt)],
    &[
        key!(MemoryStore),
        key!(MemoryClear),
        key!(MemoryRecall),
        key!(ClearAll),
    ],
    &[key!(Clear), key!(Equals), key!(Graph), key!(Solve)],
];
