//! Local expression evaluation and graphing.
//!
//! The evaluator covers arithmetic, exponentiation, parentheses and the
//! keypad's unary functions. Anything outside that grammar fails with a
//! [`ParseError`](crate::error::ParseError) rather than panicking, so
//! callers can fall back to the remote solver.

pub mod expr;
pub mod graph;
pub mod lexer;
pub mod parser;

pub use expr::{BinaryOp, Expr, Function};
pub use graph::{
    DEFAULT_DOMAIN, DEFAULT_SAMPLE_COUNT, DEFAULT_VARIABLE, GraphConfig, MAX_SAMPLE_COUNT, Plot,
    Sample, X_LABEL, Y_LABEL, plot, sample,
};
pub use lexer::mentions_identifier;
pub use parser::{MAX_DEPTH, parse};

use crate::error::ParseError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Values smaller than this print as zero.
const ZERO_THRESHOLD: f64 = 1e-12;

/// Magnitudes from here on print in exponent notation.
const EXPONENT_THRESHOLD: f64 = 1e15;

/// A computed numeric result.
///
/// Display drops trailing zeros and floating-point noise, so `0.1+0.2`
/// shows as `0.3` and `sin(pi)` as `0`.
///
/// # Examples
///
/// ```
/// use study_assist::math::evaluate;
///
/// let value = evaluate("2+2").unwrap();
/// assert_eq!(value.to_string(), "4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value(f64);

impl Value {
    /// Wraps a raw number.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// The raw number.
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        self.0
    }

    /// Whether the value is a real, finite number.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for Value {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("Not a Number");
        }
        if value.is_infinite() {
            return f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
        }
        if value.abs() < ZERO_THRESHOLD {
            return f.write_str("0");
        }
        if value.abs() >= EXPONENT_THRESHOLD {
            return write!(f, "{value:e}");
        }
        if value.fract() == 0.0 {
            return write!(f, "{}", value as i64);
        }

        let formatted = format!("{value:.10}");
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            f.write_str("0")
        } else {
            f.write_str(trimmed)
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_str(&self.to_string())
        }
    }
}

/// Evaluates a closed expression.
///
/// # Errors
///
/// Returns [`ParseError`] if `expr` is not valid in the supported grammar
/// or still mentions the free variable.
pub fn evaluate(expr: &str) -> Result<Value, ParseError> {
    let tree = parse(expr, DEFAULT_VARIABLE)?;
    Ok(Value(tree.eval()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2+2", "4" ; "addition")]
    #[test_case("7/2", "3.5" ; "division")]
    #[test_case("1/3", "0.3333333333" ; "repeating decimal")]
    #[test_case("0.1+0.2", "0.3" ; "float noise")]
    #[test_case("2^10", "1024" ; "power")]
    #[test_case("sqrt(2)^2", "2" ; "rounding to integer")]
    #[test_case("sin(pi)", "0" ; "tiny value")]
    #[test_case("-sin(pi)", "0" ; "negative tiny value")]
    #[test_case("cos(0)+exp(0)", "2" ; "functions")]
    #[test_case("ln(e)", "1" ; "natural log")]
    #[test_case("arctan(1)*4", "3.1415926536" ; "inverse trig")]
    #[test_case("10^20", "1e20" ; "exponent notation")]
    #[test_case("1/0", "Infinity" ; "positive infinity")]
    #[test_case("-1/0", "-Infinity" ; "negative infinity")]
    #[test_case("sqrt(-1)", "Not a Number" ; "not a number")]
    #[test_case("6×7", "42" ; "keypad multiply")]
    #[test_case("8÷2−1", "3" ; "keypad divide and minus")]
    fn test_evaluate_display(input: &str, expected: &str) {
        assert_eq!(evaluate(input).unwrap().to_string(), expected);
    }

    #[test_case("2+" ; "trailing operator")]
    #[test_case("(" ; "open paren")]
    #[test_case("sin" ; "bare function")]
    #[test_case("2**" ; "dangling power")]
    #[test_case("what is two plus two" ; "natural language")]
    #[test_case("" ; "empty")]
    fn test_evaluate_rejects(input: &str) {
        assert!(evaluate(input).is_err());
    }

    #[test]
    fn test_evaluate_free_variable() {
        assert_eq!(
            evaluate("x^2"),
            Err(ParseError::UnboundVariable {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_evaluate_value() {
        let value = evaluate("2+2").unwrap();
        assert!((value.as_f64() - 4.0).abs() < f64::EPSILON);
        assert!(value.is_finite());
    }

    #[test]
    fn test_value_serializes() {
        assert_eq!(serde_json::to_string(&Value::new(1.5)).unwrap(), "1.5");
        assert_eq!(
            serde_json::to_string(&Value::new(f64::INFINITY)).unwrap(),
            "\"Infinity\""
        );
    }
}
