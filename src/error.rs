//! Error types for study-assist operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! expression evaluator, the grapher, the remote solver gateway, keypad
//! configuration and CLI commands.

use thiserror::Error;

/// Result type alias for study-assist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Expression could not be parsed or evaluated.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Expression could not be graphed.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Remote solver call failed.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Keypad or runtime configuration errors.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// I/O errors (terminal reads and writes).
    #[error("I/O error: {0}")]
    Io(String),
}

/// The expression is not valid in the supported grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing to parse.
    #[error("empty expression")]
    Empty,

    /// A character outside the expression alphabet.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset in the expression.
        offset: usize,
    },

    /// A token that does not fit the grammar at this position.
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedToken {
        /// Text of the offending token.
        found: String,
        /// Byte offset in the expression.
        offset: usize,
    },

    /// The expression ended where an operand or ')' was required.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// An identifier that is neither a function, a constant nor the variable.
    #[error("unknown identifier: {name}")]
    UnknownIdentifier {
        /// The identifier as written.
        name: String,
    },

    /// A function name not followed by a parenthesised argument.
    #[error("function {function} requires a parenthesised argument")]
    MissingArgument {
        /// Function name.
        function: String,
    },

    /// The expression mentions a variable that has no value.
    #[error("expression depends on unbound variable {name}")]
    UnboundVariable {
        /// Variable name.
        name: String,
    },

    /// Parentheses, calls, signs or operator chains nest past the parser's limit.
    #[error("expression nested deeper than {limit} levels")]
    TooDeep {
        /// Maximum nesting depth.
        limit: usize,
    },
}

/// The expression cannot be turned into a plot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The plotting variable does not occur in the expression.
    #[error("missing variable: graphing requires '{variable}' in the expression")]
    MissingVariable {
        /// The expected variable symbol.
        variable: String,
    },

    /// The expression failed to parse.
    #[error("not plottable: {0}")]
    Unparseable(#[from] ParseError),

    /// Every sample point failed to evaluate to a finite number.
    #[error("not plottable: no sample point evaluates to a finite value")]
    NoFiniteSamples,

    /// The sampling domain is unusable.
    #[error("not plottable: invalid domain: {reason}")]
    InvalidDomain {
        /// Why the domain was rejected.
        reason: String,
    },
}

/// Remote solver failures. Never retried, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No API key was configured at startup.
    #[error("missing API credentials (set GROQ_API_KEY)")]
    MissingCredentials,

    /// The binary was built without the remote solver.
    #[error("remote solver not available in this build")]
    Unavailable,

    /// Transport-level failure.
    #[error("network failure: {0}")]
    Network(String),

    /// The service answered with a non-success response.
    #[error("request rejected: {message}")]
    Rejected {
        /// Message reported by the service.
        message: String,
    },

    /// The response carried no message text.
    #[error("empty response from solver")]
    EmptyResponse,

    /// The request could not be built or the response could not be decoded.
    #[error("invalid request or response: {0}")]
    InvalidRequest(String),

    /// The blocking runtime could not be started.
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A label that is not on the keypad.
    #[error("unknown button: {label}")]
    UnknownButton {
        /// The label that was pressed.
        label: String,
    },

    /// A configuration value is out of range.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),

    /// Output format error.
    #[error("output format error: {0}")]
    OutputFormat(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(feature = "remote-solver")]
impl From<async_openai::error::OpenAIError> for GatewayError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        use async_openai::error::OpenAIError;

        match err {
            OpenAIError::Reqwest(e) => Self::Network(e.to_string()),
            OpenAIError::ApiError(api) => Self::Rejected {
                message: api.message,
            },
            OpenAIError::InvalidArgument(msg) => Self::InvalidRequest(msg),
            other => Self::InvalidRequest(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::OutputFormat(err.to_string())
    }
}
