//! CLI layer for study-assist.
//!
//! Provides the command-line interface using clap, with commands for the
//! keypad session, the evaluator, the grapher and the assistant panels.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::{execute, run_session};
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
