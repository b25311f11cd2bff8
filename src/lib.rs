//! # study-assist
//!
//! Study assistant: a scientific calculator keypad, a local expression
//! evaluator and grapher, and a remote language-model solver for anything
//! the evaluator cannot handle.
//!
//! ## Features
//!
//! - **Keypad sessions**: append-only expression entry with memory store,
//!   recall and clear
//! - **Local evaluation**: arithmetic, powers and the keypad's unary
//!   functions, without any network access
//! - **Graphing**: parallel sampling of one-variable expressions
//! - **Remote fallback**: an OpenAI-compatible chat endpoint answers what
//!   the evaluator rejects, plus concept explanations, study plans and tips

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod assistant;
pub mod cli;
pub mod core;
pub mod error;
pub mod gateway;
pub mod math;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export session types
pub use crate::core::{BUTTON_LAYOUT, ButtonToken, Calculator, CalculatorState, Outcome};

// Re-export evaluator and grapher
pub use math::{GraphConfig, Plot, Sample, Value, evaluate, plot};

// Re-export gateway types
#[cfg(feature = "remote-solver")]
pub use gateway::OpenAiGateway;
pub use gateway::{GatewayConfig, OfflineGateway, SolverGateway, create_gateway};

// Re-export assistant panels
pub use assistant::{
    StudyPlanRequest, StudyPurpose, explain_concept, generate_study_plan, study_tip,
};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
