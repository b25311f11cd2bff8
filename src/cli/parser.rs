//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::assistant::{StudyPlanRequest, StudyPurpose};
use crate::gateway::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, GatewayConfig, MODEL_ENV,
};
use crate::math::{DEFAULT_DOMAIN, DEFAULT_SAMPLE_COUNT, DEFAULT_VARIABLE, GraphConfig};
use clap::{Parser, Subcommand};

/// study-assist: calculator, grapher and study assistant.
///
/// Expressions are evaluated locally; anything the local evaluator
/// cannot handle is sent to a remote language model.
#[derive(Parser, Debug)]
#[command(name = "study-assist")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API key for the remote solver. Without it only local evaluation works.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// OpenAI-compatible endpoint of the remote solver.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Model used by the remote solver.
    #[arg(long, env = MODEL_ENV, default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive keypad session.
    ///
    /// Each line of input is a whitespace-separated list of button labels,
    /// e.g. `3 + 4 M+ =`. `quit`, `exit` or end of input ends the session.
    Calc,

    /// Press a sequence of buttons in a fresh session and print its state.
    Press {
        /// Button labels, e.g. `sin ( x ) graph`.
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Evaluate an expression locally.
    Eval {
        /// Expression, e.g. `2^10/4`.
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },

    /// Sample an expression of one variable for plotting.
    Graph {
        /// Expression, e.g. `sin(x)*x`.
        #[arg(allow_hyphen_values = true)]
        expression: String,

        /// Plotting variable.
        #[arg(long, default_value = DEFAULT_VARIABLE)]
        variable: String,

        /// Lower end of the domain.
        #[arg(long, default_value_t = DEFAULT_DOMAIN.0, allow_negative_numbers = true)]
        from: f64,

        /// Upper end of the domain.
        #[arg(long, default_value_t = DEFAULT_DOMAIN.1, allow_negative_numbers = true)]
        to: f64,

        /// Number of sample points.
        #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        count: usize,
    },

    /// Evaluate an expression, asking the remote solver if that fails.
    Solve {
        /// Expression or math problem.
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },

    /// Explain a concept in simple terms.
    Explain {
        /// Concept to explain.
        concept: String,
    },

    /// Generate a study plan.
    Plan {
        /// Subject, e.g. `Physics`.
        #[arg(short, long)]
        subject: String,

        /// Topic within the subject.
        #[arg(short, long)]
        topic: String,

        /// Study duration in hours.
        #[arg(long, default_value_t = 1)]
        hours: u32,

        /// What the plan is for.
        #[arg(short, long, value_enum, default_value_t = StudyPurpose::Exam)]
        purpose: StudyPurpose,
    },

    /// Get one study tip.
    Tip,

    /// Show the keypad layout.
    Buttons,
}

impl Cli {
    /// Builds the gateway settings from the global options.
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new()
            .with_api_key(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
    }
}

impl Commands {
    /// Graph settings for the `graph` command, defaults otherwise.
    #[must_use]
    pub fn graph_config(&self) -> GraphConfig {
        match self {
            Self::Graph {
                variable,
                from,
                to,
                count,
                ..
            } => GraphConfig::new()
                .with_variable(variable.clone())
                .with_domain(*from, *to)
                .with_count(*count),
            _ => GraphConfig::new(),
        }
    }

    /// The study plan request for the `plan` command.
    #[must_use]
    pub fn plan_request(&self) -> Option<StudyPlanRequest> {
        match self {
            Self::Plan {
                subject,
                topic,
                hours,
                purpose,
            } => Some(StudyPlanRequest {
                subject: subject.clone(),
                topic: topic.clone(),
                hours: *hours,
                purpose: *purpose,
            }),
            _ => None,
        }
    }
}
