//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{BUTTON_LAYOUT, CalculatorState, Outcome};
use crate::error::Error;
use crate::math::{Plot, Value};
use serde::Serialize;
use std::fmt::Write;

/// Width of the text plot, in characters.
const PLOT_WIDTH: usize = 64;

/// Height of the text plot, in lines.
const PLOT_HEIGHT: usize = 16;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// What a batch of key presses left behind.
#[derive(Debug, Serialize)]
pub struct StepReport<'a> {
    /// Session slots after the last press.
    pub state: CalculatorState,
    /// Messages of failed presses, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// The most recent plot, if any press produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<&'a Plot>,
}

impl<'a> StepReport<'a> {
    /// Summarizes `outcomes` against the session state that followed them.
    #[must_use]
    pub fn new(state: CalculatorState, outcomes: &'a [Outcome]) -> Self {
        let errors = outcomes.iter().filter_map(Outcome::error_message).collect();
        let plot = outcomes.iter().rev().find_map(|outcome| match outcome {
            Outcome::Plotted(plot) => Some(plot),
            _ => None,
        });
        Self {
            state,
            errors,
            plot,
        }
    }
}

/// Formats the result of a batch of key presses.
#[must_use]
pub fn format_step(report: &StepReport<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_step_text(report),
        OutputFormat::Json => format_json(report),
    }
}

fn format_step_text(report: &StepReport<'_>) -> String {
    let mut output = String::new();
    for error in &report.errors {
        let _ = writeln!(output, "error: {error}");
    }
    if let Some(plot) = report.plot {
        output.push_str(&format_plot_text(plot));
    }
    output.push_str(&format_state_text(&report.state));
    output
}

fn format_state_text(state: &CalculatorState) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "  Input:  {}", state.input);
    let _ = writeln!(output, "  Result: {}", state.result);
    let _ = writeln!(
        output,
        "  Memory: {}",
        state.memory.as_deref().unwrap_or("-")
    );
    output
}

/// Formats a locally evaluated value.
#[must_use]
pub fn format_value(expression: &str, value: Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{value}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ValueOutput<'a> {
                expression: &'a str,
                value: Value,
                display: String,
            }
            format_json(&ValueOutput {
                expression,
                value,
                display: value.to_string(),
            })
        }
    }
}

/// Formats a sampled curve.
#[must_use]
pub fn format_plot(plot: &Plot, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_plot_text(plot),
        OutputFormat::Json => format_json(plot),
    }
}

fn format_plot_text(plot: &Plot) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{} = {}", plot.y_label, plot.legend);

    let (Some(first), Some(last)) = (plot.samples.first(), plot.samples.last()) else {
        return output;
    };
    let _ = writeln!(
        output,
        "  {}: [{}, {}], {} samples",
        plot.x_label,
        Value::new(first.x),
        Value::new(last.x),
        plot.samples.len()
    );
    let Some((y_lo, y_hi)) = plot.y_range() else {
        return output;
    };
    let _ = writeln!(
        output,
        "  {}: [{}, {}]",
        plot.y_label,
        Value::new(y_lo),
        Value::new(y_hi)
    );

    for line in render_grid(plot, (first.x, last.x), (y_lo, y_hi)) {
        output.push_str("  |");
        output.push_str(line.trim_end());
        output.push('\n');
    }
    let _ = writeln!(output, "  +{}", "-".repeat(PLOT_WIDTH));
    output
}

/// Rasterizes the finite samples onto a character grid, top row first.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn render_grid(plot: &Plot, (x_lo, x_hi): (f64, f64), (y_lo, y_hi): (f64, f64)) -> Vec<String> {
    let mut grid = vec![vec![' '; PLOT_WIDTH]; PLOT_HEIGHT];
    let x_span = x_hi - x_lo;
    let y_span = y_hi - y_lo;
    let row_of = |y: f64| -> usize {
        if y_span <= 0.0 {
            return PLOT_HEIGHT / 2;
        }
        let from_top = (y_hi - y) / y_span * (PLOT_HEIGHT - 1) as f64;
        (from_top.round() as usize).min(PLOT_HEIGHT - 1)
    };

    if y_lo <= 0.0 && 0.0 <= y_hi {
        grid[row_of(0.0)].fill('-');
    }
    for sample in plot.finite_samples() {
        let col = if x_span > 0.0 {
            ((sample.x - x_lo) / x_span * (PLOT_WIDTH - 1) as f64).round() as usize
        } else {
            0
        };
        grid[row_of(sample.y)][col.min(PLOT_WIDTH - 1)] = '*';
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

/// Formats a reply from the remote solver.
#[must_use]
pub fn format_reply(kind: &str, reply: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = reply.to_string();
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ReplyOutput<'a> {
                kind: &'a str,
                reply: &'a str,
            }
            format_json(&ReplyOutput { kind, reply })
        }
    }
}

/// Formats the keypad layout.
#[must_use]
pub fn format_buttons(format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            for row in BUTTON_LAYOUT {
                let line = row
                    .iter()
                    .map(|button| format!("{:^7}", button.label()))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(output, "{}", line.trim_end());
            }
            output
        }
        OutputFormat::Json => format_json(&BUTTON_LAYOUT),
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: &'static str,
                message: String,
            }
            let kind = match err {
                Error::Parse(_) => "parse",
                Error::Graph(_) => "graph",
                Error::Gateway(_) => "gateway",
                Error::Config(_) => "config",
                Error::Command(_) => "command",
                Error::Io(_) => "io",
            };
            format_json(&ErrorOutput {
                error: kind,
                message: err.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).map_or_else(|_| "{}".to_string(), |json| json + "\n")
}
