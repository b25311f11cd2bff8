//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::assistant::{explain_concept, generate_study_plan, study_tip};
use crate::cli::output::{
    OutputFormat, StepReport, format_buttons, format_plot, format_reply, format_step,
    format_value,
};
use crate::cli::parser::{Cli, Commands};
use crate::core::{ButtonToken, Calculator, Outcome};
use crate::error::{CommandError, GatewayError, Result};
use crate::gateway::{API_KEY_ENV, OfflineGateway, SolverGateway, create_gateway};
use crate::math::{GraphConfig, evaluate};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::debug;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Calc => cmd_calc(gateway(cli)?, format),
        Commands::Press { labels } => cmd_press(gateway(cli)?, labels, format),
        Commands::Eval { expression } => cmd_eval(expression, format),
        Commands::Graph { expression, .. } => {
            cmd_graph(expression, cli.command.graph_config(), format)
        }
        Commands::Solve { expression } => cmd_solve(gateway(cli)?, expression, format),
        Commands::Explain { concept } => {
            let reply = explain_concept(gateway(cli)?.as_ref(), concept)?;
            Ok(format_reply("explain", &reply, format))
        }
        Commands::Plan { .. } => {
            let request = cli
                .command
                .plan_request()
                .ok_or_else(|| CommandError::ExecutionFailed("not a plan command".to_string()))?;
            let reply = generate_study_plan(gateway(cli)?.as_ref(), &request)?;
            Ok(format_reply("plan", &reply, format))
        }
        Commands::Tip => {
            let reply = study_tip(gateway(cli)?.as_ref())?;
            Ok(format_reply("tip", &reply, format))
        }
        Commands::Buttons => Ok(format_buttons(format)),
    }
}

/// Builds the gateway only for commands that may need it.
fn gateway(cli: &Cli) -> Result<Arc<dyn SolverGateway>> {
    let config = cli.gateway_config();
    config.validate()?;
    debug!(config = ?config, "creating solver gateway");
    Ok(create_gateway(&config))
}

fn cmd_calc(gateway: Arc<dyn SolverGateway>, format: OutputFormat) -> Result<String> {
    let mut calc = Calculator::new(gateway);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(&mut calc, stdin.lock(), &mut stdout, format)?;
    Ok(String::new())
}

/// Runs an interactive keypad session.
///
/// Reads one line at a time from `input`; each line holds whitespace-separated
/// button labels. After every line the session state is written to `output`,
/// as text or as one compact JSON object per line. `quit`, `exit` or end of
/// input ends the session.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub fn run_session<R: BufRead, W: Write>(
    calc: &mut Calculator,
    input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Text {
        if !calc.remote_available() {
            writeln!(
                output,
                "warning: remote solver unavailable (set {API_KEY_ENV}); local evaluation still works"
            )?;
        }
        writeln!(output, "Enter button labels separated by spaces, `quit` to exit.")?;
        output.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        let outcomes = calc.press_labels(line.split_whitespace());
        let report = StepReport::new(calc.state(), &outcomes);
        match format {
            OutputFormat::Text => write!(output, "{}", format_step(&report, format))?,
            OutputFormat::Json => {
                let json = serde_json::to_string(&report).map_err(CommandError::from)?;
                writeln!(output, "{json}")?;
            }
        }
        output.flush()?;
    }

    Ok(())
}

fn cmd_press(
    gateway: Arc<dyn SolverGateway>,
    labels: &[String],
    format: OutputFormat,
) -> Result<String> {
    let mut calc = Calculator::new(gateway);
    let outcomes = calc.press_labels(labels.iter().map(String::as_str));
    let report = StepReport::new(calc.state(), &outcomes);
    Ok(format_step(&report, format))
}

fn cmd_eval(expression: &str, format: OutputFormat) -> Result<String> {
    let value = evaluate(expression)?;
    Ok(format_value(expression, value, format))
}

fn cmd_graph(expression: &str, config: GraphConfig, format: OutputFormat) -> Result<String> {
    // The grapher never needs the remote solver.
    let offline = Arc::new(OfflineGateway::new(GatewayError::Unavailable));
    let mut calc = Calculator::new(offline).with_graph_config(config);
    calc.type_text(expression.trim());

    match calc.press(ButtonToken::Graph) {
        Outcome::Plotted(plot) => Ok(format_plot(&plot, format)),
        Outcome::GraphFailed(err) => Err(err.into()),
        other => Err(CommandError::ExecutionFailed(format!("unexpected outcome: {other:?}")).into()),
    }
}

fn cmd_solve(
    gateway: Arc<dyn SolverGateway>,
    expression: &str,
    format: OutputFormat,
) -> Result<String> {
    let mut calc = Calculator::new(gateway);
    calc.type_text(expression.trim());

    match calc.press(ButtonToken::Solve) {
        Outcome::Computed(value) => Ok(format_value(calc.input(), value, format)),
        Outcome::Solved => Ok(format_reply("solve", calc.result(), format)),
        Outcome::Unchanged => Err(CommandError::MissingArgument("expression".to_string()).into()),
        _ => Err(CommandError::ExecutionFailed(calc.result().to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, GraphError};

    struct Echo;

    impl SolverGateway for Echo {
        fn solve(&self, prompt: &str) -> std::result::Result<String, GatewayError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    fn offline() -> Arc<dyn SolverGateway> {
        Arc::new(OfflineGateway::new(GatewayError::MissingCredentials))
    }

    fn session(gateway: Arc<dyn SolverGateway>, input: &str, format: OutputFormat) -> String {
        let mut calc = Calculator::new(gateway);
        let mut output = Vec::new();
        run_session(&mut calc, input.as_bytes(), &mut output, format).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_cmd_eval() {
        assert_eq!(cmd_eval("2+2", OutputFormat::Text).unwrap(), "4\n");
        assert!(matches!(
            cmd_eval("2+", OutputFormat::Text),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_cmd_graph() {
        let output = cmd_graph("x^2", GraphConfig::new(), OutputFormat::Text).unwrap();
        assert!(output.contains("400 samples"));

        let err = cmd_graph("2+2", GraphConfig::new(), OutputFormat::Text).unwrap_err();
        assert!(matches!(
            err,
            Error::Graph(GraphError::MissingVariable { .. })
        ));
    }

    #[test]
    fn test_cmd_solve_local_first() {
        let output = cmd_solve(Arc::new(Echo), "3*(1+1)", OutputFormat::Text).unwrap();
        assert_eq!(output, "6\n");
    }

    #[test]
    fn test_cmd_solve_falls_back() {
        let output = cmd_solve(Arc::new(Echo), "integrate x dx", OutputFormat::Text).unwrap();
        assert_eq!(
            output,
            "echo: Solve this mathematical expression: integrate x dx\n"
        );
    }

    #[test]
    fn test_cmd_solve_failure() {
        let err = cmd_solve(offline(), "2+", OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("Error in solving math problem"));

        let err = cmd_solve(offline(), "  ", OutputFormat::Text).unwrap_err();
        assert!(matches!(
            err,
            Error::Command(CommandError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_cmd_press() {
        let labels: Vec<String> = ["3", "+", "4", "M+", "Clear", "MR", "="]
            .iter()
            .map(ToString::to_string)
            .collect();
        let output = cmd_press(offline(), &labels, OutputFormat::Text).unwrap();
        assert!(output.contains("Input:  3+4"));
        assert!(output.contains("Result: 7"));
        assert!(output.contains("Memory: 3+4"));
    }

    #[test]
    fn test_session_warns_without_credentials() {
        let output = session(offline(), "", OutputFormat::Text);
        assert!(output.starts_with("warning: remote solver unavailable"));

        let output = session(Arc::new(Echo), "", OutputFormat::Text);
        assert!(!output.contains("warning"));
    }

    #[test]
    fn test_session_processes_lines_until_quit() {
        let output = session(offline(), "1 + 2\n\n=\nquit\n9\n", OutputFormat::Text);
        assert!(output.contains("Input:  1+2"));
        assert!(output.contains("Result: 3"));
        assert!(!output.contains("Input:  1+29"));
    }

    #[test]
    fn test_session_reports_unknown_labels() {
        let output = session(offline(), "1 bogus\n", OutputFormat::Text);
        assert!(output.contains("error: unknown button: bogus"));
        assert!(output.contains("Input:  1"));
    }

    #[test]
    fn test_session_json_lines() {
        let output = session(offline(), "2 ^ 3 =\nM+\n", OutputFormat::Json);
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["state"]["result"], "8");
        assert_eq!(lines[1]["state"]["memory"], "2^3");
    }

    #[test]
    fn test_session_survives_solver_failure() {
        let output = session(offline(), "2 +\n=\nClear 5 * 5 =\n", OutputFormat::Text);
        assert!(output.contains("Error in solving math problem"));
        assert!(output.contains("Result: 25"));
    }
}
