//! Calculator session state machine.
//!
//! A [`Calculator`] owns one session's expression buffer, result and
//! memory. It consumes keypad tokens one at a time; input keys only append
//! text (no syntax checking happens while typing), control keys clear,
//! store, recall, compute or plot.

use crate::core::token::ButtonToken;
use crate::error::{ConfigError, GatewayError, GraphError};
use crate::gateway::SolverGateway;
use crate::gateway::prompt::solve_prompt;
use crate::math::{GraphConfig, Plot, Value, evaluate, mentions_identifier, plot};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of the result text shown when the remote solver fails.
pub const SOLVE_FAILURE_PREFIX: &str = "Error in solving math problem";

/// A snapshot of the session's three slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalculatorState {
    /// Expression under construction.
    pub input: String,
    /// Last computed or solved result, empty if none.
    pub result: String,
    /// Stored expression, if any.
    pub memory: Option<String>,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The expression or memory was edited.
    Edited,
    /// Nothing happened.
    Unchanged,
    /// Evaluated locally; the result slot holds the formatted value.
    Computed(Value),
    /// Solved remotely; the result slot holds the reply.
    Solved,
    /// Remote solving failed; the result slot holds the failure message.
    SolveFailed(GatewayError),
    /// The expression was sampled for plotting.
    Plotted(Plot),
    /// The expression could not be plotted. State is unchanged.
    GraphFailed(GraphError),
    /// The label is not a keypad button. State is unchanged.
    Rejected(ConfigError),
}

impl Outcome {
    /// Error text to surface to the user, if this outcome is a failure.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::SolveFailed(err) => Some(err.to_string()),
            Self::GraphFailed(err) => Some(err.to_string()),
            Self::Rejected(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

/// One interactive calculator session.
///
/// Sessions share nothing but the gateway; each owns its own buffer,
/// result and memory.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use study_assist::core::{ButtonToken, Calculator};
/// use study_assist::error::GatewayError;
/// use study_assist::gateway::OfflineGateway;
///
/// let gateway = Arc::new(OfflineGateway::new(GatewayError::MissingCredentials));
/// let mut calc = Calculator::new(gateway);
/// for label in ["2", "+", "2", "="] {
///     calc.press_label(label);
/// }
/// assert_eq!(calc.input(), "2+2");
/// assert_eq!(calc.result(), "4");
/// ```
pub struct Calculator {
    input: String,
    result: String,
    memory: Option<String>,
    graph: GraphConfig,
    gateway: Arc<dyn SolverGateway>,
}

impl Calculator {
    /// Creates an empty session backed by `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<dyn SolverGateway>) -> Self {
        Self {
            input: String::new(),
            result: String::new(),
            memory: None,
            graph: GraphConfig::default(),
            gateway,
        }
    }

    /// Overrides the sampling domain and count used by `graph`.
    #[must_use]
    pub fn with_graph_config(mut self, graph: GraphConfig) -> Self {
        self.graph = graph;
        self
    }

    /// The expression under construction.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The last result, empty if none.
    #[must_use]
    pub fn result(&self) -> &str {
        &self.result
    }

    /// The stored expression, if any.
    #[must_use]
    pub fn memory(&self) -> Option<&str> {
        self.memory.as_deref()
    }

    /// Whether the remote fallback can succeed.
    #[must_use]
    pub fn remote_available(&self) -> bool {
        self.gateway.is_available()
    }

    /// Copies the three slots.
    #[must_use]
    pub fn state(&self) -> CalculatorState {
        CalculatorState {
            input: self.input.clone(),
            result: self.result.clone(),
            memory: self.memory.clone(),
        }
    }

    /// Applies one key press.
    pub fn press(&mut self, token: ButtonToken) -> Outcome {
        debug!(button = %token, "button pressed");
        match token {
            ButtonToken::Digit(_)
            | ButtonToken::Point
            | ButtonToken::Operator(_)
            | ButtonToken::OpenParen
            | ButtonToken::CloseParen
            | ButtonToken::Function(_)
            | ButtonToken::Variable => token.literal().map_or(Outcome::Unchanged, |literal| {
                self.input.push_str(literal);
                Outcome::Edited
            }),
            ButtonToken::Clear => {
                self.input.clear();
                self.result.clear();
                Outcome::Edited
            }
            ButtonToken::ClearAll => {
                self.input.clear();
                self.memory = None;
                Outcome::Edited
            }
            ButtonToken::MemoryStore => {
                self.memory = Some(self.input.clone()).filter(|m| !m.is_empty());
                Outcome::Edited
            }
            ButtonToken::MemoryClear => {
                self.memory = None;
                Outcome::Edited
            }
            ButtonToken::MemoryRecall => match &self.memory {
                Some(stored) => {
                    self.input.push_str(stored);
                    Outcome::Edited
                }
                None => Outcome::Unchanged,
            },
            ButtonToken::Equals | ButtonToken::Solve => self.solve(),
            ButtonToken::Graph => self.graph(),
        }
    }

    /// Applies one key press given by its label.
    ///
    /// Unknown labels are logged and ignored.
    pub fn press_label(&mut self, label: &str) -> Outcome {
        match label.parse::<ButtonToken>() {
            Ok(token) => self.press(token),
            Err(err) => {
                warn!(error = %err, "ignoring key press");
                Outcome::Rejected(err)
            }
        }
    }

    /// Appends free text to the expression, as typed on a keyboard.
    ///
    /// Like the input keys, this never validates.
    pub fn type_text(&mut self, text: &str) {
        debug!(text, "text typed");
        self.input.push_str(text);
    }

    /// Applies a sequence of labelled key presses, returning every outcome.
    pub fn press_labels<'a, I>(&mut self, labels: I) -> Vec<Outcome>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels
            .into_iter()
            .map(|label| self.press_label(label))
            .collect()
    }

    fn solve(&mut self) -> Outcome {
        if self.input.is_empty() {
            return Outcome::Unchanged;
        }

        match evaluate(&self.input) {
            Ok(value) => {
                self.result = value.to_string();
                Outcome::Computed(value)
            }
            Err(parse_err) => {
                // Every local failure goes to the remote solver, including
                // plain typos.
                debug!(error = %parse_err, "local evaluation failed, asking remote solver");
                match self.gateway.solve(&solve_prompt(&self.input)) {
                    Ok(text) => {
                        self.result = text;
                        Outcome::Solved
                    }
                    Err(err) => {
                        warn!(error = %err, "remote solver failed");
                        self.result = format!("{SOLVE_FAILURE_PREFIX}: {err}");
                        Outcome::SolveFailed(err)
                    }
                }
            }
        }
    }

    fn graph(&self) -> Outcome {
        if !mentions_identifier(&self.input, &self.graph.variable) {
            return Outcome::GraphFailed(GraphError::MissingVariable {
                variable: self.graph.variable.clone(),
            });
        }

        match plot(&self.input, &self.graph) {
            Ok(plot) => Outcome::Plotted(plot),
            Err(err) => {
                debug!(error = %err, "graph failed");
                Outcome::GraphFailed(err)
            }
        }
    }
}

impl fmt::Debug for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calculator")
            .field("input", &self.input)
            .field("result", &self.result)
            .field("memory", &self.memory)
            .field("graph", &self.graph)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::gateway::OfflineGateway;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies with a fixed result and counts calls.
    struct Scripted {
        reply: Result<String, GatewayError>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: GatewayError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SolverGateway for Scripted {
        fn solve(&self, _prompt: &str) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn offline() -> Calculator {
        Calculator::new(Arc::new(OfflineGateway::new(
            GatewayError::MissingCredentials,
        )))
    }

    fn typed(labels: &[&str]) -> Calculator {
        let mut calc = offline();
        calc.press_labels(labels.iter().copied());
        calc
    }

    #[test]
    fn test_initial_state_is_empty() {
        let calc = offline();
        assert_eq!(calc.state(), CalculatorState::default());
    }

    #[test]
    fn test_input_keys_append_literals() {
        let calc = typed(&["sin", "(", "x", ")", "*", "1", ".", "5"]);
        assert_eq!(calc.input(), "sin(x)*1.5");
        assert_eq!(calc.result(), "");
    }

    #[test]
    fn test_append_does_not_validate() {
        let calc = typed(&["(", "(", "+", "*", ")"]);
        assert_eq!(calc.input(), "((+*)");
    }

    #[test]
    fn test_clear_keeps_memory() {
        let mut calc = typed(&["3", "+", "4", "M+", "="]);
        assert_eq!(calc.result(), "7");

        assert_eq!(calc.press(ButtonToken::Clear), Outcome::Edited);
        assert_eq!(calc.input(), "");
        assert_eq!(calc.result(), "");
        assert_eq!(calc.memory(), Some("3+4"));

        calc.press(ButtonToken::MemoryRecall);
        assert_eq!(calc.input(), "3+4");
    }

    #[test]
    fn test_recall_appends_and_keeps_memory() {
        let mut calc = typed(&["2", "M+", "*"]);
        calc.press(ButtonToken::MemoryRecall);
        calc.press(ButtonToken::MemoryRecall);
        assert_eq!(calc.input(), "2*22");
        assert_eq!(calc.memory(), Some("2"));
    }

    #[test]
    fn test_recall_empty_memory_is_noop() {
        let mut calc = typed(&["1", "+"]);
        let before = calc.state();
        assert_eq!(calc.press(ButtonToken::MemoryRecall), Outcome::Unchanged);
        assert_eq!(calc.state(), before);
    }

    #[test]
    fn test_memory_clear() {
        let mut calc = typed(&["9", "M+"]);
        calc.press(ButtonToken::MemoryClear);
        assert_eq!(calc.memory(), None);
        assert_eq!(calc.input(), "9");
    }

    #[test]
    fn test_store_empty_input_leaves_memory_empty() {
        let mut calc = offline();
        calc.press(ButtonToken::MemoryStore);
        assert_eq!(calc.memory(), None);
    }

    #[test]
    fn test_clear_all_keeps_result() {
        let mut calc = typed(&["5", "M+", "="]);
        calc.press(ButtonToken::ClearAll);
        assert_eq!(calc.input(), "");
        assert_eq!(calc.memory(), None);
        assert_eq!(calc.result(), "5");
    }

    #[test]
    fn test_equals_on_empty_input_is_noop() {
        let gateway = Scripted::ok("unused");
        let mut calc = Calculator::new(gateway.clone());
        assert_eq!(calc.press(ButtonToken::Equals), Outcome::Unchanged);
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_equals_local_success_skips_gateway() {
        let gateway = Scripted::ok("unused");
        let mut calc = Calculator::new(gateway.clone());
        calc.press_labels(["2", "+", "2"]);
        let outcome = calc.press(ButtonToken::Equals);
        assert_eq!(outcome, Outcome::Computed(Value::new(4.0)));
        assert_eq!(calc.result(), "4");
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_equals_is_idempotent() {
        let mut calc = typed(&["1", "/", "3"]);
        calc.press(ButtonToken::Equals);
        let first = calc.state();
        calc.press(ButtonToken::Equals);
        assert_eq!(calc.state(), first);
        assert_eq!(calc.result(), "0.3333333333");
    }

    #[test]
    fn test_unparseable_falls_back_to_gateway() {
        let gateway = Scripted::ok("Invalid expression");
        let mut calc = Calculator::new(gateway.clone());
        calc.press_labels(["2", "+"]);
        assert_eq!(calc.press(ButtonToken::Solve), Outcome::Solved);
        assert_eq!(calc.result(), "Invalid expression");
        assert_eq!(calc.input(), "2+");
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn test_gateway_failure_sets_error_text() {
        let gateway = Scripted::failing(GatewayError::Network("connection reset".to_string()));
        let mut calc = Calculator::new(gateway);
        calc.press_labels(["2", "+", "M+"]);
        let outcome = calc.press(ButtonToken::Equals);
        assert!(matches!(
            outcome,
            Outcome::SolveFailed(GatewayError::Network(_))
        ));
        assert!(calc.result().starts_with(SOLVE_FAILURE_PREFIX));
        assert!(calc.result().contains("connection reset"));
        assert_eq!(calc.input(), "2+");
        assert_eq!(calc.memory(), Some("2+"));

        // The session keeps working.
        calc.press(ButtonToken::Clear);
        calc.press_labels(["6", "*", "7", "="]);
        assert_eq!(calc.result(), "42");
    }

    #[test]
    fn test_graph_without_variable() {
        let gateway = Scripted::ok("unused");
        let mut calc = Calculator::new(gateway.clone());
        calc.press_labels(["2", "+", "2", "="]);
        let before = calc.state();
        let outcome = calc.press(ButtonToken::Graph);
        assert_eq!(
            outcome,
            Outcome::GraphFailed(GraphError::MissingVariable {
                variable: "x".to_string()
            })
        );
        assert_eq!(calc.state(), before);
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_graph_exp_is_not_a_variable() {
        let mut calc = typed(&["exp", "(", "1", ")"]);
        assert!(matches!(
            calc.press(ButtonToken::Graph),
            Outcome::GraphFailed(GraphError::MissingVariable { .. })
        ));
    }

    #[test]
    fn test_graph_square() {
        let mut calc = typed(&["x", "^", "2"]);
        let Outcome::Plotted(plot) = calc.press(ButtonToken::Graph) else {
            panic!("expected a plot");
        };
        assert_eq!(plot.samples.len(), 400);
        assert!((plot.samples[0].x + 10.0).abs() < f64::EPSILON);
        assert!((plot.samples[399].x - 10.0).abs() < f64::EPSILON);
        assert_eq!(plot.x_label, "x");
        assert_eq!(plot.y_label, "f(x)");
        assert_eq!(calc.result(), "");
    }

    #[test]
    fn test_graph_unparseable_never_calls_gateway() {
        let gateway = Scripted::ok("unused");
        let mut calc = Calculator::new(gateway.clone());
        calc.press_labels(["x", "+"]);
        assert!(matches!(
            calc.press(ButtonToken::Graph),
            Outcome::GraphFailed(GraphError::Unparseable(_))
        ));
        assert_eq!(gateway.calls(), 0);
        assert_eq!(calc.input(), "x+");
    }

    #[test]
    fn test_deeply_nested_input_falls_back_to_gateway() {
        let gateway = Scripted::ok("Invalid expression");
        let mut calc = Calculator::new(gateway.clone());
        for _ in 0..3000 {
            calc.press(ButtonToken::OpenParen);
        }
        assert_eq!(calc.press(ButtonToken::Equals), Outcome::Solved);
        assert_eq!(calc.result(), "Invalid expression");
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn test_graph_deeply_nested_input_is_unparseable() {
        let mut calc = offline();
        calc.type_text(&format!("{}x{}", "(".repeat(3000), ")".repeat(3000)));
        assert!(matches!(
            calc.press(ButtonToken::Graph),
            Outcome::GraphFailed(GraphError::Unparseable(ParseError::TooDeep { .. }))
        ));
    }

    #[test]
    fn test_graph_uses_configured_domain() {
        let mut calc = typed(&["x"]).with_graph_config(GraphConfig::new().with_count(5));
        let Outcome::Plotted(plot) = calc.press(ButtonToken::Graph) else {
            panic!("expected a plot");
        };
        assert_eq!(plot.samples.len(), 5);
    }

    #[test]
    fn test_free_variable_on_equals_goes_remote() {
        let gateway = Scripted::ok("x = 0");
        let mut calc = Calculator::new(gateway.clone());
        calc.press_labels(["x", "^", "2"]);
        assert_eq!(calc.press(ButtonToken::Equals), Outcome::Solved);
        assert_eq!(calc.result(), "x = 0");
    }

    #[test]
    fn test_unknown_label_is_rejected_without_change() {
        let mut calc = typed(&["1"]);
        let before = calc.state();
        let outcome = calc.press_label("sinh");
        assert_eq!(
            outcome,
            Outcome::Rejected(ConfigError::UnknownButton {
                label: "sinh".to_string()
            })
        );
        assert!(outcome.error_message().is_some());
        assert_eq!(calc.state(), before);
    }

    #[test]
    fn test_sessions_are_independent() {
        let gateway: Arc<dyn SolverGateway> = Scripted::ok("unused");
        let mut first = Calculator::new(Arc::clone(&gateway));
        let mut second = Calculator::new(gateway);
        first.press_labels(["4", "M+"]);
        second.press(ButtonToken::MemoryRecall);
        assert_eq!(second.input(), "");
        assert_eq!(second.memory(), None);
        assert_eq!(first.memory(), Some("4"));
    }

    #[test]
    fn test_type_text_appends() {
        let mut calc = typed(&["1", "+"]);
        calc.type_text("sqrt(16)");
        calc.press(ButtonToken::Equals);
        assert_eq!(calc.input(), "1+sqrt(16)");
        assert_eq!(calc.result(), "5");
    }

    #[test]
    fn test_debug_omits_gateway() {
        let calc = typed(&["1"]);
        let debug = format!("{calc:?}");
        assert!(debug.contains("input: \"1\""));
    }
}
