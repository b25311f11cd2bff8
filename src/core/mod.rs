//! Calculator session core.
//!
//! This module contains the keypad vocabulary and the per-session state
//! machine that turns key presses into edits, results and plots. The
//! session depends on the gateway only through the
//! [`SolverGateway`](crate::gateway::SolverGateway) trait.

pub mod session;
pub mod token;

pub use session::{Calculator, CalculatorState, Outcome, SOLVE_FAILURE_PREFIX};
pub use token::{BUTTON_LAYOUT, ButtonToken, Digit, Operator};
