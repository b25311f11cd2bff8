//! Study assistant panels.
//!
//! Concept explanation, study plan generation and study tips. Each panel
//! validates its input, sends one prompt through the gateway and returns
//! the reply text verbatim.

use crate::error::{CommandError, Result};
use crate::gateway::SolverGateway;
use crate::gateway::prompt::{STUDY_TIP_PROMPT, explain_prompt, study_plan_prompt};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// What the study plan is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyPurpose {
    /// Preparing for an exam.
    #[default]
    Exam,
    /// Preparing for a test.
    Test,
}

impl fmt::Display for StudyPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exam => f.write_str("Exam Preparation"),
            Self::Test => f.write_str("Test Preparation"),
        }
    }
}

/// Inputs of the study plan panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyPlanRequest {
    /// Subject, e.g. `Physics`.
    pub subject: String,
    /// Topic within the subject.
    pub topic: String,
    /// Study duration in hours, at least 1.
    pub hours: u32,
    /// Purpose of the plan.
    pub purpose: StudyPurpose,
}

impl StudyPlanRequest {
    /// Checks that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingArgument`] for a blank subject or topic
    /// and [`CommandError::InvalidArgument`] for zero hours.
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(CommandError::MissingArgument("subject".to_string()).into());
        }
        if self.topic.trim().is_empty() {
            return Err(CommandError::MissingArgument("topic".to_string()).into());
        }
        if self.hours == 0 {
            return Err(
                CommandError::InvalidArgument("hours must be at least 1".to_string()).into(),
            );
        }
        Ok(())
    }

    /// The prompt sent for this request.
    #[must_use]
    pub fn prompt(&self) -> String {
        study_plan_prompt(
            self.subject.trim(),
            self.topic.trim(),
            self.hours,
            &self.purpose.to_string(),
        )
    }
}

/// Explains `concept` in simple terms.
///
/// # Errors
///
/// Returns an error for a blank concept or a failed gateway call.
pub fn explain_concept(gateway: &dyn SolverGateway, concept: &str) -> Result<String> {
    let concept = concept.trim();
    if concept.is_empty() {
        return Err(CommandError::MissingArgument("concept".to_string()).into());
    }
    Ok(gateway.solve(&explain_prompt(concept))?)
}

/// Generates a study plan.
///
/// # Errors
///
/// Returns an error for an incomplete request or a failed gateway call.
pub fn generate_study_plan(gateway: &dyn SolverGateway, request: &StudyPlanRequest) -> Result<String> {
    request.validate()?;
    Ok(gateway.solve(&request.prompt())?)
}

/// Fetches one study tip.
///
/// # Errors
///
/// Returns an error if the gateway call fails.
pub fn study_tip(gateway: &dyn SolverGateway) -> Result<String> {
    Ok(gateway.solve(STUDY_TIP_PROMPT)?)
}
