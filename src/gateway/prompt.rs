//! Prompt templates for the remote solver.
//!
//! Each assistant panel sends exactly one user message built here.

/// Prompt for the study tip panel.
pub const STUDY_TIP_PROMPT: &str = "Provide one study tip for students.";

/// Prompt asking the solver to work out a calculator expression.
#[must_use]
pub fn solve_prompt(expression: &str) -> String {
    format!("Solve this mathematical expression: {expression}")
}

/// Prompt asking for a plain-language explanation of `concept`.
#[must_use]
pub fn explain_prompt(concept: &str) -> String {
    format!("Explain the concept of {concept} in simple terms.")
}

/// Prompt asking for a study plan.
///
/// `purpose` is inserted lower-cased, e.g. `exam preparation`.
#[must_use]
pub fn study_plan_prompt(subject: &str, topic: &str, hours: u32, purpose: &str) -> String {
    format!(
        "Create a study plan for {hours} hours on {topic} in {subject} for {}.",
        purpose.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_prompt() {
        assert_eq!(
            solve_prompt("2+"),
            "Solve this mathematical expression: 2+"
        );
    }

    #[test]
    fn test_explain_prompt() {
        assert_eq!(
            explain_prompt("entropy"),
            "Explain the concept of entropy in simple terms."
        );
    }

    #[test]
    fn test_study_plan_prompt() {
        assert_eq!(
            study_plan_prompt("Physics", "Kinematics", 3, "Exam Preparation"),
            "Create a study plan for 3 hours on Kinematics in Physics for exam preparation."
        );
    }
}
