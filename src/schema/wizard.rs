//! Interactive terminal wizard for the registration form
//!
//! The wizard is a thin renderer: it draws the current [`StepState`], feeds
//! each prompt's answer to the controller as a field edit, and forwards the
//! chosen navigation action. All gating happens in [`StepController`].

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use miette::{IntoDiagnostic, Result};

use crate::core::controller::{Action, StepController, StepState, TransitionError};
use crate::core::field::{Field, Step};
use crate::schema::validator::FieldErrors;

/// How a wizard session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardOutcome {
    Submitted,
    Cancelled,
}

/// Navigation choices offered below each step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavChoice {
    Next,
    Back,
    Submit,
    Cancel,
}

impl NavChoice {
    pub fn label(&self) -> &'static str {
        match self {
            NavChoice::Next => "Next →",
            NavChoice::Back => "← Back",
            NavChoice::Submit => "Submit",
            NavChoice::Cancel => "Cancel",
        }
    }
}

/// Navigation choices for a set of allowed actions, primary action first
pub fn nav_choices(allowed: &[Action]) -> Vec<NavChoice> {
    let mut choices = Vec::new();
    if allowed.contains(&Action::Advance) {
        choices.push(NavChoice::Next);
    }
    if allowed.contains(&Action::Submit) {
        choices.push(NavChoice::Submit);
    }
    if allowed.contains(&Action::Retreat) {
        choices.push(NavChoice::Back);
    }
    choices.push(NavChoice::Cancel);
    choices
}

/// Progress indicator slots: each step and whether it has been reached
pub fn indicator(state: &StepState) -> Vec<(Step, bool)> {
    Step::all()
        .iter()
        .map(|step| (*step, state.is_reached(*step)))
        .collect()
}

/// A prompt-driven front-end for [`StepController`]
pub struct FormWizard {
    theme: ColorfulTheme,
}

impl FormWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Run until the form is submitted or the user cancels
    pub fn run(&self, controller: &mut StepController) -> Result<WizardOutcome> {
        let mut last_errors: Option<FieldErrors> = None;

        while !controller.is_submitted() {
            self.render_header(controller.state());

            for field in controller.current_step().fields() {
                if let Some(message) = last_errors.as_ref().and_then(|e| e.get(*field)) {
                    println!("  {} {}", style("✗").red(), style(message).red());
                }
                let value = self.prompt_field(*field, controller.draft().get(*field))?;
                controller.set_field(*field, value)?;
            }

            let choices = nav_choices(&controller.allowed_actions());
            let labels: Vec<&str> = choices.iter().map(|c| c.label()).collect();
            let selection = Select::with_theme(&self.theme)
                .items(&labels)
                .default(0)
                .interact()
                .into_diagnostic()?;

            let result = match choices[selection] {
                NavChoice::Next => controller.advance().map(|_| ()),
                NavChoice::Back => controller.retreat().map(|_| ()),
                NavChoice::Submit => controller.submit().map(|_| ()),
                NavChoice::Cancel => {
                    println!("{} Registration cancelled", style("✗").yellow());
                    return Ok(WizardOutcome::Cancelled);
                }
            };

            last_errors = match result {
                Ok(()) => None,
                Err(TransitionError::Rejected { errors, .. }) => {
                    println!(
                        "{} Please fix {} field(s) before continuing",
                        style("!").red().bold(),
                        errors.len()
                    );
                    Some(errors)
                }
                Err(e) => return Err(e.into()),
            };
        }

        println!();
        println!("{} Registration complete!", style("✓").green());
        Ok(WizardOutcome::Submitted)
    }

    fn render_header(&self, state: &StepState) {
        let slots: Vec<String> = indicator(state)
            .into_iter()
            .map(|(step, reached)| {
                let label = format!("{} {}", step.number(), step.indicator_label());
                if reached {
                    style(label).cyan().bold().to_string()
                } else {
                    style(label).dim().to_string()
                }
            })
            .collect();

        println!();
        println!("{}", slots.join(&style(" ─ ").dim().to_string()));
        println!(
            "{} {}",
            style(state.direction().arrow()).cyan(),
            style(state.current_step.name()).bold()
        );
        println!("{}", style("─".repeat(50)).dim());
    }

    fn prompt_field(&self, field: Field, current: Option<&str>) -> Result<String> {
        if field.is_secret() {
            let prompt = match current {
                Some(_) => format!("{} (leave empty to keep)", field.label()),
                None => field.label().to_string(),
            };
            let value = Password::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
                .into_diagnostic()?;
            return Ok(match current {
                Some(existing) if value.is_empty() => existing.to_string(),
                _ => value,
            });
        }

        Input::<String>::with_theme(&self.theme)
            .with_prompt(field.label())
            .with_initial_text(current.unwrap_or_default())
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()
    }
}

impl Default for FormWizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Draft;

    #[test]
    fn test_nav_choices_per_step() {
        let mut controller = StepController::with_draft(
            Draft::new()
                .with(Field::Firstname, "Alice")
                .with(Field::Lastname, "Smith")
                .with(Field::Email, "a@b.com")
                .with(Field::Phone, "01234567891"),
        );
        assert_eq!(
            nav_choices(&controller.allowed_actions()),
            vec![NavChoice::Next, NavChoice::Cancel]
        );

        controller.advance().unwrap();
        assert_eq!(
            nav_choices(&controller.allowed_actions()),
            vec![NavChoice::Next, NavChoice::Back, NavChoice::Cancel]
        );

        controller.advance().unwrap();
        assert_eq!(
            nav_choices(&controller.allowed_actions()),
            vec![NavChoice::Submit, NavChoice::Back, NavChoice::Cancel]
        );
    }

    #[test]
    fn test_indicator_highlights_reached_steps() {
        let state = StepState::default();
        assert_eq!(
            indicator(&state),
            vec![(Step::Personal, true), (Step::Contact, false), (Step::Account, false)]
        );
    }
}
