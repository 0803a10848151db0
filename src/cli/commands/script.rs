//! `stepform script` command - Replay a scripted form session
//!
//! A script is a YAML or JSON list of events fed to the step controller in
//! order, exactly as an interactive session would:
//!
//! ```yaml
//! - set: { field: firstname, value: Alice }
//! - set: { field: lastname, value: Smith }
//! - advance
//! - retreat
//! ```
//!
//! Rejected or unavailable transitions are reported and the session carries
//! on. The command fails if the session does not end submitted.

use console::style;
use miette::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::cli::helpers::{parse_document, read_input};
use crate::cli::output::{render_field_errors, render_summary};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Field, StepController, TransitionError};

#[derive(clap::Args, Debug)]
pub struct ScriptArgs {
    /// Script file (YAML or JSON), or `-` for stdin
    pub file: PathBuf,

    /// Show the password in the final summary
    #[arg(long)]
    pub show_password: bool,
}

/// One user interaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    /// Field change notification
    Set { field: Field, value: String },
    Advance,
    Retreat,
    Submit,
}

/// Apply one event to the controller, returning a one-line description on success
pub fn apply_event(controller: &mut StepController, event: &Event) -> Result<String, TransitionError> {
    match event {
        Event::Set { field, value } => {
            controller.set_field(*field, value.clone())?;
            let shown = if field.is_secret() { "(hidden)" } else { value.as_str() };
            Ok(format!("set {} = {}", field, shown))
        }
        Event::Advance => {
            let step = controller.advance()?;
            Ok(format!("advance → {} ({})", step, step.name()))
        }
        Event::Retreat => {
            let step = controller.retreat()?;
            Ok(format!("retreat ← {} ({})", step, step.name()))
        }
        Event::Submit => {
            controller.submit()?;
            Ok("submit → submitted".to_string())
        }
    }
}

pub fn run(args: ScriptArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.format.resolve(config.default_format.as_deref());
    let show_trace = !global.quiet && !format.is_structured();

    let content = read_input(&args.file)?;
    let events: Vec<Event> = parse_document(&args.file, &content)?;
    tracing::debug!(count = events.len(), "loaded script");

    let mut controller = StepController::new();

    for (idx, event) in events.iter().enumerate() {
        match apply_event(&mut controller, event) {
            Ok(line) => {
                if show_trace {
                    println!("{} {:>3}. {}", style("✓").green(), idx + 1, line);
                }
            }
            Err(TransitionError::Rejected { action, errors }) => {
                if show_trace {
                    println!(
                        "{} {:>3}. {} rejected, still on {}",
                        style("✗").red(),
                        idx + 1,
                        action,
                        controller.current_step()
                    );
                    print!("{}", render_field_errors(&errors, OutputFormat::Text)?);
                }
            }
            Err(e @ TransitionError::Unavailable { .. }) => {
                if show_trace {
                    println!("{} {:>3}. {}", style("!").yellow(), idx + 1, e);
                }
            }
        }
    }

    let state = controller.state();
    match controller.record() {
        Some(record) => {
            if show_trace {
                println!();
            }
            print!(
                "{}",
                render_summary(record, state.submitted_at, format, &config, args.show_password)?
            );
            Ok(())
        }
        None => Err(miette::miette!(
            help = "Finish the script with a `submit` event on step 3",
            "Session ended on {} ({}) without submitting",
            state.current_step,
            state.current_step.name()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Step;

    #[test]
    fn test_parse_events_yaml() {
        let yaml = "- set: { field: firstname, value: Alice }\n- advance\n- retreat\n- submit\n";
        let events: Vec<Event> = serde_yml::from_str(yaml).unwrap();
        assert_eq!(
            events,
            vec![
                Event::Set {
                    field: Field::Firstname,
                    value: "Alice".to_string()
                },
                Event::Advance,
                Event::Retreat,
                Event::Submit,
            ]
        );
    }

    #[test]
    fn test_parse_events_json() {
        let json = r#"[{"set": {"field": "phone", "value": "123"}}, "advance"]"#;
        let events: Vec<Event> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], Event::Advance);
    }

    #[test]
    fn test_set_accepts_field_aliases() {
        let yaml = "- set: { field: first_name, value: Alice }\n- set: { field: LastName, value: Smith }\n";
        let events: Vec<Event> = serde_yml::from_str(yaml).unwrap();
        assert!(matches!(events[0], Event::Set { field: Field::Firstname, .. }));
        assert!(matches!(events[1], Event::Set { field: Field::Lastname, .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "- set: { field: nickname, value: Al }\n";
        assert!(serde_yml::from_str::<Vec<Event>>(yaml).is_err());
    }

    #[test]
    fn test_apply_event_hides_password() {
        let mut controller = StepController::new();
        let line = apply_event(
            &mut controller,
            &Event::Set {
                field: Field::Password,
                value: "secret123".to_string(),
            },
        )
        .unwrap();
        assert_eq!(line, "set password = (hidden)");
        assert_eq!(controller.draft().get(Field::Password), Some("secret123"));
    }

    #[test]
    fn test_apply_event_rejected_advance() {
        let mut controller = StepController::new();
        let set = |field, value: &str| Event::Set {
            field,
            value: value.to_string(),
        };
        apply_event(&mut controller, &set(Field::Firstname, "Al")).unwrap();
        apply_event(&mut controller, &set(Field::Lastname, "Smith")).unwrap();

        let err = apply_event(&mut controller, &Event::Advance).unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get(Field::Firstname),
            Some("At least 3 characters")
        );
        assert_eq!(controller.current_step(), Step::Personal);

        apply_event(&mut controller, &set(Field::Firstname, "Alice")).unwrap();
        let line = apply_event(&mut controller, &Event::Advance).unwrap();
        assert_eq!(line, "advance → Step 2 (Contact Information)");
    }
}
