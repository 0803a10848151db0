//! Step controller - the form's state machine
//!
//! Owns the [`StepState`] and the working [`Draft`]. Forward progress is
//! gated by validating only the current step's fields; going back never
//! validates; submission validates the whole draft and is terminal.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::field::{Field, Step};
use crate::core::record::{Draft, Record};
use crate::schema::validator::{validate_all, validate_fields, FieldErrors};

/// Coarse state of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing(Step),
    Submitted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Editing(step) => write!(f, "{}", step),
            Phase::Submitted => write!(f, "submitted"),
        }
    }
}

/// User actions that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Advance,
    Retreat,
    Submit,
    Edit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Advance => write!(f, "advance"),
            Action::Retreat => write!(f, "retreat"),
            Action::Submit => write!(f, "submit"),
            Action::Edit => write!(f, "edit"),
        }
    }
}

/// Which way the last step change went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    None,
}

impl Direction {
    /// Arrow hint for renderers
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Forward => "→",
            Direction::Backward => "←",
            Direction::None => "•",
        }
    }
}

/// Session progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepState {
    pub current_step: Step,
    pub previous_step: Step,
    pub submitted: bool,
    pub record: Option<Record>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Default for StepState {
    fn default() -> Self {
        Self {
            current_step: Step::FIRST,
            previous_step: Step::FIRST,
            submitted: false,
            record: None,
            submitted_at: None,
        }
    }
}

impl StepState {
    pub fn phase(&self) -> Phase {
        if self.submitted {
            Phase::Submitted
        } else {
            Phase::Editing(self.current_step)
        }
    }

    /// Direction derived from previous vs current step
    pub fn direction(&self) -> Direction {
        match self.current_step.cmp(&self.previous_step) {
            std::cmp::Ordering::Greater => Direction::Forward,
            std::cmp::Ordering::Less => Direction::Backward,
            std::cmp::Ordering::Equal => Direction::None,
        }
    }

    /// Whether a progress indicator slot should be highlighted
    pub fn is_reached(&self, step: Step) -> bool {
        self.current_step >= step
    }

    fn move_to(&mut self, step: Step) {
        self.previous_step = self.current_step;
        self.current_step = step;
    }
}

/// Why a transition did not happen
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TransitionError {
    /// The attempted transition's fields failed validation
    #[error("Cannot {action}: {errors}")]
    #[diagnostic(code(stepform::controller::rejected))]
    Rejected {
        action: Action,
        #[diagnostic_source]
        errors: FieldErrors,
    },

    /// The action is not offered in the current state
    #[error("Cannot {action} while on {phase}")]
    #[diagnostic(
        code(stepform::controller::unavailable),
        help("Available actions depend on the current step; submitted forms are read-only")
    )]
    Unavailable { action: Action, phase: Phase },
}

impl TransitionError {
    /// Field errors, if the transition was rejected by validation
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            TransitionError::Rejected { errors, .. } => Some(errors),
            TransitionError::Unavailable { .. } => None,
        }
    }
}

/// State machine mediating step transitions
#[derive(Debug, Clone, Default)]
pub struct StepController {
    state: StepState,
    draft: Draft,
}

impl StepController {
    /// Start a new session on step 1 with an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session on step 1 with pre-filled values
    pub fn with_draft(draft: Draft) -> Self {
        Self {
            state: StepState::default(),
            draft,
        }
    }

    pub fn state(&self) -> &StepState {
        &self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    pub fn direction(&self) -> Direction {
        self.state.direction()
    }

    pub fn is_submitted(&self) -> bool {
        self.state.submitted
    }

    /// The stored record, present only after a successful submit
    pub fn record(&self) -> Option<&Record> {
        self.state.record.as_ref()
    }

    /// Actions offered in the current state
    pub fn allowed_actions(&self) -> Vec<Action> {
        match self.phase() {
            Phase::Submitted => vec![],
            Phase::Editing(Step::Personal) => vec![Action::Edit, Action::Advance],
            Phase::Editing(Step::Contact) => vec![Action::Edit, Action::Retreat, Action::Advance],
            Phase::Editing(Step::Account) => vec![Action::Edit, Action::Retreat, Action::Submit],
        }
    }

    fn ensure_allowed(&self, action: Action) -> Result<(), TransitionError> {
        if self.allowed_actions().contains(&action) {
            Ok(())
        } else {
            debug!(%action, phase = %self.phase(), "action unavailable");
            Err(TransitionError::Unavailable {
                action,
                phase: self.phase(),
            })
        }
    }

    /// Field change notification
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_allowed(Action::Edit)?;
        debug!(%field, "field edited");
        self.draft.set(field, value);
        Ok(())
    }

    /// Validate the current step's fields and move forward
    pub fn advance(&mut self) -> Result<Step, TransitionError> {
        self.ensure_allowed(Action::Advance)?;
        let current = self.state.current_step;

        if let Err(errors) = validate_fields(&self.draft, current.fields()) {
            debug!(step = current.number(), failed = ?errors.fields(), "advance rejected");
            return Err(TransitionError::Rejected {
                action: Action::Advance,
                errors,
            });
        }

        // allowed_actions only offers Advance on steps with a successor
        let Some(next) = current.next() else {
            return Err(TransitionError::Unavailable {
                action: Action::Advance,
                phase: self.phase(),
            });
        };
        self.state.move_to(next);
        debug!(from = current.number(), to = next.number(), "advanced");
        Ok(next)
    }

    /// Move back one step without validating anything
    pub fn retreat(&mut self) -> Result<Step, TransitionError> {
        self.ensure_allowed(Action::Retreat)?;
        let current = self.state.current_step;

        let Some(prev) = current.prev() else {
            return Err(TransitionError::Unavailable {
                action: Action::Retreat,
                phase: self.phase(),
            });
        };
        self.state.move_to(prev);
        debug!(from = current.number(), to = prev.number(), "retreated");
        Ok(prev)
    }

    /// Validate the entire draft and store the normalized record
    pub fn submit(&mut self) -> Result<&Record, TransitionError> {
        self.ensure_allowed(Action::Submit)?;

        let record = validate_all(&self.draft).map_err(|errors| {
            debug!(failed = ?errors.fields(), "submit rejected");
            TransitionError::Rejected {
                action: Action::Submit,
                errors,
            }
        })?;

        // Field values stay out of the logs
        info!("registration submitted");
        self.state.submitted = true;
        self.state.submitted_at = Some(Utc::now());
        Ok(self.state.record.insert(record))
    }
}
