//! Core module - fundamental types and the step state machine

pub mod config;
pub mod controller;
pub mod field;
pub mod record;

pub use config::Config;
pub use controller::{Action, Direction, Phase, StepController, StepState, TransitionError};
pub use field::{Field, FieldSet, IdentParseError, Step};
pub use record::{Draft, Record};
