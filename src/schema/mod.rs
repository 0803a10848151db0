//! Schema system - field validation, summary templates and the interactive wizard

pub mod template;
pub mod validator;
pub mod wizard;

pub use template::{SummaryContext, SummaryRenderer, TemplateError};
pub use validator::{
    constraint, validate_all, validate_field, validate_fields, Constraint, FieldErrors,
    FieldValidationError,
};
pub use wizard::{FormWizard, WizardOutcome};
