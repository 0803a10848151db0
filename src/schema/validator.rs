//! Field validation with per-field error reporting
//!
//! Each field has a declarative [`Constraint`]. The constraints are composed
//! into [`validate_fields`] (per-step gating) and [`validate_all`] (final
//! submission). Validation failure is ordinary data: a [`FieldErrors`]
//! mapping of field to message, never a panic.

use lazy_static::lazy_static;
use miette::Diagnostic;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::field::Field;
use crate::core::record::{Draft, Record};

lazy_static! {
    /// local@domain.tld, case-insensitive. Leading dot and ".." are checked separately.
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$"
    ).unwrap();
}

pub const REQUIRED_MESSAGE: &str = "Required";

/// A single field that failed its constraint
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{field}: {message}")]
#[diagnostic(code(stepform::schema::field))]
pub struct FieldValidationError {
    pub field: Field,
    pub message: String,

    #[help]
    help: Option<String>,
}

impl FieldValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            help: None,
        }
    }

    fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }
}

/// Field-to-message mapping produced by a failed validation
///
/// Holds at most one entry per field, kept in record order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Diagnostic)]
#[error("{} field(s) failed validation", .errors.len())]
#[diagnostic(
    code(stepform::schema::validation_error),
    help("Correct the listed fields and try again")
)]
pub struct FieldErrors {
    #[related]
    errors: Vec<FieldValidationError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error, replacing any existing entry for the same field
    pub fn push(&mut self, error: FieldValidationError) {
        match self.errors.binary_search_by_key(&error.field, |e| e.field) {
            Ok(idx) => self.errors[idx] = error,
            Err(idx) => self.errors.insert(idx, error),
        }
    }

    /// Get the message for a field, if it failed
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fields that failed, in record order
    pub fn fields(&self) -> Vec<Field> {
        self.errors.iter().map(|e| e.field).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldValidationError> {
        self.errors.iter()
    }

    /// Plain field-name to message map, for serialization
    pub fn to_map(&self) -> BTreeMap<Field, String> {
        self.errors
            .iter()
            .map(|e| (e.field, e.message.clone()))
            .collect()
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldValidationError;
    type IntoIter = std::slice::Iter<'a, FieldValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Format checks beyond length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
    Digits,
}

/// Declarative constraint for one field
#[derive(Debug, Clone, Copy)]
pub struct Constraint {
    /// Strip surrounding whitespace before checking and storing
    pub trim: bool,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub format: Option<Format>,
    pub min_message: &'static str,
    pub max_message: &'static str,
    pub format_message: &'static str,
}

impl Constraint {
    const fn text(min_len: usize, max_len: Option<usize>, min_message: &'static str) -> Self {
        Self {
            trim: true,
            min_len: Some(min_len),
            max_len,
            format: None,
            min_message,
            max_message: "At most 20 characters",
            format_message: "",
        }
    }

    /// Short human description, e.g. "trimmed, 3-20 characters"
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.trim {
            parts.push("trimmed".to_string());
        }
        match (self.min_len, self.max_len) {
            (Some(min), Some(max)) if min == max => parts.push(format!("exactly {} characters", min)),
            (Some(min), Some(max)) => parts.push(format!("{}-{} characters", min, max)),
            (Some(min), None) => parts.push(format!("at least {} characters", min)),
            (None, Some(max)) => parts.push(format!("at most {} characters", max)),
            (None, None) => {}
        }
        match self.format {
            Some(Format::Email) => parts.push("valid email address".to_string()),
            Some(Format::Digits) => parts.push("digits only".to_string()),
            None => {}
        }
        parts.join(", ")
    }
}

/// Get the constraint for a field
pub fn constraint(field: Field) -> Constraint {
    match field {
        Field::Firstname | Field::Lastname => Constraint::text(3, Some(20), "At least 3 characters"),
        Field::Email => Constraint {
            trim: true,
            min_len: None,
            max_len: None,
            format: Some(Format::Email),
            min_message: "",
            max_message: "",
            format_message: "Invalid email",
        },
        Field::Phone => Constraint {
            trim: false,
            min_len: Some(11),
            max_len: Some(11),
            format: Some(Format::Digits),
            min_message: "Phone must be 11 digits",
            max_message: "Phone must be 11 digits",
            format_message: "Phone must be 11 digits",
        },
        Field::Country => Constraint::text(4, None, "At least 4 characters"),
        Field::Password => Constraint::text(8, Some(20), "At least 8 characters"),
    }
}

fn matches_format(format: Format, value: &str) -> bool {
    match format {
        Format::Email => {
            !value.starts_with('.') && !value.contains("..") && EMAIL_REGEX.is_match(value)
        }
        Format::Digits => value.chars().all(|c| c.is_ascii_digit()),
    }
}

/// Validate a single field value, returning the normalized value
///
/// `None` means the field was never filled in.
pub fn validate_field(field: Field, value: Option<&str>) -> Result<String, FieldValidationError> {
    let rule = constraint(field);
    let fail = |message: &str| FieldValidationError::new(field, message).with_help(rule.describe());

    let raw = value.ok_or_else(|| fail(REQUIRED_MESSAGE))?;
    let value = if rule.trim { raw.trim() } else { raw };
    // Unicode scalar values, so an astral character counts once
    let len = value.chars().count();

    if let Some(min) = rule.min_len {
        if len < min {
            return Err(fail(rule.min_message));
        }
    }
    if let Some(max) = rule.max_len {
        if len > max {
            return Err(fail(rule.max_message));
        }
    }
    if let Some(format) = rule.format {
        if !matches_format(format, value) {
            return Err(fail(rule.format_message));
        }
    }

    Ok(value.to_string())
}

/// Validate only the listed fields; everything else is ignored
pub fn validate_fields(draft: &Draft, fields: &[Field]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in fields {
        if let Err(e) = validate_field(*field, draft.get(*field)) {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate every field and return the normalized record
pub fn validate_all(draft: &Draft) -> Result<Record, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut check = |field: Field| match validate_field(field, draft.get(field)) {
        Ok(v) => v,
        Err(e) => {
            errors.push(e);
            String::new()
        }
    };

    let record = Record {
        firstname: check(Field::Firstname),
        lastname: check(Field::Lastname),
        email: check(Field::Email),
        phone: check(Field::Phone),
        country: check(Field::Country),
        password: check(Field::Password),
    };

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::Step;

    fn valid_draft() -> Draft {
        Draft::new()
            .with(Field::Firstname, "Alice")
            .with(Field::Lastname, "Smith")
            .with(Field::Email, "a@b.com")
            .with(Field::Phone, "01234567891")
            .with(Field::Country, "Kenya")
            .with(Field::Password, "secret123")
    }

    #[test]
    fn test_valid_record() {
        let record = validate_all(&valid_draft()).unwrap();
        assert_eq!(record.firstname, "Alice");
        assert_eq!(record.lastname, "Smith");
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.phone, "01234567891");
        assert_eq!(record.country, "Kenya");
        assert_eq!(record.password, "secret123");
    }

    #[test]
    fn test_valid_record_is_trimmed() {
        let draft = valid_draft()
            .with(Field::Firstname, "  Alice ")
            .with(Field::Email, "\ta@b.com\n")
            .with(Field::Country, " Kenya ")
            .with(Field::Password, " secret123 ");
        let record = validate_all(&draft).unwrap();
        assert_eq!(record.firstname, "Alice");
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.country, "Kenya");
        assert_eq!(record.password, "secret123");
    }

    #[test]
    fn test_short_firstname() {
        let err = validate_field(Field::Firstname, Some("Al")).unwrap_err();
        assert_eq!(err.message, "At least 3 characters");
        assert_eq!(err.field, Field::Firstname);
    }

    #[test]
    fn test_whitespace_padding_does_not_satisfy_min_length() {
        let err = validate_field(Field::Lastname, Some("  Al  ")).unwrap_err();
        assert_eq!(err.message, "At least 3 characters");
    }

    #[test]
    fn test_long_name() {
        let err = validate_field(Field::Firstname, Some(&"a".repeat(21))).unwrap_err();
        assert_eq!(err.message, "At most 20 characters");
        assert!(validate_field(Field::Firstname, Some(&"a".repeat(20))).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert_eq!(validate_field(Field::Firstname, Some("Zoë")).unwrap(), "Zoë");
        assert!(validate_field(Field::Lastname, Some(&"é".repeat(20))).is_ok());
        // 11 astral characters are 22 UTF-16 units
        assert!(validate_field(Field::Firstname, Some(&"😀".repeat(11))).is_ok());
        assert!(validate_field(Field::Firstname, Some(&"😀".repeat(21))).is_err());
    }

    #[test]
    fn test_missing_field_is_required() {
        let err = validate_field(Field::Country, None).unwrap_err();
        assert_eq!(err.message, REQUIRED_MESSAGE);
    }

    #[test]
    fn test_email_formats() {
        for ok in ["a@b.com", "first.last+tag@sub.example.org", "O'Neil@Example.COM"] {
            assert!(validate_field(Field::Email, Some(ok)).is_ok(), "{ok}");
        }
        for bad in ["", "plain", "a@b", "@b.com", ".a@b.com", "a..b@c.com", "a.@b.com", "a@b.c", "a@-b.com"] {
            let err = validate_field(Field::Email, Some(bad)).unwrap_err();
            assert_eq!(err.message, "Invalid email", "{bad}");
        }
    }

    #[test]
    fn test_phone_rules() {
        assert_eq!(validate_field(Field::Phone, Some("01234567891")).unwrap(), "01234567891");
        for bad in ["123", "012345678912", "0123456789a", " 0123456789", "0123456789 "] {
            let err = validate_field(Field::Phone, Some(bad)).unwrap_err();
            assert_eq!(err.message, "Phone must be 11 digits", "{bad:?}");
        }
    }

    #[test]
    fn test_country_and_password() {
        assert_eq!(validate_field(Field::Country, Some("Peru")).unwrap(), "Peru");
        assert_eq!(
            validate_field(Field::Country, Some("UK")).unwrap_err().message,
            "At least 4 characters"
        );
        assert_eq!(
            validate_field(Field::Password, Some("short")).unwrap_err().message,
            "At least 8 characters"
        );
        assert_eq!(
            validate_field(Field::Password, Some(&"x".repeat(21))).unwrap_err().message,
            "At most 20 characters"
        );
    }

    #[test]
    fn test_validate_fields_ignores_unlisted() {
        let draft = Draft::new()
            .with(Field::Firstname, "Alice")
            .with(Field::Lastname, "Smith")
            .with(Field::Phone, "123");
        assert!(validate_fields(&draft, Step::Personal.fields()).is_ok());
    }

    #[test]
    fn test_validate_fields_step_two_phone() {
        let draft = Draft::new().with(Field::Email, "a@b.com").with(Field::Phone, "123");
        let errors = validate_fields(&draft, Step::Contact.fields()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Phone), Some("Phone must be 11 digits"));
        assert!(!errors.contains(Field::Email));
    }

    #[test]
    fn test_validate_all_reports_every_violation() {
        let draft = valid_draft()
            .with(Field::Lastname, "Li")
            .with(Field::Email, "nope")
            .with(Field::Password, "pw");
        let errors = validate_all(&draft).unwrap_err();
        assert_eq!(errors.fields(), vec![Field::Lastname, Field::Email, Field::Password]);
        assert_eq!(errors.get(Field::Lastname), Some("At least 3 characters"));
        assert_eq!(errors.get(Field::Email), Some("Invalid email"));
        assert_eq!(errors.get(Field::Password), Some("At least 8 characters"));
        assert!(!errors.contains(Field::Firstname));
    }

    #[test]
    fn test_validate_all_empty_draft() {
        let errors = validate_all(&Draft::new()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().all(|e| e.message == REQUIRED_MESSAGE));
    }

    #[test]
    fn test_field_errors_push_replaces_and_orders() {
        let mut errors = FieldErrors::new();
        errors.push(FieldValidationError::new(Field::Password, "a"));
        errors.push(FieldValidationError::new(Field::Firstname, "b"));
        errors.push(FieldValidationError::new(Field::Password, "c"));
        assert_eq!(errors.fields(), vec![Field::Firstname, Field::Password]);
        assert_eq!(errors.get(Field::Password), Some("c"));
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let draft = Draft::new().with(Field::Firstname, "Al").with(Field::Lastname, "Smith");
        let errors = validate_fields(&draft, Step::Personal.fields()).unwrap_err();
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"firstname":"At least 3 characters"}"#);
    }

    #[test]
    fn test_constraint_describe() {
        assert_eq!(constraint(Field::Firstname).describe(), "trimmed, 3-20 characters");
        assert_eq!(constraint(Field::Phone).describe(), "exactly 11 characters, digits only");
        assert_eq!(constraint(Field::Country).describe(), "trimmed, at least 4 characters");
        assert_eq!(constraint(Field::Email).describe(), "trimmed, valid email address");
    }
}
