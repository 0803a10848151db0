//! Field and step identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The six fields collected by the form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Field {
    Firstname,
    Lastname,
    Email,
    Phone,
    Country,
    Password,
}

impl Field {
    /// Get the identifier used in records and input files
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Firstname => "firstname",
            Field::Lastname => "lastname",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Country => "country",
            Field::Password => "password",
        }
    }

    /// Human-readable label, used as the prompt/placeholder
    pub fn label(&self) -> &'static str {
        match self {
            Field::Firstname => "First Name",
            Field::Lastname => "Last Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Country => "Country",
            Field::Password => "Password",
        }
    }

    /// Get all fields in record order
    pub fn all() -> &'static [Field] {
        &[
            Field::Firstname,
            Field::Lastname,
            Field::Email,
            Field::Phone,
            Field::Country,
            Field::Password,
        ]
    }

    /// Whether the value should be hidden when echoed back
    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password)
    }

    /// The step that owns this field
    pub fn step(&self) -> Step {
        match self {
            Field::Firstname | Field::Lastname => Step::Personal,
            Field::Email | Field::Phone => Step::Contact,
            Field::Country | Field::Password => Step::Account,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from parsing field or step identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentParseError {
    #[error("Unknown field: {0} (expected one of firstname, lastname, email, phone, country, password)")]
    UnknownField(String),

    #[error("Invalid step: {0} (expected 1, 2 or 3)")]
    InvalidStep(String),
}

impl FromStr for Field {
    type Err = IdentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "firstname" | "first_name" => Ok(Field::Firstname),
            "lastname" | "last_name" => Ok(Field::Lastname),
            "email" => Ok(Field::Email),
            "phone" => Ok(Field::Phone),
            "country" => Ok(Field::Country),
            "password" => Ok(Field::Password),
            _ => Err(IdentParseError::UnknownField(s.to_string())),
        }
    }
}

impl TryFrom<String> for Field {
    type Error = IdentParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An ordered list of fields validated together
pub type FieldSet = &'static [Field];

/// One of the three pages of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    Personal,
    Contact,
    Account,
}

impl Step {
    pub const FIRST: Step = Step::Personal;
    pub const LAST: Step = Step::Account;

    /// 1-based step number
    pub fn number(&self) -> u8 {
        match self {
            Step::Personal => 1,
            Step::Contact => 2,
            Step::Account => 3,
        }
    }

    /// Look up a step by its 1-based number
    pub fn from_number(n: u8) -> Option<Step> {
        match n {
            1 => Some(Step::Personal),
            2 => Some(Step::Contact),
            3 => Some(Step::Account),
            _ => None,
        }
    }

    pub fn all() -> &'static [Step] {
        &[Step::Personal, Step::Contact, Step::Account]
    }

    /// Section heading shown above the step's fields
    pub fn name(&self) -> &'static str {
        match self {
            Step::Personal => "Personal Information",
            Step::Contact => "Contact Information",
            Step::Account => "Account Information",
        }
    }

    /// Label shown in the progress indicator
    pub fn indicator_label(&self) -> &'static str {
        match self {
            Step::Personal => "Register",
            Step::Contact => "Choose plan",
            Step::Account => "Purchase",
        }
    }

    /// The fields owned by this step
    pub fn fields(&self) -> FieldSet {
        match self {
            Step::Personal => &[Field::Firstname, Field::Lastname],
            Step::Contact => &[Field::Email, Field::Phone],
            Step::Account => &[Field::Country, Field::Password],
        }
    }

    pub fn next(&self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn prev(&self) -> Option<Step> {
        self.number().checked_sub(1).and_then(Step::from_number)
    }

    pub fn is_last(&self) -> bool {
        *self == Step::LAST
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}", self.number())
    }
}

impl TryFrom<u8> for Step {
    type Error = IdentParseError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Step::from_number(n).ok_or_else(|| IdentParseError::InvalidStep(n.to_string()))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl FromStr for Step {
    type Err = IdentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("step")
            .or_else(|| trimmed.strip_prefix("Step"))
            .unwrap_or(trimmed)
            .trim();
        digits
            .parse::<u8>()
            .ok()
            .and_then(Step::from_number)
            .ok_or_else(|| IdentParseError::InvalidStep(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_roundtrip() {
        for field in Field::all() {
            let parsed: Field = field.as_str().parse().unwrap();
            assert_eq!(parsed, *field);
        }
        assert_eq!("FirstName".parse::<Field>().unwrap(), Field::Firstname);
        assert!("nickname".parse::<Field>().is_err());
    }

    #[test]
    fn test_fieldsets_are_disjoint_and_complete() {
        let mut seen: Vec<Field> = Step::all().iter().flat_map(|s| s.fields().iter().copied()).collect();
        assert_eq!(seen.len(), 6);
        seen.sort();
        seen.dedup();
        assert_eq!(seen, Field::all().to_vec());

        for step in Step::all() {
            for field in step.fields() {
                assert_eq!(field.step(), *step);
            }
        }
    }

    #[test]
    fn test_step_navigation() {
        assert_eq!(Step::Personal.next(), Some(Step::Contact));
        assert_eq!(Step::Account.next(), None);
        assert_eq!(Step::Personal.prev(), None);
        assert_eq!(Step::Account.prev(), Some(Step::Contact));
        assert!(Step::Account.is_last());
    }

    #[test]
    fn test_step_parse() {
        assert_eq!("2".parse::<Step>().unwrap(), Step::Contact);
        assert_eq!("step 3".parse::<Step>().unwrap(), Step::Account);
        assert_eq!(
            "4".parse::<Step>(),
            Err(IdentParseError::InvalidStep("4".to_string()))
        );
        assert!(Step::try_from(0u8).is_err());
    }
}
