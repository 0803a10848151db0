//! Draft and validated registration records

use serde::{Deserialize, Serialize};

use crate::core::field::Field;

/// The working copy of the form, mutated by field edits before validation
///
/// Every field is optional: a field the user has not reached yet is simply
/// absent. Unknown keys in input files are rejected so typos surface early.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Draft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Firstname => &self.firstname,
            Field::Lastname => &self.lastname,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Country => &self.country,
            Field::Password => &self.password,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Firstname => &mut self.firstname,
            Field::Lastname => &mut self.lastname,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Country => &mut self.country,
            Field::Password => &mut self.password,
        }
    }

    /// Get the raw (untrimmed) value of a field
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Set a field's raw value
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Remove a field's value, returning what was there
    pub fn clear(&mut self, field: Field) -> Option<String> {
        self.slot_mut(field).take()
    }

    /// Builder-style setter
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Fields that currently hold a value
    pub fn filled(&self) -> Vec<Field> {
        Field::all()
            .iter()
            .copied()
            .filter(|f| self.slot(*f).is_some())
            .collect()
    }
}

impl From<Record> for Draft {
    fn from(record: Record) -> Self {
        Self {
            firstname: Some(record.firstname),
            lastname: Some(record.lastname),
            email: Some(record.email),
            phone: Some(record.phone),
            country: Some(record.country),
            password: Some(record.password),
        }
    }
}

/// A complete, schema-valid, normalized registration
///
/// Only produced by [`crate::schema::validate_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub password: String,
}

impl Record {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Firstname => &self.firstname,
            Field::Lastname => &self.lastname,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Country => &self.country,
            Field::Password => &self.password,
        }
    }

    /// Full display name
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}
