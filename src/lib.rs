//! Stepform: a multi-step registration wizard
//!
//! Collects personal, contact and account details across three steps,
//! validating each step's fields before the user may move on, and shows a
//! summary once the whole record passes validation.

pub mod cli;
pub mod core;
pub mod schema;
