//! CLI command implementations

pub mod completions;
pub mod config;
pub mod run;
pub mod script;
pub mod steps;
pub mod validate;
