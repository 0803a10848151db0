//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

use crate::core::record::Draft;

/// Read a file's contents, treating `-` as stdin
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .into_diagnostic()
            .wrap_err("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))
    }
}

/// Parse YAML or JSON content; `.json` files use the JSON parser
pub fn parse_document<T: DeserializeOwned + 'static>(path: &Path, content: &str) -> Result<T> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(content)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid JSON in {}", path.display()))
    } else {
        serde_yml::from_str(content)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid YAML in {}", path.display()))
    }
}

/// Load a (possibly partial) record from a YAML/JSON file or stdin
pub fn load_draft(path: &Path) -> Result<Draft> {
    let content = read_input(path)?;
    if content.trim().is_empty() {
        return Ok(Draft::new());
    }
    parse_document(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::Field;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_draft_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("record.yaml");
        fs::write(&path, "firstname: Alice\nlastname: Smith\n").unwrap();
        let draft = load_draft(&path).unwrap();
        assert_eq!(draft.get(Field::Firstname), Some("Alice"));
        assert_eq!(draft.get(Field::Email), None);
    }

    #[test]
    fn test_load_draft_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("record.json");
        fs::write(&path, r#"{"email": "a@b.com", "phone": "01234567891"}"#).unwrap();
        let draft = load_draft(&path).unwrap();
        assert_eq!(draft.get(Field::Phone), Some("01234567891"));
    }

    #[test]
    fn test_load_draft_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.yaml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(load_draft(&path).unwrap(), Draft::new());
    }

    #[test]
    fn test_load_draft_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(load_draft(&tmp.path().join("missing.yaml")).is_err());

        let path = tmp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_draft(&path).is_err());
    }
}
