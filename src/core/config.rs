//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the working-directory config
pub const LOCAL_CONFIG_FILE: &str = ".stepform.yaml";

/// Stepform configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Hide the password in the completion summary (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_password: Option<bool>,

    /// Default output format for summaries and validation results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Tera template used for the text summary instead of the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_template: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/stepform/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Working directory config (./.stepform.yaml)
        if let Some(local) = Self::read_file(&Self::local_config_path()) {
            config.merge(local);
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Read one config layer; unreadable or malformed files are skipped
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(mask) = var("STEPFORM_MASK_PASSWORD") {
            match mask.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.mask_password = Some(true),
                "0" | "false" | "no" | "off" => self.mask_password = Some(false),
                other => tracing::warn!(value = other, "ignoring invalid STEPFORM_MASK_PASSWORD"),
            }
        }
        if let Some(format) = var("STEPFORM_FORMAT") {
            self.default_format = Some(format);
        }
        if let Some(template) = var("STEPFORM_TEMPLATE") {
            self.summary_template = Some(PathBuf::from(template));
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "stepform")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the working-directory config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.mask_password.is_some() {
            self.mask_password = other.mask_password;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.summary_template.is_some() {
            self.summary_template = other.summary_template;
        }
    }

    /// Whether the summary hides the password
    pub fn mask_password(&self) -> bool {
        self.mask_password.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.mask_password());
        assert!(config.default_format.is_none());
        assert!(config.summary_template.is_none());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            mask_password: Some(true),
            default_format: Some("yaml".to_string()),
            summary_template: None,
        };
        base.merge(Config {
            mask_password: Some(false),
            default_format: None,
            summary_template: Some(PathBuf::from("summary.tera")),
        });
        assert!(!base.mask_password());
        assert_eq!(base.default_format.as_deref(), Some("yaml"));
        assert_eq!(base.summary_template, Some(PathBuf::from("summary.tera")));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("STEPFORM_MASK_PASSWORD", "no"),
            ("STEPFORM_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert!(!config.mask_password());
        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert!(config.summary_template.is_none());
    }

    #[test]
    fn test_env_ignores_garbage_mask_value() {
        let mut config = Config::default();
        config.apply_env(|k| (k == "STEPFORM_MASK_PASSWORD").then(|| "maybe".to_string()));
        assert_eq!(config.mask_password, None);
    }

    #[test]
    fn test_read_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "mask_password: false\ndefault_format: yaml\n").unwrap();
        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.mask_password, Some(false));
        assert_eq!(config.default_format.as_deref(), Some("yaml"));

        std::fs::write(&path, "mask_password: [not, a, bool]\n").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&tmp.path().join("missing.yaml")).is_none());
    }
}
