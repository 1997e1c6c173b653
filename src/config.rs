//! Configuration for checking template documents
//!
//! A config file is TOML with two optional tables:
//!
//! ```toml
//! [validation]
//! generation = "legacy"
//! semantic_checks = true
//! max_violations = 50
//! warnings_as_errors = false
//!
//! [report]
//! color = false
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::Generation;

/// Errors that can occur when loading a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Options for the check pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    /// Schema generation documents are checked against
    pub generation: Generation,

    /// Run the checks a schema cannot express after decoding
    pub semantic_checks: bool,

    /// Stop reporting after this many violations
    pub max_violations: Option<usize>,

    /// Treat warnings as errors when deciding validity
    pub warnings_as_errors: bool,

    /// Colored report output
    pub color: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            generation: Generation::default(),
            semantic_checks: true,
            max_violations: None,
            warnings_as_errors: false,
            color: true,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    validation: Option<TomlValidation>,
    report: Option<TomlReport>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlValidation {
    generation: Option<Generation>,
    semantic_checks: Option<bool>,
    max_violations: Option<usize>,
    warnings_as_errors: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlReport {
    color: Option<bool>,
}

impl CheckConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let validation = parsed.validation.unwrap_or_default();
        let report = parsed.report.unwrap_or_default();
        let defaults = Self::default();

        Ok(CheckConfig {
            generation: validation.generation.unwrap_or(defaults.generation),
            semantic_checks: validation.semantic_checks.unwrap_or(defaults.semantic_checks),
            max_violations: validation.max_violations.or(defaults.max_violations),
            warnings_as_errors: validation
                .warnings_as_errors
                .unwrap_or(defaults.warnings_as_errors),
            color: report.color.unwrap_or(defaults.color),
        })
    }

    /// Set the schema generation
    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    /// Enable or disable the semantic checks
    pub fn with_semantic_checks(mut self, enabled: bool) -> Self {
        self.semantic_checks = enabled;
        self
    }

    /// Cap the number of reported violations
    pub fn with_max_violations(mut self, max: usize) -> Self {
        self.max_violations = Some(max);
        self
    }

    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CheckConfig::default();
        assert_eq!(config.generation, Generation::Current);
        assert!(config.semantic_checks);
        assert_eq!(config.max_violations, None);
        assert!(!config.warnings_as_errors);
        assert!(config.color);
    }

    #[test]
    fn test_builder_pattern() {
        let config = CheckConfig::new()
            .with_generation(Generation::Legacy)
            .with_max_violations(5)
            .with_color(false);

        assert_eq!(config.generation, Generation::Legacy);
        assert_eq!(config.max_violations, Some(5));
        assert!(!config.color);
    }

    #[test]
    fn test_from_toml() {
        let config = CheckConfig::from_str(
            r#"
[validation]
generation = "v1"
warnings_as_errors = true

[report]
color = false
"#,
        )
        .expect("Should parse config");

        assert_eq!(config.generation, Generation::Legacy);
        assert!(config.warnings_as_errors);
        assert!(config.semantic_checks);
        assert!(!config.color);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = CheckConfig::from_str("").expect("Should parse empty config");
        assert_eq!(config, CheckConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = CheckConfig::from_str("[validation]\nstrict = true\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = CheckConfig::from_file(Path::new("/nonexistent/check.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
