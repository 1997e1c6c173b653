//! Tabletop Templates - object template documents for a tabletop simulator
//!
//! This library provides the typed template model for both schema
//! generations, JSON Schema generation, and a checker that reports every
//! violation in a document with its location.
//!
//! # Example
//!
//! ```rust
//! use tabletop_templates::{check, CheckConfig, Generation};
//!
//! let report = check(r#"{"Type": "Spinner"}"#, &CheckConfig::new()).unwrap();
//! assert!(!report.is_valid());
//! assert_eq!(report.generation, Generation::Current);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod report;
pub mod schema;
pub mod validate;

pub use config::{CheckConfig, ConfigError};
pub use document::{parse, JsonPath, Node};
pub use error::ParseError;
pub use model::{Generation, LegacyObjectTemplate, ObjectTemplate, Template};
pub use report::CheckReport;
pub use validate::{SchemaValidator, Severity, Violation, ViolationKind};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during the check pipeline
#[derive(Debug, Error)]
pub enum CheckError {
    /// The document is not well-formed JSON
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// The document is JSON but not a valid template
    #[error("invalid template: {}", format_violations(.0))]
    Invalid(Vec<Violation>),

    /// Schema generation or serialization failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Vec<ParseError>> for CheckError {
    fn from(errors: Vec<ParseError>) -> Self {
        CheckError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode a document that already passed schema validation
pub fn decode(document: &Node, generation: Generation) -> Result<Template, serde_json::Error> {
    let value = document.to_value();
    Ok(match generation {
        Generation::Legacy => Template::Legacy(serde_json::from_value(value)?),
        Generation::Current => Template::Current(serde_json::from_value(value)?),
    })
}

/// Check a template document and report every violation found
///
/// Violations never make this fail; they are collected in the report.
/// Only documents that are not JSON at all produce an error.
///
/// # Example
///
/// ```rust
/// use tabletop_templates::{check, CheckConfig, Generation};
///
/// let source = r#"{
///     "Type": "Generic",
///     "TemplateId": "0123456789ABCDEF0123456789ABCDEF",
///     "TemplateName": "Crate",
///     "CollisionType": "Regular",
///     "SurfaceType": "Wood",
///     "Models": [{
///         "Offset": {"X": 0, "Y": 0, "Z": 0},
///         "Rotation": {"X": 0, "Y": 0, "Z": 0},
///         "Scale": {"X": 1, "Y": 1, "Z": 1},
///         "ModelName": "crate.obj",
///         "UseOverrides": false,
///         "Roughness": 1.5
///     }]
/// }"#;
///
/// let config = CheckConfig::new().with_generation(Generation::Legacy);
/// let report = check(source, &config).unwrap();
/// assert!(!report.is_valid());
/// assert_eq!(report.violations[0].path.to_string(), "$.Models[0].Roughness");
/// ```
pub fn check(source: &str, config: &CheckConfig) -> Result<CheckReport, CheckError> {
    let document = parse(source)?;
    debug!(generation = %config.generation, "parsed document");

    let validator = SchemaValidator::for_generation(config.generation)?;
    let mut violations = validator.validate(&document);
    debug!(count = violations.len(), "schema validation finished");

    let mut template = None;
    if !violations.iter().any(Violation::is_error) {
        match decode(&document, config.generation) {
            Ok(decoded) => {
                if config.semantic_checks {
                    let found = validate::semantic::check(&decoded, &document);
                    debug!(count = found.len(), "semantic checks finished");
                    violations.extend(found);
                }
                template = Some(decoded);
            }
            Err(e) => {
                warn!(error = %e, "document passed the schema but does not decode");
                violations.push(Violation::new(
                    JsonPath::root(),
                    document.span.clone(),
                    ViolationKind::Decode {
                        message: e.to_string(),
                    },
                ));
            }
        }
    }

    let (mut omitted, mut omitted_errors) = (0, 0);
    if let Some(max) = config.max_violations {
        if violations.len() > max {
            let dropped = violations.split_off(max);
            omitted = dropped.len();
            omitted_errors = dropped.iter().filter(|v| v.is_error()).count();
        }
    }

    let report = CheckReport {
        generation: config.generation,
        template,
        violations,
        omitted,
        omitted_errors,
        warnings_as_errors: config.warnings_as_errors,
    };
    info!(
        valid = report.is_valid(),
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "checked template"
    );
    Ok(report)
}

/// Load a typed template, failing with every error found
///
/// Warnings do not prevent loading.
pub fn load(source: &str, generation: Generation) -> Result<Template, CheckError> {
    let config = CheckConfig::new().with_generation(generation);
    let report = check(source, &config)?;
    let errors: Vec<Violation> = report.errors().cloned().collect();
    match report.template {
        Some(template) if errors.is_empty() => Ok(template),
        _ => Err(CheckError::Invalid(errors)),
    }
}

/// The document with every default written out
pub fn normalize(source: &str, generation: Generation) -> Result<serde_json::Value, CheckError> {
    let template = load(source, generation)?;
    Ok(serde_json::to_value(&template)?)
}
