//! Violations found while checking a template document

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::document::node::JsonPath;
use crate::error::Span;

/// How serious a violation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The constraint a value broke
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViolationKind {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("{value} is less than the minimum of {minimum}")]
    BelowMinimum { value: f64, minimum: f64 },

    #[error("{value} is greater than the maximum of {maximum}")]
    AboveMaximum { value: f64, maximum: f64 },

    #[error("{value} must be greater than {bound}")]
    NotAboveBound { value: f64, bound: f64 },

    #[error("{value} must be less than {bound}")]
    NotBelowBound { value: f64, bound: f64 },

    #[error("expected at least {minimum} item(s), found {len}")]
    TooFewItems { len: usize, minimum: u64 },

    #[error("expected at most {maximum} item(s), found {len}")]
    TooManyItems { len: usize, maximum: u64 },

    #[error("{found} is not one of {}", allowed.join(", "))]
    NotInEnum { found: String, allowed: Vec<String> },

    #[error("expected {expected}, found {found}")]
    ConstMismatch { expected: String, found: String },

    #[error("unknown {field} {found} (expected one of {})", known.join(", "))]
    UnknownVariant {
        field: String,
        found: String,
        known: Vec<String>,
    },

    #[error("unexpected field '{field}'")]
    UnexpectedField { field: String },

    #[error("value does not match any allowed shape")]
    NoMatchingShape,

    #[error("value matches {matches} alternative shapes, expected exactly one")]
    AmbiguousShape { matches: usize },

    #[error("direction vector must not be zero")]
    ZeroVector,

    #[error("atlas index {index} is outside the {len}-cell texture atlas")]
    AtlasIndexOutOfRange { index: i64, len: u64 },

    #[error("card name key '{key}' is not an integer")]
    NonIntegerKey { key: String },

    #[error("{field} must not be empty for {object_type} templates")]
    EmptyList { field: String, object_type: String },

    #[error("'{value}' is not a 32 character hexadecimal id")]
    MalformedId { value: String },

    #[error("document does not decode: {message}")]
    Decode { message: String },
}

impl ViolationKind {
    /// Severity this kind is reported with
    pub fn severity(&self) -> Severity {
        match self {
            ViolationKind::MalformedId { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable short name of the constraint
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingField { .. } => "required",
            ViolationKind::TypeMismatch { .. } => "type",
            ViolationKind::BelowMinimum { .. } => "minimum",
            ViolationKind::AboveMaximum { .. } => "maximum",
            ViolationKind::NotAboveBound { .. } => "exclusive-minimum",
            ViolationKind::NotBelowBound { .. } => "exclusive-maximum",
            ViolationKind::TooFewItems { .. } => "min-items",
            ViolationKind::TooManyItems { .. } => "max-items",
            ViolationKind::NotInEnum { .. } => "enum",
            ViolationKind::ConstMismatch { .. } => "const",
            ViolationKind::UnknownVariant { .. } => "discriminator",
            ViolationKind::UnexpectedField { .. } => "additional-properties",
            ViolationKind::NoMatchingShape => "any-of",
            ViolationKind::AmbiguousShape { .. } => "one-of",
            ViolationKind::ZeroVector => "zero-vector",
            ViolationKind::AtlasIndexOutOfRange { .. } => "atlas-index",
            ViolationKind::NonIntegerKey { .. } => "card-name-key",
            ViolationKind::EmptyList { .. } => "non-empty",
            ViolationKind::MalformedId { .. } => "id-format",
            ViolationKind::Decode { .. } => "decode",
        }
    }
}

/// One broken constraint, located in the document
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: JsonPath,
    pub span: Span,
    pub severity: Severity,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(path: JsonPath, span: Span, kind: ViolationKind) -> Self {
        Self {
            path,
            span,
            severity: kind.severity(),
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

impl Serialize for Violation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("Violation", 6)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("severity", &self.severity)?;
        s.serialize_field("constraint", self.kind.code())?;
        s.serialize_field("message", &self.kind.to_string())?;
        s.serialize_field("start", &self.span.start)?;
        s.serialize_field("end", &self.span.end)?;
        s.end()
    }
}

/// Render a JSON value compactly for messages
pub(crate) fn describe_value(value: &serde_json::Value) -> String {
    value.to_string()
}
