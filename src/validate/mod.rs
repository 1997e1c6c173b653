//! Document checking: schema validation plus semantic checks

pub mod schema_check;
pub mod semantic;
pub mod violation;

pub use schema_check::SchemaValidator;
pub use violation::{Severity, Violation, ViolationKind};
