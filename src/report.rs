//! Outcome of checking one document

use ariadne::{Color, Config, Label, Report, ReportKind};
use serde::Serialize;

use crate::error::write_report;
use crate::model::{Generation, Template};
use crate::validate::{Severity, Violation};

/// Result of running the check pipeline over one document
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Generation the document was checked against
    pub generation: Generation,
    /// Decoded template, present when the document passed schema validation
    pub template: Option<Template>,
    /// Violations in the order they were found
    pub violations: Vec<Violation>,
    /// Violations dropped by the `max_violations` cap
    pub omitted: usize,
    /// How many of the dropped violations were errors
    pub omitted_errors: usize,
    /// Warnings count against validity
    pub warnings_as_errors: bool,
}

impl CheckReport {
    /// Whether the document is acceptable
    pub fn is_valid(&self) -> bool {
        if self.warnings_as_errors {
            self.violations.is_empty() && self.omitted == 0
        } else {
            self.errors().next().is_none() && self.omitted_errors == 0
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.is_error())
    }

    /// Render every violation against the source text, followed by a summary line
    pub fn render(&self, source: &str, filename: &str, color: bool) -> String {
        let mut out = String::new();
        for violation in &self.violations {
            out.push_str(&render_violation(violation, source, filename, color));
        }
        out.push_str(&self.summary(filename));
        out.push('\n');
        out
    }

    /// One-line outcome, e.g. `deck.json: 2 errors, 1 warning (current)`
    pub fn summary(&self, filename: &str) -> String {
        let errors = self.errors().count();
        let warnings = self.warnings().count();
        let mut line = if errors == 0 && warnings == 0 {
            format!("{}: valid ({})", filename, self.generation)
        } else {
            format!(
                "{}: {}, {} ({})",
                filename,
                plural(errors, "error"),
                plural(warnings, "warning"),
                self.generation
            )
        };
        if self.omitted > 0 {
            line.push_str(&format!(", {} more not shown", self.omitted));
        }
        line
    }

    /// Machine readable form of the report
    pub fn to_json(&self) -> serde_json::Value {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            valid: bool,
            generation: Generation,
            violations: &'a [Violation],
            omitted: usize,
        }

        serde_json::to_value(JsonReport {
            valid: self.is_valid(),
            generation: self.generation,
            violations: &self.violations,
            omitted: self.omitted,
        })
        .unwrap_or(serde_json::Value::Null)
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn render_violation(violation: &Violation, source: &str, filename: &str, color: bool) -> String {
    let (kind, label_color) = match violation.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
    };

    let report = Report::build(kind, filename, violation.span.start)
        .with_config(Config::default().with_color(color))
        .with_code(violation.kind.code())
        .with_message(format!("{}", violation.path))
        .with_label(
            Label::new((filename, violation.span.clone()))
                .with_message(violation.kind.to_string())
                .with_color(label_color),
        )
        .finish();

    write_report(report, source, filename).unwrap_or_else(|| format!("{}\n", violation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::JsonPath;
    use crate::validate::ViolationKind;

    fn report(violations: Vec<Violation>) -> CheckReport {
        CheckReport {
            generation: Generation::Current,
            template: None,
            violations,
            omitted: 0,
            omitted_errors: 0,
            warnings_as_errors: false,
        }
    }

    fn malformed_id() -> Violation {
        Violation::new(
            JsonPath::root().key("GUID"),
            9..14,
            ViolationKind::MalformedId {
                value: "abc".to_string(),
            },
        )
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut r = report(vec![malformed_id()]);
        assert!(r.is_valid());
        assert_eq!(r.warnings().count(), 1);

        r.warnings_as_errors = true;
        assert!(!r.is_valid());
    }

    #[test]
    fn test_summary() {
        let r = report(vec![
            malformed_id(),
            Violation::new(JsonPath::root().key("Faces").index(0), 20..30, ViolationKind::ZeroVector),
        ]);
        insta::assert_snapshot!(r.summary("dice.json"), @"dice.json: 1 error, 1 warning (current)");
        insta::assert_snapshot!(report(vec![]).summary("dice.json"), @"dice.json: valid (current)");
    }

    #[test]
    fn test_render_mentions_path_and_message() {
        let source = r#"{"GUID": "abc"}"#;
        let r = report(vec![malformed_id()]);
        let text = r.render(source, "t.json", false);
        assert!(text.contains("$.GUID"));
        assert!(text.contains("'abc' is not a 32 character hexadecimal id"));
        assert!(text.ends_with("t.json: 0 errors, 1 warning (current)\n"));
    }

    #[test]
    fn test_json_form() {
        let r = report(vec![malformed_id()]);
        let json = r.to_json();
        assert_eq!(json["valid"], serde_json::json!(true));
        assert_eq!(json["generation"], serde_json::json!("current"));
        assert_eq!(json["violations"][0]["constraint"], serde_json::json!("id-format"));
        assert_eq!(json["violations"][0]["severity"], serde_json::json!("warning"));
    }
}
