//! Error types for reading template documents

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::document::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("Invalid token at {span:?}: {text}")]
    InvalidToken { span: Span, text: String },

    #[error("Nesting too deep at {span:?}: more than {limit} levels")]
    TooDeep { span: Span, limit: usize },
}

impl ParseError {
    pub(crate) fn invalid_token(text: &str, span: Span) -> Self {
        ParseError::InvalidToken {
            span,
            text: text.to_string(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. }
            | ParseError::InvalidToken { span, .. }
            | ParseError::TooDeep { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str, color: bool) -> String {
        let (span, message, detail) = match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let detail = if expected.is_empty() {
                    message.clone()
                } else {
                    format!("{}\nExpected: {}", message, expected.join(", "))
                };
                (span.clone(), message.clone(), detail)
            }
            ParseError::InvalidToken { span, text } => {
                let message = format!("Invalid token {:?}", text);
                (span.clone(), message.clone(), message)
            }
            ParseError::TooDeep { span, limit } => (
                span.clone(),
                format!("Nesting deeper than {} levels", limit),
                "this array or object is nested too deeply".to_string(),
            ),
        };

        let report = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(color))
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(detail)
                    .with_color(Color::Red),
            )
            .finish();
        write_report(report, source, filename).unwrap_or_else(|| self.to_string())
    }
}

/// Write an ariadne report to a string, None if writing fails
pub(crate) fn write_report<'a>(
    report: Report<'_, (&'a str, Span)>,
    source: &str,
    filename: &'a str,
) -> Option<String> {
    let mut buf = Vec::new();
    report
        .write((filename, Source::from(source)), &mut buf)
        .ok()?;
    String::from_utf8(buf).ok()
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let mut expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();
        expected.sort();
        expected.dedup();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::String(s) => format!("string {:?}", s),
        Token::Number(n) => format!("number {}", n),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::Null => "'null'".to_string(),
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Colon => "':'".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_display() {
        let err = ParseError::invalid_token("@", 3..4);
        assert_eq!(err.to_string(), "Invalid token at 3..4: @");
        assert_eq!(err.span(), &(3..4));
    }

    #[test]
    fn test_format_contains_message() {
        let err = ParseError::Syntax {
            span: 5..6,
            message: "Unexpected number 1".to_string(),
            expected: vec!["':'".to_string()],
        };
        let text = err.format(r#"{"A" 1}"#, "card.json", false);
        assert!(text.contains("Unexpected number 1"));
        assert!(text.contains("card.json"));
        assert!(text.contains("Expected: ':'"));
    }

    #[test]
    fn test_too_deep_format() {
        let err = ParseError::TooDeep {
            span: 2..3,
            limit: 2,
        };
        assert_eq!(err.to_string(), "Nesting too deep at 2..3: more than 2 levels");
        let text = err.format("[[[]]]", "deep.json", false);
        assert!(text.contains("Nesting deeper than 2 levels"));
        assert!(text.contains("deep.json"));
    }
}
