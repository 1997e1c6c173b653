//! JSON grammar using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::lexer::Token;
use super::node::{Node, NodeKind, Spanned};
use crate::error::{ParseError, Span};

/// Deepest array/object nesting accepted
pub const MAX_DEPTH: usize = 64;

/// Parse a JSON document into a spanned tree
///
/// Documents nested deeper than [`MAX_DEPTH`] are rejected before parsing.
pub fn parse(input: &str) -> Result<Node, Vec<ParseError>> {
    let len = input.len();

    let (tokens, invalid) = super::lexer::lex(input);
    let lex_errors: Vec<ParseError> = invalid
        .into_iter()
        .map(|span| ParseError::invalid_token(&input[span.clone()], span))
        .collect();

    if let Some(span) = too_deep(&tokens, MAX_DEPTH) {
        return Err(vec![ParseError::TooDeep {
            span,
            limit: MAX_DEPTH,
        }]);
    }

    let token_stream = Stream::from_iter(tokens.into_iter().map(|(tok, span)| (tok, span.into())))
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let result = document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(ParseError::from).collect::<Vec<_>>());

    match result {
        Ok(node) if lex_errors.is_empty() => Ok(node),
        Ok(_) => Err(lex_errors),
        Err(mut errors) => {
            let mut all = lex_errors;
            all.append(&mut errors);
            all.sort_by_key(|e| e.span().start);
            Err(all)
        }
    }
}

/// Span of the first bracket or brace opened past `limit` levels
fn too_deep(tokens: &[(Token, Span)], limit: usize) -> Option<Span> {
    let mut depth = 0usize;
    for (token, span) in tokens {
        match token {
            Token::BracketOpen | Token::BraceOpen => {
                depth += 1;
                if depth > limit {
                    return Some(span.clone());
                }
            }
            Token::BracketClose | Token::BraceClose => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Node, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let value = recursive(|value| {
        let scalar = select! {
            Token::Null => NodeKind::Null,
            Token::True => NodeKind::Bool(true),
            Token::False => NodeKind::Bool(false),
            Token::Number(n) => NodeKind::Number(n),
            Token::String(s) => NodeKind::String(s),
        };

        let array = value
            .clone()
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
            .map(NodeKind::Array);

        let key = select! {
            Token::String(s) => s,
        }
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

        let member = key.then_ignore(just(Token::Colon)).then(value);

        let object = member
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(Token::BraceOpen), just(Token::BraceClose))
            .map(NodeKind::Object);

        choice((scalar, array, object)).map_with(|kind, e| Node::new(kind, span_range(&e.span())))
    });

    value.then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("null").unwrap().kind, NodeKind::Null);
        assert_eq!(parse("true").unwrap().kind, NodeKind::Bool(true));
        assert_eq!(parse("-1.5").unwrap().kind, NodeKind::Number(-1.5));
        assert_eq!(
            parse(r#""Dice""#).unwrap().kind,
            NodeKind::String("Dice".to_string())
        );
    }

    #[test]
    fn test_parse_object_spans() {
        let src = r#"{"Range": 0.5, "Tags": ["a", "b"]}"#;
        let doc = parse(src).expect("Should parse");
        assert_eq!(doc.span, 0..src.len());

        let range = doc.field("Range").expect("Range present");
        assert_eq!(&src[range.span.clone()], "0.5");

        let key = doc.key("Tags").expect("Tags key");
        assert_eq!(&src[key.span.clone()], r#""Tags""#);

        let tags = doc.field("Tags").expect("Tags present");
        assert_eq!(&src[tags.span.clone()], r#"["a", "b"]"#);
        assert_eq!(&src[tags.index(1).unwrap().span.clone()], r#""b""#);
    }

    #[test]
    fn test_parse_nested_empty() {
        let doc = parse(r#"{"A": {}, "B": [[], {}]}"#).expect("Should parse");
        assert_eq!(doc.field("A").unwrap().kind, NodeKind::Object(vec![]));
        assert!(matches!(doc.field("B").unwrap().kind, NodeKind::Array(ref items) if items.len() == 2));
    }

    #[test]
    fn test_trailing_comma_rejected() {
        assert!(parse(r#"{"A": 1,}"#).is_err());
        assert!(parse("[1, 2,]").is_err());
    }

    #[test]
    fn test_missing_colon_error_span() {
        let errors = parse(r#"{"A" 1}"#).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(5..6));
    }

    #[test]
    fn test_trailing_content_rejected() {
        assert!(parse("{} {}").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let errors = parse(&"[".repeat(200_000)).unwrap_err();
        assert_eq!(
            errors,
            vec![ParseError::TooDeep {
                span: MAX_DEPTH..MAX_DEPTH + 1,
                limit: MAX_DEPTH,
            }]
        );
    }

    #[test]
    fn test_nesting_counts_objects_and_arrays() {
        let mut src = String::new();
        for _ in 0..MAX_DEPTH / 2 {
            src.push_str(r#"{"A": ["#);
        }
        src.push_str("null");
        for _ in 0..MAX_DEPTH / 2 {
            src.push_str("]}");
        }
        assert!(parse(&src).is_ok());

        let deeper = format!("[{}]", src);
        let errors = parse(&deeper).unwrap_err();
        assert!(matches!(errors[0], ParseError::TooDeep { .. }));
    }

    #[test]
    fn test_invalid_character_reported() {
        let errors = parse(r#"{"A": 1} #"#).unwrap_err();
        assert!(errors.iter().any(|e| e.span() == &(9..10)));
    }
}
