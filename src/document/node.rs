//! Spanned JSON tree and field paths

use std::fmt;

use serde::Serialize;

use super::lexer::Span;

/// Value with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A JSON value with the byte range it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Node>),
    /// Members in document order; duplicate keys are kept
    Object(Vec<(Spanned<String>, Node)>),
}

impl NodeKind {
    /// JSON type name as used by JSON Schema `type`
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool(_) => "boolean",
            NodeKind::Number(n) if is_integral(*n) => "integer",
            NodeKind::Number(_) => "number",
            NodeKind::String(_) => "string",
            NodeKind::Array(_) => "array",
            NodeKind::Object(_) => "object",
        }
    }
}

/// Whether a number has no fractional part
pub fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}

/// Largest magnitude at which every integer is exactly representable in f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Last value for `key` when this node is an object
    pub fn field(&self, key: &str) -> Option<&Node> {
        match &self.kind {
            NodeKind::Object(members) => members
                .iter()
                .rev()
                .find(|(k, _)| k.node == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Key of `key` when this node is an object, with its span
    pub fn key(&self, key: &str) -> Option<&Spanned<String>> {
        match &self.kind {
            NodeKind::Object(members) => members.iter().rev().find(|(k, _)| k.node == key).map(|(k, _)| k),
            _ => None,
        }
    }

    pub fn index(&self, index: usize) -> Option<&Node> {
        match &self.kind {
            NodeKind::Array(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Node at `path`, starting from this node
    pub fn get(&self, path: &JsonPath) -> Option<&Node> {
        path.segments().iter().try_fold(self, |node, segment| match segment {
            PathSegment::Key(key) => node.field(key),
            PathSegment::Index(index) => node.index(*index),
        })
    }

    /// Convert to a `serde_json::Value` for typed decoding
    ///
    /// Integral numbers become JSON integers so that integer fields decode.
    /// Duplicate keys resolve to the last occurrence.
    pub fn to_value(&self) -> serde_json::Value {
        use serde_json::Value;
        match &self.kind {
            NodeKind::Null => Value::Null,
            NodeKind::Bool(b) => Value::Bool(*b),
            NodeKind::Number(n) => number_value(*n),
            NodeKind::String(s) => Value::String(s.clone()),
            NodeKind::Array(items) => Value::Array(items.iter().map(Node::to_value).collect()),
            NodeKind::Object(members) => {
                let mut map = serde_json::Map::new();
                for (key, value) in members {
                    map.insert(key.node.clone(), value.to_value());
                }
                Value::Object(map)
            }
        }
    }

    /// Structural equality with a plain JSON value (numbers compare numerically)
    pub fn equals(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match (&self.kind, value) {
            (NodeKind::Null, Value::Null) => true,
            (NodeKind::Bool(a), Value::Bool(b)) => a == b,
            (NodeKind::Number(a), Value::Number(b)) => b.as_f64() == Some(*a),
            (NodeKind::String(a), Value::String(b)) => a == b,
            (NodeKind::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (NodeKind::Object(_), Value::Object(b)) => {
                let keys = self.object_keys();
                keys.len() == b.len()
                    && b.iter()
                        .all(|(k, v)| self.field(k).is_some_and(|node| node.equals(v)))
            }
            _ => false,
        }
    }

    fn object_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = match &self.kind {
            NodeKind::Object(members) => members.iter().map(|(k, _)| k.node.as_str()).collect(),
            _ => Vec::new(),
        };
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

fn number_value(n: f64) -> serde_json::Value {
    if is_integral(n) && n.abs() <= MAX_SAFE_INTEGER {
        if n >= 0.0 {
            serde_json::Value::from(n as u64)
        } else {
            serde_json::Value::from(n as i64)
        }
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// One step of a [`JsonPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a document, displayed as `$.Models[0].Roughness`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// This path extended by an object key
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.0.push(PathSegment::Key(key.into()));
        path
    }

    /// This path extended by an array index
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(PathSegment::Index(index));
        path
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// Last key segment, if the path ends on an object member
    pub fn last_key(&self) -> Option<&str> {
        match self.0.last() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => write!(f, ".{}", key)?,
                PathSegment::Key(key) => write!(f, "[{:?}]", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Serialize for JsonPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(members: Vec<(&str, Node)>) -> Node {
        Node::new(
            NodeKind::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (Spanned::new(k.to_string(), 0..0), v))
                    .collect(),
            ),
            0..0,
        )
    }

    fn num(n: f64) -> Node {
        Node::new(NodeKind::Number(n), 0..0)
    }

    #[test]
    fn test_path_display() {
        let path = JsonPath::root().key("Models").index(0).key("Roughness");
        assert_eq!(path.to_string(), "$.Models[0].Roughness");
        assert_eq!(JsonPath::root().to_string(), "$");
        assert_eq!(JsonPath::root().key("0").to_string(), "$[\"0\"]");
    }

    #[test]
    fn test_get_follows_path() {
        let doc = obj(vec![(
            "Models",
            Node::new(NodeKind::Array(vec![obj(vec![("Roughness", num(0.5))])]), 0..0),
        )]);
        let path = JsonPath::root().key("Models").index(0).key("Roughness");
        assert_eq!(doc.get(&path).and_then(Node::as_f64), Some(0.5));
        assert!(doc.get(&JsonPath::root().key("Missing")).is_none());
    }

    #[test]
    fn test_to_value_integers() {
        assert_eq!(num(3.0).to_value(), serde_json::json!(3));
        assert_eq!(num(-3.0).to_value(), serde_json::json!(-3));
        assert_eq!(num(0.7).to_value(), serde_json::json!(0.7));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let doc = obj(vec![("A", num(1.0)), ("A", num(2.0))]);
        assert_eq!(doc.field("A").and_then(Node::as_f64), Some(2.0));
        assert_eq!(doc.to_value(), serde_json::json!({"A": 2}));
        assert!(doc.equals(&serde_json::json!({"A": 2})));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(num(1.0).kind.type_name(), "integer");
        assert_eq!(num(1.5).kind.type_name(), "number");
    }
}
