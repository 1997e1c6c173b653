//! Checks a spanned document against a generated JSON Schema
//!
//! Covers the subset of draft-07 the generator emits: `$ref`, `allOf`,
//! `anyOf`, `oneOf`, `type`, `enum`, `const`, numeric bounds, item counts,
//! `items`, `required`, `properties` and `additionalProperties`. Every
//! violation is collected; checking never stops at the first one.

use serde_json::Value;
use tracing::warn;

use crate::document::node::{is_integral, JsonPath, Node, NodeKind, PathSegment};
use crate::model::Generation;
use crate::schema;

use super::violation::{describe_value, Violation, ViolationKind};

/// Validator for one generated schema
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Value,
}

/// A `oneOf` whose branches are told apart by one tagged property
struct Discriminator<'s> {
    field: String,
    branches: Vec<(&'s Value, &'s Value)>,
}

impl SchemaValidator {
    /// Validator for the schema of a generation
    pub fn for_generation(generation: Generation) -> Result<Self, serde_json::Error> {
        Ok(Self::from_schema(schema::to_json(generation)?))
    }

    /// Validator for an arbitrary schema document
    pub fn from_schema(schema: Value) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Check a document, returning every violation found
    pub fn validate(&self, node: &Node) -> Vec<Violation> {
        let mut out = Vec::new();
        let mut path = JsonPath::root();
        self.check(&self.schema, node, &mut path, &mut out);
        out
    }

    fn resolve<'s>(&'s self, reference: &str) -> Option<&'s Value> {
        let pointer = reference.strip_prefix('#')?;
        self.schema.pointer(pointer)
    }

    fn check(&self, schema: &Value, node: &Node, path: &mut JsonPath, out: &mut Vec<Violation>) {
        let keywords = match schema {
            Value::Bool(true) => return,
            Value::Bool(false) => {
                out.push(Violation::new(path.clone(), node.span.clone(), ViolationKind::NoMatchingShape));
                return;
            }
            Value::Object(keywords) => keywords,
            _ => return,
        };

        if let Some(types) = keywords.get("type") {
            if !type_matches(types, &node.kind) {
                out.push(Violation::new(
                    path.clone(),
                    node.span.clone(),
                    ViolationKind::TypeMismatch {
                        expected: describe_types(types),
                        found: node.kind.type_name().to_string(),
                    },
                ));
                return;
            }
        }

        if let Some(reference) = keywords.get("$ref").and_then(Value::as_str) {
            match self.resolve(reference) {
                Some(target) => self.check(target, node, path, out),
                None => warn!(reference, "unresolved schema reference"),
            }
        }

        if let Some(all_of) = keywords.get("allOf").and_then(Value::as_array) {
            for branch in all_of {
                self.check(branch, node, path, out);
            }
        }

        if let Some(any_of) = keywords.get("anyOf").and_then(Value::as_array) {
            self.check_any_of(any_of, node, path, out);
        }

        if let Some(one_of) = keywords.get("oneOf").and_then(Value::as_array) {
            self.check_one_of(one_of, node, path, out);
        }

        if let Some(allowed) = keywords.get("enum").and_then(Value::as_array) {
            if !allowed.iter().any(|v| node.equals(v)) {
                out.push(Violation::new(
                    path.clone(),
                    node.span.clone(),
                    ViolationKind::NotInEnum {
                        found: describe_value(&node.to_value()),
                        allowed: allowed.iter().map(describe_value).collect(),
                    },
                ));
            }
        }

        if let Some(expected) = keywords.get("const") {
            if !node.equals(expected) {
                out.push(Violation::new(
                    path.clone(),
                    node.span.clone(),
                    ViolationKind::ConstMismatch {
                        expected: describe_value(expected),
                        found: describe_value(&node.to_value()),
                    },
                ));
            }
        }

        match &node.kind {
            NodeKind::Number(n) => check_number(keywords, *n, node, path, out),
            NodeKind::Array(items) => self.check_array(keywords, items, node, path, out),
            NodeKind::Object(_) => self.check_object(keywords, node, path, out),
            _ => {}
        }
    }

    fn check_array(
        &self,
        keywords: &serde_json::Map<String, Value>,
        items: &[Node],
        node: &Node,
        path: &mut JsonPath,
        out: &mut Vec<Violation>,
    ) {
        if let Some(minimum) = keywords.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < minimum {
                out.push(Violation::new(
                    path.clone(),
                    node.span.clone(),
                    ViolationKind::TooFewItems {
                        len: items.len(),
                        minimum,
                    },
                ));
            }
        }
        if let Some(maximum) = keywords.get("maxItems").and_then(Value::as_u64) {
            if (items.len() as u64) > maximum {
                out.push(Violation::new(
                    path.clone(),
                    node.span.clone(),
                    ViolationKind::TooManyItems {
                        len: items.len(),
                        maximum,
                    },
                ));
            }
        }

        match keywords.get("items") {
            Some(Value::Array(positional)) => {
                for (index, (item, item_schema)) in items.iter().zip(positional).enumerate() {
                    path.push(PathSegment::Index(index));
                    self.check(item_schema, item, path, out);
                    path.pop();
                }
            }
            Some(item_schema) => {
                for (index, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    self.check(item_schema, item, path, out);
                    path.pop();
                }
            }
            None => {}
        }
    }

    fn check_object(
        &self,
        keywords: &serde_json::Map<String, Value>,
        node: &Node,
        path: &mut JsonPath,
        out: &mut Vec<Violation>,
    ) {
        let NodeKind::Object(members) = &node.kind else {
            return;
        };

        if let Some(required) = keywords.get("required").and_then(Value::as_array) {
            for field in required.iter().filter_map(Value::as_str) {
                if node.field(field).is_none() {
                    out.push(Violation::new(
                        path.clone(),
                        node.span.clone(),
                        ViolationKind::MissingField {
                            field: field.to_string(),
                        },
                    ));
                }
            }
        }

        let properties = keywords.get("properties").and_then(Value::as_object);
        let additional = keywords.get("additionalProperties");

        for (position, (key, value)) in members.iter().enumerate() {
            // Later duplicates win, as they do when decoding
            if members[position + 1..].iter().any(|(k, _)| k.node == key.node) {
                continue;
            }
            path.push(PathSegment::Key(key.node.clone()));
            match properties.and_then(|p| p.get(&key.node)) {
                Some(property_schema) => self.check(property_schema, value, path, out),
                None => match additional {
                    Some(Value::Bool(false)) => out.push(Violation::new(
                        path.clone(),
                        key.span.clone(),
                        ViolationKind::UnexpectedField {
                            field: key.node.clone(),
                        },
                    )),
                    Some(schema @ Value::Object(_)) => self.check(schema, value, path, out),
                    _ => {}
                },
            }
            path.pop();
        }
    }

    /// Valid when any branch is; otherwise report the closest branch
    fn check_any_of(
        &self,
        branches: &[Value],
        node: &Node,
        path: &mut JsonPath,
        out: &mut Vec<Violation>,
    ) {
        let mut closest: Option<((bool, usize), Vec<Violation>)> = None;
        for branch in branches {
            let mut attempt = Vec::new();
            self.check(branch, node, path, &mut attempt);
            if attempt.is_empty() {
                return;
            }
            let rank = (mismatches_here(&attempt, path), attempt.len());
            if closest.as_ref().map_or(true, |(best, _)| rank < *best) {
                closest = Some((rank, attempt));
            }
        }
        match closest {
            Some((_, mut violations)) => out.append(&mut violations),
            None => out.push(Violation::new(path.clone(), node.span.clone(), ViolationKind::NoMatchingShape)),
        }
    }

    /// Exactly one branch must hold. Tagged unions dispatch on their tag.
    fn check_one_of(
        &self,
        branches: &[Value],
        node: &Node,
        path: &mut JsonPath,
        out: &mut Vec<Violation>,
    ) {
        if let Some(discriminator) = self.discriminator(branches) {
            self.check_tagged(&discriminator, node, path, out);
            return;
        }

        let mut matches = 0;
        let mut closest: Option<((bool, usize), Vec<Violation>)> = None;
        for branch in branches {
            let mut attempt = Vec::new();
            self.check(branch, node, path, &mut attempt);
            if attempt.is_empty() {
                matches += 1;
                continue;
            }
            let rank = (mismatches_here(&attempt, path), attempt.len());
            if closest.as_ref().map_or(true, |(best, _)| rank < *best) {
                closest = Some((rank, attempt));
            }
        }
        match (matches, closest) {
            (1, _) => {}
            (0, Some((_, mut violations))) => out.append(&mut violations),
            (0, None) => out.push(Violation::new(path.clone(), node.span.clone(), ViolationKind::NoMatchingShape)),
            (matches, _) => out.push(Violation::new(
                path.clone(),
                node.span.clone(),
                ViolationKind::AmbiguousShape { matches },
            )),
        }
    }

    fn check_tagged(
        &self,
        discriminator: &Discriminator<'_>,
        node: &Node,
        path: &mut JsonPath,
        out: &mut Vec<Violation>,
    ) {
        if !matches!(node.kind, NodeKind::Object(_)) {
            out.push(Violation::new(
                path.clone(),
                node.span.clone(),
                ViolationKind::TypeMismatch {
                    expected: "object".to_string(),
                    found: node.kind.type_name().to_string(),
                },
            ));
            return;
        }

        let Some(tag) = node.field(&discriminator.field) else {
            out.push(Violation::new(
                path.clone(),
                node.span.clone(),
                ViolationKind::MissingField {
                    field: discriminator.field.clone(),
                },
            ));
            return;
        };

        match discriminator.branches.iter().find(|(value, _)| tag.equals(value)) {
            Some((_, branch)) => self.check(branch, node, path, out),
            None => out.push(Violation::new(
                path.key(discriminator.field.clone()),
                tag.span.clone(),
                ViolationKind::UnknownVariant {
                    field: discriminator.field.clone(),
                    found: describe_value(&tag.to_value()),
                    known: discriminator
                        .branches
                        .iter()
                        .map(|(value, _)| describe_value(value))
                        .collect(),
                },
            )),
        }
    }

    /// Find a property every branch pins to a single distinct value
    fn discriminator<'s>(&'s self, branches: &'s [Value]) -> Option<Discriminator<'s>> {
        let per_branch: Vec<Vec<(&'s str, &'s Value)>> = branches
            .iter()
            .map(|branch| {
                let mut tags = Vec::new();
                self.collect_tags(branch, 0, &mut tags);
                tags
            })
            .collect();

        let first = per_branch.first()?;
        let mut candidates: Vec<&str> = first
            .iter()
            .map(|(field, _)| *field)
            .filter(|field| {
                per_branch
                    .iter()
                    .all(|tags| tags.iter().any(|(f, _)| f == field))
            })
            .collect();
        // Prefer the conventional tag name when several qualify
        candidates.sort_by_key(|field| *field != "Type");
        let field = *candidates.first()?;

        let pinned: Vec<(&'s Value, &'s Value)> = per_branch
            .iter()
            .zip(branches)
            .filter_map(|(tags, branch)| {
                tags.iter()
                    .find(|(f, _)| *f == field)
                    .map(|(_, value)| (*value, branch))
            })
            .collect();

        let distinct = pinned
            .iter()
            .enumerate()
            .all(|(i, (a, _))| pinned[i + 1..].iter().all(|(b, _)| a != b));
        if !distinct {
            return None;
        }

        Some(Discriminator {
            field: field.to_string(),
            branches: pinned,
        })
    }

    /// Required properties pinned to one value, looking through `$ref` and `allOf`
    fn collect_tags<'s>(&'s self, schema: &'s Value, depth: usize, tags: &mut Vec<(&'s str, &'s Value)>) {
        if depth > 8 {
            return;
        }
        let Some(keywords) = schema.as_object() else {
            return;
        };

        let required: Vec<&str> = keywords
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        if let Some(properties) = keywords.get("properties").and_then(Value::as_object) {
            for (name, property) in properties {
                if !required.contains(&name.as_str()) {
                    continue;
                }
                if let Some(value) = pinned_value(property) {
                    tags.push((name.as_str(), value));
                }
            }
        }

        if let Some(target) = keywords
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| self.resolve(r))
        {
            self.collect_tags(target, depth + 1, tags);
        }

        if let Some(all_of) = keywords.get("allOf").and_then(Value::as_array) {
            for branch in all_of {
                self.collect_tags(branch, depth + 1, tags);
            }
        }
    }
}

/// The single value a property schema allows, if it allows exactly one
fn pinned_value(property: &Value) -> Option<&Value> {
    if let Some(value) = property.get("const") {
        return Some(value);
    }
    match property.get("enum").and_then(Value::as_array) {
        Some(values) if values.len() == 1 => values.first(),
        _ => None,
    }
}

fn mismatches_here(violations: &[Violation], path: &JsonPath) -> bool {
    violations
        .iter()
        .any(|v| v.path == *path && matches!(v.kind, ViolationKind::TypeMismatch { .. }))
}

fn check_number(
    keywords: &serde_json::Map<String, Value>,
    n: f64,
    node: &Node,
    path: &JsonPath,
    out: &mut Vec<Violation>,
) {
    let bound = |name: &str| keywords.get(name).and_then(Value::as_f64);
    let mut push = |kind| out.push(Violation::new(path.clone(), node.span.clone(), kind));

    if let Some(minimum) = bound("minimum") {
        if n < minimum {
            push(ViolationKind::BelowMinimum { value: n, minimum });
        }
    }
    if let Some(maximum) = bound("maximum") {
        if n > maximum {
            push(ViolationKind::AboveMaximum { value: n, maximum });
        }
    }
    if let Some(limit) = bound("exclusiveMinimum") {
        if n <= limit {
            push(ViolationKind::NotAboveBound { value: n, bound: limit });
        }
    }
    if let Some(limit) = bound("exclusiveMaximum") {
        if n >= limit {
            push(ViolationKind::NotBelowBound { value: n, bound: limit });
        }
    }
}

fn type_matches(types: &Value, kind: &NodeKind) -> bool {
    let matches_one = |name: &str| match (name, kind) {
        ("integer", NodeKind::Number(n)) => is_integral(*n),
        ("number", NodeKind::Number(_)) => true,
        ("null", NodeKind::Null) => true,
        ("boolean", NodeKind::Bool(_)) => true,
        ("string", NodeKind::String(_)) => true,
        ("array", NodeKind::Array(_)) => true,
        ("object", NodeKind::Object(_)) => true,
        _ => false,
    };
    match types {
        Value::String(name) => matches_one(name),
        Value::Array(names) => names.iter().filter_map(Value::as_str).any(matches_one),
        _ => true,
    }
}

fn describe_types(types: &Value) -> String {
    match types {
        Value::String(name) => name.clone(),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" or "),
        other => other.to_string(),
    }
}
