//! JSON Schema generation for both template generations
//!
//! The schema is derived from the typed model, so doc comments become
//! descriptions, serde defaults become `default`, and tagged enums become
//! `oneOf` unions pinned on `Type`.

use schemars::gen::SchemaSettings;
use schemars::schema::RootSchema;

use crate::model::{Generation, LegacyObjectTemplate, ObjectTemplate};

/// Build the draft-07 schema for a generation
pub fn generate(generation: Generation) -> RootSchema {
    let gen = SchemaSettings::draft07().into_generator();
    let mut root = match generation {
        Generation::Legacy => gen.into_root_schema_for::<LegacyObjectTemplate>(),
        Generation::Current => gen.into_root_schema_for::<ObjectTemplate>(),
    };
    let metadata = root.schema.metadata();
    metadata.title = Some(title(generation).to_owned());
    root
}

/// The schema for a generation as a JSON value
pub fn to_json(generation: Generation) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(generate(generation))
}

/// The schema for a generation as pretty-printed JSON text
pub fn to_string_pretty(generation: Generation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&generate(generation))
}

fn title(generation: Generation) -> &'static str {
    match generation {
        Generation::Legacy => "Object Template (legacy)",
        Generation::Current => "Object Template",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition<'a>(schema: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
        &schema["definitions"][name]
    }

    #[test]
    fn test_schema_is_deterministic() {
        let a = to_string_pretty(Generation::Current).unwrap();
        let b = to_string_pretty(Generation::Current).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_current_schema_has_union() {
        let schema = to_json(Generation::Current).unwrap();
        let variants = schema["oneOf"].as_array().expect("oneOf on root");
        assert_eq!(variants.len(), 7);
        assert_eq!(schema["title"], "Object Template");
    }

    #[test]
    fn test_snap_point_bounds_and_default() {
        let schema = to_json(Generation::Current).unwrap();
        let range = &definition(&schema, "SnapPoint")["properties"]["Range"];
        assert_eq!(range["minimum"].as_f64(), Some(0.1));
        assert_eq!(range["default"].as_f64(), Some(1.0));
    }

    #[test]
    fn test_integer_fields_have_upper_bounds() {
        let schema = to_json(Generation::Current).unwrap();
        let holder = &definition(&schema, "CardHolderTemplate")["properties"];
        assert_eq!(holder["MaxCards"]["maximum"].as_f64(), Some(4294967295.0));

        let card = &definition(&schema, "CardTemplate")["properties"];
        assert_eq!(card["BackIndex"]["minimum"].as_f64(), Some(-3.0));
        assert_eq!(card["BackIndex"]["maximum"].as_f64(), Some(2147483647.0));
        assert_eq!(card["Indices"]["minItems"].as_u64(), Some(1));
        assert_eq!(card["Indices"]["items"]["maximum"].as_f64(), Some(4294967295.0));
    }

    #[test]
    fn test_color_bounds() {
        let schema = to_json(Generation::Legacy).unwrap();
        let red = &definition(&schema, "Color")["properties"]["R"];
        assert_eq!(red["minimum"].as_f64(), Some(0.0));
        assert_eq!(red["maximum"].as_f64(), Some(1.0));
    }

    #[test]
    fn test_legacy_root_fields() {
        let schema = to_json(Generation::Legacy).unwrap();
        let props = &schema["properties"];
        assert!(props.get("TemplateId").is_some());
        assert!(props.get("GUID").is_none());
        assert_eq!(props["Friction"]["default"].as_f64(), Some(0.7));
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"TemplateId"));
        assert!(!required.contains(&"Friction"));
    }

    #[test]
    fn test_snap_point_shape_is_integer_enum() {
        let schema = to_json(Generation::Current).unwrap();
        let shape = definition(&schema, "SnapPointShape");
        assert_eq!(shape["type"], "integer");
        assert_eq!(shape["enum"], serde_json::json!([0, 1, 2]));
    }
}
