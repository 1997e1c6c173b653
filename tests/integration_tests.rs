//! Integration tests over the template fixtures
//!
//! Every fixture is a fully populated template of one concrete type. Each
//! must check clean, and its normalized form must check clean again.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tabletop_templates::model::current::{CardShape, CardModel, SnapPointRotation};
use tabletop_templates::model::{CollisionDetails, ObjectType};
use tabletop_templates::{
    check, load, normalize, CheckConfig, Generation, ObjectTemplate, Template,
};

fn fixture(generation: &str, name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(generation)
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e))
}

fn fixtures(generation: &str) -> Vec<(String, String)> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(generation);
    let mut found = Vec::new();
    for entry in fs::read_dir(&dir).expect("Failed to read fixtures directory") {
        let path = entry.expect("Failed to read entry").path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            let source = fs::read_to_string(&path).expect("Failed to read fixture");
            found.push((name, source));
        }
    }
    found.sort();
    found
}

fn assert_clean(source: &str, generation: Generation, name: &str) {
    let config = CheckConfig::new().with_generation(generation);
    let report = check(source, &config).expect("Should parse");
    let messages: Vec<String> = report.violations.iter().map(|v| v.to_string()).collect();
    assert_eq!(messages, Vec::<String>::new(), "violations in {}", name);
    assert!(report.is_valid());
    assert!(report.template.is_some());
}

#[test]
fn test_current_fixtures_are_valid() {
    let all = fixtures("current");
    assert_eq!(all.len(), 7, "one fixture per concrete template type");
    for (name, source) in &all {
        assert_clean(source, Generation::Current, name);
    }
}

#[test]
fn test_legacy_fixtures_are_valid() {
    for (name, source) in fixtures("legacy") {
        assert_clean(&source, Generation::Legacy, &name);
    }
}

#[test]
fn test_normalized_round_trip() {
    let cases = fixtures("current")
        .into_iter()
        .map(|(name, source)| (name, source, Generation::Current))
        .chain(
            fixtures("legacy")
                .into_iter()
                .map(|(name, source)| (name, source, Generation::Legacy)),
        );

    for (name, source, generation) in cases {
        let normalized = normalize(&source, generation).expect("Should normalize");
        let text = serde_json::to_string_pretty(&normalized).unwrap();
        assert_clean(&text, generation, &name);

        // Normalizing is idempotent
        let again = normalize(&text, generation).expect("Should normalize again");
        assert_eq!(again, normalized, "normalize changed {}", name);
    }
}

#[test]
fn test_every_concrete_type_decodes() {
    let mut types: Vec<ObjectType> = fixtures("current")
        .iter()
        .map(|(_, source)| load(source, Generation::Current).expect("Should load").object_type())
        .collect();
    types.sort_by_key(|t| t.as_str());
    assert_eq!(
        types,
        vec![
            ObjectType::Card,
            ObjectType::CardHolder,
            ObjectType::Figure,
            ObjectType::Container,
            ObjectType::Dice,
            ObjectType::Generic,
            ObjectType::Multistate,
        ]
    );
}

#[test]
fn test_generic_fixture_contents() {
    let template = load(&fixture("current", "generic.json"), Generation::Current).unwrap();
    let Template::Current(ObjectTemplate::Generic(base)) = template else {
        panic!("Expected a generic template");
    };
    assert_eq!(base.name, "Wooden Crate");

    let points = base.snap_points.expect("snap points");
    assert_eq!(points[0].snap_rotation.mode(), SnapPointRotation::RotateNoFlip);
    assert!(points[0].accepts(&["token"]));
    assert_eq!(points[1].range, 1.0);
    assert_eq!(points[1].snap_rotation.mode(), SnapPointRotation::NoChange);
    assert!(points[1].accepts(&["anything"]));

    let collision = base.collision.expect("collision");
    assert!(matches!(collision[0], CollisionDetails::Convex(_)));
    match &collision[1] {
        CollisionDetails::Sphere(sphere) => assert_eq!(sphere.radius, 0.5),
        other => panic!("Expected sphere, got {:?}", other),
    }
}

#[test]
fn test_card_fixture_contents() {
    let template = load(&fixture("current", "card.json"), Generation::Current).unwrap();
    let Template::Current(ObjectTemplate::Card(card)) = template else {
        panic!("Expected a card template");
    };
    assert_eq!(card.atlas_len(), 52);
    assert_eq!(card.card_name(51), Some("King of Hearts"));
    assert_eq!(card.model, CardShape::Standard(CardModel::Rounded));
}

#[test]
fn test_legacy_defaults_filled() {
    let value = normalize(&fixture("legacy", "generic.json"), Generation::Legacy).unwrap();
    assert_eq!(value["SnapPoints"][1]["Range"], serde_json::json!(1.0));
    assert_eq!(value["Models"][0]["Metallic"], serde_json::json!(0.0));
    assert_eq!(value["Models"][0]["Roughness"], serde_json::json!(1.0));
}

#[test]
fn test_legacy_dice_fixture_contents() {
    let template = load(&fixture("legacy", "dice.json"), Generation::Legacy).unwrap();
    let Template::Legacy(dice) = template else {
        panic!("Expected a legacy template");
    };
    assert_eq!(dice.object_type, ObjectType::Dice);
    assert_eq!(dice.template_name, "Marble D6");

    let points = dice.snap_points.expect("snap points");
    assert_eq!(points[0].range, 0.5);
    assert!(points[0].snap_rotation);
    assert_eq!(points[1].range, 1.0);
    assert!(!points[1].snap_rotation);

    let collisions = dice.collisions.expect("collisions");
    assert_eq!(collisions.len(), 3);
    assert!(matches!(collisions[0], CollisionDetails::Convex(_)));
    let radii: Vec<f64> = collisions
        .iter()
        .filter_map(|c| match c {
            CollisionDetails::Sphere(sphere) => Some(sphere.radius),
            CollisionDetails::Convex(_) => None,
        })
        .collect();
    assert_eq!(radii, vec![0.9, 1.0]);
    assert_eq!(collisions[2].offset(), None);
}

#[test]
fn test_fixture_checked_against_wrong_generation() {
    let config = CheckConfig::new().with_generation(Generation::Legacy);
    let report = check(&fixture("current", "dice.json"), &config).unwrap();
    assert!(!report.is_valid());
    let missing: Vec<String> = report
        .violations
        .iter()
        .filter(|v| v.kind.code() == "required")
        .map(|v| v.to_string())
        .collect();
    assert_eq!(
        missing,
        vec![
            "$: missing required field 'TemplateId'".to_string(),
            "$: missing required field 'TemplateName'".to_string(),
        ]
    );
}
