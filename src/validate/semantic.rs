//! Checks on decoded templates that a JSON Schema cannot express.
//!
//! Runs after a document passed schema validation and decoded into a
//! [`Template`]. The spanned document is only consulted to locate findings.

use crate::document::node::{JsonPath, Node};
use crate::error::Span;
use crate::model::current::{CardTemplate, DiceTemplate, SnapPoint};
use crate::model::legacy::LegacySnapPoint;
use crate::model::{
    LegacyObjectTemplate, ModelDetails, MultistateModelDetails, ObjectTemplate, ObjectType,
    Template,
};

use super::violation::{Violation, ViolationKind};

/// Length of a template id in hexadecimal characters
const ID_LEN: usize = 32;

/// Run all semantic checks on a decoded template.
pub fn check(template: &Template, document: &Node) -> Vec<Violation> {
    let mut found = Findings {
        document,
        violations: Vec::new(),
    };
    match template {
        Template::Legacy(t) => check_legacy(t, &mut found),
        Template::Current(t) => check_current(t, &mut found),
    }
    found.violations
}

/// Violations collected so far, with the document used to locate them
struct Findings<'a> {
    document: &'a Node,
    violations: Vec<Violation>,
}

impl Findings<'_> {
    fn span_of(&self, path: &JsonPath) -> Span {
        self.document
            .get(path)
            .map(|node| node.span.clone())
            .unwrap_or_else(|| self.document.span.clone())
    }

    fn push(&mut self, path: JsonPath, kind: ViolationKind) {
        let span = self.span_of(&path);
        self.violations.push(Violation::new(path, span, kind));
    }

    /// Like `push`, but points at the key of the member instead of its value
    fn push_at_key(&mut self, path: JsonPath, kind: ViolationKind) {
        let mut parent = path.clone();
        let span = match (parent.pop(), path.last_key()) {
            (Some(_), Some(key)) => self
                .document
                .get(&parent)
                .and_then(|node| node.key(key))
                .map(|key| key.span.clone()),
            _ => None,
        }
        .unwrap_or_else(|| self.span_of(&path));
        self.violations.push(Violation::new(path, span, kind));
    }
}

fn check_legacy(template: &LegacyObjectTemplate, found: &mut Findings<'_>) {
    let root = JsonPath::root();
    check_id(&template.template_id, root.key("TemplateId"), found);
    check_models(template.object_type, &template.models, &root, found);
    if let Some(points) = &template.snap_points {
        check_legacy_snap_points(points, &root.key("SnapPoints"), found);
    }
}

fn check_current(template: &ObjectTemplate, found: &mut Findings<'_>) {
    let root = JsonPath::root();
    let base = template.base();
    check_id(&base.guid, root.key("GUID"), found);
    check_models(template.object_type(), &base.models, &root, found);
    if let Some(points) = &base.snap_points {
        check_snap_points(points, &root.key("SnapPoints"), found);
    }

    match template {
        ObjectTemplate::Card(card) => check_card(card, &root, found),
        ObjectTemplate::Dice(dice) => check_dice(dice, &root, found),
        ObjectTemplate::Multistate(multistate) => {
            let models = root.key("MultistateModels");
            for (i, model) in multistate.multistate_models.iter().enumerate() {
                check_multistate_model(model, &models.index(i), found);
            }
        }
        _ => {}
    }
}

// ── Identity ──────────────────────────────────────────────────────

fn check_id(id: &str, path: JsonPath, found: &mut Findings<'_>) {
    if id.len() != ID_LEN || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        found.push(
            path,
            ViolationKind::MalformedId {
                value: id.to_string(),
            },
        );
    }
}

// ── Models ────────────────────────────────────────────────────────

fn check_models(
    object_type: ObjectType,
    models: &[ModelDetails],
    root: &JsonPath,
    found: &mut Findings<'_>,
) {
    if models.is_empty() && object_type.renders_from_models() {
        found.push(
            root.key("Models"),
            ViolationKind::EmptyList {
                field: "Models".to_string(),
                object_type: object_type.to_string(),
            },
        );
    }
}

// ── Snap points ───────────────────────────────────────────────────

fn check_positive(value: f64, path: JsonPath, found: &mut Findings<'_>) {
    if value <= 0.0 {
        found.push(path, ViolationKind::NotAboveBound { value, bound: 0.0 });
    }
}

fn check_snap_points(points: &[SnapPoint], list: &JsonPath, found: &mut Findings<'_>) {
    for (i, point) in points.iter().enumerate() {
        let path = list.index(i);
        check_positive(point.range, path.key("Range"), found);
        check_positive(point.secondary_range, path.key("SecondaryRange"), found);
    }
}

fn check_legacy_snap_points(points: &[LegacySnapPoint], list: &JsonPath, found: &mut Findings<'_>) {
    for (i, point) in points.iter().enumerate() {
        check_positive(point.range, list.index(i).key("Range"), found);
    }
}

// ── Texture atlases ───────────────────────────────────────────────

fn check_atlas_indices(indices: &[u32], len: u64, list: &JsonPath, found: &mut Findings<'_>) {
    for (i, &index) in indices.iter().enumerate() {
        if u64::from(index) >= len {
            found.push(
                list.index(i),
                ViolationKind::AtlasIndexOutOfRange {
                    index: i64::from(index),
                    len,
                },
            );
        }
    }
}

/// Non-negative special indices address the atlas; negative ones are markers
fn check_atlas_marker(index: i32, len: u64, path: JsonPath, found: &mut Findings<'_>) {
    if let Ok(cell) = u64::try_from(index) {
        if cell >= len {
            found.push(
                path,
                ViolationKind::AtlasIndexOutOfRange {
                    index: i64::from(index),
                    len,
                },
            );
        }
    }
}

fn check_card(card: &CardTemplate, root: &JsonPath, found: &mut Findings<'_>) {
    let len = card.atlas_len();
    check_atlas_indices(&card.indices, len, &root.key("Indices"), found);
    check_atlas_marker(card.back_index, len, root.key("BackIndex"), found);
    check_atlas_marker(card.hidden_index, len, root.key("HiddenIndex"), found);

    let names = root.key("CardNames");
    for key in card.card_names.keys() {
        if key.parse::<u32>().is_err() {
            found.push_at_key(names.key(key.clone()), ViolationKind::NonIntegerKey { key: key.clone() });
        }
    }
}

fn check_multistate_model(model: &MultistateModelDetails, path: &JsonPath, found: &mut Findings<'_>) {
    let len = model.atlas_len();
    check_atlas_indices(&model.indices, len, &path.key("Indices"), found);
    check_atlas_marker(model.back_index, len, path.key("BackIndex"), found);
}

// ── Dice ──────────────────────────────────────────────────────────

fn check_dice(dice: &DiceTemplate, root: &JsonPath, found: &mut Findings<'_>) {
    let faces = root.key("Faces");
    for (i, face) in dice.faces.iter().enumerate() {
        if face.direction().is_zero() {
            found.push(faces.index(i), ViolationKind::ZeroVector);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;

    const GUID: &str = "0123456789ABCDEF0123456789ABCDEF";

    fn run(source: &str) -> Vec<Violation> {
        let node = parse(source).expect("Should parse");
        let template: ObjectTemplate = serde_json::from_value(node.to_value()).expect("Should decode");
        check(&Template::Current(template), &node)
    }

    fn current(ty: &str, models: &str, extra: &str) -> String {
        format!(
            r#"{{"Type": "{ty}", "GUID": "{GUID}", "Name": "T", "Metadata": "",
                "CollisionType": "Regular", "SurfaceType": "Wood",
                "Models": {models}, "Tags": []{extra}}}"#
        )
    }

    const MODEL: &str = r#"[{"Offset": {"X": 0, "Y": 0, "Z": 0}, "Rotation": {"X": 0, "Y": 0, "Z": 0},
        "Scale": {"X": 1, "Y": 1, "Z": 1}, "ModelName": "cube.obj", "UseOverrides": false}]"#;

    #[test]
    fn test_clean_generic() {
        assert!(run(&current("Generic", MODEL, "")).is_empty());
    }

    #[test]
    fn test_empty_models() {
        let v = run(&current("Container", "[]", ""));
        assert_eq!(v.len(), 1);
        insta::assert_snapshot!(v[0].to_string(), @"$.Models: Models must not be empty for Container templates");

        // Figures are drawn from their textures
        let figure = current("Cardboard Figure", "[]", r#", "FrontTexture": "hero.png""#);
        assert!(run(&figure).is_empty());
    }

    #[test]
    fn test_zero_dice_face() {
        let faces = r#", "Faces": [{"X": 0, "Y": 0, "Z": 1, "Name": "1"}, {"X": 0, "Y": 0, "Z": 0, "Name": "2"}]"#;
        let source = current("Dice", MODEL, faces);
        let v = run(&source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind, ViolationKind::ZeroVector);
        assert_eq!(v[0].path.to_string(), "$.Faces[1]");
        assert!(source[v[0].span.clone()].contains(r#""Name": "2""#));
    }

    #[test]
    fn test_card_atlas_bounds() {
        let extra = r#", "FrontTexture": "deck.png", "BackIndex": 6, "HiddenIndex": -2,
            "NumHorizontal": 3, "NumVertical": 2, "Indices": [0, 5, 6], "CardNames": {}"#;
        let v = run(&current("Card", "[]", extra));
        let paths: Vec<String> = v.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(paths, vec!["$.Indices[2]", "$.BackIndex"]);
        assert_eq!(v[0].kind, ViolationKind::AtlasIndexOutOfRange { index: 6, len: 6 });
    }

    #[test]
    fn test_card_name_keys() {
        let extra = r#", "FrontTexture": "deck.png", "BackIndex": -1, "HiddenIndex": -1,
            "Indices": [0], "CardNames": {"0": "Ace", "King": "K"}"#;
        let source = current("Card", "[]", extra);
        let v = run(&source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind.code(), "card-name-key");
        assert_eq!(&source[v[0].span.clone()], r#""King""#);
    }

    #[test]
    fn test_multistate_atlas() {
        let extra = r#", "MultistateModels": [{"Offset": {"X": 0, "Y": 0, "Z": 0},
            "Rotation": {"X": 0, "Y": 0, "Z": 0}, "Scale": {"X": 1, "Y": 1, "Z": 1},
            "ModelName": "dial.obj", "UseOverrides": false, "BackIndex": 4,
            "NumHorizontal": 2, "NumVertical": 2, "Indices": [0, 3]}]"#;
        let v = run(&current("Multistate Object", "[]", extra));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].path.to_string(), "$.MultistateModels[0].BackIndex");
    }

    #[test]
    fn test_malformed_guid_is_warning() {
        let source = current("Generic", MODEL, "").replace(GUID, "not-a-guid");
        let v = run(&source);
        assert_eq!(v.len(), 1);
        assert!(!v[0].is_error());
        assert_eq!(v[0].path.to_string(), "$.GUID");
    }

    #[test]
    fn test_legacy_checks() {
        let source = r#"{"Type": "Dice", "TemplateId": "abc", "TemplateName": "D",
            "CollisionType": "Regular", "SurfaceType": "Plastic", "Models": []}"#;
        let node = parse(source).expect("Should parse");
        let template: LegacyObjectTemplate = serde_json::from_value(node.to_value()).expect("Should decode");
        let v = check(&Template::Legacy(template), &node);
        let codes: Vec<&str> = v.iter().map(|v| v.kind.code()).collect();
        assert_eq!(codes, vec!["id-format", "non-empty"]);
    }
}
