//! Legacy schema generation (`TemplateId`/`TemplateName` documents)
//!
//! A single template shape for every object type; type-specific settings did
//! not exist yet and snap rotation was a plain flag.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::basic::{CollisionBehavior, Color, ObjectType, PhysicalSurface, Vector};
use super::components::{CollisionDetails, ModelDetails};
use super::defaults;

/// A single snap point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LegacySnapPoint {
    /// Position of the snap point relative to the position of its actor.
    pub position: Vector,

    /// Maximum range for snapping to this point.
    #[serde(default = "defaults::snap_range")]
    #[schemars(range(min = 0.1))]
    pub range: f64,

    /// Snap rotation relative to snapped-to object?
    pub snap_rotation: bool,

    /// Rotation offset when using rotation snapping
    pub rotation_offset: f64,
}

/// Template document of the legacy generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyObjectTemplate {
    /// Type of this template.
    #[serde(rename = "Type")]
    pub object_type: ObjectType,

    /// Unique ID of the template. A UUID with 32 hexadecimal characters, for example "123E4567E89B12D3A456426614174000"
    pub template_id: String,

    /// Name of the template, shown in object explorer.
    pub template_name: String,

    /// Default primary color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<Color>,

    /// Default secondary color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<Color>,

    /// Default metallic value
    #[serde(default = "defaults::metallic")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub metallic: f64,

    /// Default roughness value
    #[serde(default = "defaults::roughness")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub roughness: f64,

    /// Default script for all objects with this template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_name: Option<String>,

    /// Snap points of the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_points: Option<Vec<LegacySnapPoint>>,

    /// The collision type objects created from this template get by default.
    pub collision_type: CollisionBehavior,

    /// Friction value
    #[serde(default = "defaults::friction")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub friction: f64,

    /// Restitution (bounciness) value
    #[serde(default = "defaults::restitution")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub restitution: f64,

    /// Density value
    #[serde(default = "defaults::density")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub density: f64,

    /// Surface type, used for impact sounds.
    pub surface_type: PhysicalSurface,

    /// Details for the models of the template. Minimum length 1 for most object types.
    pub models: Vec<ModelDetails>,

    /// Details for the collision bodies of the template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collisions: Option<Vec<CollisionDetails>>,

    /// Flip the object when interacted with? Otherwise, it will be returned
    /// to its default rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flippable: Option<bool>,

    /// Path to Blueprint for this template. The Blueprint is only relevant for some default options in the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<String>,

    /// Direction from which the camera should view the object when zoomed. Default perspective and automatic rotation is used if zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_view_direction: Option<Vector>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "Type": "Generic",
        "TemplateId": "0123456789ABCDEF0123456789ABCDEF",
        "TemplateName": "Crate",
        "CollisionType": "Regular",
        "SurfaceType": "Wood",
        "Models": []
    }"#;

    #[test]
    fn test_legacy_defaults() {
        let t: LegacyObjectTemplate = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(t.object_type, ObjectType::Generic);
        assert_eq!(t.friction, 0.7);
        assert_eq!(t.restitution, 0.3);
        assert_eq!(t.density, 1.0);
        assert_eq!(t.roughness, 1.0);
        assert_eq!(t.metallic, 0.0);
        assert!(t.snap_points.is_none());
    }

    #[test]
    fn test_legacy_snap_point_range_default() {
        let p: LegacySnapPoint = serde_json::from_str(
            r#"{"Position": {"X": 0, "Y": 0, "Z": 1}, "SnapRotation": true, "RotationOffset": 90}"#,
        )
        .unwrap();
        assert_eq!(p.range, 1.0);
        assert!(p.snap_rotation);
    }

    #[test]
    fn test_legacy_uses_collisions_key() {
        let json = MINIMAL.replace(
            r#""Models": []"#,
            r#""Models": [], "Collisions": [{"Type": "Sphere", "Radius": 2}]"#,
        );
        let t: LegacyObjectTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(t.collisions.map(|c| c.len()), Some(1));
    }
}
