//! Model, multistate model, and collision components

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::basic::{Color, PhysicalSurface, Vector};
use super::defaults;

/// A renderable model component of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ModelDetails {
    /// Position of the component relative to the object
    pub offset: Vector,

    /// Rotation of the component relative to the object
    pub rotation: Vector,

    /// Scale of the component relative to the object
    pub scale: Vector,

    /// Source file name for geometry
    pub model_name: String,

    /// Source file name of the texture name for this model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_name: Option<String>,

    /// Source file name of the normal map name for this model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_map_name: Option<String>,

    /// Source file name of the extra map name for this model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_map_name: Option<String>,

    /// Whether object level appearance overrides should be used on this component.
    /// If false, this component will ignore in-game appearance changes of the object.
    pub use_overrides: bool,

    /// Primary color for the component. Only used if UseOverrides is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<Color>,

    /// Secondary color for the component. Only used if UseOverrides is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<Color>,

    /// Metallic value for the component. Only used if UseOverrides is true.
    #[serde(default = "defaults::metallic")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub metallic: f64,

    /// Roughness value for the component. Only used if UseOverrides is true.
    #[serde(default = "defaults::roughness")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub roughness: f64,

    /// Whether the component is transparent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_transparent: Option<bool>,

    /// Alpha value (opacity)
    #[serde(default = "defaults::alpha")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub alpha: f64,

    /// Custom physical surface for this model. Only valid for components of tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_type: Option<PhysicalSurface>,

    /// Only used for the built-in tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_custom_material: Option<bool>,
}

impl ModelDetails {
    /// A model at the object origin with unit scale and default material
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            offset: Vector::ZERO,
            rotation: Vector::ZERO,
            scale: Vector::ONE,
            model_name: model_name.into(),
            texture_name: None,
            normal_map_name: None,
            extra_map_name: None,
            use_overrides: true,
            primary_color: None,
            secondary_color: None,
            metallic: defaults::METALLIC,
            roughness: defaults::ROUGHNESS,
            is_transparent: None,
            alpha: defaults::ALPHA,
            surface_type: None,
            use_custom_material: None,
        }
    }
}

/// A model component with one renderable state per atlas index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MultistateModelDetails {
    #[serde(flatten)]
    pub model: ModelDetails,

    /// Back texture name of this model when using a card model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_texture_name: Option<String>,

    /// Atlas index of the back texture.
    /// -1 when front index is used as back index.
    /// -2 when a whole separate file is the back texture.
    /// -3 when the separate file has the same index as the front texture.
    #[schemars(schema_with = "super::back_index_schema")]
    pub back_index: i32,

    /// Number of horizontal items in the texture grid
    #[serde(default = "defaults::atlas_cells")]
    #[schemars(range(min = 1.0, max = 4294967295.0))]
    pub num_horizontal: u32,

    /// Number of vertical items in the texture grid
    #[serde(default = "defaults::atlas_cells")]
    #[schemars(range(min = 1.0, max = 4294967295.0))]
    pub num_vertical: u32,

    /// List of atlas indices for this component.
    #[schemars(schema_with = "super::atlas_indices_schema")]
    pub indices: Vec<u32>,
}

impl MultistateModelDetails {
    /// Number of cells in the texture atlas grid
    pub fn atlas_len(&self) -> u64 {
        u64::from(self.num_horizontal) * u64::from(self.num_vertical)
    }
}

/// Collision body attached to a template, tagged by `Type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "Type")]
pub enum CollisionDetails {
    /// Convex hull of a geometry file
    Convex(ConvexCollision),
    /// Sphere around the offset
    Sphere(SphereCollision),
}

impl CollisionDetails {
    /// Position of the component relative to the object
    pub fn offset(&self) -> Option<Vector> {
        match self {
            CollisionDetails::Convex(c) => c.offset,
            CollisionDetails::Sphere(s) => s.offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ConvexCollision {
    /// Position of the component relative to the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector>,

    /// Source file name for geometry
    pub model_name: String,

    /// Rotation of the component relative to the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vector>,

    /// Scale of the component relative to the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vector>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct SphereCollision {
    /// Position of the component relative to the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector>,

    /// Radius of the sphere relative to the object
    #[serde(default = "defaults::sphere_radius")]
    pub radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_details_defaults() {
        let model: ModelDetails = serde_json::from_str(
            r#"{
                "Offset": {"X": 0, "Y": 0, "Z": 0},
                "Rotation": {"X": 0, "Y": 0, "Z": 0},
                "Scale": {"X": 1, "Y": 1, "Z": 1},
                "ModelName": "cube.fbx",
                "UseOverrides": true
            }"#,
        )
        .unwrap();
        assert_eq!(model.metallic, 0.0);
        assert_eq!(model.roughness, 1.0);
        assert_eq!(model.alpha, 1.0);
        assert_eq!(model.texture_name, None);
    }

    #[test]
    fn test_sphere_radius_defaults_to_one() {
        let c: CollisionDetails = serde_json::from_str(r#"{"Type": "Sphere"}"#).unwrap();
        match c {
            CollisionDetails::Sphere(s) => assert_eq!(s.radius, 1.0),
            other => panic!("Expected sphere, got {:?}", other),
        }
    }

    #[test]
    fn test_convex_ignores_radius() {
        let c: CollisionDetails =
            serde_json::from_str(r#"{"Type": "Convex", "ModelName": "hull.obj", "Radius": 4}"#)
                .unwrap();
        assert!(matches!(c, CollisionDetails::Convex(ref m) if m.model_name == "hull.obj"));
    }

    #[test]
    fn test_convex_requires_model_name() {
        let result = serde_json::from_str::<CollisionDetails>(r#"{"Type": "Convex"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_multistate_atlas_len() {
        let mut details: MultistateModelDetails = serde_json::from_str(
            r#"{
                "Offset": {"X": 0, "Y": 0, "Z": 0},
                "Rotation": {"X": 0, "Y": 0, "Z": 0},
                "Scale": {"X": 1, "Y": 1, "Z": 1},
                "ModelName": "token.fbx",
                "UseOverrides": false,
                "BackIndex": -1,
                "Indices": [0]
            }"#,
        )
        .unwrap();
        assert_eq!(details.num_horizontal, 1);
        assert_eq!(details.atlas_len(), 1);
        details.num_horizontal = 4;
        details.num_vertical = 3;
        assert_eq!(details.atlas_len(), 12);
    }
}
