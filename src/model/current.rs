//! Current schema generation (`GUID`/`Name` documents)
//!
//! Every template shares [`TemplateBase`]; the `Type` field selects which
//! concrete template adds its own settings on top.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::basic::{CollisionBehavior, Color, ObjectType, PhysicalSurface, Vector};
use super::components::{CollisionDetails, ModelDetails, MultistateModelDetails};
use super::defaults;

integer_enum! {
    /// Shape of the area where objects snap to a snap point
    pub enum SnapPointShape {
        Sphere = 0,
        Cylinder = 1,
        Box = 2,
    }
}

integer_enum! {
    /// How snapped objects are rotated
    pub enum SnapPointRotation {
        NoChange = 0,
        NoFlip = 1,
        RotateNoFlip = 2,
        RotateUpright = 3,
        RotateUpsideDown = 4,
    }
}

integer_enum! {
    /// When a snap point is valid with respect to the flip state of its object
    pub enum SnapPointFlipValidity {
        Always = 0,
        Upright = 1,
        UpsideDown = 2,
    }
}

/// Snap rotation behavior: either the older flag or an explicit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SnapRotation {
    Flag(bool),
    Mode(SnapPointRotation),
}

impl SnapRotation {
    /// Resolve to a rotation mode. `false` keeps the rotation, `true` rotates without flipping.
    pub fn mode(self) -> SnapPointRotation {
        match self {
            SnapRotation::Flag(false) => SnapPointRotation::NoChange,
            SnapRotation::Flag(true) => SnapPointRotation::RotateNoFlip,
            SnapRotation::Mode(mode) => mode,
        }
    }
}

/// A single snap point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct SnapPoint {
    /// Position of the snap point relative to the position of its actor.
    pub position: Vector,

    /// Maximum range for snapping to this point.
    #[serde(default = "defaults::snap_range")]
    #[schemars(range(min = 0.1))]
    pub range: f64,

    /// Maximum range in secondary axis for snapping to this point. Only used for box shape
    #[serde(default = "defaults::snap_secondary_range")]
    #[schemars(range(min = 0.1))]
    pub secondary_range: f64,

    /// How to rotate snapped objects. false means NoChange, true is RotateNoFlip.
    pub snap_rotation: SnapRotation,

    /// Rotation offset when using rotation snapping
    pub rotation_offset: f64,

    /// Shape of the area where objects will snap to this snap point
    pub shape: SnapPointShape,

    /// When is the snap point valid with respect to flip state of the object
    pub flip_validity: SnapPointFlipValidity,

    /// Tags that can snap to this point. All objects can snap if empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl SnapPoint {
    /// Whether an object carrying `object_tags` may snap here
    pub fn accepts<S: AsRef<str>>(&self, object_tags: &[S]) -> bool {
        match &self.tags {
            None => true,
            Some(tags) if tags.is_empty() => true,
            Some(tags) => object_tags
                .iter()
                .any(|t| tags.iter().any(|allowed| allowed == t.as_ref())),
        }
    }
}

/// A light attached to a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LightDetails {
    /// Relative location of the light
    pub offset: Vector,

    /// Light color
    pub color: Color,

    /// Light intensity
    pub intensity: f64,

    /// Direction of the light. If direction is zero or missing, the light is a point light instead of a spotlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Vector>,

    /// Inner angle for the spotlight. Determines the angle where the light has full intensity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_angle: Option<f64>,

    /// Outer angle for the spotlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_angle: Option<f64>,
}

/// Kind of light a [`LightDetails`] describes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Point,
    Spot { direction: Vector },
}

impl LightDetails {
    pub fn kind(&self) -> LightKind {
        match self.direction {
            Some(direction) if !direction.is_zero() => LightKind::Spot { direction },
            _ => LightKind::Point,
        }
    }
}

/// Fields shared by every template of the current generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateBase {
    /// Unique ID of the template. A UUID with 32 hexadecimal characters, for example "123E4567E89B12D3A456426614174000"
    #[serde(rename = "GUID")]
    pub guid: String,

    /// Name of the template, shown in object explorer.
    pub name: String,

    /// Template metadata. Set in the editor, available through scripting.
    pub metadata: String,

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
    pub snap_points: Option<Vec<SnapPoint>>,

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
    pub collision: Option<Vec<CollisionDetails>>,

    /// Details for the lights of the template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lights: Option<Vec<LightDetails>>,

    /// Flip the object when interacted with? Otherwise, it will be returned
    /// to its default rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flippable: Option<bool>,

    /// Automatically return object to default rotation when lifting up?
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_straighten: Option<bool>,

    /// Should the object snap by default?
    #[serde(default = "defaults::enabled")]
    pub should_snap: bool,

    /// If true, snap points from the object are always considered even if the cursor is not hovering the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_points_global: Option<bool>,

    /// Path to Blueprint for this template. The Blueprint is only relevant for some default options in the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<String>,

    /// Direction from which the camera should view the object when zoomed. Default perspective and automatic rotation is used if zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_view_direction: Option<Vector>,

    /// Default tags for objects from this template
    pub tags: Vec<String>,
}

impl TemplateBase {
    /// A base with the given identity, no components and default physics
    pub fn new(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            metadata: String::new(),
            primary_color: None,
            secondary_color: None,
            metallic: defaults::METALLIC,
            roughness: defaults::ROUGHNESS,
            script_name: None,
            snap_points: None,
            collision_type: CollisionBehavior::Regular,
            friction: defaults::FRICTION,
            restitution: defaults::RESTITUTION,
            density: defaults::DENSITY,
            surface_type: PhysicalSurface::Plastic,
            models: Vec::new(),
            collision: None,
            lights: None,
            flippable: None,
            auto_straighten: None,
            should_snap: true,
            snap_points_global: None,
            blueprint: None,
            zoom_view_direction: None,
            tags: Vec::new(),
        }
    }
}

/// Template for card holder objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CardHolderTemplate {
    #[serde(flatten)]
    pub base: TemplateBase,

    /// Center of the area where held cards are placed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards_center: Option<Vector>,

    /// Width of the area where held cards are placed
    #[serde(default = "defaults::cards_width")]
    #[schemars(range(min = 0.1))]
    pub cards_width: f64,

    /// Maximum number of cards that can be stored in the holder
    #[serde(default = "defaults::max_cards")]
    #[schemars(range(min = 1.0, max = 4294967295.0))]
    pub max_cards: u32,

    /// Maximum height of cards that the holder accepts
    #[serde(default = "defaults::max_card_height")]
    #[schemars(range(min = 0.1))]
    pub max_card_height: f64,
}

/// Standard card shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CardModel {
    Rounded,
    Square,
    Round,
    Hexagonal,
}

/// Card shape: a standard model, or a transparent image the shape is generated from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CardShape {
    Standard(CardModel),
    Custom(String),
}

impl Default for CardShape {
    fn default() -> Self {
        defaults::card_shape()
    }
}

/// Template for card objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CardTemplate {
    #[serde(flatten)]
    pub base: TemplateBase,

    /// Name of the front texture.
    pub front_texture: String,

    /// Name of the back texture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_texture: Option<String>,

    /// Name of the hidden texture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_texture: Option<String>,

    /// Atlas index of the back texture.
    /// -1 when front index is used as back index.
    /// -2 when a whole separate file is the back texture.
    /// -3 when the separate file has the same index as the front texture.
    #[schemars(schema_with = "super::back_index_schema")]
    pub back_index: i32,

    /// Atlas index of the hidden texture.
    /// -1 when the standard grey blur is used to indicate hidden cards
    /// -2 when a whole separate file is the hidden texture.
    #[schemars(schema_with = "super::hidden_index_schema")]
    pub hidden_index: i32,

    /// Number of cards the front texture has horizontally
    #[serde(default = "defaults::atlas_cells")]
    #[schemars(range(min = 1.0, max = 128.0))]
    pub num_horizontal: u32,

    /// Number of cards the front texture has vertically
    #[serde(default = "defaults::atlas_cells")]
    #[schemars(range(min = 1.0, max = 128.0))]
    pub num_vertical: u32,

    /// Width of card
    #[serde(default = "defaults::card_width")]
    #[schemars(range(min = 0.1))]
    pub width: f64,

    /// Height of card
    #[serde(default = "defaults::card_height")]
    #[schemars(range(min = 0.1))]
    pub height: f64,

    /// List of atlas indices in this stack
    #[schemars(schema_with = "super::atlas_indices_schema")]
    pub indices: Vec<u32>,

    /// Card names for indices. Keys are strings representing integers, values are the names for the respective index.
    pub card_names: BTreeMap<String, String>,

    /// Are cards in this stack hidden from other players when in hand?
    #[serde(default = "defaults::enabled")]
    pub hidden_in_hand: bool,

    /// Thickness of cards in this stack
    #[serde(default = "defaults::card_thickness")]
    #[schemars(range(min = 0.01))]
    pub thickness: f64,

    /// Card shape. Can be one of the standard model names, or a transparent image
    /// to generate the card shape from the image shape.
    #[serde(default = "defaults::card_shape")]
    pub model: CardShape,

    /// Can this card be used with card holders?
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_with_card_holders: Option<bool>,

    /// Can this card be stacked?
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_stack: Option<bool>,

    /// Is the primary color used to determine the side color of the stack?
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_primary_color_for_side: Option<bool>,

    /// Accuracy of shape generation when using a transparent image to generate the card shape.
    #[serde(default = "defaults::shape_accuracy")]
    #[schemars(range(min = 1.0, max = 10.0))]
    pub shape_accuracy: u32,

    /// Only relevant for card shapes generated from transparent images.
    /// If true, only the convex hull of the shape will be used as collision,
    /// otherwise a convex decomposition is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convex_collision: Option<bool>,

    /// Is the texture override exposed as UI property?
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_texture_override_exposed: Option<bool>,

    /// Can cards within the stack be flipped compared to the rest of the stack?
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_flipped_in_stack: Option<bool>,
}

impl CardTemplate {
    /// Number of cards in the front texture atlas
    pub fn atlas_len(&self) -> u64 {
        u64::from(self.num_horizontal) * u64::from(self.num_vertical)
    }

    /// Name of the card at `index`, if one is given in `CardNames`
    pub fn card_name(&self, index: u32) -> Option<&str> {
        self.card_names.get(&index.to_string()).map(String::as_str)
    }
}

/// Information about a dice face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct FaceDirection {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub name: String,
}

impl FaceDirection {
    pub fn new(name: impl Into<String>, direction: Vector) -> Self {
        Self {
            x: direction.x,
            y: direction.y,
            z: direction.z,
            name: name.into(),
        }
    }

    pub fn direction(&self) -> Vector {
        Vector::new(self.x, self.y, self.z)
    }
}

/// Template for dice objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct DiceTemplate {
    #[serde(flatten)]
    pub base: TemplateBase,

    /// Direction and name for each face, vectors cannot be zero.
    #[schemars(length(min = 1))]
    pub faces: Vec<FaceDirection>,
}

/// Template for cardboard figure objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct FigureTemplate {
    #[serde(flatten)]
    pub base: TemplateBase,

    /// Name of the front texture. Will also be shown on the back if no back texture is defined.
    pub front_texture: String,

    /// Name of the back texture. Can be empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_texture: Option<String>,

    /// Name of the front extra map. Will also be shown on the back if no back texture is defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_extra_map: Option<String>,

    /// Name of the back extra map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_extra_map: Option<String>,

    /// Width of the figure component. Relative to the default scale that is calculated automatically.
    #[serde(default = "defaults::figure_width")]
    pub figure_width: f64,

    /// Height of the figure component. Relative to the default scale that is calculated automatically.
    #[serde(default = "defaults::figure_height")]
    pub figure_height: f64,

    /// Relative height of the base of the figure.
    #[serde(default = "defaults::figure_z_offset")]
    pub figure_z_offset: f64,

    /// Does this figure use the alpha channel of textures?
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_alpha: Option<bool>,

    /// Does this figure use collision for the cardboard part?
    #[serde(default = "defaults::enabled")]
    pub collide: bool,

    /// Accuracy of shape construction (when UseAlpha is true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1.0, max = 10.0))]
    pub shape_accuracy: Option<u32>,
}

/// Template for multistate objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MultistateTemplate {
    #[serde(flatten)]
    pub base: TemplateBase,

    /// Details for the multistate models of the template.
    #[schemars(length(min = 1))]
    pub multistate_models: Vec<MultistateModelDetails>,
}

/// Template document of the current generation, tagged by `Type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "Type")]
pub enum ObjectTemplate {
    /// Template for generic objects
    Generic(TemplateBase),
    /// Template for container objects
    Container(TemplateBase),
    #[serde(rename = "Card Holder")]
    CardHolder(CardHolderTemplate),
    Card(CardTemplate),
    Dice(DiceTemplate),
    #[serde(rename = "Cardboard Figure")]
    Figure(FigureTemplate),
    #[serde(rename = "Multistate Object")]
    Multistate(MultistateTemplate),
}

impl ObjectTemplate {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectTemplate::Generic(_) => ObjectType::Generic,
            ObjectTemplate::Container(_) => ObjectType::Container,
            ObjectTemplate::CardHolder(_) => ObjectType::CardHolder,
            ObjectTemplate::Card(_) => ObjectType::Card,
            ObjectTemplate::Dice(_) => ObjectType::Dice,
            ObjectTemplate::Figure(_) => ObjectType::Figure,
            ObjectTemplate::Multistate(_) => ObjectType::Multistate,
        }
    }

    /// Fields shared by every template type
    pub fn base(&self) -> &TemplateBase {
        match self {
            ObjectTemplate::Generic(base) | ObjectTemplate::Container(base) => base,
            ObjectTemplate::CardHolder(t) => &t.base,
            ObjectTemplate::Card(t) => &t.base,
            ObjectTemplate::Dice(t) => &t.base,
            ObjectTemplate::Figure(t) => &t.base,
            ObjectTemplate::Multistate(t) => &t.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut TemplateBase {
        match self {
            ObjectTemplate::Generic(base) | ObjectTemplate::Container(base) => base,
            ObjectTemplate::CardHolder(t) => &mut t.base,
            ObjectTemplate::Card(t) => &mut t.base,
            ObjectTemplate::Dice(t) => &mut t.base,
            ObjectTemplate::Figure(t) => &mut t.base,
            ObjectTemplate::Multistate(t) => &mut t.base,
        }
    }
}
