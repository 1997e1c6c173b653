//! Basic value types shared by both schema generations

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A Vector indicating a position, Euler rotation, or scale in 3D space.
/// +Z is the "up" direction, +X is forward, and the rotation axis is left-handed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);
    pub const ONE: Vector = Vector::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True if all three components are exactly zero
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// A color using a red, green, and blue component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Color {
    /// Red component
    #[schemars(range(min = 0.0, max = 1.0))]
    pub r: f64,

    /// Green component
    #[schemars(range(min = 0.0, max = 1.0))]
    pub g: f64,

    /// Blue component
    #[schemars(range(min = 0.0, max = 1.0))]
    pub b: f64,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// Surface type. Affects impact sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PhysicalSurface {
    Plastic,
    Wood,
    Metal,
    Cardboard,
    Cloth,
    Glass,
    Silent,
}

/// Available object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ObjectType {
    Generic,
    Container,
    #[serde(rename = "Card Holder")]
    CardHolder,
    Card,
    Dice,
    #[serde(rename = "Cardboard Figure")]
    Figure,
    #[serde(rename = "Multistate Object")]
    Multistate,
}

impl ObjectType {
    /// Name used for the `Type` field in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Generic => "Generic",
            ObjectType::Container => "Container",
            ObjectType::CardHolder => "Card Holder",
            ObjectType::Card => "Card",
            ObjectType::Dice => "Dice",
            ObjectType::Figure => "Cardboard Figure",
            ObjectType::Multistate => "Multistate Object",
        }
    }

    /// Whether objects of this type are drawn from the `Models` list.
    ///
    /// Cards and figures build their geometry from textures, and multistate
    /// objects use `MultistateModels` instead.
    pub fn renders_from_models(&self) -> bool {
        matches!(
            self,
            ObjectType::Generic | ObjectType::Container | ObjectType::CardHolder | ObjectType::Dice
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Possible collision behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CollisionBehavior {
    Regular,
    Ground,
    Penetrable,
    Static,
}
