//! Literal defaults for optional template fields
//!
//! Consuming engines derive physical and visual behavior from these values,
//! so each one is a named constant. The functions are the `#[serde(default)]`
//! hooks that fill them in at decode time.

use super::current::{CardModel, CardShape};

/// Default metallic value
pub const METALLIC: f64 = 0.0;
/// Default roughness value
pub const ROUGHNESS: f64 = 1.0;
/// Default alpha (opacity) of a model
pub const ALPHA: f64 = 1.0;
/// Default friction
pub const FRICTION: f64 = 0.7;
/// Default restitution (bounciness)
pub const RESTITUTION: f64 = 0.3;
/// Default density
pub const DENSITY: f64 = 1.0;

/// Default snap range
pub const SNAP_RANGE: f64 = 1.0;
/// Default secondary snap range (box snap points)
pub const SNAP_SECONDARY_RANGE: f64 = 1.0;

/// Default radius of sphere collision bodies
pub const SPHERE_RADIUS: f64 = 1.0;

/// Default atlas grid size along either axis
pub const ATLAS_CELLS: u32 = 1;

/// Card holder defaults
pub const CARDS_WIDTH: f64 = 20.0;
pub const MAX_CARDS: u32 = 10;
pub const MAX_CARD_HEIGHT: f64 = 10.0;

/// Card defaults
pub const CARD_WIDTH: f64 = 6.0;
pub const CARD_HEIGHT: f64 = 9.0;
pub const CARD_THICKNESS: f64 = 0.05;
pub const SHAPE_ACCURACY: u32 = 10;

/// Figure defaults
pub const FIGURE_WIDTH: f64 = 1.0;
pub const FIGURE_HEIGHT: f64 = 1.0;
pub const FIGURE_Z_OFFSET: f64 = 0.0;

pub fn metallic() -> f64 {
    METALLIC
}

pub fn roughness() -> f64 {
    ROUGHNESS
}

pub fn alpha() -> f64 {
    ALPHA
}

pub fn friction() -> f64 {
    FRICTION
}

pub fn restitution() -> f64 {
    RESTITUTION
}

pub fn density() -> f64 {
    DENSITY
}

pub fn snap_range() -> f64 {
    SNAP_RANGE
}

pub fn snap_secondary_range() -> f64 {
    SNAP_SECONDARY_RANGE
}

pub fn sphere_radius() -> f64 {
    SPHERE_RADIUS
}

pub fn atlas_cells() -> u32 {
    ATLAS_CELLS
}

pub fn cards_width() -> f64 {
    CARDS_WIDTH
}

pub fn max_cards() -> u32 {
    MAX_CARDS
}

pub fn max_card_height() -> f64 {
    MAX_CARD_HEIGHT
}

pub fn card_width() -> f64 {
    CARD_WIDTH
}

pub fn card_height() -> f64 {
    CARD_HEIGHT
}

pub fn card_thickness() -> f64 {
    CARD_THICKNESS
}

pub fn card_shape() -> CardShape {
    CardShape::Standard(CardModel::Rounded)
}

pub fn shape_accuracy() -> u32 {
    SHAPE_ACCURACY
}

pub fn figure_width() -> f64 {
    FIGURE_WIDTH
}

pub fn figure_height() -> f64 {
    FIGURE_HEIGHT
}

pub fn figure_z_offset() -> f64 {
    FIGURE_Z_OFFSET
}

/// Used for flags that default to enabled (`ShouldSnap`, `HiddenInHand`, `Collide`)
pub fn enabled() -> bool {
    true
}
