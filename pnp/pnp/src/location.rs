use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;

/// Uses a right-handed cartesian coordinate system.
/// See https://en.wikipedia.org/wiki/Cartesian_coordinate_system
#[derive(Debug, serde::Serialize, serde::Deserialize, Copy, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Positive = Right
    pub x: Decimal,
    /// Positive = Up
    pub y: Decimal,
    /// Degrees, positive values indicate anti-clockwise rotation
    /// Range is >-180 to +180 degrees
    pub rotation: Decimal,
}

impl Location {
    pub fn new(x: Decimal, y: Decimal, rotation: Decimal) -> Self {
        Self {
            x,
            y,
            rotation,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}°)", self.x, self.y, self.rotation)
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
}

impl Default for Side {
    fn default() -> Self {
        Self::Top
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Top => f.write_str("Top"),
            Side::Bottom => f.write_str("Bottom"),
        }
    }
}
