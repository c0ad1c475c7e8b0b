use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

use lexical_sort::natural_lexical_cmp;
use rust_decimal::Decimal;

use crate::location::Side;
use crate::part::Part;

/// Placement identifier, unique within a board. Usually a reference
/// designator, e.g. "R1", "C42".
#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct PlacementId(String);

impl Ord for PlacementId {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_lexical_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for PlacementId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for PlacementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Debug for PlacementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl From<String> for PlacementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PlacementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Deref for PlacementId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// What the machine should do with a placement.
#[derive(Debug, serde::Serialize, serde::Deserialize, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlacementType {
    /// Pick and place a component here.
    Place,
    /// Use this position for fiducial checks only.
    Fiducial,
    /// Defined in the authoring data but not processed.
    Ignore,
}

impl Display for PlacementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementType::Place => f.write_str("Place"),
            PlacementType::Fiducial => f.write_str("Fiducial"),
            PlacementType::Ignore => f.write_str("Ignore"),
        }
    }
}

/// One component-position definition inside a board.
///
/// Coordinates are board-relative; see `Location` for the coordinate system.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Placement {
    pub id: PlacementId,
    pub part: Option<Part>,

    /// Positive = Right
    pub x: Decimal,
    /// Positive = Up
    pub y: Decimal,
    /// Degrees, positive values indicate anti-clockwise rotation
    /// Range is >-180 to +180 degrees
    pub rotation: Decimal,

    pub side: Side,
    pub placement_type: PlacementType,

    pub glue: bool,
    pub check_fiducials: bool,
}

impl Placement {
    pub fn new(id: PlacementId) -> Self {
        Self {
            id,
            part: None,
            x: Decimal::ZERO,
            y: Decimal::ZERO,
            rotation: Decimal::ZERO,
            side: Side::Top,
            placement_type: PlacementType::Place,
            glue: false,
            check_fiducials: false,
        }
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.part = Some(part);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_type(mut self, placement_type: PlacementType) -> Self {
        self.placement_type = placement_type;
        self
    }

    pub fn with_position(mut self, x: Decimal, y: Decimal, rotation: Decimal) -> Self {
        self.x = x;
        self.y = y;
        self.rotation = rotation;
        self
    }
}

#[cfg(feature = "testing")]
impl Default for Placement {
    fn default() -> Self {
        Self::new("R1".into())
    }
}

#[cfg(test)]
mod placement_id_tests {
    use rstest::rstest;

    use crate::placement::PlacementId;

    #[rstest]
    #[case("R1", "R2")]
    #[case("R2", "R10")]
    #[case("C9", "C10")]
    #[case("C10", "R1")]
    fn natural_ordering(#[case] smaller: &str, #[case] larger: &str) {
        let smaller = PlacementId::from(smaller);
        let larger = PlacementId::from(larger);
        assert!(smaller < larger);
    }
}
