use std::fmt::{Display, Formatter};

use pnp::feeder::{find_enabled_feeder_for_part, Feeder};
use pnp::placement::{Placement, PlacementType};

/// Live classification of whether a placement can be executed right now.
///
/// These are informational states surfaced to the user, not errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// The placement has no part assigned.
    MissingPart,
    /// No enabled feeder currently serves the assigned part.
    MissingFeeder,
    /// The part's configured physical height is zero (not measured yet).
    ZeroPartHeight,
}

impl Display for Readiness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Readiness::Ready => f.write_str("Ready"),
            Readiness::MissingPart => f.write_str("MissingPart"),
            Readiness::MissingFeeder => f.write_str("MissingFeeder"),
            Readiness::ZeroPartHeight => f.write_str("ZeroPartHeight"),
        }
    }
}

/// Classifies a placement against the machine's current feeder set.
///
/// Checks are evaluated in priority order; the first match wins. Feeder
/// availability is live machine state, so callers must pass the current
/// feeder set on every query and never cache the result.
pub fn evaluate(placement: &Placement, feeders: &[Feeder]) -> Readiness {
    let Some(part) = &placement.part else {
        return Readiness::MissingPart;
    };

    if placement.placement_type == PlacementType::Place {
        if find_enabled_feeder_for_part(feeders, part).is_none() {
            return Readiness::MissingFeeder;
        }

        if part.height_mm.is_zero() {
            return Readiness::ZeroPartHeight;
        }
    }

    Readiness::Ready
}
