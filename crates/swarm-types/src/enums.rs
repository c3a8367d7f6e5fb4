//! Enumeration types for the layout data model.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Functional classification of a room. Drives agent behaviour inside the
/// room and the strength with which its doors attract traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    /// Gathering space: agents drift toward the center and slow down.
    Public,
    /// Retreat space: agents drift away from the center and slow down most.
    Private,
    /// Pass-through space: agents keep their heading and speed up slightly.
    Service,
}

impl RoomType {
    /// Every room type, in declaration order.
    pub const ALL: [Self; 3] = [Self::Public, Self::Private, Self::Service];

    /// Lowercase name used in logs and exported documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Service => "service",
        }
    }
}

impl core::fmt::Display for RoomType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circulation tier of a room, by graph distance to the exterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Exterior-connected room sitting on a primary floor level.
    Spine,
    /// Exterior-connected room off the primary floors.
    PrimaryBranch,
    /// One room away from an exterior-connected room.
    SecondaryBranch,
    /// Two or more rooms away, or not connected at all.
    Terminal,
}

impl Tier {
    /// Every tier, outermost first.
    pub const ALL: [Self; 4] = [
        Self::Spine,
        Self::PrimaryBranch,
        Self::SecondaryBranch,
        Self::Terminal,
    ];
}

/// The structural element a wall was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum WallSource {
    /// A full-width floor line.
    Floor,
    /// A full-height line through a primary column.
    Column,
    /// One of the four edges of a room.
    RoomEdge,
    /// A ramp between two floor levels.
    Ramp,
}
