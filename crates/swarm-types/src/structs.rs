//! Core layout entities: rooms, doors, and walls.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{RoomType, WallSource};
use crate::geometry::{Rect, Segment, Vec2};
use crate::ids::RoomId;

/// A room in the committed layout.
///
/// The room's usage records (`hits`, `age`, `wall_hits`) live on the room
/// itself, so removing a room from the layout purges them in the same step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Room {
    /// Arena handle, stable for the lifetime of the room.
    pub id: RoomId,
    /// Interior rectangle.
    pub rect: Rect,
    /// Current functional type.
    pub room_type: RoomType,
    /// Decaying occupancy counter.
    pub hits: f32,
    /// Occupancy ticks accumulated since the room was created.
    pub age: u32,
    /// Positions recorded while agents crossed this room's wall band,
    /// oldest first.
    #[serde(skip)]
    #[ts(skip)]
    pub wall_hits: VecDeque<Vec2>,
}

impl Room {
    /// Create a fresh room with no usage history.
    pub const fn new(id: RoomId, rect: Rect, room_type: RoomType) -> Self {
        Self {
            id,
            rect,
            room_type,
            hits: 0.0,
            age: 0,
            wall_hits: VecDeque::new(),
        }
    }

    /// The four candidate door walls, ordered top, bottom, left, right.
    pub fn candidate_walls(&self) -> [Segment; 4] {
        self.rect.edges()
    }
}

/// A door on a room boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Door {
    /// Door position, on `wall`.
    pub position: Vec2,
    /// Unit normal: the wall direction rotated by +90 degrees.
    pub normal: Vec2,
    /// The room edge the door sits on.
    pub wall: Segment,
    /// The room the door was generated for.
    pub room: RoomId,
    /// Whether this is a fallback door added by the minimum-exit guarantee.
    pub emergency: bool,
}

/// A wall with thickness: a centerline plus two parallel faces.
///
/// Agents collide with the faces, never with the centerline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Wall {
    /// The logical wall line.
    pub centerline: Segment,
    /// Face offset along the centerline normal.
    pub near: Segment,
    /// Face offset against the centerline normal.
    pub far: Segment,
    /// What the wall was derived from.
    pub source: WallSource,
}

impl Wall {
    /// Build a double-sided wall whose faces sit `half_thickness` either
    /// side of `centerline`. Returns `None` for a zero-length centerline.
    pub fn double_sided(
        centerline: Segment,
        half_thickness: f32,
        source: WallSource,
    ) -> Option<Self> {
        let offset = centerline.normal()? * half_thickness;
        Some(Self {
            centerline,
            near: centerline.translated(offset),
            far: centerline.translated(-offset),
            source,
        })
    }

    /// Both collision faces.
    pub const fn faces(&self) -> [Segment; 2] {
        [self.near, self.far]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_sided_wall_offsets_both_faces() {
        let line = Segment::new(Vec2::new(0.0, 10.0), Vec2::new(100.0, 10.0));
        let wall = Wall::double_sided(line, 5.0, WallSource::Floor);
        assert!(wall.is_some());
        let Some(wall) = wall else { return };
        let ys: Vec<f32> = wall.faces().iter().map(|f| f.a.y).collect();
        assert!(ys.iter().any(|y| (y - 15.0).abs() < 1e-4));
        assert!(ys.iter().any(|y| (y - 5.0).abs() < 1e-4));
    }

    #[test]
    fn degenerate_wall_is_rejected() {
        let point = Vec2::new(3.0, 3.0);
        assert!(Wall::double_sided(Segment::new(point, point), 5.0, WallSource::Ramp).is_none());
    }

    #[test]
    fn room_serializes_without_wall_hits() {
        let mut room = Room::new(
            RoomId::new(1),
            Rect::new(0.0, 0.0, 100.0, 80.0),
            RoomType::Service,
        );
        room.wall_hits.push_back(Vec2::new(1.0, 1.0));
        let json = serde_json::to_value(&room).unwrap_or_default();
        assert_eq!(json["room_type"], "service");
        assert!(json.get("wall_hits").is_none());
    }
}
