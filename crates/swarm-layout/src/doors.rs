//! Door synthesis, validation, and the minimum-exit guarantee.
//!
//! Doors are placed where traffic crosses a room's wall band. For each room
//! with enough wall-hit samples, every candidate wall is scored by the
//! samples lying close to it. The best walls that clear the threshold get a
//! door at the projection of the sample mean, kept away from corners and
//! primary columns. Validation then drops doors crowding another on the
//! same wall, and any room left without a door receives one emergency door
//! on the wall facing the canvas center.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use swarm_types::{Canvas, Door, Room, RoomId, Segment, Vec2};
use swarm_types::geometry::centroid;
use tracing::{debug, info};

use crate::config::DoorConfig;
use crate::layout::Layout;

/// Counts from one door synthesis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DoorReport {
    /// Doors placed from wall-hit evidence.
    pub synthesized: usize,
    /// Synthesized doors dropped for crowding a door on the same wall.
    pub dropped: usize,
    /// Emergency doors added by the minimum-exit guarantee.
    pub emergency: usize,
}

impl DoorReport {
    /// Total doors in the layout after the run.
    pub const fn total(&self) -> usize {
        self.synthesized
            .saturating_sub(self.dropped)
            .saturating_add(self.emergency)
    }
}

/// Place doors from each room's wall-hit samples.
///
/// Rooms are visited in handle order. Within a room, walls are ranked by
/// score (descending, ties keep the top, bottom, left, right order).
pub fn synthesize_doors(
    rooms: &BTreeMap<RoomId, Room>,
    primary_columns: &[Vec2],
    config: &DoorConfig,
) -> Vec<Door> {
    let mut doors = Vec::new();

    for room in rooms.values() {
        let hits = &room.wall_hits;
        if hits.len() < config.hit_threshold {
            continue;
        }
        let Some(mean) = centroid(hits) else {
            continue;
        };

        let mut scored: Vec<(usize, Segment)> = room
            .candidate_walls()
            .into_iter()
            .map(|wall| {
                let score = hits
                    .iter()
                    .filter(|&&h| wall.distance_to(h).distance < config.wall_hit_radius)
                    .count();
                (score, wall)
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let mut placed = 0;
        for (score, wall) in scored {
            if score < config.hit_threshold || placed >= config.max_doors_per_room {
                continue;
            }
            if let Some(door) = place_door(room.id, wall, mean, primary_columns, config) {
                doors.push(door);
                placed = placed.saturating_add(1);
            }
        }
    }
    doors
}

/// Project `target` onto `wall` and build a door there, unless the spot is
/// too close to a corner or a primary column.
fn place_door(
    room: RoomId,
    wall: Segment,
    target: Vec2,
    primary_columns: &[Vec2],
    config: &DoorConfig,
) -> Option<Door> {
    let normal = wall.normal()?;
    let t = wall
        .project(target)?
        .clamp(config.min_wall_param, config.max_wall_param);
    let position = wall.point_at(t);

    if position.distance(wall.a) < config.corner_clearance
        || position.distance(wall.b) < config.corner_clearance
    {
        return None;
    }
    if primary_columns
        .iter()
        .any(|&c| position.distance(c) < config.column_clearance)
    {
        return None;
    }

    Some(Door {
        position,
        normal,
        wall,
        room,
        emergency: false,
    })
}

/// Drop doors closer than `min_spacing` to an earlier door on the same wall.
///
/// Walls are identified by their exact endpoints. Earlier doors win.
pub fn validate_doors(doors: Vec<Door>, min_spacing: f32) -> Vec<Door> {
    let mut by_wall: HashMap<(u32, u32, u32, u32), Vec<Vec2>> = HashMap::new();
    doors
        .into_iter()
        .filter(|door| {
            let kept = by_wall.entry(door.wall.endpoint_key()).or_default();
            let crowded = kept
                .iter()
                .any(|&p| door.position.distance(p) < min_spacing);
            if !crowded {
                kept.push(door.position);
            }
            !crowded
        })
        .collect()
}

/// Give every room with fewer than `min_exits` doors one emergency door.
/// Returns how many doors were added.
pub fn ensure_minimum_exits(
    rooms: &BTreeMap<RoomId, Room>,
    doors: &mut Vec<Door>,
    canvas: Canvas,
    min_exits: usize,
) -> usize {
    let mut counts: BTreeMap<RoomId, usize> = BTreeMap::new();
    for door in doors.iter() {
        let count = counts.entry(door.room).or_default();
        *count = count.saturating_add(1);
    }

    let before = doors.len();
    for room in rooms.values() {
        if counts.get(&room.id).copied().unwrap_or(0) >= min_exits {
            continue;
        }
        if let Some(door) = emergency_door(room, canvas) {
            debug!(
                room = %room.id,
                x = door.position.x,
                y = door.position.y,
                "Added emergency door"
            );
            doors.push(door);
        }
    }
    doors.len().saturating_sub(before)
}

/// An emergency door at the midpoint of the room wall nearest the canvas
/// center. Ties go to the first wall in top, bottom, left, right order.
pub fn emergency_door(room: &Room, canvas: Canvas) -> Option<Door> {
    let center = canvas.center();
    let wall = room
        .candidate_walls()
        .into_iter()
        .min_by(|a, b| {
            a.midpoint()
                .distance(center)
                .total_cmp(&b.midpoint().distance(center))
        })?;
    Some(Door {
        position: wall.midpoint(),
        normal: wall.normal()?,
        wall,
        room: room.id,
        emergency: true,
    })
}

impl Layout {
    /// Run synthesis, validation, and the exit guarantee, replacing the
    /// current doors. Does not touch walls or connectivity.
    pub(crate) fn place_doors(&mut self) -> DoorReport {
        let synthesized = synthesize_doors(&self.rooms, &self.primary_columns, &self.config.doors);
        let count = synthesized.len();
        let mut doors = validate_doors(synthesized, self.config.doors.min_door_spacing);
        let dropped = count.saturating_sub(doors.len());
        let emergency = ensure_minimum_exits(
            &self.rooms,
            &mut doors,
            self.config.canvas,
            self.config.doors.min_exits,
        );
        self.doors = doors;
        DoorReport {
            synthesized: count,
            dropped,
            emergency,
        }
    }

    /// Re-derive doors from the wall-hit samples gathered so far, then
    /// regenerate walls and rebuild the graph and hierarchy.
    ///
    /// Room types are left as they are. Does nothing before commit.
    pub fn refresh_doors(&mut self) -> Option<DoorReport> {
        if !self.committed {
            return None;
        }
        let previous = self.doors.clone();
        let report = self.place_doors();
        self.regenerate_walls();
        self.rebuild_connectivity();
        if self.doors != previous {
            self.bump_revision();
            info!(
                doors = report.total(),
                synthesized = report.synthesized,
                dropped = report.dropped,
                emergency = report.emergency,
                "Doors refreshed"
            );
        }
        Some(report)
    }
}
