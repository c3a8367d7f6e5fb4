//! Wall derivation.
//!
//! Walls are regenerated wholesale whenever the layout or its doors change.
//! Each one is double-sided: agents collide with two faces offset either
//! side of the logical line. Doors cut openings into the lines around them
//! so agents can actually walk through.

use std::collections::BTreeSet;

use swarm_types::{Canvas, Door, Rect, Segment, Vec2, Wall, WallSource};

use crate::config::CommitConfig;

/// Derive every wall of the layout.
///
/// Sources, in output order: full-width floor lines, full-height lines
/// through primary columns, the four edges of every room, and every ramp.
/// Each line is split around the doors within
/// [`CommitConfig::doorway_half_width`] of it. Pieces repeating an earlier
/// line (in either direction) and zero-length pieces are skipped.
pub fn derive_walls(
    canvas: Canvas,
    floors: &[f32],
    primary_columns: &[Vec2],
    rooms: impl IntoIterator<Item = Rect>,
    ramps: &[Segment],
    doors: &[Door],
    config: &CommitConfig,
) -> Vec<Wall> {
    let floor_lines = floors.iter().map(|&y| {
        (
            Segment::new(Vec2::new(0.0, y), Vec2::new(canvas.width, y)),
            WallSource::Floor,
        )
    });
    let column_lines = primary_columns.iter().map(|c| {
        (
            Segment::new(Vec2::new(c.x, 0.0), Vec2::new(c.x, canvas.height)),
            WallSource::Column,
        )
    });
    let room_edges = rooms
        .into_iter()
        .flat_map(|rect| rect.edges())
        .map(|edge| (edge, WallSource::RoomEdge));
    let ramp_lines = ramps.iter().map(|&ramp| (ramp, WallSource::Ramp));

    let mut seen = BTreeSet::new();
    floor_lines
        .chain(column_lines)
        .chain(room_edges)
        .chain(ramp_lines)
        .flat_map(|(line, source)| {
            open_doorways(line, doors, config.doorway_half_width)
                .into_iter()
                .map(move |piece| (piece, source))
        })
        .filter(|(line, _)| seen.insert(undirected_key(line)))
        .filter_map(|(line, source)| Wall::double_sided(line, config.wall_half_thickness, source))
        .collect()
}

/// The pieces of `line` left after cutting `half_width` either side of
/// every door lying within `half_width` of it.
///
/// Openings are measured along the line from each door's projection.
/// Overlapping openings merge. A zero-length line comes back unchanged.
pub fn open_doorways(line: Segment, doors: &[Door], half_width: f32) -> Vec<Segment> {
    let length = line.length();
    if length <= 0.0 {
        return vec![line];
    }
    let span = half_width / length;

    let mut openings: Vec<(f32, f32)> = doors
        .iter()
        .filter(|door| line.distance_to(door.position).distance < half_width)
        .filter_map(|door| line.project(door.position))
        .map(|t| (t - span, t + span))
        .collect();
    if openings.is_empty() {
        return vec![line];
    }
    openings.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut pieces = Vec::new();
    let mut start = 0.0_f32;
    for (from, to) in openings {
        if from > start {
            let from = from.min(1.0);
            pieces.push(Segment::new(line.point_at(start), line.point_at(from)));
        }
        start = start.max(to);
    }
    if start < 1.0 {
        pieces.push(Segment::new(line.point_at(start), line.b));
    }
    pieces
}

/// Endpoint key that ignores the line's direction.
fn undirected_key(line: &Segment) -> (u32, u32, u32, u32) {
    let forward = line.endpoint_key();
    let backward = Segment::new(line.b, line.a).endpoint_key();
    forward.min(backward)
}
