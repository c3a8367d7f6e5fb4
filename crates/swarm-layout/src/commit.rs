//! One-shot layout commit.
//!
//! Turns the swarm's anchors and positions into structure, in order:
//! columns, primary/secondary split, core, floors, beams, ramps, floor split,
//! rooms, doors, walls, then the room graph and circulation hierarchy with
//! hierarchy-driven room typing. A second call is a no-op.

use rand::Rng;
use serde::Serialize;
use swarm_types::{Canvas, Rect, RoomType, Segment, Vec2};
use tracing::info;

use crate::columns::cluster_columns;
use crate::config::CommitConfig;
use crate::layout::Layout;

/// What a commit produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    /// Column points after clustering.
    pub columns: usize,
    /// Columns classified primary.
    pub primary_columns: usize,
    /// Floor levels kept.
    pub floors: usize,
    /// Rooms created.
    pub rooms: usize,
    /// Doors after validation, emergency doors included.
    pub doors: usize,
    /// Emergency doors added by the minimum-exit guarantee.
    pub emergency_doors: usize,
    /// Double-sided walls.
    pub walls: usize,
    /// Rooms with exterior access.
    pub circulation_rooms: usize,
    /// Rooms with neither neighbours nor exterior access.
    pub isolated_rooms: usize,
}

impl Layout {
    /// Commit the layout from the current anchors and agent positions.
    ///
    /// `anchors` are clustered into columns; `positions` (every agent,
    /// anchors included) seed the floor levels. New rooms get a uniformly
    /// random initial type drawn from `rng`. Returns `None` if the layout
    /// was already committed.
    pub fn commit(
        &mut self,
        anchors: &[Vec2],
        positions: &[Vec2],
        rng: &mut impl Rng,
    ) -> Option<CommitSummary> {
        if self.committed {
            return None;
        }
        self.committed = true;

        let canvas = self.config.canvas;
        let commit = self.config.commit.clone();

        self.columns = cluster_columns(anchors, self.config.columns.cluster_radius);
        let (primary, secondary) =
            partition_columns(&self.columns, canvas, commit.primary_column_ratio);
        self.primary_columns = primary;
        self.secondary_columns = secondary;
        self.core = select_core(&self.primary_columns, canvas);

        self.floors = derive_floors(positions, commit.floor_merge_distance, commit.max_floors);
        self.beams = derive_beams(&self.columns, commit.beam_max_dy);
        self.ramps = derive_ramps(&self.floors, self.core, commit.ramp_half_span);
        let (primary_floors, secondary_floors) =
            split_floors(&self.floors, canvas, commit.primary_floor_band);
        self.primary_floors = primary_floors;
        self.secondary_floors = secondary_floors;

        self.rooms.clear();
        for rect in room_cells(&self.columns, &self.floors, &commit) {
            let pick = rng.random_range(0..RoomType::ALL.len());
            let room_type = RoomType::ALL.get(pick).copied().unwrap_or(RoomType::Public);
            self.insert_room(rect, room_type);
        }

        let doors = self.place_doors();
        self.regenerate_walls();
        self.rebuild_connectivity();
        self.hierarchy.apply_room_types(&mut self.rooms);
        self.bump_revision();

        let summary = CommitSummary {
            columns: self.columns.len(),
            primary_columns: self.primary_columns.len(),
            floors: self.floors.len(),
            rooms: self.rooms.len(),
            doors: self.doors.len(),
            emergency_doors: doors.emergency,
            walls: self.walls.len(),
            circulation_rooms: self.graph.circulation().len(),
            isolated_rooms: self.graph.isolated().len(),
        };
        info!(
            columns = summary.columns,
            primary_columns = summary.primary_columns,
            floors = summary.floors,
            rooms = summary.rooms,
            doors = summary.doors,
            emergency_doors = summary.emergency_doors,
            walls = summary.walls,
            circulation = summary.circulation_rooms,
            isolated = summary.isolated_rooms,
            "Layout committed"
        );
        Some(summary)
    }
}

/// Split columns into primary (below `ratio` of the canvas height, i.e.
/// larger `y`) and secondary.
pub fn partition_columns(columns: &[Vec2], canvas: Canvas, ratio: f32) -> (Vec<Vec2>, Vec<Vec2>) {
    let threshold = canvas.height * ratio;
    columns.iter().copied().partition(|c| c.y > threshold)
}

/// The primary column closest to the horizontal center of the canvas.
pub fn select_core(primary_columns: &[Vec2], canvas: Canvas) -> Option<Vec2> {
    let cx = canvas.center().x;
    primary_columns
        .iter()
        .copied()
        .min_by(|a, b| (a.x - cx).abs().total_cmp(&(b.x - cx).abs()))
}

/// Sorted agent y-values, keeping a value only if no kept value lies within
/// `merge_distance`, capped at `max_floors`.
pub fn derive_floors(positions: &[Vec2], merge_distance: f32, max_floors: usize) -> Vec<f32> {
    let mut ys: Vec<f32> = positions.iter().map(|p| p.y).collect();
    ys.sort_by(f32::total_cmp);

    let mut levels: Vec<f32> = Vec::new();
    for y in ys {
        if levels.len() >= max_floors {
            break;
        }
        if !levels.iter().any(|&l| (y - l).abs() < merge_distance) {
            levels.push(y);
        }
    }
    levels
}

/// Link x-adjacent columns whose heights differ by less than `max_dy`.
pub fn derive_beams(columns: &[Vec2], max_dy: f32) -> Vec<Segment> {
    let mut sorted = columns.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
    sorted
        .windows(2)
        .filter_map(|pair| match pair {
            [a, b] if (a.y - b.y).abs() < max_dy => Some(Segment::new(*a, *b)),
            _ => None,
        })
        .collect()
}

/// One ramp per adjacent floor pair, spanning `half_span` either side of the
/// core. No ramps without a core.
pub fn derive_ramps(floors: &[f32], core: Option<Vec2>, half_span: f32) -> Vec<Segment> {
    let Some(core) = core else {
        return Vec::new();
    };
    floors
        .windows(2)
        .filter_map(|pair| match pair {
            [y1, y2] => Some(Segment::new(
                Vec2::new(core.x - half_span, *y1),
                Vec2::new(core.x + half_span, *y2),
            )),
            _ => None,
        })
        .collect()
}

/// Split floors into those within `band` of the canvas height from the
/// vertical center (primary) and the rest.
pub fn split_floors(floors: &[f32], canvas: Canvas, band: f32) -> (Vec<f32>, Vec<f32>) {
    let center_y = canvas.center().y;
    let limit = canvas.height * band;
    floors.iter().copied().partition(|&y| (y - center_y).abs() < limit)
}

/// Candidate room rectangles: each x-adjacent column pair crossed with each
/// adjacent floor pair, inset on every side and kept only inside the size
/// window. Coordinates are truncated to whole units.
pub fn room_cells(columns: &[Vec2], floors: &[f32], config: &CommitConfig) -> Vec<Rect> {
    let mut xs: Vec<f32> = columns.iter().map(|c| c.x).collect();
    xs.sort_by(f32::total_cmp);
    let mut ys = floors.to_vec();
    ys.sort_by(f32::total_cmp);

    let inset = config.room_inset;
    let mut cells = Vec::new();
    for x_pair in xs.windows(2) {
        let [x1, x2] = x_pair else { continue };
        for y_pair in ys.windows(2) {
            let [y1, y2] = y_pair else { continue };
            let width = (x2 - x1).abs();
            let height = (y2 - y1).abs();
            let fits = width > config.room_min_width
                && width < config.room_max_width
                && height > config.room_min_height
                && height < config.room_max_height;
            if fits {
                cells.push(Rect::new(
                    (x1 + inset).trunc(),
                    (y1 + inset).trunc(),
                    inset.mul_add(-2.0, width).trunc(),
                    inset.mul_add(-2.0, height).trunc(),
                ));
            }
        }
    }
    cells
}
