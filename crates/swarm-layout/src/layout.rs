//! The committed layout: the shared, read-many/write-rarely structure that
//! agents steer through.
//!
//! [`Layout`] owns every derived element (columns, floors, beams, ramps,
//! rooms, doors, walls) together with the room graph and circulation
//! hierarchy computed from them. Structural mutations go through
//! [`Layout::remove_rooms`] or the door refresh, both of which regenerate
//! walls and rebuild the graph and hierarchy before returning, so no reader
//! ever observes stale connectivity.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use swarm_types::{Canvas, Door, Rect, Room, RoomId, RoomType, Segment, Vec2, Wall};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::graph::RoomGraph;
use crate::hierarchy::CirculationHierarchy;
use crate::walls;

/// The layout synthesized from the swarm.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    /// Synthesis parameters.
    #[serde(skip)]
    pub(crate) config: LayoutConfig,
    /// Set once the one-shot commit has run.
    pub(crate) committed: bool,
    /// Incremented on every structural or typing change.
    pub(crate) revision: u64,
    /// Next arena index handed to a new room.
    #[serde(skip)]
    pub(crate) next_room_id: u32,
    /// All column points, in clustering order.
    pub(crate) columns: Vec<Vec2>,
    /// Columns in the lower part of the canvas.
    pub(crate) primary_columns: Vec<Vec2>,
    /// Remaining columns.
    pub(crate) secondary_columns: Vec<Vec2>,
    /// Primary column closest to the horizontal center.
    pub(crate) core: Option<Vec2>,
    /// Floor levels in ascending order.
    pub(crate) floors: Vec<f32>,
    /// Floors near the vertical center.
    pub(crate) primary_floors: Vec<f32>,
    /// Remaining floors.
    pub(crate) secondary_floors: Vec<f32>,
    /// Links between horizontally adjacent columns at similar heights.
    pub(crate) beams: Vec<Segment>,
    /// One ramp per adjacent floor pair, centred on the core.
    pub(crate) ramps: Vec<Segment>,
    /// Live rooms keyed by handle.
    pub(crate) rooms: BTreeMap<RoomId, Room>,
    /// Validated doors.
    pub(crate) doors: Vec<Door>,
    /// Double-sided walls.
    pub(crate) walls: Vec<Wall>,
    /// Room connectivity derived from rooms and doors.
    pub(crate) graph: RoomGraph,
    /// Circulation tiers derived from the graph.
    pub(crate) hierarchy: CirculationHierarchy,
}

impl Layout {
    /// Create an empty, uncommitted layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidCanvas`] if either canvas dimension is
    /// not a positive finite number.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        let Canvas { width, height } = config.canvas;
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(LayoutError::InvalidCanvas { width, height });
        }
        Ok(Self {
            config,
            committed: false,
            revision: 0,
            next_room_id: 0,
            columns: Vec::new(),
            primary_columns: Vec::new(),
            secondary_columns: Vec::new(),
            core: None,
            floors: Vec::new(),
            primary_floors: Vec::new(),
            secondary_floors: Vec::new(),
            beams: Vec::new(),
            ramps: Vec::new(),
            rooms: BTreeMap::new(),
            doors: Vec::new(),
            walls: Vec::new(),
            graph: RoomGraph::default(),
            hierarchy: CirculationHierarchy::default(),
        })
    }

    // -------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------

    /// Synthesis parameters.
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The canvas the layout lives on.
    pub const fn canvas(&self) -> Canvas {
        self.config.canvas
    }

    /// Whether the one-shot commit has run.
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Structural revision. Renderers redraw when it changes.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// All column points.
    pub fn columns(&self) -> &[Vec2] {
        &self.columns
    }

    /// Primary (lower) columns.
    pub fn primary_columns(&self) -> &[Vec2] {
        &self.primary_columns
    }

    /// Secondary (upper) columns.
    pub fn secondary_columns(&self) -> &[Vec2] {
        &self.secondary_columns
    }

    /// The core column, if any primary column exists.
    pub const fn core(&self) -> Option<Vec2> {
        self.core
    }

    /// Floor levels in ascending order.
    pub fn floors(&self) -> &[f32] {
        &self.floors
    }

    /// Floors near the vertical center.
    pub fn primary_floors(&self) -> &[f32] {
        &self.primary_floors
    }

    /// Floors away from the vertical center.
    pub fn secondary_floors(&self) -> &[f32] {
        &self.secondary_floors
    }

    /// Beams between adjacent columns.
    pub fn beams(&self) -> &[Segment] {
        &self.beams
    }

    /// Ramps between adjacent floors.
    pub fn ramps(&self) -> &[Segment] {
        &self.ramps
    }

    /// Live rooms in handle order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Look up a room by handle.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// Look up a room mutably by handle.
    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    /// Validated doors. Door indices in the room graph refer to this list.
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Double-sided walls.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Room connectivity graph.
    pub const fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    /// Circulation hierarchy.
    pub const fn hierarchy(&self) -> &CirculationHierarchy {
        &self.hierarchy
    }

    /// The first room (in handle order) whose rectangle contains `p`.
    pub fn room_containing(&self, p: Vec2) -> Option<RoomId> {
        self.rooms
            .values()
            .find(|room| room.rect.contains(p))
            .map(|room| room.id)
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Add a room and return its new handle. Connectivity is not rebuilt;
    /// call [`Layout::rebuild_connectivity`] once all edits are done.
    pub fn insert_room(&mut self, rect: Rect, room_type: RoomType) -> RoomId {
        let id = RoomId::new(self.next_room_id);
        self.next_room_id = self.next_room_id.saturating_add(1);
        self.rooms.insert(id, Room::new(id, rect, room_type));
        id
    }

    /// Append a door. Connectivity is not rebuilt.
    pub fn push_door(&mut self, door: Door) {
        self.doors.push(door);
    }

    /// Replace the primary floor levels used for spine detection.
    pub fn set_primary_floors(&mut self, floors: Vec<f32>) {
        self.primary_floors = floors;
    }

    /// Manually classify a room, returning its previous type.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] if `id` is not a live room.
    pub fn classify_room(
        &mut self,
        id: RoomId,
        room_type: RoomType,
    ) -> Result<RoomType, LayoutError> {
        let room = self.rooms.get_mut(&id).ok_or(LayoutError::RoomNotFound(id))?;
        let previous = room.room_type;
        room.room_type = room_type;
        if previous != room_type {
            self.bump_revision();
        }
        Ok(previous)
    }

    /// Recompute the room graph and then the circulation hierarchy from the
    /// current rooms and doors.
    pub fn rebuild_connectivity(&mut self) {
        self.graph = RoomGraph::build(&self.rooms, &self.doors, &self.config.doors);
        self.hierarchy = CirculationHierarchy::build(
            &self.rooms,
            &self.graph,
            &self.primary_floors,
            &self.config.hierarchy,
        );
    }

    /// Regenerate wall geometry from floors, primary columns, rooms, and
    /// ramps, opened around the current doors.
    pub fn regenerate_walls(&mut self) {
        self.walls = walls::derive_walls(
            self.config.canvas,
            &self.floors,
            &self.primary_columns,
            self.rooms.values().map(|room| room.rect),
            &self.ramps,
            &self.doors,
            &self.config.commit,
        );
    }

    /// Remove rooms together with their usage records and doors, then
    /// regenerate walls and rebuild connectivity once.
    ///
    /// Connectivity is rebuilt even when `ids` is empty. Returns the handles
    /// that were actually removed.
    pub fn remove_rooms(&mut self, ids: &BTreeSet<RoomId>) -> Vec<RoomId> {
        let removed: Vec<RoomId> = ids
            .iter()
            .filter(|id| self.rooms.remove(id).is_some())
            .copied()
            .collect();

        if !removed.is_empty() {
            let before = self.doors.len();
            self.doors.retain(|door| !ids.contains(&door.room));
            debug!(
                rooms = removed.len(),
                doors = before.saturating_sub(self.doors.len()),
                "Removed rooms and their doors"
            );
            self.regenerate_walls();
            self.bump_revision();
        }
        self.rebuild_connectivity();
        removed
    }

    pub(crate) const fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
