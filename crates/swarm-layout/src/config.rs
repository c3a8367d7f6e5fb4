//! Tunable parameters for layout synthesis and maintenance.
//!
//! Every struct deserializes from the `layout` section of
//! `swarm-config.yaml`. Omitted keys fall back to the defaults below, which
//! reproduce the reference behaviour of the engine.

use serde::{Deserialize, Serialize};
use swarm_types::Canvas;

/// Bundle of every layout parameter. The simulation driver builds this from
/// configuration and hands it to [`Layout::new`](crate::Layout::new).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas the layout is synthesized on.
    pub canvas: Canvas,
    /// Column clustering.
    pub columns: ColumnConfig,
    /// One-shot commit derivation.
    pub commit: CommitConfig,
    /// Door synthesis, validation, and probing.
    pub doors: DoorConfig,
    /// Circulation hierarchy tiering.
    pub hierarchy: HierarchyConfig,
    /// Usage-driven room evolution and decay.
    pub evolution: EvolutionConfig,
    /// Connectivity-aware pruning.
    pub prune: PruneConfig,
    /// Usage sampling bands.
    pub usage: UsageConfig,
}

/// Column clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Anchors closer than this to a cluster seed join that cluster.
    pub cluster_radius: f32,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            cluster_radius: 60.0,
        }
    }
}

/// Parameters of the one-shot commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Columns below this fraction of the canvas height are primary.
    pub primary_column_ratio: f32,
    /// Agent y-values within this distance of a kept level merge into it.
    pub floor_merge_distance: f32,
    /// Maximum number of floor levels kept.
    pub max_floors: usize,
    /// Adjacent columns closer than this in y are linked by a beam.
    pub beam_max_dy: f32,
    /// Horizontal half-span of a ramp around the core column.
    pub ramp_half_span: f32,
    /// Floors within this fraction of the canvas height from the vertical
    /// center are primary.
    pub primary_floor_band: f32,
    /// Inset of a room from its bounding columns and floors.
    pub room_inset: f32,
    /// Exclusive lower bound on a cell's width.
    pub room_min_width: f32,
    /// Exclusive upper bound on a cell's width.
    pub room_max_width: f32,
    /// Exclusive lower bound on a cell's height.
    pub room_min_height: f32,
    /// Exclusive upper bound on a cell's height.
    pub room_max_height: f32,
    /// Distance from a wall's centerline to each of its faces.
    pub wall_half_thickness: f32,
    /// Half-width of the opening a door cuts into every wall line passing
    /// within this distance of it.
    pub doorway_half_width: f32,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            primary_column_ratio: 0.4,
            floor_merge_distance: 25.0,
            max_floors: 4,
            beam_max_dy: 40.0,
            ramp_half_span: 40.0,
            primary_floor_band: 0.18,
            room_inset: 10.0,
            room_min_width: 60.0,
            room_max_width: 220.0,
            room_min_height: 50.0,
            room_max_height: 180.0,
            wall_half_thickness: 5.0,
            doorway_half_width: 14.0,
        }
    }
}

/// Door synthesis, validation, and connectivity probing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Wall-hit samples a room (and a wall) needs before it gets a door.
    pub hit_threshold: usize,
    /// Upper bound on synthesized doors per room.
    pub max_doors_per_room: usize,
    /// A sample scores for a wall when it lies within this distance of it.
    pub wall_hit_radius: f32,
    /// Lower clamp of the door's parameter along its wall.
    pub min_wall_param: f32,
    /// Upper clamp of the door's parameter along its wall.
    pub max_wall_param: f32,
    /// Doors closer than this to a wall endpoint are rejected.
    pub corner_clearance: f32,
    /// Doors closer than this to a primary column are rejected.
    pub column_clearance: f32,
    /// Minimum distance between two doors on the same wall.
    pub min_door_spacing: f32,
    /// Rooms with fewer doors than this receive one emergency door.
    pub min_exits: usize,
    /// Distance of the connectivity probes from the door, along its normal.
    pub probe_distance: f32,
    /// Inflation applied to rooms when resolving a probe (negative shrinks).
    pub probe_margin: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            hit_threshold: 12,
            max_doors_per_room: 2,
            wall_hit_radius: 12.0,
            min_wall_param: 0.1,
            max_wall_param: 0.9,
            corner_clearance: 18.0,
            column_clearance: 22.0,
            min_door_spacing: 25.0,
            min_exits: 1,
            probe_distance: 15.0,
            probe_margin: -5.0,
        }
    }
}

/// Circulation hierarchy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// A circulation room whose vertical center lies within this distance
    /// of a primary floor is part of the spine.
    pub spine_floor_tolerance: f32,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            spine_floor_tolerance: 30.0,
        }
    }
}

/// Usage-driven evolution thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Rooms younger than this are never transitioned.
    pub min_age: u32,
    /// Hits at or above this promote a room to public.
    pub promote_hits: f32,
    /// Public rooms at or below this are demoted to service.
    pub demote_hits: f32,
    /// Non-service rooms at or below this are removed.
    pub kill_hits: f32,
    /// Multiplier applied to every hit counter by the decay pass.
    pub decay_rate: f32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            min_age: 300,
            promote_hits: 140.0,
            demote_hits: 30.0,
            kill_hits: 8.0,
            decay_rate: 0.995,
        }
    }
}

/// Connectivity-aware pruning thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    /// Base hit threshold every other factor scales.
    pub hit_threshold: f32,
    /// Rooms younger than this are always kept.
    pub min_age: u32,
    /// Isolated rooms below `hit_threshold * isolated_factor` are dropped.
    pub isolated_factor: f32,
    /// Exterior-connected rooms at or above `hit_threshold * circulation_factor` are kept.
    pub circulation_factor: f32,
    /// Well-connected rooms at or above `hit_threshold * connected_factor` are kept.
    pub connected_factor: f32,
    /// Neighbour count that makes a room well-connected.
    pub connected_min_neighbors: usize,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            hit_threshold: 120.0,
            min_age: 240,
            isolated_factor: 1.5,
            circulation_factor: 0.5,
            connected_factor: 0.7,
            connected_min_neighbors: 2,
        }
    }
}

/// Usage sampling bands around each room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Total inflation of the inner edge of the wall band.
    pub wall_band_inner: f32,
    /// Total inflation of the outer edge of the wall band.
    pub wall_band_outer: f32,
    /// Oldest wall-hit samples are dropped beyond this many per room.
    pub max_wall_hits_per_room: usize,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            wall_band_inner: 6.0,
            wall_band_outer: 14.0,
            max_wall_hits_per_room: 2048,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = LayoutConfig::default();
        assert_eq!(config.doors.hit_threshold, 12);
        assert_eq!(config.doors.max_doors_per_room, 2);
        assert_eq!(config.commit.max_floors, 4);
        assert_eq!(config.evolution.min_age, 300);
        assert_eq!(config.prune.min_age, 240);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let parsed: Result<LayoutConfig, _> =
            serde_json::from_str(r#"{ "doors": { "hit_threshold": 5 } }"#);
        assert!(parsed.is_ok());
        let config = parsed.unwrap_or_default();
        assert_eq!(config.doors.hit_threshold, 5);
        assert_eq!(config.doors.max_doors_per_room, 2);
        assert_eq!(config.columns, ColumnConfig::default());
    }
}
