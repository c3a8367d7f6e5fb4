//! Configuration constants and defaults for agent motion.
//!
//! These values correspond to the `agents`, `flocking`, and `navigation`
//! sections of `swarm-config.yaml`. Each struct bundles every tunable of one
//! phase so that callers (tick cycle, tests) can override defaults.

use serde::{Deserialize, Serialize};

/// Agent lifecycle parameters: spawning, integration, anchoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Spawn velocity components are uniform in `[-spawn_speed, spawn_speed]`
    /// (default: 2.0).
    pub spawn_speed: f32,

    /// Speed clamp applied after every integration step (default: 4.0).
    pub max_speed: f32,

    /// Positions kept in the trajectory ring (default: 500).
    pub trajectory_capacity: usize,

    /// An agent slower than this is a candidate anchor (default: 0.5).
    pub anchor_speed: f32,

    /// Consecutive slow ticks needed to anchor (default: 1).
    pub anchor_dwell_ticks: u32,

    /// Trajectory samples an agent needs before it may anchor (default: 120).
    pub anchor_min_trajectory: usize,

    /// No new anchor forms within this distance of an existing one
    /// (default: 120.0).
    pub anchor_spacing: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            spawn_speed: 2.0,
            max_speed: 4.0,
            trajectory_capacity: 500,
            anchor_speed: 0.5,
            anchor_dwell_ticks: 1,
            anchor_min_trajectory: 120,
            anchor_spacing: 120.0,
        }
    }
}

/// Pre-commit flocking weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockingConfig {
    /// Other agents closer than this are neighbours (default: 60.0).
    pub neighbor_radius: f32,
    /// Alignment weight (default: 0.05).
    pub alignment: f32,
    /// Cohesion weight (default: 0.01).
    pub cohesion: f32,
    /// Neighbours closer than this push apart (default: 25.0).
    pub separation_distance: f32,
    /// Separation weight (default: 0.15).
    pub separation: f32,
    /// Anchors closer than this repel (default: 120.0).
    pub anchor_repulsion_radius: f32,
    /// Anchor repulsion numerator, divided by distance (default: 0.3).
    pub anchor_repulsion: f32,
    /// Speed clamp after flocking (default: 2.2).
    pub max_speed: f32,
}

impl Default for FlockingConfig {
    fn default() -> Self {
        Self {
            neighbor_radius: 60.0,
            alignment: 0.05,
            cohesion: 0.01,
            separation_distance: 25.0,
            separation: 0.15,
            anchor_repulsion_radius: 120.0,
            anchor_repulsion: 0.3,
            max_speed: 2.2,
        }
    }
}

/// Post-commit navigation force field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Velocity multiplier applied before any force (default: 0.9).
    pub damping: f32,

    /// Agents within this vertical distance of a floor are pulled toward
    /// the horizontal center (default: 20.0).
    pub floor_pull_band: f32,
    /// Horizontal pull near a floor (default: 0.4).
    pub floor_pull: f32,
    /// Agents within this horizontal distance of a primary column are
    /// pulled toward the vertical center (default: 15.0).
    pub column_pull_band: f32,
    /// Vertical pull near a primary column (default: 0.5).
    pub column_pull: f32,
    /// Pull toward the core column (default: 0.15).
    pub core_pull: f32,

    /// Agents within this vertical distance of a floor follow its corridor
    /// (default: 10.0).
    pub corridor_band: f32,
    /// Corridor push along primary floors (default: 1.2).
    pub primary_corridor: f32,
    /// Corridor push along secondary floors (default: 0.35).
    pub secondary_corridor: f32,

    /// Spine rooms only bias agents faster than this horizontally
    /// (default: 0.1).
    pub spine_min_speed: f32,
    /// Horizontal push in spine rooms (default: 0.3).
    pub spine_push: f32,
    /// Pull from terminal rooms toward circulation (default: 0.12).
    pub terminal_pull: f32,

    /// Wall faces closer than this repel (default: 16.0).
    pub wall_buffer: f32,
    /// Wall repulsion at contact (default: 1.6).
    pub wall_repulsion: f32,
    /// Wall repulsion is suppressed within this distance of any door
    /// (default: 22.0).
    pub door_suppression_radius: f32,
    /// Inner edge of the wall-slide band (default: 4.0).
    pub slide_min_distance: f32,
    /// Outer edge of the wall-slide band (default: 18.0).
    pub slide_max_distance: f32,
    /// Tangential nudge per face in the slide band (default: 0.35).
    pub wall_slide: f32,

    /// Minimum alignment with the door's inward direction for attraction
    /// (default: 0.25).
    pub door_min_approach: f32,
    /// Door attraction strength for public rooms (default: 0.25).
    pub door_public: f32,
    /// Door attraction strength for private rooms (default: 0.06).
    pub door_private: f32,
    /// Door attraction strength for service rooms (default: 0.14).
    pub door_service: f32,
    /// Overall weight of door attraction (default: 0.6).
    pub door_attraction_weight: f32,
    /// Alignment with the door normal past which an agent is on the wrong
    /// side (default: 0.2).
    pub wrong_side_threshold: f32,
    /// Wrong-side repulsion (default: 0.35).
    pub wrong_side_repulsion: f32,

    /// Primary columns closer than this repel (default: 26.0).
    pub column_radius: f32,
    /// Column repulsion numerator, divided by distance (default: 1.4).
    pub column_repulsion: f32,

    /// Total shrink of a room before room behaviour applies (default: 6.0).
    pub room_inset: f32,
    /// Pull toward the center of public rooms (default: 0.08).
    pub public_center_pull: f32,
    /// Push away from the center of private rooms (default: 0.06).
    pub private_center_push: f32,
    /// Heading reinforcement in service rooms (default: 0.12).
    pub service_heading: f32,

    /// Agents within this distance of a door are drawn to it (default: 22.0).
    pub door_snap_radius: f32,
    /// Door snap strength (default: 0.25).
    pub door_snap: f32,
    /// Agents within this distance of a door are pushed off it
    /// (default: 10.0).
    pub door_clearance_radius: f32,
    /// Door clearance push (default: 0.6).
    pub door_clearance: f32,

    /// Velocity multiplier inside public rooms (default: 0.92).
    pub public_pace: f32,
    /// Velocity multiplier inside private rooms (default: 0.80).
    pub private_pace: f32,
    /// Velocity multiplier inside service rooms (default: 1.05).
    pub service_pace: f32,
    /// Private rooms holding more agents than this slow everyone inside
    /// (default: 3).
    pub private_capacity: usize,
    /// Velocity multiplier in an over-full private room (default: 0.6).
    pub private_crowding: f32,

    /// Look-ahead only fires for faces currently farther than this
    /// (default: 6.0).
    pub lookahead_clear: f32,
    /// Look-ahead fires when the next position comes within this
    /// (default: 4.0).
    pub lookahead_hit: f32,
    /// Velocity multiplier when the look-ahead fires (default: 0.5).
    pub lookahead_damping: f32,

    /// Hard collision buffer around every wall face (default: 6.0).
    pub collision_buffer: f32,
    /// Faces within this distance count toward a junction (default: 18.0).
    pub junction_radius: f32,
    /// Faces needed for a junction (default: 2).
    pub junction_min_walls: usize,
    /// Velocity multiplier at a junction (default: 0.45).
    pub junction_damping: f32,

    /// Final speed clamp (default: 2.6).
    pub max_speed: f32,
    /// Velocities with squared length at or below this are zeroed
    /// (default: 1e-6).
    pub rest_epsilon: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            damping: 0.9,
            floor_pull_band: 20.0,
            floor_pull: 0.4,
            column_pull_band: 15.0,
            column_pull: 0.5,
            core_pull: 0.15,
            corridor_band: 10.0,
            primary_corridor: 1.2,
            secondary_corridor: 0.35,
            spine_min_speed: 0.1,
            spine_push: 0.3,
            terminal_pull: 0.12,
            wall_buffer: 16.0,
            wall_repulsion: 1.6,
            door_suppression_radius: 22.0,
            slide_min_distance: 4.0,
            slide_max_distance: 18.0,
            wall_slide: 0.35,
            door_min_approach: 0.25,
            door_public: 0.25,
            door_private: 0.06,
            door_service: 0.14,
            door_attraction_weight: 0.6,
            wrong_side_threshold: 0.2,
            wrong_side_repulsion: 0.35,
            column_radius: 26.0,
            column_repulsion: 1.4,
            room_inset: 6.0,
            public_center_pull: 0.08,
            private_center_push: 0.06,
            service_heading: 0.12,
            door_snap_radius: 22.0,
            door_snap: 0.25,
            door_clearance_radius: 10.0,
            door_clearance: 0.6,
            public_pace: 0.92,
            private_pace: 0.80,
            service_pace: 1.05,
            private_capacity: 3,
            private_crowding: 0.6,
            lookahead_clear: 6.0,
            lookahead_hit: 4.0,
            lookahead_damping: 0.5,
            collision_buffer: 6.0,
            junction_radius: 18.0,
            junction_min_walls: 2,
            junction_damping: 0.45,
            max_speed: 2.6,
            rest_epsilon: 1e-6,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn door_strengths_rank_public_service_private() {
        let config = NavigationConfig::default();
        assert!(config.door_public > config.door_service);
        assert!(config.door_service > config.door_private);
    }

    #[test]
    fn partial_navigation_config_keeps_defaults() {
        let parsed: NavigationConfig =
            serde_json::from_str(r#"{ "max_speed": 3.0 }"#).unwrap();
        assert!((parsed.max_speed - 3.0).abs() < f32::EPSILON);
        assert!((parsed.damping - 0.9).abs() < f32::EPSILON);
        assert_eq!(parsed.junction_min_walls, 2);
    }
}
