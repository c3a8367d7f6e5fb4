//! Emergent architecture synthesis for the swarm simulation.
//!
//! This crate turns the swarm's anchors and positions into a building:
//! columns, floors, beams, ramps, rooms, doors, and double-sided walls. It
//! derives a room connectivity graph and a circulation hierarchy from them,
//! and keeps the structure alive afterwards through usage sampling,
//! evolution, decay, pruning, and door refreshes.
//!
//! # Modules
//!
//! - [`columns`] -- Greedy clustering of anchors into column points.
//! - [`commit`] -- The one-shot commit deriving the whole layout.
//! - [`config`] -- Tunable parameters, deserialized from configuration.
//! - [`doors`] -- Door synthesis from wall-hit samples, spacing validation,
//!   and the emergency-exit guarantee.
//! - [`error`] -- Error types for layout operations.
//! - [`evolution`] -- Promotion, demotion, removal, decay, and smart prune.
//! - [`graph`] -- [`RoomGraph`]: adjacency, exterior access, isolation.
//! - [`hierarchy`] -- [`CirculationHierarchy`]: spine, branches, terminals.
//! - [`layout`] -- [`Layout`], the shared structure agents steer through.
//! - [`usage`] -- Per-tick wall-band and occupancy sampling.
//! - [`walls`] -- Wall derivation from floors, columns, rooms, and ramps,
//!   with openings cut around doors.

pub mod columns;
pub mod commit;
pub mod config;
pub mod doors;
pub mod error;
pub mod evolution;
pub mod graph;
pub mod hierarchy;
pub mod layout;
pub mod usage;
pub mod walls;

// Re-export primary types at crate root.
pub use columns::cluster_columns;
pub use commit::CommitSummary;
pub use config::{
    ColumnConfig, CommitConfig, DoorConfig, EvolutionConfig, HierarchyConfig, LayoutConfig,
    PruneConfig, UsageConfig,
};
pub use doors::{DoorReport, emergency_door, ensure_minimum_exits, synthesize_doors, validate_doors};
pub use error::LayoutError;
pub use evolution::{EvolutionReport, PruneReport, Transition};
pub use graph::{DoorLink, RoomGraph, UnresolvedDoor};
pub use hierarchy::CirculationHierarchy;
pub use layout::Layout;
pub use walls::{derive_walls, open_doorways};
