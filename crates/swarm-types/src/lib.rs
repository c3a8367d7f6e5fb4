//! Shared type definitions for the swarm architecture engine.
//!
//! This crate is the single source of truth for the spatial data model that
//! flows between the synthesis engine, the agent crate, and the renderer.
//! Types defined here are exported to `TypeScript` via `ts-rs` so a renderer
//! can consume read-only layout snapshots.
//!
//! # Modules
//!
//! - [`geometry`] -- 2D vectors, rectangles, segments, and the canvas
//! - [`ids`] -- Arena handles for rooms
//! - [`enums`] -- Room types, circulation tiers, wall provenance
//! - [`structs`] -- Rooms, doors, and double-sided walls

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{RoomType, Tier, WallSource};
pub use geometry::{Canvas, Rect, Segment, SegmentDistance, Vec2};
pub use ids::RoomId;
pub use structs::{Door, Room, Wall};
