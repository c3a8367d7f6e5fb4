//! Error types for the `swarm-layout` crate.
//!
//! Missing lookups during synthesis (no primary columns, no reachable
//! circulation room) are ordinary outcomes and are signalled with `Option`.
//! [`LayoutError`] is reserved for caller mistakes and for invariant
//! violations worth surfacing.

use swarm_types::{RoomId, Vec2};

/// Errors that can occur during layout operations.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The canvas has a non-positive or non-finite dimension.
    #[error("invalid canvas {width}x{height}")]
    InvalidCanvas {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },

    /// A room handle did not resolve to a live room.
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    /// A door's probes resolved to no room on either side, or to the same
    /// room on both sides. This indicates a probe-sampling bug.
    #[error("door {door} generated for {room} at {position:?} links no rooms")]
    DanglingDoor {
        /// Index of the door in the layout's door list.
        door: usize,
        /// Door position.
        position: Vec2,
        /// Room the door was generated for.
        room: RoomId,
    },
}
