//! Agent motion for the swarm architecture engine.
//!
//! Agents are points that flock until enough of them have settled into
//! anchors, then circulate through the layout those anchors seeded. This
//! crate owns everything that moves an agent; the layout itself lives in
//! `swarm-layout`.
//!
//! # Modules
//!
//! - [`agent`] -- [`Agent`] state, spawning, integration, and anchoring.
//! - [`config`] -- Tunable parameters for each motion phase.
//! - [`flocking`] -- Pre-commit alignment, cohesion, separation, and anchor
//!   repulsion.
//! - [`navigation`] -- The post-commit force field with hard wall
//!   corrections ([`steer`]).

pub mod agent;
pub mod config;
pub mod flocking;
pub mod navigation;

// Re-export primary types at crate root.
pub use agent::{Agent, AgentSnapshot};
pub use config::{AgentConfig, FlockingConfig, NavigationConfig};
pub use flocking::flocking_velocity;
pub use navigation::{Steering, room_occupancy, steer};
