//! Simulation driver for the swarm architecture engine.
//!
//! This crate owns the tick cycle that moves the swarm from free flocking,
//! through anchor formation and the one-time layout commit, into
//! circulation with periodic layout maintenance.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `swarm-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- [`RunControl`], the shared stop flag and tick pacing.
//! - [`export`] -- Trajectory export as a JSON document.
//! - [`runner`] -- The paced async loop around [`run_tick`].
//! - [`schedule`] -- Per-pass maintenance timers armed at commit.
//! - [`tick`] -- The per-tick engine loop and [`SimulationState`].
//!
//! [`RunControl`]: control::RunControl
//! [`run_tick`]: tick::run_tick
//! [`SimulationState`]: tick::SimulationState

pub mod config;
pub mod control;
pub mod export;
pub mod runner;
pub mod schedule;
pub mod tick;

// Re-export primary types at crate root.
pub use config::{ConfigError, SimulationConfig};
pub use control::{RunControl, SimulationEndReason};
pub use export::{ExportError, TrajectoryExport};
pub use runner::{
    NoOpCallback, RunnerError, SimulationResult, TickCallback, log_simulation_end, run_simulation,
};
pub use tick::{Phase, SimulationState, TickError, TickSummary, run_tick};
