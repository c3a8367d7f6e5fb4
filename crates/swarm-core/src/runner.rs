//! Paced simulation loop.
//!
//! [`run_simulation`] drives [`run_tick`] at the configured tick interval
//! until the tick limit is reached or a stop is requested through the
//! shared [`RunControl`]. A stop always lands between ticks, so the state a
//! caller sees afterwards is never half-updated.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::control::{RunControl, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// The reason the run ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Ticks executed by this run.
    pub total_ticks: u64,
    /// The tick the layout committed on, if it did.
    pub committed_at: Option<u64>,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run.
    pub finished_at: DateTime<Utc>,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A callback that ignores every tick.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the tick loop until the tick limit is reached or a stop is
/// requested.
///
/// The stop flag is checked before every tick; the tick limit after. With
/// a zero tick interval the loop yields to the runtime between ticks
/// instead of sleeping.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails.
pub async fn run_simulation(
    state: &mut SimulationState,
    control: &Arc<RunControl>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let started_at = Utc::now();
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = control.max_ticks(),
        tick_interval_ms = control.tick_interval_ms(),
        agents = state.agents.len(),
        "Simulation starting"
    );

    let end_reason = loop {
        if control.is_stop_requested() {
            info!(tick = state.tick, "Stop requested");
            break SimulationEndReason::Stopped;
        }

        let summary = tick::run_tick(state)?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary, state);

        let reached = control.tick_limit_reached(summary.tick);
        last_summary = Some(summary);
        if reached {
            info!(tick = state.tick, max_ticks = control.max_ticks(), "Tick limit reached");
            break SimulationEndReason::MaxTicksReached;
        }

        let interval_ms = control.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    };

    Ok(SimulationResult {
        end_reason,
        final_summary: last_summary,
        total_ticks,
        committed_at: state.committed_at,
        started_at,
        finished_at: Utc::now(),
    })
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    let elapsed_ms = result
        .finished_at
        .signed_duration_since(result.started_at)
        .num_milliseconds();
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        committed_at = ?result.committed_at,
        elapsed_ms,
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            phase = ?summary.phase,
            anchors = summary.anchors,
            rooms = summary.rooms,
            doors = summary.doors,
            unresolved_doors = summary.unresolved_doors,
            "Final tick summary"
        );
        if result.committed_at.is_none() {
            warn!(anchors = summary.anchors, "Run ended before the layout committed");
        }
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
