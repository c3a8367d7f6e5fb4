//! Tick callback that turns tick summaries into run-level log events.
//!
//! Layout changes are already logged where they happen; this callback adds
//! the run view on top: which tick the swarm committed on, how much the
//! maintenance passes changed over the run, and the room count peak.

use serde::Serialize;
use swarm_core::{SimulationState, TickCallback, TickSummary};
use swarm_layout::{EvolutionReport, PruneReport};
use tracing::{debug, info};
use uuid::Uuid;

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Rooms the commit created.
    pub rooms_at_commit: usize,
    /// Largest live room count seen.
    pub peak_rooms: usize,
    /// Rooms forced to public by evolution.
    pub promoted: usize,
    /// Rooms downgraded to service by evolution.
    pub demoted: usize,
    /// Rooms removed by evolution or pruning.
    pub removed: usize,
    /// Door refresh passes that ran.
    pub door_refreshes: usize,
}

impl RunStats {
    fn absorb_evolution(&mut self, report: &EvolutionReport) {
        self.promoted = self.promoted.saturating_add(report.promoted.len());
        self.demoted = self.demoted.saturating_add(report.demoted.len());
        self.removed = self.removed.saturating_add(report.removed.len());
    }

    fn absorb_prune(&mut self, report: &PruneReport) {
        self.removed = self.removed.saturating_add(report.removed.len());
    }
}

/// Callback that logs run milestones tagged with the run id.
#[derive(Debug)]
pub struct RunLogCallback {
    run_id: Uuid,
    stats: RunStats,
}

impl RunLogCallback {
    /// Create a callback for the run identified by `run_id`.
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            stats: RunStats::default(),
        }
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> RunStats {
        self.stats
    }
}

impl TickCallback for RunLogCallback {
    fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
        self.stats.peak_rooms = self.stats.peak_rooms.max(summary.rooms);

        if let Some(commit) = summary.commit {
            self.stats.rooms_at_commit = commit.rooms;
            info!(
                run_id = %self.run_id,
                tick = summary.tick,
                anchors = summary.anchors,
                columns = commit.columns,
                floors = commit.floors,
                rooms = commit.rooms,
                doors = commit.doors,
                "Swarm settled into a layout"
            );
        }

        let maintenance = &summary.maintenance;
        if maintenance.doors.is_some() {
            self.stats.door_refreshes = self.stats.door_refreshes.saturating_add(1);
        }
        if let Some(ref report) = maintenance.evolution {
            self.stats.absorb_evolution(report);
        }
        if let Some(ref report) = maintenance.prune {
            self.stats.absorb_prune(report);
        }

        if maintenance.evolution.as_ref().is_some_and(|r| !r.is_empty())
            || maintenance.prune.as_ref().is_some_and(|r| !r.removed.is_empty())
        {
            info!(
                run_id = %self.run_id,
                tick = summary.tick,
                rooms = summary.rooms,
                doors = summary.doors,
                unresolved_doors = summary.unresolved_doors,
                revision = summary.revision,
                "Layout reshaped by usage"
            );
        } else if maintenance.decayed {
            debug!(run_id = %self.run_id, tick = summary.tick, "Room memory decayed");
        }
    }
}
