//! Tick cycle: the per-tick engine loop that drives the swarm.
//!
//! Each tick runs through these phases:
//!
//! 1. **Snapshot** -- capture every agent's position and velocity. All
//!    steering this tick reads the snapshot, never a live agent.
//!
//! 2. **Motion** -- before commit, flock and integrate, then promote anchors
//!    one agent at a time. After commit, steer every agent through the
//!    layout, apply the positional push-out, and integrate.
//!
//! 3. **Commit** -- once enough anchors exist (or the commit deadline
//!    passes), derive the layout from them and arm the maintenance timers.
//!
//! 4. **Usage** -- after commit, record every agent's wall-band crossings
//!    and room occupancy and update its last room.
//!
//! 5. **Maintenance** -- run whichever passes are due: door refresh,
//!    evolution, decay, smart prune. Each runs to completion before the next
//!    tick's steering reads the layout.
//!
//! The tick cycle is deterministic given the same configuration and seed.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use swarm_agents::{Agent, flocking_velocity, room_occupancy, steer};
use swarm_layout::{CommitSummary, DoorReport, EvolutionReport, Layout, LayoutError, PruneReport};
use swarm_types::Vec2;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::schedule::MaintenanceSchedule;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// The layout could not be created.
    #[error("layout error: {source}")]
    Layout {
        /// The underlying layout error.
        #[from]
        source: LayoutError,
    },
}

/// Whether the swarm is still forming anchors or circulating through a
/// committed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Flocking and anchoring; no layout yet.
    Forming,
    /// Navigating the committed layout.
    Committed,
}

/// Results of the maintenance passes that ran this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    /// Door refresh outcome, if it ran.
    pub doors: Option<DoorReport>,
    /// Evolution outcome, if it ran.
    pub evolution: Option<EvolutionReport>,
    /// Whether hit counters decayed.
    pub decayed: bool,
    /// Smart prune outcome, if it ran.
    pub prune: Option<PruneReport>,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Phase at the end of the tick.
    pub phase: Phase,
    /// Anchors at the end of the tick.
    pub anchors: usize,
    /// Set on the tick the layout committed.
    pub commit: Option<CommitSummary>,
    /// Maintenance passes that ran.
    pub maintenance: MaintenanceReport,
    /// Live rooms at the end of the tick.
    pub rooms: usize,
    /// Doors at the end of the tick.
    pub doors: usize,
    /// Doors whose connectivity probes resolved to no room pair.
    pub unresolved_doors: usize,
    /// Layout revision at the end of the tick.
    pub revision: u64,
}

/// The mutable simulation state passed through the tick cycle.
///
/// Owned by the driver; every component receives it (or a part of it) by
/// reference. There is no other simulation state.
#[derive(Debug)]
pub struct SimulationState {
    /// Ticks executed so far.
    pub tick: u64,
    /// Every agent, in spawn order. Never shrinks.
    pub agents: Vec<Agent>,
    /// The shared layout. Uncommitted until the anchor threshold is met.
    pub layout: Layout,
    /// The tick the layout committed on.
    pub committed_at: Option<u64>,
    /// Run configuration.
    pub config: SimulationConfig,
    schedule: Option<MaintenanceSchedule>,
    rng: StdRng,
}

impl SimulationState {
    /// Create the state and spawn `population.agent_count` agents from the
    /// seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Layout`] if the configured canvas is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, TickError> {
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        let agents = (0..config.population.agent_count)
            .map(|_| Agent::spawn(config.canvas, &config.agents, &mut rng))
            .collect();
        Self::with_agents(config, agents, rng)
    }

    /// Create the state around an explicit set of agents.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Layout`] if the configured canvas is invalid.
    pub fn with_agents(
        config: SimulationConfig,
        agents: Vec<Agent>,
        rng: StdRng,
    ) -> Result<Self, TickError> {
        let layout = Layout::new(config.layout_config())?;
        info!(
            agents = agents.len(),
            width = config.canvas.width,
            height = config.canvas.height,
            seed = config.world.seed,
            "Simulation state created"
        );
        Ok(Self {
            tick: 0,
            agents,
            layout,
            committed_at: None,
            config,
            schedule: None,
            rng,
        })
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        if self.layout.is_committed() { Phase::Committed } else { Phase::Forming }
    }

    /// Positions of every anchor.
    pub fn anchor_positions(&self) -> Vec<Vec2> {
        self.agents
            .iter()
            .filter(|agent| agent.is_anchor)
            .map(|agent| agent.position)
            .collect()
    }

    /// Every agent's position, in agent order.
    pub fn positions(&self) -> Vec<Vec2> {
        self.agents.iter().map(|agent| agent.position).collect()
    }

    /// Commit the layout from the current anchors now, whatever their
    /// count. Returns `None` if already committed.
    pub fn commit_now(&mut self) -> Option<CommitSummary> {
        let anchors = self.anchor_positions();
        let positions = self.positions();
        let summary = self.layout.commit(&anchors, &positions, &mut self.rng)?;
        self.committed_at = Some(self.tick);
        self.schedule = Some(MaintenanceSchedule::new(&self.config.schedule, self.tick));
        Some(summary)
    }
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError::TickOverflow`] if the tick counter is exhausted.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    state.tick = state.tick.checked_add(1).ok_or(TickError::TickOverflow)?;
    let tick = state.tick;

    let (commit, maintenance) = if state.layout.is_committed() {
        phase_navigate(state);
        phase_usage(state);
        (None, phase_maintenance(state))
    } else {
        phase_form(state);
        (phase_commit(state), MaintenanceReport::default())
    };

    let summary = TickSummary {
        tick,
        phase: state.phase(),
        anchors: state.agents.iter().filter(|agent| agent.is_anchor).count(),
        commit,
        maintenance,
        rooms: state.layout.room_count(),
        doors: state.layout.doors().len(),
        unresolved_doors: state.layout.graph().unresolved_doors().len(),
        revision: state.layout.revision(),
    };

    if tick.checked_rem(state.config.logging.progress_interval_ticks) == Some(0) {
        info!(
            tick,
            phase = ?summary.phase,
            anchors = summary.anchors,
            rooms = summary.rooms,
            doors = summary.doors,
            "Tick progress"
        );
    } else {
        debug!(tick, anchors = summary.anchors, rooms = summary.rooms, "Tick completed");
    }
    Ok(summary)
}

/// Pre-commit motion: flock from the snapshot, integrate, then promote
/// anchors sequentially so each promotion sees the ones before it.
fn phase_form(state: &mut SimulationState) {
    let snapshot: Vec<_> = state.agents.iter().map(Agent::snapshot).collect();
    let canvas = state.config.canvas;

    for (i, agent) in state.agents.iter_mut().enumerate() {
        agent.velocity = flocking_velocity(i, &snapshot, &state.config.flocking);
        agent.integrate(canvas, &state.config.agents);
    }

    let mut anchors = state.anchor_positions();
    for agent in &mut state.agents {
        if agent.update_anchor(&anchors, &state.config.agents) {
            anchors.push(agent.position);
        }
    }
}

/// Commit once the anchor threshold is met or the deadline has passed.
fn phase_commit(state: &mut SimulationState) -> Option<CommitSummary> {
    let population = &state.config.population;
    let anchors = state.agents.iter().filter(|agent| agent.is_anchor).count();
    let threshold_met = anchors >= population.anchor_threshold;
    let deadline = population.commit_deadline_ticks;
    let deadline_passed = deadline > 0 && state.tick >= deadline;

    if !threshold_met && !deadline_passed {
        return None;
    }
    if !threshold_met {
        warn!(
            tick = state.tick,
            anchors,
            threshold = population.anchor_threshold,
            "Commit deadline reached before anchor threshold"
        );
    }
    let summary = state.commit_now()?;
    info!(tick = state.tick, anchors, rooms = summary.rooms, "Architecture committed");
    Some(summary)
}

/// Post-commit motion: steer every agent from the snapshot, then move it.
fn phase_navigate(state: &mut SimulationState) {
    let snapshot: Vec<_> = state.agents.iter().map(Agent::snapshot).collect();
    let positions: Vec<Vec2> = snapshot.iter().map(|view| view.position).collect();
    let occupancy = room_occupancy(&state.layout, &positions);
    let canvas = state.config.canvas;

    for (agent, view) in state.agents.iter_mut().zip(&snapshot) {
        let steering = steer(view, &state.layout, &occupancy, &state.config.navigation);
        agent.velocity = steering.velocity;
        agent.position += steering.displacement;
        agent.integrate(canvas, &state.config.agents);
    }
}

/// Record usage samples for every agent's new position.
fn phase_usage(state: &mut SimulationState) {
    for agent in &mut state.agents {
        state.layout.record_presence(agent.position);
        agent.last_room = state.layout.room_containing(agent.position);
    }
}

/// Run the maintenance passes due this tick.
fn phase_maintenance(state: &mut SimulationState) -> MaintenanceReport {
    let Some(schedule) = state.schedule.as_mut() else {
        return MaintenanceReport::default();
    };
    let due = schedule.due(state.tick);
    let mut report = MaintenanceReport::default();
    if !due.any() {
        return report;
    }

    if due.door_refresh {
        report.doors = state.layout.refresh_doors();
    }
    if due.evolution {
        report.evolution = Some(state.layout.evolve_rooms());
    }
    if due.decay {
        state.layout.decay_room_memory();
        report.decayed = true;
    }
    if due.prune {
        report.prune = Some(state.layout.smart_prune_rooms());
    }
    debug!(tick = state.tick, ?due, "Maintenance passes ran");
    report
}
