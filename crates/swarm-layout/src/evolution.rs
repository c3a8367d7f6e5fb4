//! Usage-driven room evolution, memory decay, and connectivity-aware pruning.
//!
//! Each pass first decides, then mutates: candidates for removal are
//! collected against the current graph and removed in one step, after which
//! walls, graph, and hierarchy are rebuilt once.

use std::collections::BTreeSet;

use serde::Serialize;
use swarm_types::{Room, RoomId, RoomType};
use tracing::{debug, info};

use crate::config::{EvolutionConfig, PruneConfig};
use crate::graph::RoomGraph;
use crate::layout::Layout;

/// The single transition an evolution pass applies to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Heavily used: becomes public.
    Promote,
    /// A public room that lost its traffic: becomes service.
    Demote,
    /// An unused, non-service room: removed.
    Remove,
}

/// Outcome of one evolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvolutionReport {
    /// Rooms forced to public.
    pub promoted: Vec<RoomId>,
    /// Rooms downgraded from public to service.
    pub demoted: Vec<RoomId>,
    /// Rooms removed.
    pub removed: Vec<RoomId>,
}

impl EvolutionReport {
    /// Whether the pass changed nothing.
    pub fn is_empty(&self) -> bool {
        self.promoted.is_empty() && self.demoted.is_empty() && self.removed.is_empty()
    }
}

/// Outcome of one prune pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    /// Rooms removed.
    pub removed: Vec<RoomId>,
    /// Rooms left.
    pub remaining: usize,
    /// Isolated rooms after the rebuild.
    pub isolated: usize,
}

/// The transition `room` qualifies for, checked in priority order promote,
/// demote, remove. Rooms younger than `min_age` never transition.
pub fn evolution_transition(room: &Room, config: &EvolutionConfig) -> Option<Transition> {
    if room.age < config.min_age {
        return None;
    }
    if room.hits >= config.promote_hits {
        Some(Transition::Promote)
    } else if room.hits <= config.demote_hits && room.room_type == RoomType::Public {
        Some(Transition::Demote)
    } else if room.hits <= config.kill_hits && room.room_type != RoomType::Service {
        Some(Transition::Remove)
    } else {
        None
    }
}

/// Whether `room` survives a prune against `graph`.
pub fn survives_prune(room: &Room, graph: &RoomGraph, config: &PruneConfig) -> bool {
    if room.age < config.min_age {
        return true;
    }
    let threshold = config.hit_threshold;
    if graph.is_isolated(room.id) && room.hits < threshold * config.isolated_factor {
        return false;
    }
    if graph.is_circulation(room.id) && room.hits >= threshold * config.circulation_factor {
        return true;
    }
    if graph.neighbor_count(room.id) >= config.connected_min_neighbors
        && room.hits >= threshold * config.connected_factor
    {
        return true;
    }
    room.hits >= threshold
}

impl Layout {
    /// Apply at most one transition to every room, then remove the rooms
    /// marked for removal.
    ///
    /// Connectivity is rebuilt only when a room was removed. Promoted or
    /// demoted types are kept as set; the hierarchy does not re-type rooms.
    pub fn evolve_rooms(&mut self) -> EvolutionReport {
        let config = &self.config.evolution;
        let mut report = EvolutionReport::default();

        for room in self.rooms.values_mut() {
            match evolution_transition(room, config) {
                Some(Transition::Promote) => {
                    if room.room_type != RoomType::Public {
                        room.room_type = RoomType::Public;
                        report.promoted.push(room.id);
                    }
                }
                Some(Transition::Demote) => {
                    room.room_type = RoomType::Service;
                    report.demoted.push(room.id);
                }
                Some(Transition::Remove) => report.removed.push(room.id),
                None => {}
            }
        }

        if !report.promoted.is_empty() || !report.demoted.is_empty() {
            self.bump_revision();
        }
        if !report.removed.is_empty() {
            let doomed: BTreeSet<RoomId> = report.removed.iter().copied().collect();
            self.remove_rooms(&doomed);
        }

        if report.is_empty() {
            debug!("Evolution pass changed nothing");
        } else {
            info!(
                promoted = report.promoted.len(),
                demoted = report.demoted.len(),
                removed = report.removed.len(),
                rooms = self.rooms.len(),
                "Rooms evolved"
            );
        }
        report
    }

    /// Multiply every room's hit counter by the configured decay rate.
    pub fn decay_room_memory(&mut self) {
        let rate = self.config.evolution.decay_rate;
        for room in self.rooms.values_mut() {
            room.hits *= rate;
        }
        debug!(rate, rooms = self.rooms.len(), "Decayed room memory");
    }

    /// Drop rooms that connectivity and usage no longer justify, then
    /// rebuild the graph and hierarchy unconditionally.
    pub fn smart_prune_rooms(&mut self) -> PruneReport {
        let doomed: BTreeSet<RoomId> = self
            .rooms
            .values()
            .filter(|room| !survives_prune(room, &self.graph, &self.config.prune))
            .map(|room| room.id)
            .collect();

        let removed = self.remove_rooms(&doomed);
        let report = PruneReport {
            removed,
            remaining: self.rooms.len(),
            isolated: self.graph.isolated().len(),
        };
        info!(
            removed = report.removed.len(),
            remaining = report.remaining,
            isolated = report.isolated,
            "Smart prune"
        );
        report
    }
}
