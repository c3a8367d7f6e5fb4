//! Maintenance pass scheduling.
//!
//! Each maintenance pass owns an explicit tick timer that starts at commit.
//! A pass is due when the current tick reaches its next deadline; the next
//! deadline is then set one interval past the *current* tick, so a pass
//! fires at most once per tick and never catches up with a burst after a
//! stall.

use serde::Serialize;

use crate::config::ScheduleConfig;

/// Which maintenance passes are due this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DuePasses {
    /// Re-derive doors from wall-hit samples.
    pub door_refresh: bool,
    /// Promote, demote, and remove rooms by usage.
    pub evolution: bool,
    /// Decay every room's hit counter.
    pub decay: bool,
    /// Connectivity-aware pruning.
    pub prune: bool,
}

impl DuePasses {
    /// Whether any pass is due.
    pub const fn any(self) -> bool {
        self.door_refresh || self.evolution || self.decay || self.prune
    }
}

/// A single pass timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    interval: u64,
    next: Option<u64>,
}

impl Timer {
    /// A timer first due at `first`, or disabled when `interval` is 0.
    const fn new(interval: u64, first: u64) -> Self {
        Self {
            interval,
            next: if interval == 0 { None } else { Some(first) },
        }
    }

    fn fire(&mut self, tick: u64) -> bool {
        match self.next {
            Some(next) if tick >= next => {
                self.next = Some(tick.saturating_add(self.interval));
                true
            }
            _ => false,
        }
    }
}

/// Per-pass timers, armed at commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceSchedule {
    door_refresh: Timer,
    evolution: Timer,
    decay: Timer,
    prune: Timer,
}

impl MaintenanceSchedule {
    /// Arm every timer relative to the commit tick. Prune first fires once
    /// the cooldown has passed.
    pub const fn new(config: &ScheduleConfig, committed_at: u64) -> Self {
        Self {
            door_refresh: Timer::new(
                config.door_refresh_interval,
                committed_at.saturating_add(config.door_refresh_interval),
            ),
            evolution: Timer::new(
                config.evolution_interval,
                committed_at.saturating_add(config.evolution_interval),
            ),
            decay: Timer::new(
                config.decay_interval,
                committed_at.saturating_add(config.decay_interval),
            ),
            prune: Timer::new(
                config.prune_interval,
                committed_at.saturating_add(config.prune_cooldown),
            ),
        }
    }

    /// The passes due at `tick`, advancing each fired timer.
    pub fn due(&mut self, tick: u64) -> DuePasses {
        DuePasses {
            door_refresh: self.door_refresh.fire(tick),
            evolution: self.evolution.fire(tick),
            decay: self.decay.fire(tick),
            prune: self.prune.fire(tick),
        }
    }
}
