//! Agent state and lifecycle.
//!
//! An [`Agent`] is a moving point with a bounded trajectory history. Agents
//! are spawned once at simulation start, integrated every tick, and never
//! destroyed. An agent that lingers (slow for long enough, far from other
//! anchors, with enough history) becomes an anchor and seeds a column.
//!
//! Steering never reads live agents: each tick the driver takes an
//! [`AgentSnapshot`] of every agent and all velocity updates read from it.

use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;
use swarm_types::{Canvas, RoomId, Vec2};
use tracing::debug;

use crate::config::AgentConfig;

/// The read-only view of an agent that steering consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentSnapshot {
    /// Position at the start of the tick.
    pub position: Vec2,
    /// Velocity at the start of the tick.
    pub velocity: Vec2,
    /// Whether the agent is an anchor.
    pub is_anchor: bool,
}

/// A swarm agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agent {
    /// Current position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Set once the agent has anchored. Never cleared.
    pub is_anchor: bool,
    /// Consecutive ticks spent below the anchor speed.
    slow_ticks: u32,
    /// Recent positions, oldest first.
    trajectory: VecDeque<Vec2>,
    /// The room the agent was last inside, if any. Lookup only; the room
    /// may since have been removed.
    pub last_room: Option<RoomId>,
}

impl Agent {
    /// Create an agent at rest at `position`.
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            is_anchor: false,
            slow_ticks: 0,
            trajectory: VecDeque::new(),
            last_room: None,
        }
    }

    /// Spawn an agent uniformly over the canvas with a random velocity.
    pub fn spawn(canvas: Canvas, config: &AgentConfig, rng: &mut impl Rng) -> Self {
        let position = Vec2::new(
            rng.random_range(0.0..=canvas.width),
            rng.random_range(0.0..=canvas.height),
        );
        let s = config.spawn_speed;
        let velocity = Vec2::new(rng.random_range(-s..=s), rng.random_range(-s..=s));
        Self::new(position, velocity)
    }

    /// Current speed.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Recent positions, oldest first.
    pub const fn trajectory(&self) -> &VecDeque<Vec2> {
        &self.trajectory
    }

    /// The read-only view steering consumes.
    pub const fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position,
            velocity: self.velocity,
            is_anchor: self.is_anchor,
        }
    }

    /// Advance one tick: move, clamp speed, wrap at the canvas edges, and
    /// record the new position.
    pub fn integrate(&mut self, canvas: Canvas, config: &AgentConfig) {
        self.position += self.velocity;
        self.velocity = self.velocity.clamp_length(config.max_speed);
        self.position = canvas.wrap(self.position);

        if config.trajectory_capacity == 0 {
            return;
        }
        while self.trajectory.len() >= config.trajectory_capacity {
            self.trajectory.pop_front();
        }
        self.trajectory.push_back(self.position);
    }

    /// Anchor the agent if it qualifies. `anchors` are the positions of
    /// existing anchors. Returns `true` when the agent anchored this call.
    pub fn update_anchor(&mut self, anchors: &[Vec2], config: &AgentConfig) -> bool {
        if self.is_anchor {
            return false;
        }
        if self.speed() < config.anchor_speed {
            self.slow_ticks = self.slow_ticks.saturating_add(1);
        } else {
            self.slow_ticks = 0;
            return false;
        }

        let dwelled = self.slow_ticks >= config.anchor_dwell_ticks;
        let seasoned = self.trajectory.len() > config.anchor_min_trajectory;
        let spaced = anchors
            .iter()
            .all(|&a| self.position.distance(a) >= config.anchor_spacing);
        if dwelled && seasoned && spaced {
            self.is_anchor = true;
            self.velocity = Vec2::ZERO;
            debug!(x = self.position.x, y = self.position.y, "Agent anchored");
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn make_seasoned(position: Vec2, velocity: Vec2, config: &AgentConfig) -> Agent {
        let mut agent = Agent::new(position, Vec2::ZERO);
        for _ in 0..=config.anchor_min_trajectory {
            agent.integrate(Canvas::default(), config);
        }
        agent.velocity = velocity;
        agent
    }

    #[test]
    fn spawn_stays_on_canvas() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = AgentConfig::default();
        for _ in 0..100 {
            let agent = Agent::spawn(Canvas::default(), &config, &mut rng);
            assert!((0.0..=800.0).contains(&agent.position.x));
            assert!((0.0..=600.0).contains(&agent.position.y));
            assert!(agent.velocity.x.abs() <= 2.0 && agent.velocity.y.abs() <= 2.0);
        }
    }

    #[test]
    fn integrate_moves_clamps_and_wraps() {
        let config = AgentConfig::default();
        let mut agent = Agent::new(Vec2::new(798.0, 300.0), Vec2::new(6.0, 8.0));
        agent.integrate(Canvas::default(), &config);
        // Moved past the right edge, wrapped to x = 0.
        assert!(agent.position.x.abs() < 1e-4);
        assert!((agent.position.y - 308.0).abs() < 1e-4);
        assert!((agent.speed() - 4.0).abs() < 1e-4);
        assert_eq!(agent.trajectory().len(), 1);
    }

    #[test]
    fn trajectory_is_bounded() {
        let config = AgentConfig {
            trajectory_capacity: 5,
            ..AgentConfig::default()
        };
        let mut agent = Agent::new(Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0));
        for _ in 0..20 {
            agent.integrate(Canvas::default(), &config);
        }
        assert_eq!(agent.trajectory().len(), 5);
        let oldest = agent.trajectory().front().copied().unwrap_or_default();
        assert!((oldest.x - 26.0).abs() < 1e-4);
    }

    #[test]
    fn slow_seasoned_agent_anchors() {
        let config = AgentConfig::default();
        let mut agent = make_seasoned(Vec2::new(100.0, 100.0), Vec2::new(0.1, 0.0), &config);
        assert!(agent.update_anchor(&[], &config));
        assert!(agent.is_anchor);
        assert_eq!(agent.velocity, Vec2::ZERO);
        assert!(!agent.update_anchor(&[], &config));
    }

    #[test]
    fn anchor_spacing_is_respected() {
        let config = AgentConfig::default();
        let mut agent = make_seasoned(Vec2::new(100.0, 100.0), Vec2::ZERO, &config);
        assert!(!agent.update_anchor(&[Vec2::new(150.0, 100.0)], &config));
        assert!(agent.update_anchor(&[Vec2::new(300.0, 100.0)], &config));
    }

    #[test]
    fn fresh_agent_never_anchors() {
        let config = AgentConfig::default();
        let mut agent = Agent::new(Vec2::new(100.0, 100.0), Vec2::ZERO);
        assert!(!agent.update_anchor(&[], &config));
    }

    #[test]
    fn dwell_requires_consecutive_slow_ticks() {
        let config = AgentConfig {
            anchor_dwell_ticks: 3,
            ..AgentConfig::default()
        };
        let mut agent = make_seasoned(Vec2::new(100.0, 100.0), Vec2::ZERO, &config);
        assert!(!agent.update_anchor(&[], &config));
        assert!(!agent.update_anchor(&[], &config));
        agent.velocity = Vec2::new(1.0, 0.0);
        assert!(!agent.update_anchor(&[], &config));
        agent.velocity = Vec2::ZERO;
        assert!(!agent.update_anchor(&[], &config));
        assert!(!agent.update_anchor(&[], &config));
        assert!(agent.update_anchor(&[], &config));
    }
}
