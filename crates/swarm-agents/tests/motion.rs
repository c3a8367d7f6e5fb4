//! Integration tests for agent motion.
//!
//! These drive agents the way the tick driver does: snapshot everyone,
//! compute every new velocity from the snapshot, then integrate.

// Integration tests use unwrap/indexing freely -- panicking on failure is
// the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::cast_precision_loss,
    clippy::missing_panics_doc
)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use swarm_agents::{
    Agent, AgentConfig, AgentSnapshot, FlockingConfig, NavigationConfig, flocking_velocity,
    room_occupancy, steer,
};
use swarm_layout::{Layout, LayoutConfig};
use swarm_types::{Canvas, Vec2};

// =============================================================================
// Helpers
// =============================================================================

fn make_swarm(count: usize, seed: u64) -> Vec<Agent> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Agent::spawn(Canvas::default(), &AgentConfig::default(), &mut rng))
        .collect()
}

fn snapshots(agents: &[Agent]) -> Vec<AgentSnapshot> {
    agents.iter().map(Agent::snapshot).collect()
}

fn make_committed() -> Layout {
    let mut layout = Layout::new(LayoutConfig::default()).unwrap();
    let anchors = [
        Vec2::new(250.0, 405.0),
        Vec2::new(400.0, 405.0),
        Vec2::new(550.0, 405.0),
    ];
    let positions: Vec<Vec2> = [200.0, 300.0, 400.0]
        .into_iter()
        .map(|y| Vec2::new(10.0, y))
        .chain(anchors)
        .collect();
    layout
        .commit(&anchors, &positions, &mut StdRng::seed_from_u64(3))
        .unwrap();
    layout
}

// =============================================================================
// Flocking
// =============================================================================

#[test]
fn flocking_swarm_stays_on_canvas_and_under_speed() {
    let agent_config = AgentConfig::default();
    let flocking = FlockingConfig::default();
    let mut agents = make_swarm(40, 7);

    for _ in 0..300 {
        let snap = snapshots(&agents);
        for (i, agent) in agents.iter_mut().enumerate() {
            agent.velocity = flocking_velocity(i, &snap, &flocking);
            agent.integrate(Canvas::default(), &agent_config);
        }
    }

    for agent in &agents {
        assert!((0.0..=800.0).contains(&agent.position.x));
        assert!((0.0..=600.0).contains(&agent.position.y));
        assert!(agent.speed() <= 4.0 + 1e-4);
        assert_eq!(agent.trajectory().len(), 300);
    }
}

#[test]
fn velocity_updates_are_order_independent() {
    let flocking = FlockingConfig::default();
    let agents = make_swarm(25, 11);
    let snap = snapshots(&agents);

    let forward: Vec<Vec2> = (0..snap.len())
        .map(|i| flocking_velocity(i, &snap, &flocking))
        .collect();
    let mut backward: Vec<Vec2> = (0..snap.len())
        .rev()
        .map(|i| flocking_velocity(i, &snap, &flocking))
        .collect();
    backward.reverse();

    assert_eq!(forward, backward);
}

// =============================================================================
// Anchoring
// =============================================================================

#[test]
fn clustered_anchors_keep_their_spacing() {
    let config = AgentConfig::default();
    // Ten resting agents within 45 units of each other, plus one far away.
    let mut agents: Vec<Agent> = (0..10)
        .map(|i| Agent::new(Vec2::new(100.0 + 5.0 * i as f32, 100.0), Vec2::ZERO))
        .chain(std::iter::once(Agent::new(Vec2::new(600.0, 400.0), Vec2::ZERO)))
        .collect();
    for _ in 0..=config.anchor_min_trajectory {
        for agent in &mut agents {
            agent.integrate(Canvas::default(), &config);
        }
    }

    let mut anchors: Vec<Vec2> = Vec::new();
    for agent in &mut agents {
        if agent.update_anchor(&anchors, &config) {
            anchors.push(agent.position);
        }
    }

    assert_eq!(anchors.len(), 2);
    for (i, a) in anchors.iter().enumerate() {
        for b in &anchors[i + 1..] {
            assert!(a.distance(*b) >= config.anchor_spacing);
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn navigation_respects_speed_clamp_everywhere() {
    let layout = make_committed();
    let config = NavigationConfig::default();
    let agents = make_swarm(60, 5);
    let snap = snapshots(&agents);
    let positions: Vec<Vec2> = snap.iter().map(|a| a.position).collect();
    let occupancy = room_occupancy(&layout, &positions);

    for agent in &snap {
        let steering = steer(agent, &layout, &occupancy, &config);
        assert!(steering.velocity.length() <= config.max_speed + 1e-4);
        assert!(steering.velocity.x.is_finite() && steering.velocity.y.is_finite());
        assert!(steering.displacement.length() <= 2.0 * config.collision_buffer * 4.0);
    }
}

#[test]
fn agents_on_a_wall_are_pushed_off_it() {
    let layout = make_committed();
    let config = NavigationConfig::default();
    // The floor at y = 300 has faces at 295 and 305. Start 2 units below
    // the lower face, heading up into it.
    let agent = AgentSnapshot {
        position: Vec2::new(120.0, 307.0),
        velocity: Vec2::new(0.0, -2.0),
        is_anchor: false,
    };
    let steering = steer(&agent, &layout, &room_occupancy(&layout, &[]), &config);
    assert!(steering.displacement.y > 0.0);
    assert!(steering.velocity.y >= -1e-4);
}

#[test]
fn steered_swarm_stays_finite_over_time() {
    let layout = make_committed();
    let agent_config = AgentConfig::default();
    let config = NavigationConfig::default();
    let mut agents = make_swarm(30, 9);

    for _ in 0..200 {
        let snap = snapshots(&agents);
        let positions: Vec<Vec2> = snap.iter().map(|a| a.position).collect();
        let occupancy = room_occupancy(&layout, &positions);
        for (agent, view) in agents.iter_mut().zip(&snap) {
            let steering = steer(view, &layout, &occupancy, &config);
            agent.velocity = steering.velocity;
            agent.position += steering.displacement;
            agent.integrate(layout.canvas(), &agent_config);
        }
    }

    for agent in &agents {
        assert!(agent.position.x.is_finite() && agent.position.y.is_finite());
        assert!(agent.speed() <= config.max_speed + 1e-4);
    }
}
