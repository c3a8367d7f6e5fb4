//! Pre-commit flocking.
//!
//! Before the layout commits, non-anchor agents flock: they align with and
//! drift toward their neighbours, keep a little personal space, and are
//! pushed away from existing anchors so that new anchors form elsewhere.
//! Every term reads the tick's snapshot only.

use swarm_types::Vec2;
use swarm_types::geometry::centroid;

use crate::agent::AgentSnapshot;
use crate::config::FlockingConfig;

/// Snapshots of every other agent within `neighbor_radius` of `me`.
pub fn neighbors<'a>(
    me: usize,
    agents: &'a [AgentSnapshot],
    config: &FlockingConfig,
) -> Vec<&'a AgentSnapshot> {
    let Some(self_agent) = agents.get(me) else {
        return Vec::new();
    };
    agents
        .iter()
        .enumerate()
        .filter(|&(i, other)| {
            i != me && self_agent.position.distance(other.position) < config.neighbor_radius
        })
        .map(|(_, other)| other)
        .collect()
}

/// Steer toward the neighbours' mean velocity.
pub fn alignment(
    agent: &AgentSnapshot,
    neighbors: &[&AgentSnapshot],
    config: &FlockingConfig,
) -> Vec2 {
    let velocities: Vec<Vec2> = neighbors.iter().map(|n| n.velocity).collect();
    centroid(&velocities).map_or(Vec2::ZERO, |mean| (mean - agent.velocity) * config.alignment)
}

/// Steer toward the neighbours' centroid.
pub fn cohesion(
    agent: &AgentSnapshot,
    neighbors: &[&AgentSnapshot],
    config: &FlockingConfig,
) -> Vec2 {
    let positions: Vec<Vec2> = neighbors.iter().map(|n| n.position).collect();
    centroid(&positions).map_or(Vec2::ZERO, |center| (center - agent.position) * config.cohesion)
}

/// Mean unit push away from neighbours closer than `separation_distance`.
pub fn separation(
    agent: &AgentSnapshot,
    neighbors: &[&AgentSnapshot],
    config: &FlockingConfig,
) -> Vec2 {
    let pushes: Vec<Vec2> = neighbors
        .iter()
        .filter_map(|other| {
            let d = agent.position.distance(other.position);
            (d > 0.0 && d < config.separation_distance)
                .then(|| (agent.position - other.position) / d)
        })
        .collect();
    centroid(&pushes).map_or(Vec2::ZERO, |mean| mean * config.separation)
}

/// Push away from every anchor within `anchor_repulsion_radius`, falling
/// off with distance.
pub fn anchor_repulsion(
    agent: &AgentSnapshot,
    agents: &[AgentSnapshot],
    config: &FlockingConfig,
) -> Vec2 {
    agents
        .iter()
        .filter(|other| other.is_anchor)
        .fold(Vec2::ZERO, |acc, other| {
            let d = agent.position.distance(other.position);
            if d > 0.0 && d < config.anchor_repulsion_radius {
                let away = (agent.position - other.position).normalize_or_zero();
                acc + away * (config.anchor_repulsion / d)
            } else {
                acc
            }
        })
}

/// The flocking velocity for agent `me` after one tick.
///
/// Anchors are pinned and keep their (zero) velocity. An out-of-range index
/// yields the zero vector.
pub fn flocking_velocity(me: usize, agents: &[AgentSnapshot], config: &FlockingConfig) -> Vec2 {
    let Some(agent) = agents.get(me) else {
        return Vec2::ZERO;
    };
    if agent.is_anchor {
        return agent.velocity;
    }

    let near = neighbors(me, agents, config);
    let velocity = agent.velocity
        + alignment(agent, &near, config)
        + cohesion(agent, &near, config)
        + separation(agent, &near, config)
        + anchor_repulsion(agent, agents, config);

    velocity.clamp_length(config.max_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_agent(x: f32, y: f32, vx: f32, vy: f32) -> AgentSnapshot {
        AgentSnapshot {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            is_anchor: false,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn neighbors_exclude_self_and_distant_agents() {
        let agents = [
            make_agent(0.0, 0.0, 0.0, 0.0),
            make_agent(30.0, 0.0, 0.0, 0.0),
            make_agent(100.0, 0.0, 0.0, 0.0),
        ];
        let near = neighbors(0, &agents, &FlockingConfig::default());
        assert_eq!(near.len(), 1);
        assert!(approx(near[0].position.x, 30.0));
    }

    #[test]
    fn lone_agent_keeps_its_velocity() {
        let agents = [make_agent(100.0, 100.0, 1.0, 0.5)];
        let v = flocking_velocity(0, &agents, &FlockingConfig::default());
        assert!(approx(v.x, 1.0));
        assert!(approx(v.y, 0.5));
    }

    #[test]
    fn alignment_and_cohesion_pull_toward_neighbour() {
        let config = FlockingConfig::default();
        let agents = [make_agent(0.0, 0.0, 0.0, 0.0), make_agent(40.0, 0.0, 1.0, 0.0)];
        let v = flocking_velocity(0, &agents, &config);
        // alignment 0.05 * 1 + cohesion 0.01 * 40
        assert!(approx(v.x, 0.45));
        assert!(approx(v.y, 0.0));
    }

    #[test]
    fn separation_pushes_crowded_agents_apart() {
        let config = FlockingConfig {
            alignment: 0.0,
            cohesion: 0.0,
            ..FlockingConfig::default()
        };
        let agents = [make_agent(0.0, 0.0, 0.0, 0.0), make_agent(10.0, 0.0, 0.0, 0.0)];
        let v = flocking_velocity(0, &agents, &config);
        assert!(approx(v.x, -0.15));
    }

    #[test]
    fn anchors_repel_and_stay_pinned() {
        let config = FlockingConfig::default();
        let mut anchor = make_agent(100.0, 0.0, 0.0, 0.0);
        anchor.is_anchor = true;
        let agents = [make_agent(0.0, 0.0, 0.0, 0.0), anchor];
        let v = anchor_repulsion(&agents[0], &agents, &config);
        assert!(approx(v.x, -0.003));
        assert_eq!(flocking_velocity(1, &agents, &config), Vec2::ZERO);
    }

    #[test]
    fn flocking_speed_is_clamped() {
        let agents = [make_agent(0.0, 0.0, 5.0, 0.0)];
        let v = flocking_velocity(0, &agents, &FlockingConfig::default());
        assert!(approx(v.length(), 2.2));
    }

    #[test]
    fn out_of_range_index_is_zero() {
        assert_eq!(flocking_velocity(3, &[], &FlockingConfig::default()), Vec2::ZERO);
    }
}
