//! Post-commit navigation force field.
//!
//! Once the layout commits, every agent is steered by a layered field over
//! the shared [`Layout`]:
//!
//! 1. Damping: the incoming velocity is scaled by `damping`.
//! 2. Soft forces, each added in turn against the running velocity:
//!    circulation pull, corridor bias, hierarchy tiers, wall repulsion,
//!    wall sliding, door attraction, wrong-side door repulsion, column
//!    repulsion, and room-type behaviour.
//! 3. Door proximity: snap toward nearby doors, then clear off them.
//! 4. Pacing: room-type speed scaling and the private-room density limit.
//! 5. Look-ahead: damp velocity that would carry the agent onto a wall face
//!    it is currently clear of.
//! 6. Hard corrections: strip velocity heading into nearby faces, push the
//!    agent out of the collision buffer, and damp at junctions.
//! 7. Final clamp.
//!
//! Collision always uses wall faces, never centerlines. Degenerate vectors
//! contribute nothing.

use std::collections::BTreeMap;

use serde::Serialize;
use swarm_layout::Layout;
use swarm_types::{RoomId, RoomType, Segment, Tier, Vec2};

use crate::agent::AgentSnapshot;
use crate::config::NavigationConfig;

/// The outcome of steering one agent for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Steering {
    /// The agent's new velocity.
    pub velocity: Vec2,
    /// Positional push-out to apply before integrating.
    pub displacement: Vec2,
}

/// Every collision face of every wall.
fn faces(layout: &Layout) -> impl Iterator<Item = Segment> + '_ {
    layout.walls().iter().flat_map(|wall| wall.faces())
}

/// Door attraction strength for a room type.
const fn door_strength(room_type: RoomType, config: &NavigationConfig) -> f32 {
    match room_type {
        RoomType::Public => config.door_public,
        RoomType::Private => config.door_private,
        RoomType::Service => config.door_service,
    }
}

/// Velocity multiplier for an agent well inside a room of this type.
const fn pace(room_type: RoomType, config: &NavigationConfig) -> f32 {
    match room_type {
        RoomType::Public => config.public_pace,
        RoomType::Private => config.private_pace,
        RoomType::Service => config.service_pace,
    }
}

/// Count the positions inside each room.
pub fn room_occupancy(layout: &Layout, positions: &[Vec2]) -> BTreeMap<RoomId, usize> {
    let mut occupancy = BTreeMap::new();
    for room in layout.rooms() {
        let count = positions.iter().filter(|&&p| room.rect.contains(p)).count();
        if count > 0 {
            occupancy.insert(room.id, count);
        }
    }
    occupancy
}

// -------------------------------------------------------------------
// Soft forces
// -------------------------------------------------------------------

/// Pull along floors toward the horizontal center, along primary columns
/// toward the vertical center, and toward the core.
pub fn circulation_force(position: Vec2, layout: &Layout, config: &NavigationConfig) -> Vec2 {
    let center = layout.canvas().center();
    let mut force = Vec2::ZERO;

    for &y in layout.floors() {
        if (position.y - y).abs() < config.floor_pull_band {
            force.x += if position.x < center.x { config.floor_pull } else { -config.floor_pull };
        }
    }
    for column in layout.primary_columns() {
        if (position.x - column.x).abs() < config.column_pull_band {
            force.y += if position.y > center.y { config.column_pull } else { -config.column_pull };
        }
    }
    if let Some(core) = layout.core() {
        force += (core - position).normalize_or_zero() * config.core_pull;
    }
    force
}

/// Push along the floor lines in the current horizontal heading, stronger
/// on primary floors.
pub fn corridor_force(
    position: Vec2,
    velocity: Vec2,
    layout: &Layout,
    config: &NavigationConfig,
) -> Vec2 {
    let heading = velocity.heading_sign_x();
    let on = |y: f32| (position.y - y).abs() < config.corridor_band;

    let primary = layout.primary_floors().iter().filter(|&&y| on(y)).count();
    let secondary = layout.secondary_floors().iter().filter(|&&y| on(y)).count();

    #[allow(clippy::cast_precision_loss)] // floor counts are tiny
    let x = (primary as f32).mul_add(
        config.primary_corridor,
        secondary as f32 * config.secondary_corridor,
    );
    Vec2::new(x * heading, 0.0)
}

/// Tier-dependent steering for the rooms containing `position`: spine rooms
/// reinforce lateral motion, terminal rooms pull toward the nearest
/// circulation room.
pub fn hierarchy_force(
    position: Vec2,
    velocity: Vec2,
    layout: &Layout,
    config: &NavigationConfig,
) -> Vec2 {
    let mut force = Vec2::ZERO;
    for room in layout.rooms().filter(|room| room.rect.contains(position)) {
        match layout.hierarchy().tier_of(room.id) {
            Some(Tier::Spine) if velocity.x.abs() > config.spine_min_speed => {
                force.x += config.spine_push * velocity.heading_sign_x();
            }
            Some(Tier::Terminal) => {
                if let Some(target) = nearest_circulation_center(position, layout) {
                    force += (target - position).normalize_or_zero() * config.terminal_pull;
                }
            }
            _ => {}
        }
    }
    force
}

/// Center of the circulation room closest to `position`.
fn nearest_circulation_center(position: Vec2, layout: &Layout) -> Option<Vec2> {
    layout
        .graph()
        .circulation()
        .iter()
        .filter_map(|&id| layout.room(id))
        .map(|room| room.rect.center())
        .min_by(|a, b| a.distance(position).total_cmp(&b.distance(position)))
}

/// Push away from wall faces within `wall_buffer`, growing linearly toward
/// contact. Suppressed entirely near any door so agents can pass through.
pub fn wall_repulsion(position: Vec2, layout: &Layout, config: &NavigationConfig) -> Vec2 {
    let near_door = layout
        .doors()
        .iter()
        .any(|door| position.distance(door.position) < config.door_suppression_radius);
    if near_door {
        return Vec2::ZERO;
    }

    faces(layout).fold(Vec2::ZERO, |force, face| {
        let hit = face.distance_to(position);
        if hit.distance <= 0.0 || hit.distance > config.wall_buffer {
            return force;
        }
        let Some(away) = hit.offset.normalize() else {
            return force;
        };
        let falloff = (config.wall_buffer - hit.distance) / config.wall_buffer;
        force + away * (config.wall_repulsion * falloff)
    })
}

/// Tangential nudge along faces that are near but not touching.
pub fn wall_slide(position: Vec2, layout: &Layout, config: &NavigationConfig) -> Vec2 {
    faces(layout).fold(Vec2::ZERO, |force, face| {
        let hit = face.distance_to(position);
        if hit.distance <= config.slide_min_distance || hit.distance >= config.slide_max_distance {
            return force;
        }
        hit.offset
            .normalize()
            .map_or(force, |normal| force + normal.rotate_90() * config.wall_slide)
    })
}

/// Attraction toward doors the agent approaches from the correct side,
/// weighted by the door's room type and by how squarely it approaches.
pub fn door_attraction(position: Vec2, layout: &Layout, config: &NavigationConfig) -> Vec2 {
    layout.doors().iter().fold(Vec2::ZERO, |force, door| {
        let Some(toward) = (door.position - position).normalize() else {
            return force;
        };
        let approach = toward.dot(-door.normal);
        if approach < config.door_min_approach {
            return force;
        }
        let room_type = layout.room(door.room).map_or(RoomType::Public, |room| room.room_type);
        force + toward * (door_strength(room_type, config) * approach)
    })
}

/// Push away from doors the agent sits on the forbidden side of.
pub fn door_wrong_side_repulsion(
    position: Vec2,
    layout: &Layout,
    config: &NavigationConfig,
) -> Vec2 {
    layout.doors().iter().fold(Vec2::ZERO, |force, door| {
        match (position - door.position).normalize() {
            Some(away) if away.dot(door.normal) > config.wrong_side_threshold => {
                force + away * config.wrong_side_repulsion
            }
            _ => force,
        }
    })
}

/// Inverse-distance push away from nearby primary columns.
pub fn column_repulsion(position: Vec2, layout: &Layout, config: &NavigationConfig) -> Vec2 {
    layout.primary_columns().iter().fold(Vec2::ZERO, |force, &column| {
        let d = position.distance(column);
        if d > 0.0 && d < config.column_radius {
            force + (position - column).normalize_or_zero() * (config.column_repulsion / d)
        } else {
            force
        }
    })
}

/// Room-type behaviour for agents well inside a room: public rooms gather
/// toward their center, private rooms spread away from it, service rooms
/// reinforce the current heading.
pub fn room_behavior(
    position: Vec2,
    velocity: Vec2,
    layout: &Layout,
    config: &NavigationConfig,
) -> Vec2 {
    let inset = -config.room_inset;
    layout
        .rooms()
        .filter(|room| room.rect.inflate(inset, inset).contains(position))
        .fold(Vec2::ZERO, |force, room| {
            let Some(toward) = (room.rect.center() - position).normalize() else {
                return force;
            };
            match room.room_type {
                RoomType::Public => force + toward * config.public_center_pull,
                RoomType::Private => force - toward * config.private_center_push,
                RoomType::Service => force + velocity.normalize_or_zero() * config.service_heading,
            }
        })
}

// -------------------------------------------------------------------
// Door proximity and pacing
// -------------------------------------------------------------------

/// Pull toward every door within `door_snap_radius`.
pub fn door_snap(position: Vec2, layout: &Layout, config: &NavigationConfig) -> Vec2 {
    layout
        .doors()
        .iter()
        .filter(|door| position.distance(door.position) < config.door_snap_radius)
        .fold(Vec2::ZERO, |force, door| {
            force + (door.position - position).normalize_or_zero() * config.door_snap
        })
}

/// Push off every door within `door_clearance_radius`.
pub fn door_clearance(position: Vec2, layout: &Layout, config: &NavigationConfig) -> Vec2 {
    layout
        .doors()
        .iter()
        .filter(|door| position.distance(door.position) < config.door_clearance_radius)
        .fold(Vec2::ZERO, |force, door| {
            force + (position - door.position).normalize_or_zero() * config.door_clearance
        })
}

/// Combined velocity multiplier from room-type pacing and the private-room
/// density limit.
pub fn pace_factor(
    position: Vec2,
    layout: &Layout,
    occupancy: &BTreeMap<RoomId, usize>,
    config: &NavigationConfig,
) -> f32 {
    let inset = -config.room_inset;
    let mut factor = 1.0;
    for room in layout.rooms() {
        if room.rect.inflate(inset, inset).contains(position) {
            factor *= pace(room.room_type, config);
        }
        let crowded = occupancy.get(&room.id).copied().unwrap_or(0) > config.private_capacity;
        if room.room_type == RoomType::Private && crowded && room.rect.contains(position) {
            factor *= config.private_crowding;
        }
    }
    factor
}

/// Whether moving by `velocity` would bring the agent onto a face it is
/// currently clear of.
pub fn lookahead_blocked(
    position: Vec2,
    velocity: Vec2,
    layout: &Layout,
    config: &NavigationConfig,
) -> bool {
    let next = position + velocity;
    faces(layout).any(|face| {
        face.distance_to(position).distance > config.lookahead_clear
            && face.distance_to(next).distance < config.lookahead_hit
    })
}

// -------------------------------------------------------------------
// Hard corrections
// -------------------------------------------------------------------

/// Remove the velocity component heading into any face within the
/// collision buffer. Faces are applied in turn.
pub fn correct_velocity(
    position: Vec2,
    velocity: Vec2,
    layout: &Layout,
    config: &NavigationConfig,
) -> Vec2 {
    if velocity == Vec2::ZERO {
        return velocity;
    }
    faces(layout).fold(velocity, |v, face| {
        let hit = face.distance_to(position);
        if hit.distance >= config.collision_buffer {
            return v;
        }
        let Some(normal) = hit.offset.normalize() else {
            return v;
        };
        let into = v.dot(normal);
        if into < 0.0 { v - normal * into } else { v }
    })
}

/// Displacement that pushes the agent out of the collision buffer of every
/// face it sits inside.
pub fn push_out(position: Vec2, layout: &Layout, config: &NavigationConfig) -> Vec2 {
    faces(layout).fold(Vec2::ZERO, |displacement, face| {
        let hit = face.distance_to(position);
        if hit.distance <= 0.0 || hit.distance >= config.collision_buffer {
            return displacement;
        }
        hit.offset.normalize().map_or(displacement, |normal| {
            displacement + normal * (config.collision_buffer - hit.distance)
        })
    })
}

/// Whether `position` sits at a junction: enough faces within
/// `junction_radius`.
pub fn at_junction(position: Vec2, layout: &Layout, config: &NavigationConfig) -> bool {
    faces(layout)
        .filter(|face| face.distance_to(position).distance < config.junction_radius)
        .take(config.junction_min_walls)
        .count()
        >= config.junction_min_walls
}

/// Steer one agent through the committed layout.
///
/// `occupancy` is the per-room head count of the tick's snapshot, from
/// [`room_occupancy`].
pub fn steer(
    agent: &AgentSnapshot,
    layout: &Layout,
    occupancy: &BTreeMap<RoomId, usize>,
    config: &NavigationConfig,
) -> Steering {
    let position = agent.position;

    // 1. Damping
    let mut velocity = agent.velocity * config.damping;

    // 2. Soft forces
    velocity += circulation_force(position, layout, config);
    velocity += corridor_force(position, velocity, layout, config);
    velocity += hierarchy_force(position, velocity, layout, config);
    velocity += wall_repulsion(position, layout, config);
    velocity += wall_slide(position, layout, config);
    velocity += door_attraction(position, layout, config) * config.door_attraction_weight;
    velocity += door_wrong_side_repulsion(position, layout, config);
    velocity += column_repulsion(position, layout, config);
    velocity += room_behavior(position, velocity, layout, config);

    // 3. Door proximity
    velocity += door_snap(position, layout, config);
    velocity += door_clearance(position, layout, config);

    // 4. Pacing
    velocity *= pace_factor(position, layout, occupancy, config);

    // 5. Look-ahead
    if lookahead_blocked(position, velocity, layout, config) {
        velocity *= config.lookahead_damping;
    }

    // 6. Hard corrections
    velocity = correct_velocity(position, velocity, layout, config);
    let displacement = push_out(position, layout, config);
    if at_junction(position, layout, config) {
        velocity *= config.junction_damping;
    }

    // 7. Clamp
    let velocity = if velocity.length_squared() > config.rest_epsilon {
        velocity.clamp_length(config.max_speed)
    } else {
        Vec2::ZERO
    };

    Steering { velocity, displacement }
}
