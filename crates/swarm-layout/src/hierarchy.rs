//! Circulation hierarchy: tiers rooms by their distance to circulation.
//!
//! Every live room lands in exactly one tier:
//!
//! - spine: a circulation room centred near a primary floor;
//! - primary branch: any other circulation room (distance 0);
//! - secondary branch: one hop from circulation;
//! - terminal: two or more hops, or unreachable.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use swarm_types::{Room, RoomId, RoomType, Tier};
use tracing::debug;

use crate::config::HierarchyConfig;
use crate::graph::RoomGraph;

/// Partition of the live rooms into four disjoint tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CirculationHierarchy {
    /// Circulation rooms on a primary floor.
    pub spine: BTreeSet<RoomId>,
    /// Remaining circulation rooms.
    pub primary_branch: BTreeSet<RoomId>,
    /// Rooms one hop from circulation.
    pub secondary_branch: BTreeSet<RoomId>,
    /// Rooms two or more hops from circulation, or cut off from it.
    pub terminal: BTreeSet<RoomId>,
}

impl CirculationHierarchy {
    /// Tier every room in `rooms` using `graph` and the primary floor levels.
    pub fn build(
        rooms: &BTreeMap<RoomId, Room>,
        graph: &RoomGraph,
        primary_floors: &[f32],
        config: &HierarchyConfig,
    ) -> Self {
        let mut hierarchy = Self::default();

        for room in rooms.values() {
            let on_primary_floor = primary_floors
                .iter()
                .any(|&y| (room.rect.center().y - y).abs() < config.spine_floor_tolerance);

            let tier = if graph.is_circulation(room.id) && on_primary_floor {
                Tier::Spine
            } else {
                match graph.circulation_distance(room.id) {
                    Some(0) => Tier::PrimaryBranch,
                    Some(1) => Tier::SecondaryBranch,
                    _ => Tier::Terminal,
                }
            };
            hierarchy.tier_set_mut(tier).insert(room.id);
        }

        debug!(
            spine = hierarchy.spine.len(),
            primary = hierarchy.primary_branch.len(),
            secondary = hierarchy.secondary_branch.len(),
            terminal = hierarchy.terminal.len(),
            "Built circulation hierarchy"
        );
        hierarchy
    }

    /// The tier `room` belongs to, if it is known.
    pub fn tier_of(&self, room: RoomId) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|&tier| self.tier_set(tier).contains(&room))
    }

    /// Members of one tier.
    pub const fn tier_set(&self, tier: Tier) -> &BTreeSet<RoomId> {
        match tier {
            Tier::Spine => &self.spine,
            Tier::PrimaryBranch => &self.primary_branch,
            Tier::SecondaryBranch => &self.secondary_branch,
            Tier::Terminal => &self.terminal,
        }
    }

    const fn tier_set_mut(&mut self, tier: Tier) -> &mut BTreeSet<RoomId> {
        match tier {
            Tier::Spine => &mut self.spine,
            Tier::PrimaryBranch => &mut self.primary_branch,
            Tier::SecondaryBranch => &mut self.secondary_branch,
            Tier::Terminal => &mut self.terminal,
        }
    }

    /// Total number of tiered rooms.
    pub fn len(&self) -> usize {
        Tier::ALL
            .into_iter()
            .map(|tier| self.tier_set(tier).len())
            .fold(0_usize, usize::saturating_add)
    }

    /// Whether no room is tiered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Infer room types from tiers and return how many rooms changed type.
    ///
    /// Spine and primary-branch rooms become public and terminal rooms
    /// become private, overriding any current type. Secondary-branch rooms
    /// become service only when they are not already public or private.
    pub fn apply_room_types(&self, rooms: &mut BTreeMap<RoomId, Room>) -> usize {
        let mut changed = 0_usize;
        for room in rooms.values_mut() {
            let next = match self.tier_of(room.id) {
                Some(Tier::Spine | Tier::PrimaryBranch) => RoomType::Public,
                Some(Tier::SecondaryBranch) => match room.room_type {
                    RoomType::Public | RoomType::Private => room.room_type,
                    RoomType::Service => RoomType::Service,
                },
                Some(Tier::Terminal) => RoomType::Private,
                None => room.room_type,
            };
            if next != room.room_type {
                room.room_type = next;
                changed = changed.saturating_add(1);
            }
        }
        changed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use swarm_types::{Door, Rect, Segment, Vec2};

    use super::*;
    use crate::config::DoorConfig;

    /// Three rooms in a row, the left one with an exterior door on its top
    /// edge, each pair joined by a shared door.
    fn make_chain() -> (BTreeMap<RoomId, Room>, Vec<Door>) {
        let rects = [
            Rect::new(100.0, 100.0, 100.0, 80.0),
            Rect::new(200.0, 100.0, 100.0, 80.0),
            Rect::new(300.0, 100.0, 100.0, 80.0),
        ];
        let rooms: BTreeMap<RoomId, Room> = rects
            .iter()
            .enumerate()
            .map(|(i, rect)| {
                let id = RoomId::new(u32::try_from(i).unwrap());
                (id, Room::new(id, *rect, RoomType::Service))
            })
            .collect();
        let door = |room: u32, a: Vec2, b: Vec2| {
            let wall = Segment::new(a, b);
            Door {
                position: wall.midpoint(),
                normal: wall.normal().unwrap(),
                wall,
                room: RoomId::new(room),
                emergency: false,
            }
        };
        let doors = vec![
            door(0, Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)),
            door(0, Vec2::new(200.0, 100.0), Vec2::new(200.0, 180.0)),
            door(1, Vec2::new(300.0, 100.0), Vec2::new(300.0, 180.0)),
        ];
        (rooms, doors)
    }

    #[test]
    fn chain_distances_and_tiers() {
        let (rooms, doors) = make_chain();
        let graph = RoomGraph::build(&rooms, &doors, &DoorConfig::default());
        assert_eq!(graph.circulation_distance(RoomId::new(0)), Some(0));
        assert_eq!(graph.circulation_distance(RoomId::new(1)), Some(1));
        assert_eq!(graph.circulation_distance(RoomId::new(2)), Some(2));

        let hierarchy =
            CirculationHierarchy::build(&rooms, &graph, &[], &HierarchyConfig::default());
        assert_eq!(hierarchy.tier_of(RoomId::new(0)), Some(Tier::PrimaryBranch));
        assert_eq!(hierarchy.tier_of(RoomId::new(1)), Some(Tier::SecondaryBranch));
        assert_eq!(hierarchy.tier_of(RoomId::new(2)), Some(Tier::Terminal));
        assert_eq!(hierarchy.len(), rooms.len());
    }

    #[test]
    fn circulation_room_on_primary_floor_is_spine() {
        let (rooms, doors) = make_chain();
        let graph = RoomGraph::build(&rooms, &doors, &DoorConfig::default());
        // Room centres sit at y = 140.
        let hierarchy =
            CirculationHierarchy::build(&rooms, &graph, &[150.0], &HierarchyConfig::default());
        assert!(hierarchy.spine.contains(&RoomId::new(0)));
        assert!(hierarchy.primary_branch.is_empty());
    }

    #[test]
    fn secondary_branch_keeps_explicit_types() {
        let (mut rooms, doors) = make_chain();
        if let Some(room) = rooms.get_mut(&RoomId::new(1)) {
            room.room_type = RoomType::Private;
        }
        let graph = RoomGraph::build(&rooms, &doors, &DoorConfig::default());
        let hierarchy =
            CirculationHierarchy::build(&rooms, &graph, &[], &HierarchyConfig::default());
        hierarchy.apply_room_types(&mut rooms);

        assert_eq!(rooms[&RoomId::new(0)].room_type, RoomType::Public);
        assert_eq!(rooms[&RoomId::new(1)].room_type, RoomType::Private);
        assert_eq!(rooms[&RoomId::new(2)].room_type, RoomType::Private);
    }

    #[test]
    fn terminal_overrides_public() {
        let (mut rooms, doors) = make_chain();
        if let Some(room) = rooms.get_mut(&RoomId::new(2)) {
            room.room_type = RoomType::Public;
        }
        let graph = RoomGraph::build(&rooms, &doors, &DoorConfig::default());
        let hierarchy =
            CirculationHierarchy::build(&rooms, &graph, &[], &HierarchyConfig::default());
        let changed = hierarchy.apply_room_types(&mut rooms);
        assert_eq!(rooms[&RoomId::new(2)].room_type, RoomType::Private);
        // Room 0 becomes public, room 2 private, room 1 stays service.
        assert_eq!(changed, 2);
        assert_eq!(hierarchy.apply_room_types(&mut rooms), 0);
    }
}
