//! Room connectivity graph derived from rooms and doors.
//!
//! The graph is a pure function of the current rooms and doors and is always
//! rebuilt from scratch. Each door is resolved by probing a point on either
//! side of it along its normal:
//!
//! - both probes land in different rooms: the rooms become neighbours;
//! - exactly one probe lands in a room: that room reaches the exterior and is
//!   a circulation room;
//! - otherwise the door links nothing and is recorded as unresolved.
//!
//! A room with no neighbours and no exterior door is isolated.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;
use swarm_types::{Door, Room, RoomId, Vec2};
use tracing::warn;

use crate::config::DoorConfig;
use crate::error::LayoutError;

/// What a single door connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorLink {
    /// The door joins two rooms (order carries no meaning).
    Rooms(RoomId, RoomId),
    /// The door leads from a room to the exterior.
    Exterior(RoomId),
}

impl DoorLink {
    /// Whether the link touches `room`.
    pub fn involves(self, room: RoomId) -> bool {
        match self {
            Self::Rooms(a, b) => a == room || b == room,
            Self::Exterior(a) => a == room,
        }
    }
}

/// A door whose probes did not resolve to a room pair or a room and the
/// exterior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnresolvedDoor {
    /// Index into the layout's door list.
    pub index: usize,
    /// Door position.
    pub position: Vec2,
    /// The room the door was generated for.
    pub room: RoomId,
}

/// Adjacency, exterior access, and isolation for every live room.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoomGraph {
    /// Neighbour sets. Every live room has an entry, possibly empty.
    adjacencies: BTreeMap<RoomId, BTreeSet<RoomId>>,
    /// Resolved link per door index.
    door_links: BTreeMap<usize, DoorLink>,
    /// Rooms with at least one exterior door.
    circulation: BTreeSet<RoomId>,
    /// Rooms with neither neighbours nor exterior access.
    isolated: BTreeSet<RoomId>,
    /// Doors that linked nothing.
    unresolved_doors: Vec<UnresolvedDoor>,
}

impl RoomGraph {
    /// Build the graph for `rooms` and `doors`.
    pub fn build(rooms: &BTreeMap<RoomId, Room>, doors: &[Door], config: &DoorConfig) -> Self {
        let mut graph = Self {
            adjacencies: rooms.keys().map(|&id| (id, BTreeSet::new())).collect(),
            ..Self::default()
        };

        for (index, door) in doors.iter().enumerate() {
            let offset = door.normal * config.probe_distance;
            let side_a = room_at_point(rooms, door.position + offset, config.probe_margin);
            let side_b = room_at_point(rooms, door.position - offset, config.probe_margin);

            let link = match (side_a, side_b) {
                (Some(a), Some(b)) if a != b => {
                    graph.adjacencies.entry(a).or_default().insert(b);
                    graph.adjacencies.entry(b).or_default().insert(a);
                    Some(DoorLink::Rooms(a, b))
                }
                (Some(a), None) | (None, Some(a)) => {
                    graph.circulation.insert(a);
                    Some(DoorLink::Exterior(a))
                }
                _ => None,
            };

            match link {
                Some(link) => {
                    graph.door_links.insert(index, link);
                }
                None => {
                    warn!(
                        door = index,
                        room = %door.room,
                        x = door.position.x,
                        y = door.position.y,
                        "Door probes resolved to no room pair or exterior"
                    );
                    graph.unresolved_doors.push(UnresolvedDoor {
                        index,
                        position: door.position,
                        room: door.room,
                    });
                }
            }
        }

        graph.isolated = graph
            .adjacencies
            .iter()
            .filter(|(id, neighbors)| neighbors.is_empty() && !graph.circulation.contains(id))
            .map(|(&id, _)| id)
            .collect();

        graph
    }

    /// Neighbour sets keyed by room.
    pub const fn adjacencies(&self) -> &BTreeMap<RoomId, BTreeSet<RoomId>> {
        &self.adjacencies
    }

    /// Neighbours of one room, or `None` if the room is not in the graph.
    pub fn neighbors(&self, room: RoomId) -> Option<&BTreeSet<RoomId>> {
        self.adjacencies.get(&room)
    }

    /// Number of neighbours of `room` (zero if unknown).
    pub fn neighbor_count(&self, room: RoomId) -> usize {
        self.adjacencies.get(&room).map_or(0, BTreeSet::len)
    }

    /// Resolved link per door index.
    pub const fn door_links(&self) -> &BTreeMap<usize, DoorLink> {
        &self.door_links
    }

    /// Rooms with exterior access.
    pub const fn circulation(&self) -> &BTreeSet<RoomId> {
        &self.circulation
    }

    /// Rooms with neither neighbours nor exterior access.
    pub const fn isolated(&self) -> &BTreeSet<RoomId> {
        &self.isolated
    }

    /// Doors that linked nothing.
    pub fn unresolved_doors(&self) -> &[UnresolvedDoor] {
        &self.unresolved_doors
    }

    /// Whether `room` has an exterior door.
    pub fn is_circulation(&self, room: RoomId) -> bool {
        self.circulation.contains(&room)
    }

    /// Whether `room` has neither neighbours nor exterior access.
    pub fn is_isolated(&self, room: RoomId) -> bool {
        self.isolated.contains(&room)
    }

    /// Breadth-first hop count from `room` to the nearest circulation room.
    ///
    /// Circulation rooms are at distance 0. Returns `None` when no
    /// circulation room is reachable or `room` is not in the graph.
    pub fn circulation_distance(&self, room: RoomId) -> Option<u32> {
        if !self.adjacencies.contains_key(&room) {
            return None;
        }
        if self.circulation.contains(&room) {
            return Some(0);
        }

        let mut visited = BTreeSet::from([room]);
        let mut queue = VecDeque::from([(room, 0_u32)]);

        while let Some((current, depth)) = queue.pop_front() {
            let Some(neighbors) = self.adjacencies.get(&current) else {
                continue;
            };
            for &neighbor in neighbors {
                if !visited.insert(neighbor) {
                    continue;
                }
                let next = depth.saturating_add(1);
                if self.circulation.contains(&neighbor) {
                    return Some(next);
                }
                queue.push_back((neighbor, next));
            }
        }
        None
    }

    /// Check that every door resolved to a room pair or an exterior link.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DanglingDoor`] for the first door that linked
    /// nothing.
    pub fn verify_door_links(&self) -> Result<(), LayoutError> {
        match self.unresolved_doors.first() {
            Some(door) => Err(LayoutError::DanglingDoor {
                door: door.index,
                position: door.position,
                room: door.room,
            }),
            None => Ok(()),
        }
    }
}

/// The first room, in handle order, whose rectangle inflated by `margin`
/// (negative shrinks) contains `p`.
pub fn room_at_point(rooms: &BTreeMap<RoomId, Room>, p: Vec2, margin: f32) -> Option<RoomId> {
    rooms
        .values()
        .find(|room| room.rect.inflate(margin, margin).contains(p))
        .map(|room| room.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use swarm_types::{Rect, RoomType, Segment};

    use super::*;

    fn make_rooms(rects: &[Rect]) -> BTreeMap<RoomId, Room> {
        rects
            .iter()
            .enumerate()
            .map(|(i, rect)| {
                let id = RoomId::new(u32::try_from(i).unwrap());
                (id, Room::new(id, *rect, RoomType::Public))
            })
            .collect()
    }

    fn make_door(room: RoomId, a: Vec2, b: Vec2) -> Door {
        let wall = Segment::new(a, b);
        Door {
            position: wall.midpoint(),
            normal: wall.normal().unwrap(),
            wall,
            room,
            emergency: false,
        }
    }

    #[test]
    fn shared_door_links_both_rooms() {
        // Two rooms side by side sharing the x = 200 edge.
        let rooms = make_rooms(&[
            Rect::new(100.0, 100.0, 100.0, 80.0),
            Rect::new(200.0, 100.0, 100.0, 80.0),
        ]);
        let a = RoomId::new(0);
        let b = RoomId::new(1);
        let door = make_door(a, Vec2::new(200.0, 100.0), Vec2::new(200.0, 180.0));

        let graph = RoomGraph::build(&rooms, &[door], &DoorConfig::default());
        assert!(graph.neighbors(a).unwrap().contains(&b));
        assert!(graph.neighbors(b).unwrap().contains(&a));
        let link = graph.door_links()[&0];
        assert!(link == DoorLink::Rooms(a, b) || link == DoorLink::Rooms(b, a));
        assert!(graph.circulation().is_empty());
        assert!(graph.isolated().is_empty());
        assert!(graph.verify_door_links().is_ok());
    }

    #[test]
    fn exterior_door_marks_circulation() {
        let rooms = make_rooms(&[Rect::new(100.0, 100.0, 100.0, 80.0)]);
        let a = RoomId::new(0);
        let door = make_door(a, Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        let graph = RoomGraph::build(&rooms, &[door], &DoorConfig::default());
        assert_eq!(graph.door_links()[&0], DoorLink::Exterior(a));
        assert!(graph.is_circulation(a));
        assert!(!graph.is_isolated(a));
        assert_eq!(graph.circulation_distance(a), Some(0));
    }

    #[test]
    fn doorless_room_is_isolated_and_unreachable() {
        let rooms = make_rooms(&[Rect::new(100.0, 100.0, 100.0, 80.0)]);
        let graph = RoomGraph::build(&rooms, &[], &DoorConfig::default());
        assert!(graph.is_isolated(RoomId::new(0)));
        assert_eq!(graph.circulation_distance(RoomId::new(0)), None);
        assert_eq!(graph.circulation_distance(RoomId::new(7)), None);
    }

    #[test]
    fn door_in_open_space_is_reported() {
        let rooms = make_rooms(&[Rect::new(100.0, 100.0, 100.0, 80.0)]);
        let door = make_door(
            RoomId::new(0),
            Vec2::new(500.0, 500.0),
            Vec2::new(600.0, 500.0),
        );
        let graph = RoomGraph::build(&rooms, &[door], &DoorConfig::default());
        assert!(graph.door_links().is_empty());
        assert_eq!(graph.unresolved_doors().len(), 1);
        assert!(matches!(
            graph.verify_door_links(),
            Err(LayoutError::DanglingDoor { door: 0, .. })
        ));
    }

    #[test]
    fn probe_margin_excludes_boundary_points() {
        let rooms = make_rooms(&[Rect::new(0.0, 0.0, 100.0, 100.0)]);
        assert_eq!(room_at_point(&rooms, Vec2::new(1.0, 50.0), -5.0), None);
        assert_eq!(
            room_at_point(&rooms, Vec2::new(3.0, 50.0), -5.0),
            Some(RoomId::new(0))
        );
    }
}
