//! Integration tests for layout synthesis and maintenance.
//!
//! Each test drives the public `Layout` API the way the simulation driver
//! does: commit, sample usage, refresh doors, evolve, prune.

// Integration tests use unwrap/indexing freely -- panicking on failure is
// the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::missing_panics_doc
)]

use std::collections::{BTreeMap, BTreeSet};

use rand::SeedableRng;
use rand::rngs::StdRng;
use swarm_layout::{
    DoorConfig, DoorLink, Layout, LayoutConfig, ensure_minimum_exits, synthesize_doors,
    validate_doors,
};
use swarm_types::{Canvas, Door, Rect, Room, RoomId, RoomType, Segment, Tier, Vec2};

// =============================================================================
// Helpers
// =============================================================================

fn make_layout() -> Layout {
    Layout::new(LayoutConfig::default()).unwrap()
}

/// Three primary columns 150 apart and three floors 100 apart: a 2x2 grid
/// of rooms at (260|410, 210|310), each 130x80.
fn make_committed(seed: u64) -> Layout {
    let mut layout = make_layout();
    let mut rng = StdRng::seed_from_u64(seed);
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
    layout.commit(&anchors, &positions, &mut rng).unwrap();
    layout
}

fn door_on(room: RoomId, wall: Segment) -> Door {
    Door {
        position: wall.midpoint(),
        normal: wall.normal().unwrap(),
        wall,
        room,
        emergency: false,
    }
}

/// Every door link agrees with the adjacency and circulation sets.
fn assert_graph_consistent(layout: &Layout) {
    let graph = layout.graph();
    for link in graph.door_links().values() {
        match *link {
            DoorLink::Rooms(a, b) => {
                assert!(graph.neighbors(a).unwrap().contains(&b));
                assert!(graph.neighbors(b).unwrap().contains(&a));
            }
            DoorLink::Exterior(a) => assert!(graph.is_circulation(a)),
        }
    }
    let resolved = graph.door_links().len() + graph.unresolved_doors().len();
    assert_eq!(resolved, layout.doors().len());
    for room in layout.rooms() {
        assert!(graph.neighbors(room.id).is_some());
        assert!(!(graph.is_isolated(room.id) && graph.is_circulation(room.id)));
    }
}

fn assert_hierarchy_partitions(layout: &Layout) {
    let hierarchy = layout.hierarchy();
    let all: BTreeSet<RoomId> = layout.rooms().map(|r| r.id).collect();
    let mut seen = BTreeSet::new();
    for tier in Tier::ALL {
        for id in hierarchy.tier_set(tier) {
            assert!(seen.insert(*id), "{id} appears in two tiers");
        }
    }
    assert_eq!(seen, all);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn traffic_near_top_edge_makes_one_top_door() {
    let rect = Rect::new(200.0, 200.0, 150.0, 100.0);
    let mut room = Room::new(RoomId::new(0), rect, RoomType::Public);
    room.wall_hits = (0..15_u8)
        .map(|i| Vec2::new(250.0 + f32::from(i) * 5.0, 196.0))
        .collect();
    let rooms: BTreeMap<RoomId, Room> = BTreeMap::from([(room.id, room)]);

    let config = DoorConfig::default();
    let synthesized = synthesize_doors(&rooms, &[], &config);
    let mut doors = validate_doors(synthesized, config.min_door_spacing);
    let added = ensure_minimum_exits(&rooms, &mut doors, Canvas::default(), config.min_exits);

    assert_eq!(added, 0);
    assert_eq!(doors.len(), 1);
    let door = doors[0];
    assert!(!door.emergency);
    assert_eq!(door.wall, rect.edges()[0]);
    assert!(door.position.x >= 200.0 + 15.0 && door.position.x <= 200.0 + 135.0);
    assert!((door.position.y - 200.0).abs() < 1e-4);
}

#[test]
fn shared_door_makes_rooms_neighbours() {
    let mut layout = make_layout();
    let a = layout.insert_room(Rect::new(100.0, 100.0, 100.0, 80.0), RoomType::Public);
    let b = layout.insert_room(Rect::new(200.0, 100.0, 100.0, 80.0), RoomType::Public);
    layout.push_door(door_on(
        a,
        Segment::new(Vec2::new(200.0, 100.0), Vec2::new(200.0, 180.0)),
    ));
    layout.rebuild_connectivity();

    let graph = layout.graph();
    assert_eq!(graph.neighbors(a).unwrap(), &BTreeSet::from([b]));
    assert_eq!(graph.neighbors(b).unwrap(), &BTreeSet::from([a]));
    let link = graph.door_links()[&0];
    assert!(link == DoorLink::Rooms(a, b) || link == DoorLink::Rooms(b, a));
    assert_graph_consistent(&layout);
}

#[test]
fn circulation_distance_counts_hops() {
    let mut layout = make_layout();
    let a = layout.insert_room(Rect::new(100.0, 100.0, 100.0, 80.0), RoomType::Public);
    let b = layout.insert_room(Rect::new(200.0, 100.0, 100.0, 80.0), RoomType::Public);
    let c = layout.insert_room(Rect::new(300.0, 100.0, 100.0, 80.0), RoomType::Public);
    let d = layout.insert_room(Rect::new(600.0, 400.0, 100.0, 80.0), RoomType::Public);
    layout.push_door(door_on(
        a,
        Segment::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)),
    ));
    layout.push_door(door_on(
        a,
        Segment::new(Vec2::new(200.0, 100.0), Vec2::new(200.0, 180.0)),
    ));
    layout.push_door(door_on(
        b,
        Segment::new(Vec2::new(300.0, 100.0), Vec2::new(300.0, 180.0)),
    ));
    layout.rebuild_connectivity();

    let graph = layout.graph();
    assert_eq!(graph.circulation_distance(a), Some(0));
    assert_eq!(graph.circulation_distance(b), Some(1));
    assert_eq!(graph.circulation_distance(c), Some(2));
    assert_eq!(graph.circulation_distance(d), None);
    assert!(graph.is_isolated(d));

    let hierarchy = layout.hierarchy();
    assert_eq!(hierarchy.tier_of(c), Some(Tier::Terminal));
    assert_eq!(hierarchy.tier_of(d), Some(Tier::Terminal));
    assert_hierarchy_partitions(&layout);
}

#[test]
fn unused_room_is_removed_with_its_records() {
    let mut layout = make_layout();
    let doomed = layout.insert_room(Rect::new(100.0, 100.0, 100.0, 80.0), RoomType::Private);
    let kept = layout.insert_room(Rect::new(400.0, 100.0, 100.0, 80.0), RoomType::Service);
    for id in [doomed, kept] {
        let room = layout.room_mut(id).unwrap();
        room.age = 300;
        room.hits = 5.0;
        room.wall_hits.push_back(Vec2::new(1.0, 1.0));
    }
    layout.push_door(door_on(
        doomed,
        Segment::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)),
    ));
    layout.rebuild_connectivity();

    let report = layout.evolve_rooms();
    assert_eq!(report.removed, vec![doomed]);
    assert!(layout.room(doomed).is_none());
    assert!(layout.graph().neighbors(doomed).is_none());
    assert!(layout.hierarchy().tier_of(doomed).is_none());
    assert!(layout.doors().iter().all(|d| d.room != doomed));
    // Service rooms are never removed by evolution.
    assert!(layout.room(kept).is_some());
}

#[test]
fn doorless_room_gets_emergency_door_facing_center() {
    // Room in the bottom-right: its top and left walls face the center
    // (400, 300); the left wall midpoint (500, 440) is nearer.
    let rect = Rect::new(500.0, 400.0, 200.0, 80.0);
    let room = Room::new(RoomId::new(3), rect, RoomType::Private);
    let rooms = BTreeMap::from([(room.id, room)]);
    let mut doors = Vec::new();
    let added = ensure_minimum_exits(&rooms, &mut doors, Canvas::default(), 1);

    assert_eq!(added, 1);
    assert!(doors[0].emergency);
    assert_eq!(doors[0].wall, rect.edges()[2]);
    assert_eq!(doors[0].position, Vec2::new(500.0, 440.0));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn commit_guarantees_exits_and_partitions() {
    for seed in 0..8 {
        let layout = make_committed(seed);
        assert_eq!(layout.room_count(), 4);
        for room in layout.rooms() {
            let exits = layout.doors().iter().filter(|d| d.room == room.id).count();
            assert!(exits >= 1, "{} has no exit", room.id);
        }
        assert_graph_consistent(&layout);
        assert_hierarchy_partitions(&layout);
        assert!(layout.graph().verify_door_links().is_ok());
    }
}

#[test]
fn doors_open_every_wall_around_them() {
    let half_width = LayoutConfig::default().commit.doorway_half_width;
    for seed in 0..8 {
        let layout = make_committed(seed);
        assert!(!layout.doors().is_empty());
        for door in layout.doors() {
            for wall in layout.walls() {
                let clearance = wall.centerline.distance_to(door.position).distance;
                assert!(
                    clearance > half_width - 1e-3,
                    "{:?} blocks the door at {:?}",
                    wall.centerline,
                    door.position
                );
            }
        }
    }
}

#[test]
fn validated_doors_keep_their_spacing() {
    let wall = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(300.0, 0.0));
    let doors: Vec<Door> = [40.0, 50.0, 64.0, 70.0, 100.0, 120.0, 200.0]
        .into_iter()
        .map(|x| Door {
            position: Vec2::new(x, 0.0),
            normal: Vec2::new(0.0, 1.0),
            wall,
            room: RoomId::new(0),
            emergency: false,
        })
        .collect();
    let kept = validate_doors(doors, 25.0);
    for (i, a) in kept.iter().enumerate() {
        for b in kept.iter().skip(i + 1) {
            assert!(a.position.distance(b.position) >= 25.0);
        }
    }
    assert_eq!(kept.len(), 4);
}

#[test]
fn young_rooms_survive_every_pass() {
    let mut layout = make_committed(3);
    let ids: Vec<RoomId> = layout.rooms().map(|r| r.id).collect();
    for &id in &ids {
        let room = layout.room_mut(id).unwrap();
        room.hits = 0.0;
        room.age = 100;
    }
    let evolved = layout.evolve_rooms();
    let pruned = layout.smart_prune_rooms();
    assert!(evolved.removed.is_empty());
    assert!(pruned.removed.is_empty());
    assert_eq!(layout.room_count(), ids.len());
}

#[test]
fn old_idle_rooms_are_pruned() {
    let mut layout = make_committed(5);
    let revision = layout.revision();
    let ids: Vec<RoomId> = layout.rooms().map(|r| r.id).collect();
    for &id in &ids {
        let room = layout.room_mut(id).unwrap();
        room.hits = 0.0;
        room.age = 1_000;
    }
    let report = layout.smart_prune_rooms();
    assert_eq!(report.removed.len(), ids.len());
    assert_eq!(layout.room_count(), 0);
    assert!(layout.doors().is_empty());
    assert!(layout.graph().adjacencies().is_empty());
    assert!(layout.hierarchy().is_empty());
    assert!(layout.revision() > revision);
}

#[test]
fn traffic_turns_into_a_real_door_on_refresh() {
    let mut layout = make_committed(11);
    let target = layout
        .room_containing(Vec2::new(300.0, 250.0))
        .expect("grid room at (260, 210)");

    for i in 0..15_u8 {
        layout.record_presence(Vec2::new(310.0 + f32::from(i) * 2.0, 206.0));
    }
    assert_eq!(layout.room(target).unwrap().wall_hits.len(), 15);

    let revision = layout.revision();
    let report = layout.refresh_doors().unwrap();
    assert_eq!(report.synthesized, 1);
    assert!(layout.revision() > revision);

    let doors: Vec<&Door> = layout.doors().iter().filter(|d| d.room == target).collect();
    assert_eq!(doors.len(), 1);
    assert!(!doors[0].emergency);
    assert!((doors[0].position.y - 210.0).abs() < 1e-4);
    assert!(layout.graph().is_circulation(target));
    assert_graph_consistent(&layout);
}

#[test]
fn layout_snapshot_serializes() {
    let layout = make_committed(1);
    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["committed"], true);
    assert_eq!(json["rooms"].as_object().unwrap().len(), 4);
    assert!(json["walls"].as_array().unwrap().len() > 16);
}
