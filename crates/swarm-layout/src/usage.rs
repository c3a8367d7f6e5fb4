//! Per-tick usage sampling: wall-band crossings and room occupancy.

use swarm_types::Vec2;

use crate::layout::Layout;

impl Layout {
    /// Record `p` as a wall-hit sample for every room whose wall band
    /// contains it: outside the room inflated by the inner band but inside
    /// the room inflated by the outer band. Returns how many rooms recorded
    /// the sample.
    pub fn record_wall_crossing(&mut self, p: Vec2) -> usize {
        let usage = &self.config.usage;
        if usage.max_wall_hits_per_room == 0 {
            return 0;
        }
        let mut recorded = 0_usize;
        for room in self.rooms.values_mut() {
            let inner = room.rect.inflate(usage.wall_band_inner, usage.wall_band_inner);
            let outer = room.rect.inflate(usage.wall_band_outer, usage.wall_band_outer);
            if inner.contains(p) || !outer.contains(p) {
                continue;
            }
            if room.wall_hits.len() >= usage.max_wall_hits_per_room {
                room.wall_hits.pop_front();
            }
            room.wall_hits.push_back(p);
            recorded = recorded.saturating_add(1);
        }
        recorded
    }

    /// Count an occupancy tick for every room containing `p`: both its hit
    /// counter and its age advance. Returns how many rooms were occupied.
    pub fn record_room_usage(&mut self, p: Vec2) -> usize {
        let mut occupied = 0_usize;
        for room in self.rooms.values_mut() {
            if room.rect.contains(p) {
                room.hits += 1.0;
                room.age = room.age.saturating_add(1);
                occupied = occupied.saturating_add(1);
            }
        }
        occupied
    }

    /// Record both kinds of usage for one agent position.
    pub fn record_presence(&mut self, p: Vec2) {
        self.record_wall_crossing(p);
        self.record_room_usage(p);
    }
}
