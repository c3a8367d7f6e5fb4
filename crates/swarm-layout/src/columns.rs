//! Column detection: anchors become structural columns.
//!
//! Anchor positions are grouped greedily in the order they are supplied.
//! Each anchor joins the cluster whose seed (first member) is nearest among
//! the clusters within `radius`, or starts a new cluster. A column is the
//! arithmetic mean of its cluster. The result is deterministic for a fixed
//! input order.

use swarm_types::Vec2;
use swarm_types::geometry::centroid;

/// Cluster anchor positions into column points.
pub fn cluster_columns(anchors: &[Vec2], radius: f32) -> Vec<Vec2> {
    let mut clusters: Vec<Vec<Vec2>> = Vec::new();

    for &point in anchors {
        let nearest = clusters
            .iter()
            .enumerate()
            .filter_map(|(idx, members)| {
                members
                    .first()
                    .map(|seed| (idx, seed.distance(point)))
            })
            .filter(|&(_, d)| d < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx);

        match nearest.and_then(|idx| clusters.get_mut(idx)) {
            Some(members) => members.push(point),
            None => clusters.push(vec![point]),
        }
    }

    clusters.iter().filter_map(|members| centroid(members)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_anchors_merge_into_their_mean() {
        let anchors = [
            Vec2::new(100.0, 100.0),
            Vec2::new(110.0, 100.0),
            Vec2::new(400.0, 300.0),
        ];
        let columns = cluster_columns(&anchors, 60.0);
        assert_eq!(columns.len(), 2);
        assert!((columns[0].x - 105.0).abs() < 1e-4);
        assert!((columns[1].x - 400.0).abs() < 1e-4);
    }

    #[test]
    fn anchor_joins_the_nearest_seed() {
        let anchors = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            // Within 80 of both seeds, nearer the second.
            Vec2::new(70.0, 0.0),
        ];
        let columns = cluster_columns(&anchors, 80.0);
        assert_eq!(columns.len(), 2);
        assert!((columns[0].x - 0.0).abs() < 1e-4);
        assert!((columns[1].x - 85.0).abs() < 1e-4);
    }

    #[test]
    fn no_anchors_no_columns() {
        assert!(cluster_columns(&[], 60.0).is_empty());
    }
}
