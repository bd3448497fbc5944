use std::collections::HashSet;

use geo_types::Polygon;
use serde::{Deserialize, Serialize};

use crate::model::{ClusterShape, ItemType, ShapeStrategy, SENTINEL_WEIGHT};

const NORMALIZED_MIN: f64 = 1.0;
const NORMALIZED_MAX: f64 = 1000.0;

/// a cluster shape with weights rescaled across the whole result set, ready for a writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputShape {
    pub polygon: Polygon<f64>,
    /// number of posts in the shape
    pub join_count: usize,
    pub views: u64,
    pub user_count: usize,
    pub item_name: String,
    pub item_type: ItemType,
    pub item_global_count: usize,
    /// first shape of its item in rank order, never set for single-user shapes
    pub is_most_important: bool,
    pub weight_v1: f64,
    pub weight_v2: f64,
    pub weight_v3: f64,
    pub is_emoji: bool,
    pub strategy: ShapeStrategy,
}

/// rescales every value that is not the sentinel linearly to [1, 1000], with the minimum
/// non-sentinel value mapped to 1 and the maximum to 1000. a column whose non-sentinel
/// values are all equal maps them to 1000.
pub fn normalize_weights(values: &mut [f64]) {
    let (min, max) = values
        .iter()
        .filter(|v| **v != SENTINEL_WEIGHT)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if min > max {
        return;
    }
    let range = max - min;
    for v in values.iter_mut().filter(|v| **v != SENTINEL_WEIGHT) {
        *v = if range > 0.0 {
            let a = (NORMALIZED_MAX - NORMALIZED_MIN) / range;
            let b = NORMALIZED_MAX - a * max;
            a * *v + b
        } else {
            NORMALIZED_MAX
        };
    }
}

/// collects the shapes of all items, in rank order, into output records. weights are
/// normalized per column across all shapes and each item's first shape is flagged as its
/// most important occurrence unless a single user made it.
pub fn compile_output(shapes: Vec<ClusterShape>) -> Vec<OutputShape> {
    let mut columns = [
        shapes.iter().map(|s| s.weights.v1).collect::<Vec<_>>(),
        shapes.iter().map(|s| s.weights.v2).collect::<Vec<_>>(),
        shapes.iter().map(|s| s.weights.v3).collect::<Vec<_>>(),
    ];
    for column in columns.iter_mut() {
        normalize_weights(column);
    }
    let [v1, v2, v3] = columns;

    let mut seen: HashSet<(ItemType, String)> = HashSet::new();
    shapes
        .into_iter()
        .enumerate()
        .map(|(idx, shape)| {
            let first_of_item = seen.insert((shape.item_type, shape.item_name.clone()));
            OutputShape {
                is_most_important: first_of_item && shape.user_count > 1,
                is_emoji: shape.item_type == ItemType::Emoji,
                polygon: shape.polygon,
                join_count: shape.post_count,
                views: shape.views,
                user_count: shape.user_count,
                item_name: shape.item_name,
                item_type: shape.item_type,
                item_global_count: shape.item_global_count,
                weight_v1: v1[idx],
                weight_v2: v2[idx],
                weight_v3: v3[idx],
                strategy: shape.strategy,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClusterWeights;
    use geo::polygon;

    fn shape(name: &str, item_type: ItemType, users: usize, weights: ClusterWeights) -> ClusterShape {
        ClusterShape {
            polygon: polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)],
            post_count: 4,
            views: 10,
            user_count: users,
            item_name: name.to_string(),
            item_type,
            item_global_count: 12,
            weights,
            strategy: ShapeStrategy::BufferedHull,
            post_guids: vec![],
        }
    }

    #[test]
    fn test_duplicate_minimum() {
        let mut values = vec![2.0, 2.0, 10.0];
        normalize_weights(&mut values);
        assert!((values[0] - 1.0).abs() < 1e-9);
        assert!((values[1] - 1.0).abs() < 1e-9);
        assert!((values[2] - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentinel_passes_through() {
        let mut values = vec![1.0, 3.0, 5.0, 1.0, 4.0];
        normalize_weights(&mut values);
        assert_eq!(values[0], 1.0);
        assert_eq!(values[3], 1.0);
        assert!((values[1] - 1.0).abs() < 1e-9);
        assert!((values[2] - 1000.0).abs() < 1e-9);
        assert!((values[4] - (999.0 / 2.0 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_constant_and_sentinel_only_columns() {
        let mut constant = vec![7.0, 7.0];
        normalize_weights(&mut constant);
        assert_eq!(constant, vec![1000.0, 1000.0]);

        let mut sentinels = vec![1.0, 1.0];
        normalize_weights(&mut sentinels);
        assert_eq!(sentinels, vec![1.0, 1.0]);
    }

    #[test]
    fn test_most_important_flags() {
        let w = |v: f64| ClusterWeights { v1: v, v2: v, v3: v };
        let shapes = vec![
            shape("harbor", ItemType::Tags, 3, w(10.0)),
            shape("harbor", ItemType::Tags, 2, w(4.0)),
            shape("crane", ItemType::Tags, 1, w(3.0)),
            shape("crane", ItemType::Tags, 2, w(2.0)),
            shape("⚓", ItemType::Emoji, 2, ClusterWeights::sentinel()),
        ];
        let output = compile_output(shapes);
        let flags = output.iter().map(|s| s.is_most_important).collect::<Vec<_>>();
        assert_eq!(flags, vec![true, false, false, false, true]);
        assert!(output[4].is_emoji);
        assert!(!output[0].is_emoji);
        assert!((output[0].weight_v1 - 1000.0).abs() < 1e-9);
        assert!((output[3].weight_v2 - 1.0).abs() < 1e-9);
        assert_eq!(output[4].weight_v3, 1.0);
        assert_eq!(output[0].join_count, 4);
    }
}
