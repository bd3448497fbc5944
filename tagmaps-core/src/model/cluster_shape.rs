use geo::Area;
use geo_types::Polygon;
use serde::{Deserialize, Serialize};

use super::{ClusterWeights, ItemType, ShapeStrategy};

/// one polygon per non-noise cluster (or noise singleton) of an item. the polygon is in the
/// projected, metric coordinate system of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterShape {
    pub polygon: Polygon<f64>,
    pub post_count: usize,
    pub views: u64,
    pub user_count: usize,
    pub item_name: String,
    pub item_type: ItemType,
    pub item_global_count: usize,
    pub weights: ClusterWeights,
    pub strategy: ShapeStrategy,
    /// guids of the posts covered by this shape
    pub post_guids: Vec<String>,
}

impl ClusterShape {
    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }
}
