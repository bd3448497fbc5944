use serde::{Deserialize, Serialize};

/// which branch of shape generation produced a cluster polygon, chosen by the number
/// of distinct locations in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeStrategy {
    /// a buffered disk around one location
    SinglePoint,
    /// convex hull of buffered points, 2 to 4 locations
    BufferedHull,
    /// buffered convex hull of raw points, 5 to 9 locations
    HullThenBuffer,
    /// buffered concave hull from the Delaunay triangulation, 10 or more locations
    AlphaShape,
}

impl ShapeStrategy {
    pub fn for_location_count(n: usize) -> ShapeStrategy {
        match n {
            0 | 1 => ShapeStrategy::SinglePoint,
            2..=4 => ShapeStrategy::BufferedHull,
            5..=9 => ShapeStrategy::HullThenBuffer,
            _ => ShapeStrategy::AlphaShape,
        }
    }
}

impl std::fmt::Display for ShapeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeStrategy::SinglePoint => write!(f, "1 point cluster"),
            ShapeStrategy::BufferedHull => write!(f, "between 2 and 5 points"),
            ShapeStrategy::HullThenBuffer => write!(f, "between 5 and 10 points"),
            ShapeStrategy::AlphaShape => write!(f, "alpha shape"),
        }
    }
}
