use geo::{Area, ConvexHull, Coord, MultiPoint, Point, Polygon};

use super::{alpha_shape, buffer_point, buffer_polygon, buffered_hull, AlphaShape};
use super::POINT_BUFFER_RESOLUTION;
use crate::model::{ShapeStrategy, TagMapsError};

/// polygons are buffered by this fraction of the cut distance
const BUFFER_FRACTION: f64 = 0.25;
/// number of alternative alphas tried in each direction
const ALPHA_RETRIES: i32 = 5;

/// buffer radius in meters for a cut distance
pub fn buffer_radius(cut_distance: f64) -> f64 {
    cut_distance * BUFFER_FRACTION
}

/// divisor of the cut distance that gives the alpha for a cluster of `n` locations. larger
/// clusters need a much larger divisor to keep comparable triangle density.
pub fn start_alpha(n: usize) -> f64 {
    match n {
        0..=200 => 9_000.0,
        201..=500 => 10_000.0,
        _ => 1_000_000.0,
    }
}

/// builds the single representative polygon of a cluster from its distinct projected
/// locations.
///
/// * 1 location: a disk of radius cut/4
/// * 2-4 locations: convex hull of the buffered points
/// * 5-9 locations: convex hull of the points, buffered
/// * 10+ locations: buffered alpha shape, falling back to convex hulls when the alpha
///   shape is split or degenerate
///
/// # Arguments
///
/// * `coords` - distinct locations in a metric projection
/// * `cut_distance` - cut distance of the clustering run in meters
///
/// # Returns
///
/// a non-empty polygon with positive area and the strategy that produced it
pub fn cluster_polygon(
    coords: &[Coord<f64>],
    cut_distance: f64,
) -> Result<(Polygon<f64>, ShapeStrategy), TagMapsError> {
    if coords.is_empty() {
        return Err(TagMapsError::InternalError(String::from(
            "cannot build a cluster polygon without locations",
        )));
    }
    if !(cut_distance.is_finite() && cut_distance > 0.0) {
        return Err(TagMapsError::InvalidCutDistance(cut_distance));
    }
    let radius = buffer_radius(cut_distance);
    let strategy = ShapeStrategy::for_location_count(coords.len());
    let polygon = match strategy {
        ShapeStrategy::SinglePoint => buffer_point(coords[0], radius, POINT_BUFFER_RESOLUTION),
        ShapeStrategy::BufferedHull => buffered_hull(coords, radius),
        ShapeStrategy::HullThenBuffer => {
            let hull = convex_hull(coords);
            buffered_hull(&hull.exterior().0, radius)
        }
        ShapeStrategy::AlphaShape => {
            let (shape, concave) = concave_hull(coords, cut_distance);
            if concave {
                buffer_polygon(&shape, radius).unwrap_or_else(|| {
                    log::warn!("buffering alpha shape failed, using buffered convex hull");
                    buffered_hull(&shape.exterior().0, radius)
                })
            } else {
                buffered_hull(&shape.exterior().0, radius)
            }
        }
    };

    if is_valid(&polygon) {
        Ok((polygon, strategy))
    } else {
        log::warn!(
            "{strategy} produced an invalid polygon for {} locations, using buffered convex hull",
            coords.len()
        );
        Ok((buffered_hull(coords, radius), strategy))
    }
}

/// runs the alpha shape with the size-tiered alpha, then with coarser alphas, then with
/// finer alphas. a result still split in parts falls back to its convex hull, a degenerate
/// or empty result to the convex hull of the points.
///
/// returns the unbuffered polygon and whether it is a true alpha shape (possibly concave).
fn concave_hull(coords: &[Coord<f64>], cut_distance: f64) -> (Polygon<f64>, bool) {
    let start = start_alpha(coords.len());
    let mut shape = alpha_shape(coords, cut_distance / start);

    let coarser = (1..=ALPHA_RETRIES).map(|i| start + start * (i as f64).powi(i));
    let finer = (1..=ALPHA_RETRIES).map(|i| start / (i as f64).powi(2));
    for divisor in coarser.chain(finer) {
        if !shape.needs_retry() {
            break;
        }
        shape = alpha_shape(coords, cut_distance / divisor);
    }

    match shape {
        AlphaShape::Polygon(p) => (p, true),
        AlphaShape::MultiPolygon(mp) => {
            log::debug!(
                "alpha shape of {} locations stayed split in {} parts, using convex hull",
                coords.len(),
                mp.0.len()
            );
            (mp.convex_hull(), false)
        }
        AlphaShape::Empty | AlphaShape::Degenerate => {
            log::debug!(
                "alpha shape of {} locations failed, using convex hull of points",
                coords.len()
            );
            (convex_hull(coords), false)
        }
    }
}

fn convex_hull(coords: &[Coord<f64>]) -> Polygon<f64> {
    MultiPoint::new(coords.iter().map(|c| Point::from(*c)).collect()).convex_hull()
}

fn is_valid(polygon: &Polygon<f64>) -> bool {
    let area = polygon.unsigned_area();
    polygon.exterior().0.len() >= 4 && area.is_finite() && area > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Contains;

    fn ring_of_points(n: usize, radius: f64) -> Vec<Coord<f64>> {
        (0..n)
            .map(|k| {
                let angle = std::f64::consts::TAU * k as f64 / n as f64;
                Coord {
                    x: 500_000.0 + radius * angle.cos(),
                    y: 5_000_000.0 + radius * angle.sin(),
                }
            })
            .collect()
    }

    #[test]
    fn test_start_alpha_tiers() {
        assert_eq!(start_alpha(10), 9_000.0);
        assert_eq!(start_alpha(200), 9_000.0);
        assert_eq!(start_alpha(201), 10_000.0);
        assert_eq!(start_alpha(500), 10_000.0);
        assert_eq!(start_alpha(501), 1_000_000.0);
    }

    #[test]
    fn test_strategy_by_location_count() {
        for (n, expected) in [
            (1, ShapeStrategy::SinglePoint),
            (2, ShapeStrategy::BufferedHull),
            (4, ShapeStrategy::BufferedHull),
            (5, ShapeStrategy::HullThenBuffer),
            (9, ShapeStrategy::HullThenBuffer),
            (10, ShapeStrategy::AlphaShape),
            (40, ShapeStrategy::AlphaShape),
        ] {
            let coords = ring_of_points(n, 30.0);
            let (polygon, strategy) = cluster_polygon(&coords, 100.0).unwrap();
            assert_eq!(strategy, expected, "{n} locations");
            assert!(is_valid(&polygon), "{n} locations gave an invalid polygon");
            for c in coords {
                assert!(polygon.contains(&Point::from(c)), "{n} locations not covered");
            }
        }
    }

    #[test]
    fn test_single_point_disk_radius() {
        let center = Coord { x: 0.0, y: 0.0 };
        let (polygon, _) = cluster_polygon(&[center], 100.0).unwrap();
        let max_extent = polygon
            .exterior()
            .0
            .iter()
            .map(|c| (c.x * c.x + c.y * c.y).sqrt())
            .fold(0.0, f64::max);
        assert!((max_extent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_points_fall_back() {
        let coords = (0..12)
            .map(|i| Coord {
                x: i as f64 * 5.0,
                y: 0.0,
            })
            .collect::<Vec<_>>();
        let (polygon, strategy) = cluster_polygon(&coords, 40.0).unwrap();
        assert_eq!(strategy, ShapeStrategy::AlphaShape);
        assert!(is_valid(&polygon));
        assert!(polygon.unsigned_area() > 0.0);
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(cluster_polygon(&[], 100.0).is_err());
        assert!(cluster_polygon(&[Coord { x: 0.0, y: 0.0 }], 0.0).is_err());
    }
}
