use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::util::geo_utils;

type SpherePoint = GeomWithData<[f64; 3], usize>;

/// core distance of every point: the central angle to its `min_samples`-th nearest
/// neighbor, counting the point itself as the first. with `min_samples <= 1` all core
/// distances are zero and mutual reachability reduces to the plain haversine distance.
///
/// neighbors are searched in an rtree over unit-sphere cartesian coordinates. chord length
/// is monotone in the central angle, so the k nearest by chord are the k nearest by angle.
///
/// # Arguments
///
/// * `points` - (latitude, longitude) pairs in radians
/// * `min_samples` - neighborhood size
pub fn core_distances(points: &[[f64; 2]], min_samples: usize) -> Vec<f64> {
    if min_samples <= 1 || points.len() < 2 {
        return vec![0.0; points.len()];
    }
    let k = min_samples.min(points.len());
    let entries = points
        .iter()
        .enumerate()
        .map(|(idx, p)| GeomWithData::new(to_unit_sphere(p), idx))
        .collect::<Vec<SpherePoint>>();
    let rtree = RTree::bulk_load(entries);

    points
        .iter()
        .map(|p| {
            rtree
                .nearest_neighbor_iter(&to_unit_sphere(p))
                .nth(k - 1)
                .map(|neighbor| geo_utils::haversine_angle(*p, points[neighbor.data]))
                .unwrap_or(0.0)
        })
        .collect()
}

fn to_unit_sphere(p: &[f64; 2]) -> [f64; 3] {
    let (lat, lng) = (p[0], p[1]);
    [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radians(points: &[(f64, f64)]) -> Vec<[f64; 2]> {
        points
            .iter()
            .map(|(lat, lng)| [lat.to_radians(), lng.to_radians()])
            .collect()
    }

    #[test]
    fn test_min_samples_one_is_zero() {
        let pts = radians(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(core_distances(&pts, 1), vec![0.0, 0.0]);
    }

    #[test]
    fn test_second_nearest_neighbor() {
        let pts = radians(&[(0.0, 0.0), (0.0, 1.0), (0.0, 3.0)]);
        let core = core_distances(&pts, 2);
        assert!((core[0] - 1.0_f64.to_radians()).abs() < 1e-9);
        assert!((core[1] - 1.0_f64.to_radians()).abs() < 1e-9);
        assert!((core[2] - 2.0_f64.to_radians()).abs() < 1e-9);
    }
}
