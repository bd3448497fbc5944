use geo::{ConvexHull, Coord, LineString, MultiPoint, MultiPolygon, Orient, Point, Polygon};

/// segments per quarter circle when buffering a point
pub const POINT_BUFFER_RESOLUTION: usize = 3;

/// approximates a disk around `center` with `4 * resolution` segments
pub fn buffer_point(center: Coord<f64>, radius: f64, resolution: usize) -> Polygon<f64> {
    Polygon::new(LineString::new(disk_coords(center, radius, resolution)), vec![])
}

fn disk_coords(center: Coord<f64>, radius: f64, resolution: usize) -> Vec<Coord<f64>> {
    let segments = 4 * resolution.max(1);
    let mut coords = (0..segments)
        .map(|k| {
            let angle = std::f64::consts::TAU * k as f64 / segments as f64;
            Coord {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect::<Vec<_>>();
    if let Some(first) = coords.first().copied() {
        coords.push(first);
    }
    coords
}

/// convex hull of the union of disks around every coordinate. for a convex input this
/// equals a round-cornered buffer of its hull, and it never degenerates into a line for
/// collinear or repeated points.
pub fn buffered_hull(coords: &[Coord<f64>], radius: f64) -> Polygon<f64> {
    let disk_points = coords
        .iter()
        .flat_map(|c| disk_coords(*c, radius, POINT_BUFFER_RESOLUTION))
        .map(Point::from)
        .collect::<Vec<_>>();
    MultiPoint::new(disk_points).convex_hull()
}

/// buffers a (possibly concave) polygon outward by `radius`. returns None when the buffer
/// is empty. a buffer that splits into several parts is collapsed to their convex hull.
pub fn buffer_polygon(polygon: &Polygon<f64>, radius: f64) -> Option<Polygon<f64>> {
    let oriented = polygon.orient(geo::orient::Direction::Default);
    let buffered: MultiPolygon<f64> = geo_buffer::buffer_polygon(&oriented, radius);
    match buffered.0.len() {
        0 => None,
        1 => buffered.0.into_iter().next(),
        _ => Some(buffered.convex_hull()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Contains};

    #[test]
    fn test_buffer_point() {
        let disk = buffer_point(Coord { x: 10.0, y: 20.0 }, 5.0, POINT_BUFFER_RESOLUTION);
        assert_eq!(disk.exterior().0.len(), 13);
        assert!(disk.contains(&Point::new(10.0, 20.0)));
        // area of a regular 12-gon with circumradius 5
        let expected = 0.5 * 12.0 * 25.0 * (std::f64::consts::TAU / 12.0).sin();
        assert!((disk.unsigned_area() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_buffered_hull_of_collinear_points() {
        let coords = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 20.0, y: 0.0 },
        ];
        let hull = buffered_hull(&coords, 2.0);
        assert!(hull.unsigned_area() > 20.0 * 2.0);
        for c in coords {
            assert!(hull.contains(&Point::from(c)));
        }
    }

    #[test]
    fn test_buffer_polygon_grows() {
        let square = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![],
        );
        let buffered = buffer_polygon(&square, 1.0).unwrap();
        assert!(buffered.unsigned_area() > square.unsigned_area());
        assert!(buffered.contains(&square));
    }
}
