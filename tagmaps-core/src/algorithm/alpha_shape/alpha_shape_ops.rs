use delaunator::{triangulate, Point as DPoint};
use geo::{ConvexHull, Coord, LineString, MultiPoint, MultiPolygon, Point, Polygon};

/// result of one concave hull attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AlphaShape {
    Polygon(Polygon<f64>),
    /// the kept triangles form more than one disconnected part
    MultiPolygon(MultiPolygon<f64>),
    /// no triangle passed the circumradius filter
    Empty,
    /// a zero-area triangle was found, or the points could not be triangulated
    Degenerate,
}

impl AlphaShape {
    /// true for results that warrant another attempt at a different alpha
    pub fn needs_retry(&self) -> bool {
        matches!(
            self,
            AlphaShape::MultiPolygon(_) | AlphaShape::Degenerate | AlphaShape::Empty
        )
    }
}

/// concave hull of a point set. the points are Delaunay-triangulated and a triangle is kept
/// when its circumradius is below `1 / alpha`. the kept triangles are merged and any holes
/// enclosed by kept edges are filled.
///
/// fewer than four points yield their convex hull.
pub fn alpha_shape(coords: &[Coord<f64>], alpha: f64) -> AlphaShape {
    if coords.len() < 4 {
        let hull = MultiPoint::new(coords.iter().map(|c| Point::from(*c)).collect()).convex_hull();
        return AlphaShape::Polygon(hull);
    }
    let d_points = coords
        .iter()
        .map(|c| DPoint { x: c.x, y: c.y })
        .collect::<Vec<_>>();
    let triangulation = triangulate(&d_points);
    if triangulation.triangles.is_empty() {
        return AlphaShape::Degenerate;
    }

    let max_radius = 1.0 / alpha;
    let mut kept: Vec<Polygon<f64>> = vec![];
    for triangle in triangulation.triangles.chunks_exact(3) {
        let (pa, pb, pc) = (coords[triangle[0]], coords[triangle[1]], coords[triangle[2]]);
        let a = distance(pa, pb);
        let b = distance(pb, pc);
        let c = distance(pc, pa);
        // Heron's formula
        let s = (a + b + c) / 2.0;
        let area = (s * (s - a) * (s - b) * (s - c)).sqrt();
        if !(area > 0.0) {
            return AlphaShape::Degenerate;
        }
        let circumradius = a * b * c / (4.0 * area);
        if circumradius < max_radius {
            kept.push(ccw_triangle(pa, pb, pc));
        }
    }

    if kept.is_empty() {
        return AlphaShape::Empty;
    }
    let merged = geo::unary_union(kept.iter());
    let mut parts = merged
        .0
        .into_iter()
        .map(|p| Polygon::new(p.exterior().clone(), vec![]))
        .collect::<Vec<_>>();
    match parts.len() {
        0 => AlphaShape::Empty,
        1 => parts.pop().map(AlphaShape::Polygon).unwrap_or(AlphaShape::Empty),
        _ => AlphaShape::MultiPolygon(MultiPolygon::new(parts)),
    }
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn ccw_triangle(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> Polygon<f64> {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    let ring = if cross >= 0.0 {
        vec![a, b, c, a]
    } else {
        vec![a, c, b, a]
    };
    Polygon::new(LineString::new(ring), vec![])
}
