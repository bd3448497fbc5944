use geo::{Distance, HaversineMeasure, Point};

use crate::model::{AnalysisBounds, LatLng};

/// mean earth radius used by the haversine formula
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const UNIT_SPHERE: HaversineMeasure = HaversineMeasure::new(1.0);
/// approximate length of one degree of latitude
pub const KM_PER_DEGREE: f64 = 111.325;
/// approximate degrees in one radian
pub const DEGREES_PER_RADIAN: f64 = 57.2958;

/// great-circle distance in meters between two WGS84 coordinates on a spherical earth.
///
/// # Arguments
///
/// * `lon1`, `lat1` - first coordinate in decimal degrees
/// * `lon2`, `lat2` - second coordinate in decimal degrees
pub fn haversine_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_METERS)
        .distance(Point::new(lon1, lat1), Point::new(lon2, lat2))
}

/// central angle in radians between two (latitude, longitude) pairs given in radians.
/// this is the haversine distance on the unit sphere, the metric of the cluster tree.
pub fn haversine_angle(a: [f64; 2], b: [f64; 2]) -> f64 {
    let origin = Point::new(a[1].to_degrees(), a[0].to_degrees());
    let destination = Point::new(b[1].to_degrees(), b[0].to_degrees());
    UNIT_SPHERE.distance(origin, destination)
}

/// approximate conversion from meters to the radian units of the cluster tree, using a
/// fixed kilometers-per-degree constant instead of a geodesic.
pub fn meters_to_angular_distance(meters: f64) -> f64 {
    meters / 1000.0 / KM_PER_DEGREE / DEGREES_PER_RADIAN
}

/// inverse of [`meters_to_angular_distance`]
pub fn angular_distance_to_meters(radians: f64) -> f64 {
    radians * DEGREES_PER_RADIAN * KM_PER_DEGREE * 1000.0
}

/// UTM zone number (1-60) containing the longitude
pub fn utm_zone_number(longitude: f64) -> u8 {
    let zone = ((longitude + 180.0) / 6.0).floor() as i64;
    (zone.rem_euclid(60) + 1) as u8
}

/// EPSG code of the WGS84 UTM zone for a coordinate: 326xx north of the equator,
/// 327xx south of it.
pub fn best_utm_zone(longitude: f64, latitude: f64) -> u32 {
    let zone = utm_zone_number(longitude) as u32;
    if latitude >= 0.0 {
        32600 + zone
    } else {
        32700 + zone
    }
}

/// rectangle around a collection of coordinates, or None if it is empty
pub fn bounding_rectangle(points: &[LatLng]) -> Option<AnalysisBounds> {
    let first = points.first()?;
    let init = AnalysisBounds::from_extent(first.lat, first.lat, first.lng, first.lng);
    let bounds = points.iter().fold(init, |mut acc, p| {
        acc.lat_min = acc.lat_min.min(p.lat);
        acc.lat_max = acc.lat_max.max(p.lat);
        acc.lng_min = acc.lng_min.min(p.lng);
        acc.lng_max = acc.lng_max.max(p.lng);
        acc
    });
    Some(bounds)
}

/// default cut distance when none is configured: one hundredth of the shorter side of the
/// analysis bounds, never below one meter.
pub fn auto_cluster_distance(bounds: &AnalysisBounds) -> Option<f64> {
    if bounds.is_empty() {
        return None;
    }
    let mid_lat = (bounds.lat_min + bounds.lat_max) / 2.0;
    let width = haversine_distance(bounds.lng_min, mid_lat, bounds.lng_max, mid_lat);
    let height = haversine_distance(bounds.lng_min, bounds.lat_min, bounds.lng_min, bounds.lat_max);
    Some((width.min(height) / 100.0).max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_one_degree_at_equator() {
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-6);
        assert!((d - 111_195.0).abs() < 1.0);
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let a = haversine_distance(13.73, 51.05, 13.74, 51.06);
        let b = haversine_distance(13.74, 51.06, 13.73, 51.05);
        assert!((a - b).abs() < 1e-9);
        assert_eq!(haversine_distance(13.73, 51.05, 13.73, 51.05), 0.0);
    }

    #[test]
    fn test_haversine_angle_on_unit_sphere() {
        let a = [51.05_f64.to_radians(), 13.73_f64.to_radians()];
        let b = [51.06_f64.to_radians(), 13.74_f64.to_radians()];
        let angle = haversine_angle(a, b);
        let meters = haversine_distance(13.73, 51.05, 13.74, 51.06);
        assert!((angle * EARTH_RADIUS_METERS - meters).abs() < 1e-6);
        // one degree of longitude on the equator
        let equator = haversine_angle([0.0, 0.0], [0.0, 1.0_f64.to_radians()]);
        assert!((equator - 1.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_angular_round_trip() {
        let r = meters_to_angular_distance(100.0);
        assert!((r - 1.5678e-5).abs() < 1e-8);
        assert!((angular_distance_to_meters(r) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_utm_zone() {
        // Dresden, Germany
        assert_eq!(best_utm_zone(13.73, 51.05), 32633);
        // Sydney, Australia
        assert_eq!(best_utm_zone(151.21, -33.87), 32756);
        // Denver, CO
        assert_eq!(best_utm_zone(-104.99, 39.74), 32613);
        assert_eq!(best_utm_zone(180.0, 0.0), 32601);
        assert_eq!(best_utm_zone(-180.0, 0.0), 32601);
    }

    #[test]
    fn test_bounding_rectangle() {
        assert!(bounding_rectangle(&[]).is_none());
        let b = bounding_rectangle(&[
            LatLng::new(1.0, 5.0),
            LatLng::new(-2.0, 3.0),
            LatLng::new(0.5, 7.0),
        ])
        .unwrap();
        assert_eq!((b.lat_min, b.lat_max, b.lng_min, b.lng_max), (-2.0, 1.0, 3.0, 7.0));
    }

    #[test]
    fn test_auto_cluster_distance() {
        let bounds = AnalysisBounds::from_extent(51.0, 51.1, 13.6, 13.9);
        let d = auto_cluster_distance(&bounds).unwrap();
        // the shorter side is the ~11.1 km latitude span
        assert!((d - 111.2).abs() < 1.0);
        assert!(auto_cluster_distance(&AnalysisBounds::default()).is_none());
    }
}
