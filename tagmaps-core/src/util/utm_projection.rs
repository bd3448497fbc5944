use geo::{Coord, MapCoords, Polygon};

use super::geo_utils;
use crate::model::{LatLng, TagMapsError};

// WGS84 ellipsoid
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// transverse Mercator projection for one WGS84 UTM zone, evaluated with the
/// third-order Krüger series (sub-millimeter accurate within the zone).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmProjection {
    zone: u8,
    north: bool,
    rectifying_radius: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    delta: [f64; 3],
}

impl UtmProjection {
    pub fn new(zone: u8, north: bool) -> Result<UtmProjection, TagMapsError> {
        if !(1..=60).contains(&zone) {
            return Err(TagMapsError::ConfigurationError(format!(
                "UTM zone must be in [1, 60], found {zone}"
            )));
        }
        let n = FLATTENING / (2.0 - FLATTENING);
        let n2 = n * n;
        let n3 = n2 * n;
        let rectifying_radius = SEMI_MAJOR_AXIS / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);
        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
            61.0 * n3 / 240.0,
        ];
        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
            n2 / 48.0 + n3 / 15.0,
            17.0 * n3 / 480.0,
        ];
        let delta = [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
            56.0 * n3 / 15.0,
        ];
        Ok(UtmProjection {
            zone,
            north,
            rectifying_radius,
            alpha,
            beta,
            delta,
        })
    }

    /// projection for an EPSG code of the form 326xx (north) or 327xx (south)
    pub fn from_epsg(code: u32) -> Result<UtmProjection, TagMapsError> {
        let (north, zone) = match code {
            32601..=32660 => (true, code - 32600),
            32701..=32760 => (false, code - 32700),
            _ => return Err(TagMapsError::InvalidCrs(code)),
        };
        UtmProjection::new(zone as u8, north)
    }

    /// projection of the UTM zone containing the coordinate
    pub fn for_location(location: &LatLng) -> Result<UtmProjection, TagMapsError> {
        UtmProjection::from_epsg(geo_utils::best_utm_zone(location.lng, location.lat))
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn is_north(&self) -> bool {
        self.north
    }

    pub fn epsg(&self) -> u32 {
        let base = if self.north { 32600 } else { 32700 };
        base + self.zone as u32
    }

    fn central_meridian(&self) -> f64 {
        (self.zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    fn false_northing(&self) -> f64 {
        if self.north {
            0.0
        } else {
            FALSE_NORTHING_SOUTH
        }
    }

    /// projects a WGS84 coordinate to easting (x) and northing (y) in meters
    pub fn project(&self, location: &LatLng) -> Coord<f64> {
        let n = FLATTENING / (2.0 - FLATTENING);
        let phi = location.lat.to_radians();
        let lambda = (location.lng - self.central_meridian()).to_radians();
        let k = 2.0 * n.sqrt() / (1.0 + n);
        let t = (phi.sin().atanh() - k * (k * phi.sin()).atanh()).sinh();
        let xi_prime = t.atan2(lambda.cos());
        let eta_prime = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, a) in self.alpha.iter().enumerate() {
            let m = 2.0 * (j as f64 + 1.0);
            xi += a * (m * xi_prime).sin() * (m * eta_prime).cosh();
            eta += a * (m * xi_prime).cos() * (m * eta_prime).sinh();
        }
        let scale = SCALE_FACTOR * self.rectifying_radius;
        Coord {
            x: FALSE_EASTING + scale * eta,
            y: self.false_northing() + scale * xi,
        }
    }

    /// inverse projection from easting/northing in meters back to WGS84
    pub fn unproject(&self, coord: &Coord<f64>) -> LatLng {
        let scale = SCALE_FACTOR * self.rectifying_radius;
        let xi = (coord.y - self.false_northing()) / scale;
        let eta = (coord.x - FALSE_EASTING) / scale;

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let m = 2.0 * (j as f64 + 1.0);
            xi_prime -= b * (m * xi).sin() * (m * eta).cosh();
            eta_prime -= b * (m * xi).cos() * (m * eta).sinh();
        }
        let chi = (xi_prime.sin() / eta_prime.cosh()).asin();
        let mut phi = chi;
        for (j, d) in self.delta.iter().enumerate() {
            let m = 2.0 * (j as f64 + 1.0);
            phi += d * (m * chi).sin();
        }
        let lambda = eta_prime.sinh().atan2(xi_prime.cos());
        LatLng::new(phi.to_degrees(), self.central_meridian() + lambda.to_degrees())
    }

    /// maps a projected polygon back to WGS84 (x = longitude, y = latitude)
    pub fn unproject_polygon(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        polygon.map_coords(|c| {
            let ll = self.unproject(&c);
            Coord { x: ll.lng, y: ll.lat }
        })
    }
}

impl std::fmt::Display for UtmProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hemisphere = if self.north { "N" } else { "S" };
        write!(f, "UTM zone {}{} (EPSG:{})", self.zone, hemisphere, self.epsg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridian_projects_to_false_easting() {
        let proj = UtmProjection::new(33, true).unwrap();
        let c = proj.project(&LatLng::new(0.0, 15.0));
        assert!((c.x - 500_000.0).abs() < 1e-6);
        assert!(c.y.abs() < 1e-6);
    }

    #[test]
    fn test_known_coordinate() {
        // Brandenburg Gate, Berlin: 33U 389890 5819700 (approx)
        let proj = UtmProjection::from_epsg(32633).unwrap();
        assert_eq!((proj.zone(), proj.is_north()), (33, true));
        let c = proj.project(&LatLng::new(52.516275, 13.377704));
        assert!((c.x - 389_890.0).abs() < 50.0, "easting was {}", c.x);
        assert!((c.y - 5_819_700.0).abs() < 50.0, "northing was {}", c.y);
    }

    #[test]
    fn test_round_trip() {
        let proj = UtmProjection::from_epsg(32756).unwrap();
        let sydney = LatLng::new(-33.8688, 151.2093);
        let c = proj.project(&sydney);
        assert!(c.y > 6_000_000.0 && c.y < 10_000_000.0);
        assert_eq!((proj.zone(), proj.is_north()), (56, false));
        let back = proj.unproject(&c);
        assert!((back.lat - sydney.lat).abs() < 1e-8);
        assert!((back.lng - sydney.lng).abs() < 1e-8);
    }

    #[test]
    fn test_meter_scale() {
        let proj = UtmProjection::from_epsg(32633).unwrap();
        let a = proj.project(&LatLng::new(51.05, 13.73));
        let b = proj.project(&LatLng::new(51.0509, 13.73));
        let planar = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
        let sphere = geo_utils::haversine_distance(13.73, 51.05, 13.73, 51.0509);
        assert!((planar - sphere).abs() / sphere < 0.01);
    }

    #[test]
    fn test_invalid_epsg() {
        assert!(matches!(
            UtmProjection::from_epsg(4326),
            Err(TagMapsError::InvalidCrs(4326))
        ));
        assert!(UtmProjection::from_epsg(32661).is_err());
    }
}
