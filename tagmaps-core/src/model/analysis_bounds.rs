use serde::{Deserialize, Serialize};

use super::{LatLng, ZeroCoordinatePolicy};

/// running rectangle over all post coordinates seen during a run. built once, then treated
/// as read-only when the map projection is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
    #[serde(skip)]
    policy: ZeroCoordinatePolicy,
}

impl Default for AnalysisBounds {
    fn default() -> Self {
        AnalysisBounds::new(ZeroCoordinatePolicy::default())
    }
}

impl AnalysisBounds {
    /// empty bounds. min values start at +inf and max values at -inf so the first
    /// accepted coordinate initializes all four sides.
    pub fn new(policy: ZeroCoordinatePolicy) -> AnalysisBounds {
        AnalysisBounds {
            lat_min: f64::INFINITY,
            lat_max: f64::NEG_INFINITY,
            lng_min: f64::INFINITY,
            lng_max: f64::NEG_INFINITY,
            policy,
        }
    }

    pub fn from_extent(lat_min: f64, lat_max: f64, lng_min: f64, lng_max: f64) -> AnalysisBounds {
        AnalysisBounds {
            lat_min,
            lat_max,
            lng_min,
            lng_max,
            policy: ZeroCoordinatePolicy::Include,
        }
    }

    pub fn policy(&self) -> ZeroCoordinatePolicy {
        self.policy
    }

    /// widens the bounds to include this coordinate. under [`ZeroCoordinatePolicy::TreatAsUnset`]
    /// each component equal to 0.0 is skipped independently.
    pub fn update(&mut self, location: &LatLng) {
        if !location.lat.is_finite() || !location.lng.is_finite() {
            return;
        }
        let skip_zero = self.policy == ZeroCoordinatePolicy::TreatAsUnset;
        if !(skip_zero && location.lat == 0.0) {
            self.lat_min = self.lat_min.min(location.lat);
            self.lat_max = self.lat_max.max(location.lat);
        }
        if !(skip_zero && location.lng == 0.0) {
            self.lng_min = self.lng_min.min(location.lng);
            self.lng_max = self.lng_max.max(location.lng);
        }
    }

    /// true when no coordinate has been accepted on either axis
    pub fn is_empty(&self) -> bool {
        self.lat_min > self.lat_max || self.lng_min > self.lng_max
    }

    /// center of the rectangle as a coordinate, if any coordinate was seen
    pub fn center(&self) -> Option<LatLng> {
        if self.is_empty() {
            return None;
        }
        Some(LatLng::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lng_min + self.lng_max) / 2.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_widens_bounds() {
        let mut bounds = AnalysisBounds::default();
        assert!(bounds.is_empty());
        bounds.update(&LatLng::new(51.0, 13.5));
        bounds.update(&LatLng::new(50.5, 14.0));
        assert!(!bounds.is_empty());
        assert_eq!(bounds.lat_min, 50.5);
        assert_eq!(bounds.lat_max, 51.0);
        assert_eq!(bounds.lng_min, 13.5);
        assert_eq!(bounds.lng_max, 14.0);
    }

    #[test]
    fn test_zero_is_a_real_coordinate_by_default() {
        let mut bounds = AnalysisBounds::default();
        bounds.update(&LatLng::new(0.0, 0.0));
        bounds.update(&LatLng::new(1.0, 1.0));
        assert_eq!(bounds.lat_min, 0.0);
        assert_eq!(bounds.lng_min, 0.0);
    }

    #[test]
    fn test_zero_treated_as_unset() {
        let mut bounds = AnalysisBounds::new(ZeroCoordinatePolicy::TreatAsUnset);
        bounds.update(&LatLng::new(0.0, 0.0));
        assert!(bounds.is_empty());
        bounds.update(&LatLng::new(10.0, 0.0));
        bounds.update(&LatLng::new(12.0, 5.0));
        assert_eq!(bounds.lat_min, 10.0);
        assert_eq!(bounds.lng_min, 5.0);
        assert_eq!(bounds.lng_max, 5.0);
    }

    #[test]
    fn test_center() {
        let bounds = AnalysisBounds::from_extent(50.0, 52.0, 12.0, 14.0);
        let center = bounds.center().unwrap();
        assert!((center.lat - 51.0).abs() < 1e-12);
        assert!((center.lng - 13.0).abs() < 1e-12);
    }
}
