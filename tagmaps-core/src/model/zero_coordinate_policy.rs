use serde::{Deserialize, Serialize};

/// decides whether a coordinate component of exactly 0.0 contributes to the analysis bounds.
/// some exports write 0 for a missing coordinate, which would otherwise stretch the bounds
/// to the equator or the prime meridian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCoordinatePolicy {
    /// every coordinate is a real location
    #[default]
    Include,
    /// a latitude or longitude of 0.0 is treated as unset and skipped
    TreatAsUnset,
}

impl std::fmt::Display for ZeroCoordinatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZeroCoordinatePolicy::Include => write!(f, "include"),
            ZeroCoordinatePolicy::TreatAsUnset => write!(f, "treat as unset"),
        }
    }
}
