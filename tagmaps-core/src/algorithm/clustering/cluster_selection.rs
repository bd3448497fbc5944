use serde::{Deserialize, Serialize};

/// how flat clusters are extracted from the cluster hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ClusterSelection {
    /// slice the single linkage tree at a linear distance in meters. every group joined
    /// below the cut with at least 2 members becomes a cluster.
    ManualCut { cut_distance: f64 },
    /// excess-of-mass selection over the condensed tree, ignoring any cut distance
    Automatic,
}

impl std::fmt::Display for ClusterSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterSelection::ManualCut { cut_distance } => {
                write!(f, "manual cut at {cut_distance}m")
            }
            ClusterSelection::Automatic => write!(f, "automatic (excess of mass)"),
        }
    }
}
