use serde::{Deserialize, Serialize};

use super::{
    core_distances, ClusterPartition, ClusterSelection, CondensedTree, SingleLinkageTree,
    SpanningTreeEdge,
};
use crate::model::{LatLng, TagMapsError};
use crate::util::geo_utils;

/// share of an item's points that a cluster must reach under automatic selection
pub const MIN_CLUSTER_SIZE_SHARE: f64 = 0.05;
/// smallest group size kept when slicing the tree at a cut distance
pub const MIN_CUT_CLUSTER_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterEngineParameters {
    pub selection: ClusterSelection,
    /// neighborhood size for core distances, 1 disables density smoothing
    pub min_samples: usize,
    /// keep the minimum spanning tree on the result for diagnostics
    pub keep_spanning_tree: bool,
}

impl ClusterEngineParameters {
    pub fn manual(cut_distance: f64) -> ClusterEngineParameters {
        ClusterEngineParameters {
            selection: ClusterSelection::ManualCut { cut_distance },
            min_samples: 1,
            keep_spanning_tree: false,
        }
    }

    pub fn automatic() -> ClusterEngineParameters {
        ClusterEngineParameters {
            selection: ClusterSelection::Automatic,
            min_samples: 1,
            keep_spanning_tree: false,
        }
    }
}

/// output of one clustering run
#[derive(Debug, Clone)]
pub struct ClusterFit {
    pub partition: ClusterPartition,
    pub tree: SingleLinkageTree,
    pub min_cluster_size: usize,
    /// minimum spanning tree in radians, kept only when requested
    pub spanning_tree: Option<Vec<SpanningTreeEdge>>,
}

/// minimum cluster size for `n` points: 5% of the points, at least 2
pub fn min_cluster_size(n: usize) -> usize {
    ((n as f64 * MIN_CLUSTER_SIZE_SHARE).round() as usize).max(2)
}

/// partitions the points of one item into clusters and noise.
///
/// builds a single linkage tree over haversine mutual reachability distance (in radians)
/// and extracts flat clusters either by slicing it at the cut distance or by excess-of-mass
/// selection over the condensed tree.
///
/// # Arguments
///
/// * `points` - at least two WGS84 coordinates
/// * `parameters` - cluster selection and density settings
///
/// # Returns
///
/// one label per point in input order, or an error if there are fewer than two points
/// or the cut distance is not positive.
pub fn cluster_points(
    points: &[LatLng],
    parameters: &ClusterEngineParameters,
) -> Result<ClusterFit, TagMapsError> {
    if points.len() < 2 {
        return Err(TagMapsError::InsufficientPoints(points.len()));
    }
    if let ClusterSelection::ManualCut { cut_distance } = parameters.selection {
        if !(cut_distance.is_finite() && cut_distance > 0.0) {
            return Err(TagMapsError::InvalidCutDistance(cut_distance));
        }
    }
    let radians = points.iter().map(|p| p.to_radians()).collect::<Vec<_>>();
    let core = core_distances(&radians, parameters.min_samples);
    let (tree, mst) = SingleLinkageTree::build(&radians, &core);
    let min_size = min_cluster_size(points.len());

    let labels = match parameters.selection {
        ClusterSelection::ManualCut { cut_distance } => {
            let cut = geo_utils::meters_to_angular_distance(cut_distance);
            tree.cut(cut, MIN_CUT_CLUSTER_SIZE)
        }
        ClusterSelection::Automatic => CondensedTree::condense(&tree, min_size).labels(true),
    };
    let partition = ClusterPartition::new(labels);
    log::debug!(
        "clustered {} points with {}: {} clusters, {} noise",
        points.len(),
        parameters.selection,
        partition.n_clusters(),
        partition.noise_indices().len()
    );

    let spanning_tree = if parameters.keep_spanning_tree {
        if let Some(longest) = mst.iter().map(|e| e.distance).reduce(f64::max) {
            log::info!(
                "minimum spanning tree over {} points, longest edge {:.1}m",
                points.len(),
                geo_utils::angular_distance_to_meters(longest)
            );
        }
        Some(mst)
    } else {
        None
    };

    Ok(ClusterFit {
        partition,
        tree,
        min_cluster_size: min_size,
        spanning_tree,
    })
}
