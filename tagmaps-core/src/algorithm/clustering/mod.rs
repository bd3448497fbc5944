mod cluster_engine;
mod cluster_partition;
mod cluster_selection;
mod condensed_tree;
mod core_distance;
mod single_linkage_tree;
mod union_find;

pub use cluster_engine::{cluster_points, min_cluster_size, ClusterEngineParameters, ClusterFit};
pub use cluster_partition::{ClusterPartition, NOISE};
pub use cluster_selection::ClusterSelection;
pub use condensed_tree::{CondensedRow, CondensedTree};
pub use core_distance::core_distances;
pub use single_linkage_tree::{LinkageRow, SingleLinkageTree, SpanningTreeEdge};
