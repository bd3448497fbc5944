use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

/// label of points that belong to no cluster
pub const NOISE: i32 = -1;

/// assignment of each input point to a cluster label, in input order. label values only
/// distinguish groups; compare partitions with [`ClusterPartition::same_grouping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterPartition {
    labels: Vec<i32>,
}

impl ClusterPartition {
    pub fn new(labels: Vec<i32>) -> ClusterPartition {
        ClusterPartition { labels }
    }

    /// a partition where every point is noise
    pub fn all_noise(n: usize) -> ClusterPartition {
        ClusterPartition {
            labels: vec![NOISE; n],
        }
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_clusters(&self) -> usize {
        self.labels
            .iter()
            .filter(|l| **l != NOISE)
            .unique()
            .count()
    }

    /// indices of the points labeled as noise
    pub fn noise_indices(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(idx, l)| (*l == NOISE).then_some(idx))
            .collect()
    }

    /// point indices of each cluster, largest cluster first. equal sizes keep label order.
    pub fn clusters_by_size(&self) -> Vec<Vec<usize>> {
        let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (idx, label) in self.labels.iter().enumerate() {
            if *label != NOISE {
                groups.entry(*label).or_default().push(idx);
            }
        }
        groups
            .into_values()
            .sorted_by(|a, b| b.len().cmp(&a.len()))
            .collect()
    }

    /// true when both partitions group the same points together and mark the same points
    /// as noise, regardless of label numbering
    pub fn same_grouping(&self, other: &ClusterPartition) -> bool {
        if self.labels.len() != other.labels.len() {
            return false;
        }
        let groups = |p: &ClusterPartition| -> BTreeSet<Vec<usize>> {
            p.clusters_by_size().into_iter().collect()
        };
        self.noise_indices() == other.noise_indices() && groups(self) == groups(other)
    }
}
