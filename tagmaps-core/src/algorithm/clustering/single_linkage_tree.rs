use itertools::Itertools;

use super::{union_find::UnionFind, NOISE};
use crate::util::geo_utils;

/// one merge of the hierarchy. nodes below `n_points` are points, node `n_points + i` is
/// the cluster created by row `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkageRow {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    pub size: usize,
}

/// an edge of the minimum spanning tree over mutual reachability distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanningTreeEdge {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
}

/// single linkage hierarchy over mutual reachability distance in radians
#[derive(Debug, Clone)]
pub struct SingleLinkageTree {
    rows: Vec<LinkageRow>,
    n_points: usize,
}

impl SingleLinkageTree {
    /// builds the minimum spanning tree of the mutual reachability graph with Prim's
    /// algorithm and converts it into a single linkage hierarchy.
    ///
    /// # Arguments
    ///
    /// * `points` - (latitude, longitude) in radians
    /// * `core_distances` - one core distance per point, see [`super::core_distances`]
    ///
    /// # Returns
    ///
    /// the tree and the spanning tree edges in the order Prim's algorithm added them
    pub fn build(
        points: &[[f64; 2]],
        core_distances: &[f64],
    ) -> (SingleLinkageTree, Vec<SpanningTreeEdge>) {
        let n = points.len();
        let mst = prim_spanning_tree(points, core_distances);
        let sorted = mst
            .iter()
            .copied()
            .sorted_by(|a, b| a.distance.total_cmp(&b.distance))
            .collect_vec();

        // label merges, tracking the current root node of each point.
        let mut union_find = UnionFind::new(2 * n.max(1) - 1);
        let mut sizes = vec![1usize; n];
        sizes.resize(2 * n.max(1) - 1, 0);
        let mut rows = Vec::with_capacity(n.saturating_sub(1));
        for (idx, edge) in sorted.iter().enumerate() {
            let next_label = n + idx;
            let a = union_find.find(edge.from);
            let b = union_find.find(edge.to);
            let size = sizes[a] + sizes[b];
            rows.push(LinkageRow {
                left: a,
                right: b,
                distance: edge.distance,
                size,
            });
            sizes[next_label] = size;
            union_find.union(next_label, a);
            union_find.union(next_label, b);
        }

        (SingleLinkageTree { rows, n_points: n }, mst)
    }

    pub fn rows(&self) -> &[LinkageRow] {
        &self.rows
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// the node id of the root of the hierarchy
    pub fn root(&self) -> usize {
        2 * self.rows.len()
    }

    /// number of points below a node
    pub fn node_size(&self, node: usize) -> usize {
        if node < self.n_points {
            1
        } else {
            self.rows[node - self.n_points].size
        }
    }

    /// all nodes below (and including) `root` in breadth-first order
    pub fn bfs(&self, root: usize) -> Vec<usize> {
        let mut result = vec![];
        let mut to_process = vec![root];
        while !to_process.is_empty() {
            result.extend(to_process.iter().copied());
            to_process = to_process
                .iter()
                .filter(|node| **node >= self.n_points)
                .flat_map(|node| {
                    let row = &self.rows[*node - self.n_points];
                    [row.left, row.right]
                })
                .collect();
        }
        result
    }

    /// flat labels from slicing the tree at `cut`. points joined by merges strictly below
    /// `cut` share a group; groups smaller than `min_cluster_size` become noise. labels are
    /// numbered from 0 in order of the group's root node.
    pub fn cut(&self, cut: f64, min_cluster_size: usize) -> Vec<i32> {
        let n = self.n_points;
        if n == 0 {
            return vec![];
        }
        let mut union_find = UnionFind::new(2 * n - 1);
        for (idx, row) in self.rows.iter().enumerate() {
            if row.distance < cut {
                let cluster = n + idx;
                union_find.union(cluster, row.left);
                union_find.union(cluster, row.right);
            }
        }
        let roots = (0..n).map(|p| union_find.find(p)).collect_vec();
        let counts = roots.iter().counts();
        let mut label_map = std::collections::BTreeMap::new();
        let mut next_label = 0;
        for root in roots.iter().sorted().dedup() {
            if counts.get(root).copied().unwrap_or_default() >= min_cluster_size {
                label_map.insert(*root, next_label);
                next_label += 1;
            }
        }
        roots
            .iter()
            .map(|root| label_map.get(root).copied().unwrap_or(NOISE))
            .collect()
    }
}

/// dense Prim's algorithm, O(n^2) time and O(n) memory. ties break toward the lowest index
/// so the tree is deterministic.
fn prim_spanning_tree(points: &[[f64; 2]], core_distances: &[f64]) -> Vec<SpanningTreeEdge> {
    let n = points.len();
    if n < 2 {
        return vec![];
    }
    let mut in_tree = vec![false; n];
    let mut best = vec![f64::INFINITY; n];
    let mut best_from = vec![0usize; n];
    let mut edges = Vec::with_capacity(n - 1);
    let mut current = 0;
    in_tree[0] = true;

    for _ in 1..n {
        let mut next: Option<usize> = None;
        for j in 0..n {
            if in_tree[j] {
                continue;
            }
            let d = geo_utils::haversine_angle(points[current], points[j])
                .max(core_distances[current])
                .max(core_distances[j]);
            if d < best[j] {
                best[j] = d;
                best_from[j] = current;
            }
            next = match next {
                Some(k) if best[k] <= best[j] => Some(k),
                _ => Some(j),
            };
        }
        let Some(j) = next else { break };
        in_tree[j] = true;
        edges.push(SpanningTreeEdge {
            from: best_from[j],
            to: j,
            distance: best[j],
        });
        current = j;
    }
    edges
}
