use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{union_find::UnionFind, SingleLinkageTree, NOISE};

// zero-length merges get this lambda instead of +inf so stabilities stay finite
const MAX_LAMBDA: f64 = 1e12;

/// an edge of the condensed tree. `child` is a point when below the number of points,
/// otherwise a cluster. `lambda` is the inverse distance at which the child left `parent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondensedRow {
    pub parent: usize,
    pub child: usize,
    pub lambda: f64,
    pub child_size: usize,
}

/// the single linkage hierarchy condensed so that splits creating a group smaller than the
/// minimum cluster size are read as points falling out of a cluster rather than new clusters.
#[derive(Debug, Clone)]
pub struct CondensedTree {
    rows: Vec<CondensedRow>,
    n_points: usize,
}

fn lambda_of(distance: f64) -> f64 {
    if distance > 0.0 {
        (1.0 / distance).min(MAX_LAMBDA)
    } else {
        MAX_LAMBDA
    }
}

impl CondensedTree {
    pub fn condense(tree: &SingleLinkageTree, min_cluster_size: usize) -> CondensedTree {
        let n = tree.n_points();
        let rows = tree.rows();
        if rows.is_empty() {
            return CondensedTree {
                rows: vec![],
                n_points: n,
            };
        }
        let root = tree.root();
        let mut relabel = vec![0usize; root + 1];
        let mut ignore = vec![false; root + 1];
        let mut next_label = n + 1;
        relabel[root] = n;
        let mut result = vec![];

        for node in tree.bfs(root) {
            if ignore[node] || node < n {
                continue;
            }
            let row = rows[node - n];
            let lambda = lambda_of(row.distance);
            let left_count = tree.node_size(row.left);
            let right_count = tree.node_size(row.right);
            let parent = relabel[node];

            let mut fall_out = |branch: usize, result: &mut Vec<CondensedRow>| {
                for sub in tree.bfs(branch) {
                    if sub < n {
                        result.push(CondensedRow {
                            parent,
                            child: sub,
                            lambda,
                            child_size: 1,
                        });
                    }
                    ignore[sub] = true;
                }
            };

            match (left_count >= min_cluster_size, right_count >= min_cluster_size) {
                (true, true) => {
                    for (branch, count) in [(row.left, left_count), (row.right, right_count)] {
                        relabel[branch] = next_label;
                        next_label += 1;
                        result.push(CondensedRow {
                            parent,
                            child: relabel[branch],
                            lambda,
                            child_size: count,
                        });
                    }
                }
                (false, false) => {
                    fall_out(row.left, &mut result);
                    fall_out(row.right, &mut result);
                }
                (false, true) => {
                    fall_out(row.left, &mut result);
                    relabel[row.right] = parent;
                }
                (true, false) => {
                    fall_out(row.right, &mut result);
                    relabel[row.left] = parent;
                }
            }
        }

        CondensedTree {
            rows: result,
            n_points: n,
        }
    }

    pub fn rows(&self) -> &[CondensedRow] {
        &self.rows
    }

    /// the root cluster id
    pub fn root(&self) -> usize {
        self.n_points
    }

    /// stability of every cluster: the sum over its members of the lambda range during which
    /// they belonged to it.
    pub fn stability(&self) -> BTreeMap<usize, f64> {
        let mut births: HashMap<usize, f64> = HashMap::new();
        births.insert(self.root(), 0.0);
        for row in self.rows.iter().filter(|r| r.child >= self.n_points) {
            births.insert(row.child, row.lambda);
        }
        let mut stability: BTreeMap<usize, f64> = BTreeMap::new();
        for row in self.rows.iter() {
            let birth = births.get(&row.parent).copied().unwrap_or(0.0);
            *stability.entry(row.parent).or_insert(0.0) +=
                (row.lambda - birth) * row.child_size as f64;
        }
        stability
    }

    /// picks clusters by excess of mass: walking from the leaves up, a cluster is kept when
    /// it is more stable than the sum of its selected descendants.
    pub fn select_clusters(&self, allow_single_cluster: bool) -> BTreeSet<usize> {
        let mut stability = self.stability();
        let mut children: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for row in self.rows.iter().filter(|r| r.child_size > 1) {
            children.entry(row.parent).or_default().push(row.child);
        }
        let mut nodes = stability.keys().copied().rev().collect::<Vec<_>>();
        if !allow_single_cluster {
            nodes.retain(|node| *node != self.root());
        }
        let mut is_cluster: BTreeMap<usize, bool> = nodes.iter().map(|n| (*n, true)).collect();

        for node in nodes.iter() {
            let subtree_stability: f64 = children
                .get(node)
                .map(|cs| {
                    cs.iter()
                        .map(|c| stability.get(c).copied().unwrap_or(0.0))
                        .sum()
                })
                .unwrap_or(0.0);
            let own = stability.get(node).copied().unwrap_or(0.0);
            if subtree_stability > own {
                is_cluster.insert(*node, false);
                stability.insert(*node, subtree_stability);
            } else {
                let mut stack = children.get(node).cloned().unwrap_or_default();
                while let Some(sub) = stack.pop() {
                    is_cluster.insert(sub, false);
                    if let Some(grandchildren) = children.get(&sub) {
                        stack.extend(grandchildren.iter().copied());
                    }
                }
            }
        }

        is_cluster
            .into_iter()
            .filter_map(|(node, selected)| selected.then_some(node))
            .collect()
    }

    /// labels each point with its selected cluster, or noise. labels are numbered by
    /// ascending cluster id.
    pub fn labels(&self, allow_single_cluster: bool) -> Vec<i32> {
        let clusters = self.select_clusters(allow_single_cluster);
        self.assign_labels(&clusters, allow_single_cluster)
    }

    fn assign_labels(&self, clusters: &BTreeSet<usize>, allow_single_cluster: bool) -> Vec<i32> {
        let n = self.n_points;
        if self.rows.is_empty() {
            return vec![NOISE; n];
        }
        let root = self.root();
        let max_id = self
            .rows
            .iter()
            .map(|r| r.parent.max(r.child))
            .max()
            .unwrap_or(root);
        let mut union_find = UnionFind::new(max_id + 1);
        for row in self.rows.iter() {
            if !clusters.contains(&row.child) {
                union_find.union(row.parent, row.child);
            }
        }
        let label_map: HashMap<usize, i32> = clusters
            .iter()
            .enumerate()
            .map(|(label, cluster)| (*cluster, label as i32))
            .collect();
        let point_lambda: HashMap<usize, f64> = self
            .rows
            .iter()
            .filter(|r| r.child < n)
            .map(|r| (r.child, r.lambda))
            .collect();
        let root_max_lambda = self
            .rows
            .iter()
            .filter(|r| r.parent == root)
            .map(|r| r.lambda)
            .fold(f64::NEG_INFINITY, f64::max);

        (0..n)
            .map(|point| {
                let cluster = union_find.find(point);
                if cluster < root {
                    NOISE
                } else if cluster == root {
                    let single_root = clusters.len() == 1 && clusters.contains(&root);
                    let lambda = point_lambda.get(&point).copied().unwrap_or(0.0);
                    if allow_single_cluster && single_root && lambda >= root_max_lambda {
                        label_map.get(&root).copied().unwrap_or(NOISE)
                    } else {
                        NOISE
                    }
                } else {
                    label_map.get(&cluster).copied().unwrap_or(NOISE)
                }
            })
            .collect()
    }
}
