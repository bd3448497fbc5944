/// disjoint set forest with path compression. `union` always links the root of `child`
/// under the root of `parent`, so the surviving root is predictable.
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(size: usize) -> UnionFind {
        UnionFind {
            parent: (0..size).collect(),
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    pub fn union(&mut self, parent: usize, child: usize) {
        let parent_root = self.find(parent);
        let child_root = self.find(child);
        if parent_root != child_root {
            self.parent[child_root] = parent_root;
        }
    }
}
