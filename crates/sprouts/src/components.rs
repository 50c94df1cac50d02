//! Union-find over dot ids (path compression, union by size).
//!
//! Components only ever merge, so the tracker never needs deletion. Roots are
//! found iteratively: the path is collected first, then every parent pointer on
//! it is rewritten to the root, which keeps long games free of recursion depth.

use serde::Serialize;

use crate::faces::DotId;

/// Tracks which dots are mutually reachable along drawn curves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComponentTracker {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl ComponentTracker {
    /// `n` singleton components, one per seed dot.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `dot`'s component, compressing the path behind it.
    pub fn find(&mut self, dot: DotId) -> DotId {
        let mut root = dot.0;
        let mut path = Vec::new();
        while self.parent[root] != root {
            path.push(root);
            root = self.parent[root];
        }
        for node in path {
            self.parent[node] = root;
        }
        DotId(root)
    }

    /// Root lookup without compression, for read-only callers.
    pub fn root_of(&self, dot: DotId) -> DotId {
        let mut root = dot.0;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        DotId(root)
    }

    /// Merge the components of `a` and `b`. The smaller root hangs under the
    /// larger one; on a tie `b`'s root stays the root.
    pub fn union(&mut self, a: DotId, b: DotId) {
        let mut ra = self.find(a).0;
        let mut rb = self.find(b).0;
        if ra == rb {
            return;
        }
        if self.size[ra] > self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[ra] = rb;
        self.size[rb] += self.size[ra];
    }

    /// Append a fresh singleton and return its id.
    pub fn add_singleton(&mut self) -> DotId {
        let id = self.parent.len();
        self.parent.push(id);
        self.size.push(1);
        DotId(id)
    }

    /// Number of dots in `dot`'s component.
    pub fn component_size(&self, dot: DotId) -> usize {
        self.size[self.root_of(dot).0]
    }

    /// All dots sharing `dot`'s component, in increasing id order.
    pub fn members(&mut self, dot: DotId) -> Vec<DotId> {
        let root = self.find(dot);
        (0..self.parent.len())
            .map(DotId)
            .filter(|&d| self.find(d) == root)
            .collect()
    }

    /// Number of distinct components.
    pub fn component_count(&self) -> usize {
        (0..self.parent.len())
            .filter(|&i| self.parent[i] == i)
            .count()
    }
}
