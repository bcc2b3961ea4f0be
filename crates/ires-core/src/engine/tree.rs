//! Spanning trees and the rooted index used to query them.
//!
//! A [`SpanningTree`] is just the sorted set of graph edges it uses, which
//! keeps every tree edge traceable back to its capacity in the [`Graph`].
//! [`TreeIndex`] roots a tree at the first node and answers path-length and
//! subtree queries with binary lifting and a preorder numbering.

use smallvec::SmallVec;

use crate::engine::errors::{IresError, Result};
use crate::engine::graph::{EdgeId, Graph, NodeId, UnionFind};

/// Inline capacity for per-node tree adjacency.
const INLINE_DEGREE: usize = 4;

/// A spanning tree stored as its sorted edge ids.
///
/// The sorted edge list doubles as the tree's signature: two trees are equal
/// exactly when they use the same edges, and comparing signatures gives the
/// deterministic order used to break ties between equally scored trees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanningTree {
    edges: Vec<EdgeId>,
}

impl SpanningTree {
    /// Validates that `edges` form a spanning tree of `graph`.
    ///
    /// Used when a tree comes from outside the sampler, e.g. a stored mixture.
    pub fn from_edges(graph: &Graph, mut edges: Vec<EdgeId>) -> Result<Self> {
        let n = graph.node_count();
        edges.sort_unstable();
        edges.dedup();
        if n < 2 || edges.len() != n - 1 {
            return Err(IresError::InvalidMixture(format!(
                "a spanning tree of {} nodes needs {} distinct edges, got {}",
                n,
                n.saturating_sub(1),
                edges.len()
            )));
        }
        let mut sets = UnionFind::new(n);
        for &id in &edges {
            if id.index() >= graph.edge_count() {
                return Err(IresError::InvalidMixture(format!(
                    "edge id {} is out of range",
                    id.0
                )));
            }
            let edge = graph.edge(id);
            if !sets.union(edge.u.index(), edge.v.index()) {
                let (a, b) = graph.edge_names(id);
                return Err(IresError::InvalidMixture(format!(
                    "edge {}-{} closes a cycle",
                    a, b
                )));
            }
        }
        Ok(Self { edges })
    }

    /// Wraps edges already known to form a spanning tree.
    pub(crate) fn from_sorted(edges: Vec<EdgeId>) -> Self {
        debug_assert!(edges.windows(2).all(|w| w[0] < w[1]));
        Self { edges }
    }

    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edges.binary_search(&edge).is_ok()
    }
}

/// Rooted view of a spanning tree with O(log n) path queries.
#[derive(Debug, Clone)]
pub struct TreeIndex {
    root: NodeId,
    parent: Vec<Option<(NodeId, EdgeId)>>,
    depth: Vec<u32>,
    /// `up[k][v]` is the 2^k-th ancestor of `v` (the root maps to itself).
    up: Vec<Vec<NodeId>>,
    preorder: Vec<NodeId>,
    position: Vec<usize>,
    subtree_size: Vec<usize>,
}

impl TreeIndex {
    /// Roots `tree` at node 0 of `graph`.
    pub fn new(graph: &Graph, tree: &SpanningTree) -> Self {
        let n = graph.node_count();
        let mut adjacency: Vec<SmallVec<[(NodeId, EdgeId); INLINE_DEGREE]>> =
            vec![SmallVec::new(); n];
        for &id in tree.edges() {
            let edge = graph.edge(id);
            adjacency[edge.u.index()].push((edge.v, id));
            adjacency[edge.v.index()].push((edge.u, id));
        }

        let root = NodeId(0);
        let mut parent = vec![None; n];
        let mut depth = vec![0u32; n];
        let mut preorder = Vec::with_capacity(n);
        let mut visited = vec![false; n];

        if n > 0 {
            let mut stack = vec![root];
            visited[root.index()] = true;
            while let Some(node) = stack.pop() {
                preorder.push(node);
                // Reverse so children are visited in edge order.
                for &(next, edge) in adjacency[node.index()].iter().rev() {
                    if !visited[next.index()] {
                        visited[next.index()] = true;
                        parent[next.index()] = Some((node, edge));
                        depth[next.index()] = depth[node.index()] + 1;
                        stack.push(next);
                    }
                }
            }
        }

        let mut position = vec![0usize; n];
        for (pos, node) in preorder.iter().enumerate() {
            position[node.index()] = pos;
        }

        let mut subtree_size = vec![1usize; n];
        for &node in preorder.iter().rev() {
            if let Some((p, _)) = parent[node.index()] {
                subtree_size[p.index()] += subtree_size[node.index()];
            }
        }

        let levels = (usize::BITS - n.max(1).leading_zeros()) as usize;
        let mut up = Vec::with_capacity(levels.max(1));
        up.push(
            (0..n)
                .map(|i| parent[i].map(|(p, _)| p).unwrap_or(NodeId(i as u32)))
                .collect::<Vec<_>>(),
        );
        for k in 1..levels.max(1) {
            let prev: &Vec<NodeId> = &up[k - 1];
            let next = (0..n).map(|i| prev[prev[i].index()]).collect();
            up.push(next);
        }

        Self {
            root,
            parent,
            depth,
            up,
            preorder,
            position,
            subtree_size,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn depth(&self, node: NodeId) -> u32 {
        self.depth[node.index()]
    }

    /// Parent of `node` and the tree edge joining them, `None` for the root.
    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<(NodeId, EdgeId)> {
        self.parent[node.index()]
    }

    /// Lowest common ancestor.
    pub fn lca(&self, mut a: NodeId, mut b: NodeId) -> NodeId {
        if self.depth(a) < self.depth(b) {
            std::mem::swap(&mut a, &mut b);
        }
        let mut diff = self.depth(a) - self.depth(b);
        let mut k = 0;
        while diff > 0 {
            if diff & 1 == 1 {
                a = self.up[k][a.index()];
            }
            diff >>= 1;
            k += 1;
        }
        if a == b {
            return a;
        }
        for level in self.up.iter().rev() {
            let (pa, pb) = (level[a.index()], level[b.index()]);
            if pa != pb {
                a = pa;
                b = pb;
            }
        }
        self.up[0][a.index()]
    }

    /// Number of tree edges on the unique path between `a` and `b`.
    pub fn path_length(&self, a: NodeId, b: NodeId) -> u32 {
        let lca = self.lca(a, b);
        self.depth(a) + self.depth(b) - 2 * self.depth(lca)
    }

    /// Number of nodes in the subtree hanging below `node`, itself included.
    #[inline]
    pub fn subtree_size(&self, node: NodeId) -> usize {
        self.subtree_size[node.index()]
    }

    /// True when `node` lies in the subtree rooted at `top`.
    #[inline]
    pub fn in_subtree(&self, top: NodeId, node: NodeId) -> bool {
        let start = self.position[top.index()];
        let pos = self.position[node.index()];
        pos >= start && pos < start + self.subtree_size[top.index()]
    }

    /// Nodes of the subtree rooted at `top`, in preorder.
    pub fn subtree_nodes(&self, top: NodeId) -> &[NodeId] {
        let start = self.position[top.index()];
        &self.preorder[start..start + self.subtree_size[top.index()]]
    }

    /// Crossing edge count and summed capacity for the cut under every node.
    ///
    /// Entry `v` covers the graph edges with exactly one endpoint in the
    /// subtree of `v`; the root's entry is `(0, 0.0)`. Each graph edge adds
    /// its weight at both endpoints and takes twice that back at their LCA,
    /// so one bottom-up accumulation yields every cut in O(E log n).
    pub fn crossing_totals(&self, graph: &Graph) -> Vec<(usize, f64)> {
        let n = self.preorder.len();
        let mut count = vec![0i64; n];
        let mut capacity = vec![0.0f64; n];
        for edge in graph.edges() {
            let lca = self.lca(edge.u, edge.v).index();
            for end in [edge.u.index(), edge.v.index()] {
                count[end] += 1;
                capacity[end] += edge.capacity;
            }
            count[lca] -= 2;
            capacity[lca] -= 2.0 * edge.capacity;
        }

        for &node in self.preorder.iter().rev() {
            if let Some((p, _)) = self.parent[node.index()] {
                count[p.index()] += count[node.index()];
                capacity[p.index()] += capacity[node.index()];
            }
        }

        count
            .into_iter()
            .zip(capacity)
            .map(|(c, w)| (usize::try_from(c).unwrap_or(0), w.max(0.0)))
            .collect()
    }

    /// Every tree edge paired with its lower (child) endpoint, in preorder.
    ///
    /// Removing the edge detaches exactly the child's subtree.
    pub fn child_edges(&self) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.preorder
            .iter()
            .filter_map(|&node| self.parent(node).map(|(_, edge)| (edge, node)))
    }
}
