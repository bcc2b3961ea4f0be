//! # Capacitated network graph
//!
//! Immutable, undirected graph with one positive capacity per unordered node
//! pair. The graph is the only input the fitting and analysis code reads.
//!
//! ## Ordering
//!
//! Node identifiers are sorted lexicographically when the graph is built, so
//! `NodeId` order is the same as name order. Edges are stored as canonical
//! `(u, v)` pairs with `u < v` and sorted, so `EdgeId` order is the
//! lexicographic endpoint-pair order. Every ranking and selection step in the
//! crate falls back to these orders to break ties between equal floating-point
//! scores.
//!
//! ## Example
//!
//! ```rust
//! use ires_core::engine::graph::Graph;
//!
//! let graph = Graph::from_edges([("a", "b", 1.0), ("b", "c", 2.0), ("b", "a", 0.5)]).unwrap();
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! let ab = graph.find_edge("b", "a").unwrap();
//! assert_eq!(graph.edge(ab).capacity, 1.5);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::engine::errors::{IresError, Result};

/// A node in the graph, indexing the sorted node name table.
///
/// NodeId implements Ord/PartialOrd for stable, deterministic iteration.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

/// An edge in the graph, indexing the sorted edge table.
///
/// EdgeId implements Ord/PartialOrd for stable, deterministic iteration.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An undirected capacitated edge. `u < v` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub u: NodeId,
    pub v: NodeId,
    pub capacity: f64,
}

impl Edge {
    /// Returns both endpoints as a `(u, v)` pair.
    #[inline]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.u, self.v)
    }

    /// Returns the endpoint opposite to `node`.
    #[inline]
    pub fn other(&self, node: NodeId) -> NodeId {
        if node == self.u {
            self.v
        } else {
            self.u
        }
    }
}

/// Immutable undirected graph with merged, positive edge capacities.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    names: Vec<Arc<str>>,
    index: FxHashMap<Arc<str>, NodeId>,
    edges: Vec<Edge>,
    pairs: FxHashMap<(NodeId, NodeId), EdgeId>,
}

impl Graph {
    /// Builds a graph from `(u, v, capacity)` triples.
    ///
    /// Parallel edges over the same unordered pair are merged by summing their
    /// capacities. Fails with [`IresError::InvalidParameter`] on a self loop or
    /// a capacity that is not a finite positive number.
    pub fn from_edges<I, S>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let mut merged: BTreeMap<(Arc<str>, Arc<str>), f64> = BTreeMap::new();
        let mut names: BTreeSet<Arc<str>> = BTreeSet::new();

        for (a, b, capacity) in edges {
            let (a, b) = (a.as_ref(), b.as_ref());
            if a == b {
                return Err(IresError::InvalidParameter(format!(
                    "self loop on node '{}' is not allowed",
                    a
                )));
            }
            check_capacity(a, b, capacity)?;

            let a = intern(&mut names, a);
            let b = intern(&mut names, b);
            let key = if a < b { (a, b) } else { (b, a) };
            *merged.entry(key).or_insert(0.0) += capacity;
        }

        let names: Vec<Arc<str>> = names.into_iter().collect();
        let index: FxHashMap<Arc<str>, NodeId> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), NodeId(i as u32)))
            .collect();

        let mut out = Vec::with_capacity(merged.len());
        let mut pairs = FxHashMap::default();
        for ((a, b), capacity) in merged {
            check_capacity(&a, &b, capacity)?;
            let id = EdgeId(out.len() as u32);
            let (u, v) = (index[&a], index[&b]);
            pairs.insert((u, v), id);
            out.push(Edge { id, u, v, capacity });
        }

        Ok(Self {
            names,
            index,
            edges: out,
            pairs,
        })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All node ids in name order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.names.len() as u32).map(NodeId)
    }

    /// All edges in endpoint-pair order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    #[inline]
    pub fn node_name(&self, id: NodeId) -> &str {
        &self.names[id.index()]
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Looks up the edge joining two nodes, in either direction.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let key = if a < b { (a, b) } else { (b, a) };
        self.pairs.get(&key).copied()
    }

    /// Looks up the edge joining two named nodes, in either direction.
    pub fn find_edge(&self, a: &str, b: &str) -> Option<EdgeId> {
        self.edge_between(self.node_id(a)?, self.node_id(b)?)
    }

    /// Endpoint names of an edge, in canonical order.
    pub fn edge_names(&self, id: EdgeId) -> (&str, &str) {
        let edge = self.edge(id);
        (self.node_name(edge.u), self.node_name(edge.v))
    }

    /// Counts connected components with a single union-find pass.
    pub fn connected_components(&self) -> usize {
        let mut sets = UnionFind::new(self.node_count());
        let mut components = self.node_count();
        for edge in &self.edges {
            if sets.union(edge.u.index(), edge.v.index()) {
                components -= 1;
            }
        }
        components
    }

    /// Checks that a spanning tree with at least one edge exists.
    pub fn ensure_spannable(&self) -> Result<()> {
        if self.node_count() < 2 {
            return Err(IresError::DegenerateGraph(format!(
                "a spanning tree needs at least 2 nodes, graph has {}",
                self.node_count()
            )));
        }
        match self.connected_components() {
            1 => Ok(()),
            components => Err(IresError::DisconnectedGraph { components }),
        }
    }
}

fn intern(names: &mut BTreeSet<Arc<str>>, name: &str) -> Arc<str> {
    if let Some(existing) = names.get(name) {
        return existing.clone();
    }
    let name: Arc<str> = Arc::from(name);
    names.insert(name.clone());
    name
}

fn check_capacity(a: &str, b: &str, capacity: f64) -> Result<()> {
    if capacity.is_finite() && capacity > 0.0 {
        Ok(())
    } else {
        Err(IresError::InvalidParameter(format!(
            "capacity of edge {}-{} must be a finite positive number, got {}",
            a, b, capacity
        )))
    }
}

/// Disjoint-set forest with path halving and union by rank.
#[derive(Debug, Clone)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub(crate) fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets holding `a` and `b`. Returns false if already joined.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}
