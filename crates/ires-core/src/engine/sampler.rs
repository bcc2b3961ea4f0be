//! Randomized spanning-tree sampler.
//!
//! Runs a Kruskal pass over keys `weight(e) * U` with `U` drawn uniformly from
//! `(0, 1]`. Edges with a low current weight tend to sort early and enter the
//! tree, so structure the learner has not yet exploited is preferred. Equal
//! keys fall back to `EdgeId` order, so a fixed random stream always yields
//! the same tree.

use rand::Rng;

use crate::engine::errors::{IresError, Result};
use crate::engine::graph::{EdgeId, Graph, UnionFind};
use crate::engine::tree::SpanningTree;

/// Per-edge sampling weights, indexed by [`EdgeId`].
///
/// Owned by the caller and passed into every sampling call; the learner is
/// the only code that mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeWeights {
    values: Vec<f64>,
}

impl EdgeWeights {
    /// Starts every edge at its own capacity.
    pub fn from_capacities(graph: &Graph) -> Self {
        Self {
            values: graph.edges().iter().map(|e| e.capacity).collect(),
        }
    }

    /// Builds weights from explicit values, one per edge.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if let Some(bad) = values.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(IresError::InvalidParameter(format!(
                "edge weights must be finite and positive, got {}",
                bad
            )));
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn get(&self, edge: EdgeId) -> f64 {
        self.values[edge.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Multiplies every weight by `factor`. Weights that would underflow are
    /// floored at the smallest positive normal value.
    pub fn scale(&mut self, factor: f64) {
        for w in &mut self.values {
            *w = (*w * factor).max(f64::MIN_POSITIVE);
        }
    }

    /// Multiplies the weight of every edge in `edges` by `factor`.
    pub fn boost(&mut self, edges: &[EdgeId], factor: f64) {
        for &edge in edges {
            self.values[edge.index()] *= factor;
        }
    }
}

/// Draws one spanning tree biased toward low-weight edges.
///
/// Fails with [`IresError::DegenerateGraph`] for graphs with fewer than two
/// nodes and with [`IresError::DisconnectedGraph`] when no spanning tree
/// exists.
pub fn sample<R>(graph: &Graph, weights: &EdgeWeights, rng: &mut R) -> Result<SpanningTree>
where
    R: Rng + ?Sized,
{
    let n = graph.node_count();
    if n < 2 {
        return Err(IresError::DegenerateGraph(format!(
            "a spanning tree needs at least 2 nodes, graph has {}",
            n
        )));
    }
    if weights.len() != graph.edge_count() {
        return Err(IresError::InvalidParameter(format!(
            "weight vector has {} entries but the graph has {} edges",
            weights.len(),
            graph.edge_count()
        )));
    }

    let mut keyed: Vec<(f64, EdgeId)> = graph
        .edges()
        .iter()
        .map(|edge| {
            let u = 1.0 - rng.gen::<f64>();
            (weights.get(edge.id) * u, edge.id)
        })
        .collect();
    keyed.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut sets = UnionFind::new(n);
    let mut chosen = Vec::with_capacity(n - 1);
    for (_, id) in keyed {
        let edge = graph.edge(id);
        if sets.union(edge.u.index(), edge.v.index()) {
            chosen.push(id);
            if chosen.len() == n - 1 {
                break;
            }
        }
    }

    if chosen.len() < n - 1 {
        return Err(IresError::DisconnectedGraph {
            components: n - chosen.len(),
        });
    }

    chosen.sort_unstable();
    Ok(SpanningTree::from_sorted(chosen))
}
