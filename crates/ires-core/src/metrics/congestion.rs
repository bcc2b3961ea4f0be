//! Expected-congestion scoring of graph edges.
//!
//! For a single tree, an edge left out of the tree has its capacity rerouted
//! along the unique tree path between its endpoints. Its reroute cost is
//! `capacity / path_length`; tree edges carry their own traffic and cost 0.
//! The learner ranks candidate trees by the sum of these costs, and the
//! estimator averages them over a fitted mixture.
//!
//! The estimator also reports each edge's expected induced load: the summed
//! capacity of graph edges whose tree path runs over it, which is the
//! capacity crossing the cut the edge induces. Non-tree edges carry none.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::graph::{Edge, EdgeId, Graph};
use crate::engine::mixture::Mixture;
use crate::engine::tree::{SpanningTree, TreeIndex};

/// Expected congestion of one graph edge under a mixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalEdge {
    pub edge: EdgeId,
    pub capacity: f64,
    pub score: f64,
    /// Probability-weighted induced load over the trees containing the edge.
    pub expected_load: f64,
}

/// Reroute cost of `edge` when traffic follows `tree`.
#[inline]
pub fn reroute_cost(index: &TreeIndex, in_tree: &[bool], edge: &Edge) -> f64 {
    if in_tree[edge.id.index()] {
        return 0.0;
    }
    let hops = index.path_length(edge.u, edge.v).max(1);
    edge.capacity / f64::from(hops)
}

/// Reroute cost of every graph edge under `tree`, indexed by [`EdgeId`].
pub fn tree_reroute_costs(graph: &Graph, tree: &SpanningTree) -> Vec<f64> {
    let index = TreeIndex::new(graph, tree);
    let in_tree = membership(graph, tree);
    graph
        .edges()
        .iter()
        .map(|edge| reroute_cost(&index, &in_tree, edge))
        .collect()
}

/// Congestion score of a candidate tree: the summed reroute cost of all
/// edges it leaves out. Lower means load is spread more evenly.
pub fn tree_congestion_score(graph: &Graph, tree: &SpanningTree) -> f64 {
    tree_reroute_costs(graph, tree).iter().sum()
}

/// Induced load of every graph edge under `tree`, indexed by [`EdgeId`].
pub fn tree_edge_loads(graph: &Graph, tree: &SpanningTree) -> Vec<f64> {
    edge_loads(graph, &TreeIndex::new(graph, tree))
}

fn edge_loads(graph: &Graph, index: &TreeIndex) -> Vec<f64> {
    let totals = index.crossing_totals(graph);
    let mut loads = vec![0.0f64; graph.edge_count()];
    for (edge, child) in index.child_edges() {
        loads[edge.index()] = totals[child.index()].1;
    }
    loads
}

/// Reroute costs and induced loads of one tree, sharing a single index.
fn tree_profile(graph: &Graph, tree: &SpanningTree) -> (Vec<f64>, Vec<f64>) {
    let index = TreeIndex::new(graph, tree);
    let in_tree = membership(graph, tree);
    let costs = graph
        .edges()
        .iter()
        .map(|edge| reroute_cost(&index, &in_tree, edge))
        .collect();
    (costs, edge_loads(graph, &index))
}

/// Scores every graph edge by its probability-weighted reroute cost.
///
/// Returns one record per edge, ordered by descending score with ties broken
/// by `EdgeId` (lexicographic endpoint order).
pub fn estimate(graph: &Graph, mixture: &Mixture) -> Vec<CriticalEdge> {
    #[cfg(feature = "parallel")]
    let per_tree: Vec<(Vec<f64>, Vec<f64>)> = mixture
        .components()
        .par_iter()
        .map(|c| tree_profile(graph, &c.tree))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let per_tree: Vec<(Vec<f64>, Vec<f64>)> = mixture
        .components()
        .iter()
        .map(|c| tree_profile(graph, &c.tree))
        .collect();

    // Fold in mixture order so the float sums do not depend on scheduling.
    let mut scores = vec![0.0f64; graph.edge_count()];
    let mut loads = vec![0.0f64; graph.edge_count()];
    for (component, (costs, tree_loads)) in mixture.iter().zip(&per_tree) {
        let p = component.probability;
        for (total, cost) in scores.iter_mut().zip(costs) {
            *total += p * cost;
        }
        for (total, load) in loads.iter_mut().zip(tree_loads) {
            *total += p * load;
        }
    }

    let mut records: Vec<CriticalEdge> = graph
        .edges()
        .iter()
        .map(|edge| CriticalEdge {
            edge: edge.id,
            capacity: edge.capacity,
            score: scores[edge.id.index()],
            expected_load: loads[edge.id.index()],
        })
        .collect();
    records.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.edge.cmp(&b.edge)));

    tracing::debug!(
        edges = records.len(),
        trees = mixture.len(),
        "estimated expected congestion"
    );
    records
}

fn membership(graph: &Graph, tree: &SpanningTree) -> Vec<bool> {
    let mut in_tree = vec![false; graph.edge_count()];
    for &id in tree.edges() {
        in_tree[id.index()] = true;
    }
    in_tree
}
