//! Bottleneck cuts induced by mixture trees.
//!
//! Every tree edge is a bridge of its tree, so removing it splits the node set
//! into two sides. A cut is scored by how many graph edges cross it relative
//! to the size of its smaller side (`crossing / min(|S|, |V \ S|)`); lower
//! sparsity means a sharper bottleneck.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::graph::{EdgeId, Graph, NodeId};
use crate::engine::mixture::Mixture;
use crate::engine::tree::{SpanningTree, TreeIndex};

/// A node partition induced by removing one tree edge.
#[derive(Debug, Clone, PartialEq)]
pub struct BottleneckCut {
    /// Smaller side of the partition, sorted by node id.
    pub side: Vec<NodeId>,
    pub other_side_size: usize,
    /// Tree edge whose removal induces the partition.
    pub cutting_edge: EdgeId,
    /// Graph edges with one endpoint on each side, the cutting edge included.
    pub crossing_edges: usize,
    /// Summed capacity of the crossing edges.
    pub crossing_capacity: f64,
    /// Probability mass of the trees inducing this partition.
    pub probability: f64,
    pub sparsity: f64,
}

impl BottleneckCut {
    #[inline]
    pub fn side_size(&self) -> usize {
        self.side.len()
    }
}

/// One cut per edge of `tree`, with the probability left at 0.
pub fn tree_cuts(graph: &Graph, tree: &SpanningTree) -> Vec<BottleneckCut> {
    let n = graph.node_count();
    let index = TreeIndex::new(graph, tree);
    let totals = index.crossing_totals(graph);

    index
        .child_edges()
        .map(|(cutting_edge, child)| {
            let (crossing_edges, crossing_capacity) = totals[child.index()];
            let size = index.subtree_size(child);
            let side = smaller_side(graph, &index, child, size);
            let side_size = side.len();

            BottleneckCut {
                side,
                other_side_size: n - side_size,
                cutting_edge,
                crossing_edges,
                crossing_capacity,
                probability: 0.0,
                sparsity: crossing_edges as f64 / side_size as f64,
            }
        })
        .collect()
}

/// Enumerates, aggregates and ranks the cuts of every tree in `mixture`.
///
/// Identical partitions are merged by summing probability; the representative
/// kept is the one with the fewest crossing edges, then the lowest cutting
/// edge id. Results are ordered sparsest first, then by smaller-side size,
/// then lexicographically by node.
pub fn detect(graph: &Graph, mixture: &Mixture) -> Vec<BottleneckCut> {
    #[cfg(feature = "parallel")]
    let per_tree: Vec<Vec<BottleneckCut>> = mixture
        .components()
        .par_iter()
        .map(|c| tree_cuts(graph, &c.tree))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let per_tree: Vec<Vec<BottleneckCut>> = mixture
        .components()
        .iter()
        .map(|c| tree_cuts(graph, &c.tree))
        .collect();

    let mut merged: BTreeMap<Vec<NodeId>, BottleneckCut> = BTreeMap::new();
    for (component, cuts) in mixture.iter().zip(per_tree) {
        for cut in cuts {
            match merged.get_mut(&cut.side) {
                Some(existing) => {
                    existing.probability += component.probability;
                    let better = (cut.crossing_edges, cut.cutting_edge)
                        < (existing.crossing_edges, existing.cutting_edge);
                    if better {
                        existing.cutting_edge = cut.cutting_edge;
                        existing.crossing_edges = cut.crossing_edges;
                        existing.crossing_capacity = cut.crossing_capacity;
                        existing.sparsity = cut.sparsity;
                    }
                }
                None => {
                    let mut cut = cut;
                    cut.probability = component.probability;
                    merged.insert(cut.side.clone(), cut);
                }
            }
        }
    }

    let mut cuts: Vec<BottleneckCut> = merged.into_values().collect();
    cuts.sort_by(|a, b| {
        a.sparsity
            .total_cmp(&b.sparsity)
            .then(a.side.len().cmp(&b.side.len()))
            .then_with(|| a.side.cmp(&b.side))
    });

    tracing::debug!(cuts = cuts.len(), trees = mixture.len(), "detected bottleneck cuts");
    cuts
}

/// The smaller side of the partition detaching `child`'s subtree.
///
/// When both sides have the same size the lexicographically smaller node list
/// is used, so a partition always maps to one key.
fn smaller_side(graph: &Graph, index: &TreeIndex, child: NodeId, size: usize) -> Vec<NodeId> {
    let n = graph.node_count();
    let mut subtree = index.subtree_nodes(child).to_vec();
    subtree.sort_unstable();
    if 2 * size < n {
        return subtree;
    }
    let complement: Vec<NodeId> = graph
        .node_ids()
        .filter(|&node| !index.in_subtree(child, node))
        .collect();
    if 2 * size > n {
        return complement;
    }
    subtree.min(complement)
}
