//! Report assembly.
//!
//! Merges the critical-edge and bottleneck-cut rankings into the externally
//! visible report shape, resolving ids to node names. Truncation happens
//! here and only here: the analyses always return complete rankings.

use crate::engine::graph::Graph;
use crate::engine::learner::FitConfig;
use crate::engine::mixture::Mixture;
use crate::metrics::{self, BottleneckCut, CriticalEdge};

/// Maximum number of node names listed per bottleneck cut.
pub const NODE_DISPLAY_LIMIT: usize = 30;

/// Presentation options for [`assemble_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Keep only the first `n` critical edges. `None` keeps all of them.
    pub top_edges: Option<usize>,
    /// Keep only the first `n` bottleneck cuts. `None` keeps all of them.
    pub top_cuts: Option<usize>,
    pub node_display_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_edges: None,
            top_cuts: None,
            node_display_limit: NODE_DISPLAY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    pub graph: GraphSummary,
    pub parameters: Option<FitConfig>,
    pub mixture: MixtureSummary,
    pub critical_edges: Vec<CriticalEdgeEntry>,
    pub bottleneck_cuts: Vec<CutEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixtureSummary {
    pub unique_trees: usize,
    pub total_rounds: u32,
    pub trees: Vec<TreeEntry>,
}

/// A mixture tree with its edges spelled out by node name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeEntry {
    pub edges: Vec<(String, String)>,
    pub probability: f64,
    pub rounds: u32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriticalEdgeEntry {
    pub source: String,
    pub target: String,
    pub capacity: f64,
    pub expected_congestion: f64,
    /// Expected capacity routed over this edge when it is a tree edge.
    pub expected_load: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CutEntry {
    /// Smaller side of the cut, truncated to the display limit.
    pub nodes: Vec<String>,
    pub truncated: bool,
    pub side_size: usize,
    pub other_side_size: usize,
    pub edge: (String, String),
    pub crossing_edges: usize,
    pub crossing_capacity: f64,
    pub probability: f64,
    pub sparsity: f64,
}

/// Runs both analyses over a fitted mixture.
///
/// The two are independent and read-only; with the `parallel` feature they
/// run side by side.
pub fn analyze(graph: &Graph, mixture: &Mixture) -> (Vec<CriticalEdge>, Vec<BottleneckCut>) {
    #[cfg(feature = "parallel")]
    {
        rayon::join(
            || metrics::estimate(graph, mixture),
            || metrics::detect(graph, mixture),
        )
    }
    #[cfg(not(feature = "parallel"))]
    {
        (
            metrics::estimate(graph, mixture),
            metrics::detect(graph, mixture),
        )
    }
}

/// Builds the full report for `mixture` over `graph`.
pub fn assemble_report(
    graph: &Graph,
    mixture: &Mixture,
    parameters: Option<FitConfig>,
    options: &ReportOptions,
) -> Report {
    let (critical, cuts) = analyze(graph, mixture);

    let critical_edges = critical
        .iter()
        .take(options.top_edges.unwrap_or(usize::MAX))
        .map(|record| {
            let (source, target) = graph.edge_names(record.edge);
            CriticalEdgeEntry {
                source: source.to_string(),
                target: target.to_string(),
                capacity: record.capacity,
                expected_congestion: record.score,
                expected_load: record.expected_load,
            }
        })
        .collect();

    let bottleneck_cuts = cuts
        .iter()
        .take(options.top_cuts.unwrap_or(usize::MAX))
        .map(|cut| cut_entry(graph, cut, options.node_display_limit))
        .collect();

    let report = Report {
        graph: GraphSummary {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        },
        parameters,
        mixture: MixtureSummary {
            unique_trees: mixture.len(),
            total_rounds: mixture.iter().map(|c| c.rounds).sum(),
            trees: tree_entries(graph, mixture),
        },
        critical_edges,
        bottleneck_cuts,
    };
    tracing::info!(
        critical_edges = report.critical_edges.len(),
        bottleneck_cuts = report.bottleneck_cuts.len(),
        "assembled report"
    );
    report
}

/// Spells out every mixture tree by node name.
pub fn tree_entries(graph: &Graph, mixture: &Mixture) -> Vec<TreeEntry> {
    mixture
        .iter()
        .map(|component| TreeEntry {
            edges: component
                .tree
                .edges()
                .iter()
                .map(|&id| {
                    let (u, v) = graph.edge_names(id);
                    (u.to_string(), v.to_string())
                })
                .collect(),
            probability: component.probability,
            rounds: component.rounds,
        })
        .collect()
}

fn cut_entry(graph: &Graph, cut: &BottleneckCut, limit: usize) -> CutEntry {
    let (u, v) = graph.edge_names(cut.cutting_edge);
    CutEntry {
        nodes: cut
            .side
            .iter()
            .take(limit)
            .map(|&node| graph.node_name(node).to_string())
            .collect(),
        truncated: cut.side.len() > limit,
        side_size: cut.side_size(),
        other_side_size: cut.other_side_size,
        edge: (u.to_string(), v.to_string()),
        crossing_edges: cut.crossing_edges,
        crossing_capacity: cut.crossing_capacity,
        probability: cut.probability,
        sparsity: cut.sparsity,
    }
}
