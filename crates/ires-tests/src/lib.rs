//! Shared graph fixtures and structural checks for the integration tests.

use std::collections::BTreeSet;

use ires_core::{Graph, NodeId, SpanningTree};

/// Builds a graph from borrowed triples, panicking on invalid input.
pub fn graph(edges: &[(&str, &str, f64)]) -> Graph {
    Graph::from_edges(edges.iter().copied()).expect("fixture graph is valid")
}

/// The four-node path A-B-C-D with unit capacities.
pub fn path_abcd() -> Graph {
    graph(&[("A", "B", 1.0), ("B", "C", 1.0), ("C", "D", 1.0)])
}

/// A cycle over `n` nodes named `r00`, `r01`, ...
pub fn ring(n: usize, capacity: f64) -> Graph {
    let edges: Vec<(String, String, f64)> = (0..n)
        .map(|i| (format!("r{i:02}"), format!("r{:02}", (i + 1) % n), capacity))
        .collect();
    Graph::from_edges(edges).expect("ring is valid")
}

/// A `rows x cols` grid; horizontal links have capacity 1, vertical ones 2.
pub fn grid(rows: usize, cols: usize) -> Graph {
    let name = |r: usize, c: usize| format!("g{r:02}_{c:02}");
    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                edges.push((name(r, c), name(r, c + 1), 1.0));
            }
            if r + 1 < rows {
                edges.push((name(r, c), name(r + 1, c), 2.0));
            }
        }
    }
    Graph::from_edges(edges).expect("grid is valid")
}

/// Two complete graphs of `k` nodes joined by the single link `l0 - r0`.
pub fn dumbbell(k: usize) -> Graph {
    let mut edges = Vec::new();
    for side in ["l", "r"] {
        for i in 0..k {
            for j in (i + 1)..k {
                edges.push((format!("{side}{i}"), format!("{side}{j}"), 4.0));
            }
        }
    }
    edges.push(("l0".to_string(), "r0".to_string(), 1.0));
    Graph::from_edges(edges).expect("dumbbell is valid")
}

/// Checks, independently of the library's own validation, that `tree` has
/// `n - 1` edges, contains no cycle and reaches every node.
pub fn assert_spanning_tree(graph: &Graph, tree: &SpanningTree) {
    let n = graph.node_count();
    assert_eq!(tree.len(), n - 1, "a spanning tree has n - 1 edges");

    let mut adjacency = vec![Vec::new(); n];
    for &id in tree.edges() {
        let edge = graph.edge(id);
        adjacency[edge.u.index()].push(edge.v);
        adjacency[edge.v.index()].push(edge.u);
    }

    let mut seen = vec![false; n];
    let mut stack = vec![(NodeId(0), None::<NodeId>)];
    seen[0] = true;
    let mut visited = 1;
    while let Some((node, from)) = stack.pop() {
        for &next in &adjacency[node.index()] {
            if Some(next) == from {
                continue;
            }
            assert!(!seen[next.index()], "tree contains a cycle");
            seen[next.index()] = true;
            visited += 1;
            stack.push((next, Some(node)));
        }
    }
    assert_eq!(visited, n, "tree does not reach every node");
}

/// Checks that a cut side and its complement size describe a partition of
/// the graph's nodes with both sides non-empty.
pub fn assert_partition(graph: &Graph, side: &[NodeId], other_side_size: usize) {
    assert!(!side.is_empty());
    assert!(other_side_size > 0);
    let distinct: BTreeSet<NodeId> = side.iter().copied().collect();
    assert_eq!(distinct.len(), side.len(), "side lists a node twice");
    assert!(side.iter().all(|n| n.index() < graph.node_count()));
    assert_eq!(side.len() + other_side_size, graph.node_count());
}
