//! Edge-list loader.
//!
//! Each non-blank line that does not start with `#` holds three
//! whitespace-separated tokens, `u v capacity`. Node identifiers are kept as
//! strings. Repeated pairs are merged by summing capacity.

use std::fs;
use std::path::Path;

use crate::engine::errors::{IresError, Result};
use crate::engine::graph::Graph;

/// Reads and parses an edge-list file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    let text = fs::read_to_string(path.as_ref())?;
    let graph = parse_edge_list(&text)?;
    tracing::info!(
        path = %path.as_ref().display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

/// Parses edge-list text into a [`Graph`].
pub fn parse_edge_list(text: &str) -> Result<Graph> {
    let mut triples = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let &[u, v, w] = parts.as_slice() else {
            return Err(IresError::Parse {
                line: idx + 1,
                message: format!("expected 3 tokens `u v capacity`, got {}", parts.len()),
            });
        };
        let capacity: f64 = w.parse().map_err(|_| IresError::Parse {
            line: idx + 1,
            message: format!("capacity '{}' is not a number", w),
        })?;
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(IresError::Parse {
                line: idx + 1,
                message: format!("capacity must be a finite positive number, got {}", w),
            });
        }
        triples.push((u, v, capacity));
    }
    Graph::from_edges(triples)
}
