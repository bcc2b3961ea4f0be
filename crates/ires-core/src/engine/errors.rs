//! Error types for fitting and analysis.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = IresError> = std::result::Result<T, E>;

/// Errors that can occur while loading a graph, fitting a mixture, or
/// assembling a report.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
///
/// Structural and parameter errors are raised before any sampling begins, so
/// a failed `fit` never yields a partial mixture.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IresError {
    /// Malformed edge-list input.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The graph is too small to have a spanning tree with at least one edge.
    #[error("degenerate graph: {0}")]
    DegenerateGraph(String),

    /// The graph splits into several components, so no spanning tree exists.
    #[error("disconnected graph: found {components} connected components")]
    DisconnectedGraph { components: usize },

    /// A caller-supplied parameter or capacity is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A stored mixture does not describe spanning trees of the given graph.
    #[error("invalid mixture: {0}")]
    InvalidMixture(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
