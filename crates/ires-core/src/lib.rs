//! # Infra Resilience Explorer core
//!
//! Fits a mixture of spanning trees to an undirected capacitated network and
//! derives two rankings from it: edges with high expected congestion, and
//! sparse node partitions ("bottleneck cuts") induced by the trees.

pub mod engine;
pub mod metrics;
pub mod report;
#[cfg(feature = "serde")]
pub mod storage;

// Re-export commonly used types
pub use engine::errors::{IresError, Result};
pub use engine::graph::{EdgeId, Graph, NodeId};
pub use engine::learner::{fit, fit_with_config, FitConfig, MixtureLearner};
pub use engine::loader::{load_graph, parse_edge_list};
pub use engine::mixture::{Mixture, MixtureComponent, RawComponent};
pub use engine::tree::SpanningTree;
pub use report::{assemble_report, Report, ReportOptions};
