//! JSON persistence for fitted mixtures and reports.
//!
//! The mixture artifact lists each tree by its edges' node names, so it can
//! be reloaded against a freshly parsed graph and analyzed again without
//! re-fitting. Nothing written here goes through hash-map iteration, so the
//! same inputs always produce the same bytes.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::errors::{IresError, Result};
use crate::engine::graph::Graph;
use crate::engine::learner::FitConfig;
use crate::engine::mixture::{Mixture, RawComponent};
use crate::report::{tree_entries, Report, TreeEntry};

/// File name used for the persisted mixture.
pub const MIXTURE_FILE: &str = "mixture.json";

/// File name used for the persisted report.
pub const REPORT_FILE: &str = "report.json";

/// The persisted form of a fitted mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureFile {
    /// Path of the edge list the mixture was fitted on, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<String>,
    pub parameters: FitConfig,
    pub trees: Vec<TreeEntry>,
}

impl MixtureFile {
    pub fn new(
        graph: &Graph,
        mixture: &Mixture,
        parameters: FitConfig,
        source: Option<String>,
    ) -> Self {
        Self {
            graph: source,
            parameters,
            trees: tree_entries(graph, mixture),
        }
    }

    /// Resolves the stored edge names against `graph`; tree structure and
    /// probabilities are validated by [`Mixture::from_parts`].
    pub fn to_mixture(&self, graph: &Graph) -> Result<Mixture> {
        let mut components = Vec::with_capacity(self.trees.len());
        for entry in &self.trees {
            let mut edges = Vec::with_capacity(entry.edges.len());
            for (u, v) in &entry.edges {
                let id = graph.find_edge(u, v).ok_or_else(|| {
                    IresError::InvalidMixture(format!("edge {}-{} is not in the graph", u, v))
                })?;
                edges.push(id);
            }
            components.push(RawComponent {
                edges,
                probability: entry.probability,
                rounds: entry.rounds,
            });
        }
        Mixture::from_parts(graph, components)
    }
}

/// Serializes `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "wrote json");
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&text)?)
}

pub fn read_mixture(path: impl AsRef<Path>) -> Result<MixtureFile> {
    read_json(path)
}

pub fn read_report(path: impl AsRef<Path>) -> Result<Report> {
    read_json(path)
}
