//! Probability-weighted ensembles of spanning trees.

use rustc_hash::FxHashMap;

use crate::engine::errors::{IresError, Result};
use crate::engine::graph::{EdgeId, Graph};
use crate::engine::tree::SpanningTree;

/// Allowed deviation from 1 for the probabilities of a reloaded mixture.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// One distinct tree of a mixture.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureComponent {
    pub tree: SpanningTree,
    pub probability: f64,
    /// Number of learner rounds that selected this tree.
    pub rounds: u32,
}

/// A mixture tree as read back from storage, not yet checked against a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct RawComponent {
    pub edges: Vec<EdgeId>,
    pub probability: f64,
    pub rounds: u32,
}

impl From<MixtureComponent> for RawComponent {
    fn from(component: MixtureComponent) -> Self {
        Self {
            edges: component.tree.edges().to_vec(),
            probability: component.probability,
            rounds: component.rounds,
        }
    }
}

/// Distinct spanning trees with probabilities summing to 1.
///
/// Components are ordered by descending probability; equal probabilities keep
/// the order in which the trees first appeared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mixture {
    components: Vec<MixtureComponent>,
}

impl Mixture {
    /// Rebuilds a mixture from stored components. Each edge list is checked
    /// against `graph` exactly once, here.
    ///
    /// Duplicate trees are merged by summing probability and rounds. The
    /// probabilities must be finite, positive and sum to 1 within
    /// [`PROBABILITY_TOLERANCE`]; they are then renormalized exactly.
    pub fn from_parts(graph: &Graph, components: Vec<RawComponent>) -> Result<Self> {
        if components.is_empty() {
            return Err(IresError::InvalidMixture("mixture has no trees".into()));
        }

        let mut tally = Tally::default();
        for component in components {
            if !(component.probability.is_finite() && component.probability > 0.0) {
                return Err(IresError::InvalidMixture(format!(
                    "tree probability must be finite and positive, got {}",
                    component.probability
                )));
            }
            let tree = SpanningTree::from_edges(graph, component.edges)?;
            tally.add(tree, component.probability, component.rounds);
        }

        let total: f64 = tally.entries.iter().map(|e| e.mass).sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(IresError::InvalidMixture(format!(
                "tree probabilities sum to {}, expected 1",
                total
            )));
        }
        Ok(tally.into_mixture())
    }

    #[inline]
    pub fn components(&self) -> &[MixtureComponent] {
        &self.components
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MixtureComponent> {
        self.components.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn total_probability(&self) -> f64 {
        self.components.iter().map(|c| c.probability).sum()
    }
}

impl<'a> IntoIterator for &'a Mixture {
    type Item = &'a MixtureComponent;
    type IntoIter = std::slice::Iter<'a, MixtureComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Accumulates probability mass per distinct tree in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    entries: Vec<TallyEntry>,
    seen: FxHashMap<SpanningTree, usize>,
}

#[derive(Debug)]
struct TallyEntry {
    tree: SpanningTree,
    mass: f64,
    rounds: u32,
}

impl Tally {
    pub(crate) fn add(&mut self, tree: SpanningTree, mass: f64, rounds: u32) {
        match self.seen.get(&tree) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.mass += mass;
                entry.rounds += rounds;
            }
            None => {
                self.seen.insert(tree.clone(), self.entries.len());
                self.entries.push(TallyEntry { tree, mass, rounds });
            }
        }
    }

    pub(crate) fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Normalizes the accumulated mass into a [`Mixture`].
    pub(crate) fn into_mixture(self) -> Mixture {
        let total: f64 = self.entries.iter().map(|e| e.mass).sum();
        let mut components: Vec<MixtureComponent> = self
            .entries
            .into_iter()
            .map(|e| MixtureComponent {
                tree: e.tree,
                probability: e.mass / total,
                rounds: e.rounds,
            })
            .collect();
        // Stable sort keeps first-seen order among equal probabilities.
        components.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Mixture { components }
    }
}
