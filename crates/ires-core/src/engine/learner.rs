//! # Mixture learner
//!
//! Fits a mixture of spanning trees with an iterative reweighting loop.
//!
//! ## Rounds
//!
//! The learner is a finite state machine over round indices `0..iters`. Each
//! call to [`MixtureLearner::step`] runs exactly one round:
//!
//! 1. Draw one sub-seed per candidate from the master ChaCha stream, then
//!    sample every candidate tree from its own sub-seeded stream. Candidates
//!    are independent of each other, so with the `parallel` feature they are
//!    drawn on the rayon pool; the result does not depend on worker count.
//! 2. Score each candidate with
//!    [`tree_congestion_score`](crate::metrics::congestion::tree_congestion_score).
//! 3. Keep the lowest score as the round winner (ties: smaller tree signature,
//!    then candidate index) and credit it with mass `1 / iters`.
//! 4. Multiply the weight of every winning edge by the boost factor so later
//!    rounds explore other backbones.
//!
//! After the last round, duplicate winners are merged and the masses are
//! normalized into a [`Mixture`].
//!
//! ## Example
//!
//! ```rust
//! use ires_core::engine::graph::Graph;
//! use ires_core::engine::learner::fit;
//!
//! let graph = Graph::from_edges([("a", "b", 1.0), ("b", "c", 1.0), ("a", "c", 1.0)]).unwrap();
//! let mixture = fit(&graph, 10, 4, 7).unwrap();
//! assert!((mixture.total_probability() - 1.0).abs() < 1e-9);
//! ```

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::errors::{IresError, Result};
use crate::engine::graph::Graph;
use crate::engine::mixture::{Mixture, Tally};
use crate::engine::sampler::{self, EdgeWeights};
use crate::engine::tree::SpanningTree;
use crate::metrics::congestion::tree_congestion_score;

/// Default number of learner rounds.
pub const DEFAULT_ITERS: usize = 80;

/// Default number of candidate trees per round.
pub const DEFAULT_CANDIDATES: usize = 8;

/// Default multiplier applied to the weights of each round's winning edges.
pub const DEFAULT_BOOST: f64 = 1.5;

/// Weights are rescaled once the largest exceeds this, keeping them finite
/// across long runs. Uniform scaling leaves the sampling order unchanged.
const WEIGHT_RESCALE_THRESHOLD: f64 = 1e100;

/// Parameters of a fit run. All of them determine the output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitConfig {
    pub iters: usize,
    pub candidates: usize,
    pub seed: u64,
    pub boost: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            iters: DEFAULT_ITERS,
            candidates: DEFAULT_CANDIDATES,
            seed: 0,
            boost: DEFAULT_BOOST,
        }
    }
}

impl FitConfig {
    pub fn new(iters: usize, candidates: usize, seed: u64) -> Self {
        Self {
            iters,
            candidates,
            seed,
            ..Self::default()
        }
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    /// Rejects out-of-range parameters instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        if self.iters < 1 {
            return Err(IresError::InvalidParameter(format!(
                "iters must be at least 1, got {}",
                self.iters
            )));
        }
        if self.candidates < 1 {
            return Err(IresError::InvalidParameter(format!(
                "candidates must be at least 1, got {}",
                self.candidates
            )));
        }
        if !(self.boost.is_finite() && self.boost > 1.0) {
            return Err(IresError::InvalidParameter(format!(
                "boost factor must be a finite number greater than 1, got {}",
                self.boost
            )));
        }
        Ok(())
    }
}

/// A sampled tree and its congestion score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub tree: SpanningTree,
    pub score: f64,
}

/// What one round produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub round: usize,
    pub winner: Candidate,
    /// Distinct trees in the running mixture after this round.
    pub distinct_trees: usize,
}

/// Round-by-round mixture fitting over a borrowed graph.
#[derive(Debug)]
pub struct MixtureLearner<'g> {
    graph: &'g Graph,
    config: FitConfig,
    weights: EdgeWeights,
    rng: ChaCha8Rng,
    round: usize,
    tally: Tally,
}

impl<'g> MixtureLearner<'g> {
    /// Validates the parameters and the graph, then sets up round 0.
    ///
    /// Connectivity is checked here once; the graph cannot change afterwards.
    pub fn new(graph: &'g Graph, config: FitConfig) -> Result<Self> {
        config.validate()?;
        graph.ensure_spannable()?;
        Ok(Self {
            graph,
            config,
            weights: EdgeWeights::from_capacities(graph),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            round: 0,
            tally: Tally::default(),
        })
    }

    #[inline]
    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Index of the next round to run.
    #[inline]
    pub fn round(&self) -> usize {
        self.round
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.round >= self.config.iters
    }

    #[inline]
    pub fn weights(&self) -> &EdgeWeights {
        &self.weights
    }

    /// Runs one round. Returns `None` once all rounds have run.
    pub fn step(&mut self) -> Result<Option<RoundOutcome>> {
        if self.is_finished() {
            return Ok(None);
        }

        let seeds: Vec<u64> = (0..self.config.candidates)
            .map(|_| self.rng.next_u64())
            .collect();
        let candidates = draw_candidates(self.graph, &self.weights, &seeds)?;
        for (i, candidate) in candidates.iter().enumerate() {
            tracing::trace!(
                round = self.round,
                candidate = i,
                score = candidate.score,
                "scored candidate"
            );
        }
        let winner = select_winner(candidates)?;

        self.tally
            .add(winner.tree.clone(), 1.0 / self.config.iters as f64, 1);
        self.weights.boost(winner.tree.edges(), self.config.boost);
        rescale(&mut self.weights);

        let outcome = RoundOutcome {
            round: self.round,
            winner,
            distinct_trees: self.tally.distinct(),
        };
        tracing::debug!(
            round = outcome.round,
            score = outcome.winner.score,
            distinct_trees = outcome.distinct_trees,
            "round finished"
        );

        self.round += 1;
        Ok(Some(outcome))
    }

    /// Runs the remaining rounds and returns the normalized mixture.
    pub fn run(mut self) -> Result<Mixture> {
        while self.step()?.is_some() {}
        let mixture = self.tally.into_mixture();
        tracing::info!(
            rounds = self.config.iters,
            distinct_trees = mixture.len(),
            "fit finished"
        );
        Ok(mixture)
    }
}

/// Fits a mixture with the default boost factor.
pub fn fit(graph: &Graph, iters: usize, candidates: usize, seed: u64) -> Result<Mixture> {
    fit_with_config(graph, &FitConfig::new(iters, candidates, seed))
}

/// Fits a mixture with explicit parameters.
pub fn fit_with_config(graph: &Graph, config: &FitConfig) -> Result<Mixture> {
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        iters = config.iters,
        candidates = config.candidates,
        seed = config.seed,
        boost = config.boost,
        "fitting tree mixture"
    );
    MixtureLearner::new(graph, *config)?.run()
}

/// Samples and scores one candidate per sub-seed, preserving seed order.
fn draw_candidates(graph: &Graph, weights: &EdgeWeights, seeds: &[u64]) -> Result<Vec<Candidate>> {
    let draw = |seed: &u64| -> Result<Candidate> {
        let mut rng = ChaCha8Rng::seed_from_u64(*seed);
        let tree = sampler::sample(graph, weights, &mut rng)?;
        let score = tree_congestion_score(graph, &tree);
        Ok(Candidate { tree, score })
    };

    #[cfg(feature = "parallel")]
    {
        seeds.par_iter().map(draw).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(draw).collect()
    }
}

/// Lowest score wins; ties go to the smaller tree signature, then the earlier
/// candidate.
fn select_winner(candidates: Vec<Candidate>) -> Result<Candidate> {
    candidates
        .into_iter()
        .enumerate()
        .min_by(|(i, a), (j, b)| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| a.tree.cmp(&b.tree))
                .then(i.cmp(j))
        })
        .map(|(_, candidate)| candidate)
        .ok_or_else(|| IresError::InvalidParameter("a round needs at least one candidate".into()))
}

fn rescale(weights: &mut EdgeWeights) {
    let max = weights.as_slice().iter().copied().fold(0.0f64, f64::max);
    if max > WEIGHT_RESCALE_THRESHOLD {
        weights.scale(1.0 / max);
    }
}
