//! The fitting engine.
//!
//! This module provides:
//! - **errors**: Error types shared by the whole crate
//! - **graph**: Immutable capacitated graph with deterministic node/edge order
//! - **loader**: Edge-list parsing into a [`graph::Graph`]
//! - **tree**: Spanning trees and the rooted index used for path queries
//! - **sampler**: Randomized Kruskal sampling under per-edge weights
//! - **mixture**: Probability-weighted tree ensembles
//! - **learner**: The round-based reweighting loop that fits a mixture

pub mod errors;
pub mod graph;
pub mod learner;
pub mod loader;
pub mod mixture;
pub mod sampler;
pub mod tree;
