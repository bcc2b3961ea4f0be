//! Analysis of a fitted mixture.
//!
//! Both analyses are read-only over an immutable graph and mixture. With the
//! `parallel` feature, per-tree work runs on the rayon pool and results are
//! folded in mixture order, so the output is the same either way.

pub mod congestion;
pub mod cuts;

pub use congestion::{estimate, CriticalEdge};
pub use cuts::{detect, BottleneckCut};
