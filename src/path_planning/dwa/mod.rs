//! Sampling-based Dynamic Window Approach local planner
//!
//! A tick draws a population of constant-command rollouts, drops those whose
//! padded footprint touches an obstacle point, and keeps the best scoring one.

pub mod collision;
pub mod sampler;
pub mod scorer;
pub mod trajectory;

pub use collision::Footprint;
pub use sampler::{SamplingRegime, TrajectorySampler};
pub use scorer::{min_clearance, PathSelector, ScoreBreakdown, Selection};
pub use trajectory::Trajectory;
