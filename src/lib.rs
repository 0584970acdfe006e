//! dwa_planner - sampling-based local motion planner for a differential-drive robot
//!
//! Each control tick projects the latest lidar scan into the odometry frame,
//! samples candidate constant-velocity trajectories toward the goal, discards
//! those whose padded footprint touches an obstacle, and emits the command of
//! the best-scoring survivor.

// Core modules
pub mod common;
pub mod config;
pub mod utils;

// Planner modules
pub mod perception;
pub mod path_planning;
pub mod control;
pub mod simulation;

// Re-export common types for convenience
pub use common::{ControlInput, Obstacles, Path2D, Point2D, Pose2D};
pub use common::{CommandSink, MotionModel, RecordingSink, UnicycleModel};
pub use common::{PlannerError, PlannerResult};
pub use config::PlannerConfig;
pub use control::{run_periodic, ControlCycle, GoalState, SharedInputs, TickOutcome};
