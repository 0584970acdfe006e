// Perception: odometry and range scans into planner inputs

pub mod pose;
pub mod scan;

pub use pose::*;
pub use scan::*;
