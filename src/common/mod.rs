//! Common types, traits, and error definitions for dwa_planner
//!
//! This module provides the foundational building blocks shared by
//! perception, planning and the control loop.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
