//! Utility modules

pub mod visualization;

pub use visualization::{colors, render_run_svg, PlotBounds};
