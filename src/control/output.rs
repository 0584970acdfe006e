//! Visualization output for the chosen trajectory

use crate::common::{Path2D, Point2D};
use crate::config::VisualizationConfig;

/// Line-strip marker of the selected rollout (z is always 0)
#[derive(Debug, Clone, PartialEq)]
pub struct PathMarker {
    pub frame_id: String,
    pub line_width: f64,
    pub color: [f32; 4],
    pub points: Vec<Point2D>,
}

impl PathMarker {
    pub fn line_strip(config: &VisualizationConfig, path: &Path2D) -> Self {
        Self {
            frame_id: config.frame_id.clone(),
            line_width: config.line_width,
            color: config.color,
            points: path.points.clone(),
        }
    }

    /// Marker with no points, sent when the robot is stopped
    pub fn empty(config: &VisualizationConfig) -> Self {
        Self::line_strip(config, &Path2D::new())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
