//! Range scan handling: validity filtering and projection into the planning frame

use crate::common::{Obstacles, Point2D, Pose2D};

/// One planar range scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSample {
    /// Ranges ordered by beam index [m]
    pub ranges: Vec<f64>,
    /// Bearing of the first beam relative to the robot heading [rad]
    pub angle_min: f64,
    /// Bearing step between consecutive beams [rad]
    pub angle_increment: f64,
    /// Readings at or beyond this are "no return" [m]
    pub range_max: f64,
    /// Carried for completeness; not used for filtering
    pub range_min: f64,
}

impl ScanSample {
    pub fn new(ranges: Vec<f64>, angle_min: f64, angle_increment: f64, range_max: f64) -> Self {
        Self {
            ranges,
            angle_min,
            angle_increment,
            range_max,
            range_min: 0.0,
        }
    }

    /// A reading marks an obstacle only if it is a finite return inside the sensor range
    pub fn is_valid_reading(&self, range: f64) -> bool {
        range.is_finite() && range < self.range_max
    }

    /// Bearing of beam `index` relative to the robot heading
    pub fn beam_angle(&self, index: usize) -> f64 {
        self.angle_min + index as f64 * self.angle_increment
    }

    /// Number of readings that would produce an obstacle point
    pub fn valid_count(&self) -> usize {
        self.ranges.iter().filter(|&&r| self.is_valid_reading(r)).count()
    }
}

/// Project a scan into world-frame obstacle points around `pose`.
///
/// Never fails: a missing pose or scan yields an empty set.
pub fn project_obstacles(pose: Option<&Pose2D>, scan: Option<&ScanSample>) -> Obstacles {
    let (pose, scan) = match (pose, scan) {
        (Some(pose), Some(scan)) => (pose, scan),
        _ => return Obstacles::new(),
    };

    let points = scan
        .ranges
        .iter()
        .enumerate()
        .filter(|&(_, &r)| scan.is_valid_reading(r))
        .map(|(i, &r)| {
            let bearing = pose.yaw + scan.beam_angle(i);
            Point2D::new(pose.x + r * bearing.cos(), pose.y + r * bearing.sin())
        })
        .collect();

    Obstacles::from_points(points)
}
