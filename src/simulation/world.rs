//! Static circular obstacles and ray casting against them

use serde::{Deserialize, Serialize};

use crate::common::Point2D;

/// Circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleObstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn contains(&self, point: &Point2D) -> bool {
        self.center().distance(point) <= self.radius
    }

    /// Distance along the ray from `origin` with heading `angle` to the
    /// first boundary crossing. An origin inside the circle hits at 0.
    pub fn ray_intersection(&self, origin: &Point2D, angle: f64) -> Option<f64> {
        let (dx, dy) = (angle.cos(), angle.sin());
        let fx = origin.x - self.x;
        let fy = origin.y - self.y;

        let b = fx * dx + fy * dy;
        let c = fx * fx + fy * fy - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }

        let root = disc.sqrt();
        let near = -b - root;
        let far = -b + root;
        if far < 0.0 {
            None
        } else {
            Some(near.max(0.0))
        }
    }
}

/// Obstacle field the simulated robot drives through
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub obstacles: Vec<CircleObstacle>,
}

impl World {
    pub fn new(obstacles: Vec<CircleObstacle>) -> Self {
        Self { obstacles }
    }

    /// Nearest hit over all obstacles
    pub fn ray_cast(&self, origin: &Point2D, angle: f64) -> Option<f64> {
        self.obstacles
            .iter()
            .filter_map(|o| o.ray_intersection(origin, angle))
            .fold(None, |best: Option<f64>, d| Some(best.map_or(d, |b| b.min(d))))
    }

    pub fn is_occupied(&self, point: &Point2D) -> bool {
        self.obstacles.iter().any(|o| o.contains(point))
    }

    /// Points on each obstacle boundary, for plotting
    pub fn outline(&self, points_per_obstacle: usize) -> Vec<Point2D> {
        let n = points_per_obstacle.max(1);
        self.obstacles
            .iter()
            .flat_map(|o| {
                (0..n).map(move |k| {
                    let a = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
                    Point2D::new(o.x + o.radius * a.cos(), o.y + o.radius * a.sin())
                })
            })
            .collect()
    }
}
