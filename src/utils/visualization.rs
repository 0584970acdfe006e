//! SVG rendering of planner runs using plotlib

use std::path::Path;

use plotlib::page::Page;
use plotlib::repr::Plot;
use plotlib::style::{LineStyle, PointMarker, PointStyle};
use plotlib::view::ContinuousView;

use crate::common::{Obstacles, Path2D, PlannerError, PlannerResult, Point2D};

/// Color palette for consistent styling
pub mod colors {
    pub const OBSTACLE: &str = "#000000";
    pub const GOAL: &str = "#0000FF";
    pub const TRAJECTORY: &str = "#35C788";
    pub const PLAN: &str = "#FF0000";
}

/// Axis limits covering every drawn point, padded by `margin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlotBounds {
    pub fn covering<'a, I>(points: I, margin: f64) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2D>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = Self {
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        let b = iter.fold(init, |b, p| Self {
            x_min: b.x_min.min(p.x),
            x_max: b.x_max.max(p.x),
            y_min: b.y_min.min(p.y),
            y_max: b.y_max.max(p.y),
        });
        Some(Self {
            x_min: b.x_min - margin,
            x_max: b.x_max + margin,
            y_min: b.y_min - margin,
            y_max: b.y_max + margin,
        })
    }
}

fn to_pairs(points: &[Point2D]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.x, p.y)).collect()
}

/// Write an SVG showing obstacles, the driven trajectory, the last chosen plan and the goal.
///
/// Empty layers are skipped.
pub fn render_run_svg<P: AsRef<Path>>(
    path: P,
    obstacles: &Obstacles,
    trajectory: &Path2D,
    last_plan: &Path2D,
    goal: Point2D,
) -> PlannerResult<()> {
    let all = obstacles
        .points
        .iter()
        .chain(trajectory.points.iter())
        .chain(last_plan.points.iter())
        .chain(std::iter::once(&goal));
    let bounds = PlotBounds::covering(all, 1.0)
        .ok_or_else(|| PlannerError::VisualizationError("nothing to plot".to_string()))?;

    let mut view = ContinuousView::new()
        .x_range(bounds.x_min, bounds.x_max)
        .y_range(bounds.y_min, bounds.y_max)
        .x_label("x [m]")
        .y_label("y [m]");

    if !obstacles.is_empty() {
        view = view.add(
            Plot::new(to_pairs(&obstacles.points))
                .point_style(PointStyle::new().colour(colors::OBSTACLE).size(2.)),
        );
    }
    if trajectory.len() > 1 {
        view = view.add(
            Plot::new(to_pairs(&trajectory.points))
                .line_style(LineStyle::new().colour(colors::TRAJECTORY).width(2.)),
        );
    }
    if last_plan.len() > 1 {
        view = view.add(
            Plot::new(to_pairs(&last_plan.points))
                .line_style(LineStyle::new().colour(colors::PLAN).width(1.)),
        );
    }
    view = view.add(
        Plot::new(vec![(goal.x, goal.y)]).point_style(
            PointStyle::new()
                .marker(PointMarker::Cross)
                .colour(colors::GOAL)
                .size(5.),
        ),
    );

    Page::single(&view)
        .save(path.as_ref())
        .map_err(|e| PlannerError::VisualizationError(e.to_string()))?;
    log::info!("Saved run plot to {}", path.as_ref().display());
    Ok(())
}
