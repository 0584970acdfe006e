//! Multi-objective scoring and best-path selection
//!
//! Every collision-free candidate is scored on five objectives (goal
//! distance, heading, smoothness, clearance, velocity) and the weighted sum
//! decides. The first candidate reaching the highest total wins; a later one
//! must be strictly better to replace it, so selection follows generation order.

use itertools::iproduct;
use ordered_float::OrderedFloat;

use super::collision::Footprint;
use super::trajectory::Trajectory;
use crate::common::{normalize_angle, Obstacles, Point2D, Pose2D};
use crate::config::{PlannerConfig, ScoringConfig};
use crate::control::GoalState;

/// Slack on the obstacle reach radius so rounding never drops a relevant point [m]
const REACH_MARGIN: f64 = 1e-6;

/// Individual objective values and their weighted total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub goal_distance: f64,
    pub heading: f64,
    pub smoothness: f64,
    pub clearance: f64,
    pub velocity: f64,
    pub total: f64,
}

/// Result of one selection pass
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Already within tolerance of the goal; holds a zero-velocity trajectory
    GoalReached(Trajectory),
    /// Highest scoring collision-free candidate
    Best {
        trajectory: Trajectory,
        score: ScoreBreakdown,
        survivors: usize,
    },
    /// Every candidate collides (local minimum); `yaw` is the current heading
    NoValidPath { yaw: f64 },
}

impl Selection {
    /// Trajectory whose command should be sent; stopped when none was found
    pub fn trajectory(&self) -> Trajectory {
        match self {
            Selection::GoalReached(t) => t.clone(),
            Selection::Best { trajectory, .. } => trajectory.clone(),
            Selection::NoValidPath { yaw } => Trajectory::stopped(*yaw),
        }
    }

    pub fn survivors(&self) -> usize {
        match self {
            Selection::Best { survivors, .. } => *survivors,
            _ => 0,
        }
    }
}

/// Scores candidates and picks the best one
#[derive(Debug, Clone)]
pub struct PathSelector {
    scoring: ScoringConfig,
    footprint: Footprint,
    max_speed: f64,
}

impl PathSelector {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            scoring: config.scoring.clone(),
            footprint: Footprint::from_config(&config.footprint),
            max_speed: config.motion.max_speed,
        }
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Piecewise clearance objective: penalty, linear ramp, then saturated bonus
    pub fn clearance_score(&self, min_distance: f64) -> f64 {
        let s = &self.scoring;
        if min_distance < s.clearance_danger {
            s.clearance_penalty
        } else if min_distance < s.clearance_safe {
            (min_distance - s.clearance_danger) * s.clearance_ramp_gain
        } else {
            s.clearance_bonus
        }
    }

    /// Score one candidate as seen from `pose`.
    ///
    /// Returns `None` for an empty rollout, which has no terminal point.
    pub fn score(
        &self,
        candidate: &Trajectory,
        obstacles: &Obstacles,
        pose: &Pose2D,
        goal: &Point2D,
    ) -> Option<ScoreBreakdown> {
        let clearance = min_clearance(&candidate.poses, obstacles);
        self.score_with_clearance(candidate, clearance, pose, goal)
    }

    /// [`PathSelector::score`] with the minimum obstacle distance already known
    pub fn score_with_clearance(
        &self,
        candidate: &Trajectory,
        min_distance: f64,
        pose: &Pose2D,
        goal: &Point2D,
    ) -> Option<ScoreBreakdown> {
        let terminal = candidate.terminal()?;
        let w = &self.scoring.weights;

        let goal_distance = -terminal.position().distance(goal);
        let bearing = pose.position().angle_to(goal);
        let heading = -normalize_angle(bearing - candidate.final_yaw).abs();
        let smoothness = -candidate.turn_rate.abs();
        let clearance = self.clearance_score(min_distance);
        let velocity = candidate.speed / self.max_speed;

        let total = w.goal_distance * goal_distance
            + w.heading * heading
            + w.smoothness * smoothness
            + w.clearance * clearance
            + w.velocity * velocity;

        Some(ScoreBreakdown {
            goal_distance,
            heading,
            smoothness,
            clearance,
            velocity,
            total,
        })
    }

    /// Obstacle points that can affect any of `candidates`.
    ///
    /// A point farther from `pose` than the farthest rollout pose plus the
    /// footprint circumradius can never collide, and one beyond that plus
    /// `clearance_safe` always earns the saturated clearance bonus, so dropping
    /// it changes neither the survivors nor any score.
    pub fn relevant_obstacles(
        &self,
        candidates: &[Trajectory],
        obstacles: &Obstacles,
        pose: &Pose2D,
    ) -> Obstacles {
        let origin = pose.position();
        let extent = candidates
            .iter()
            .flat_map(|c| c.poses.iter())
            .map(|p| OrderedFloat(p.position().distance(&origin)))
            .max()
            .map_or(0.0, |d| d.into_inner());
        let reach = extent
            + self.footprint.circumradius()
            + self.scoring.clearance_safe.max(0.0)
            + REACH_MARGIN;

        Obstacles::from_points(
            obstacles
                .iter()
                .filter(|o| o.distance(&origin) <= reach)
                .copied()
                .collect(),
        )
    }

    /// Pick the best collision-free candidate.
    ///
    /// Marks `goal` reached (once) when the robot is already within tolerance.
    pub fn select(
        &self,
        candidates: Vec<Trajectory>,
        obstacles: &Obstacles,
        pose: &Pose2D,
        goal: &mut GoalState,
    ) -> Selection {
        let target = goal.target();
        if pose.position().distance(&target) < self.scoring.goal_tolerance {
            goal.mark_reached();
            return Selection::GoalReached(Trajectory::stopped(pose.yaw));
        }

        let nearby = self.relevant_obstacles(&candidates, obstacles, pose);
        log::trace!("{} of {} obstacle points within reach", nearby.len(), obstacles.len());

        let mut best: Option<(Trajectory, ScoreBreakdown)> = None;
        let mut survivors = 0;

        for candidate in candidates {
            let clearance = match self.footprint.sweep(&candidate.poses, &nearby) {
                Some(clearance) => clearance,
                None => continue,
            };
            let score = match self.score_with_clearance(&candidate, clearance, pose, &target) {
                Some(score) => score,
                None => continue,
            };
            survivors += 1;
            log::trace!(
                "candidate v={:.3} w={:.3} total={:.3} ({:?})",
                candidate.speed,
                candidate.turn_rate,
                score.total,
                score
            );
            let improves = match &best {
                Some((_, current)) => score.total > current.total,
                None => true,
            };
            if improves {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((trajectory, score)) => Selection::Best {
                trajectory,
                score,
                survivors,
            },
            None => Selection::NoValidPath { yaw: pose.yaw },
        }
    }
}

/// Smallest distance between any rollout pose and any obstacle; infinite when either is empty
pub fn min_clearance(poses: &[Pose2D], obstacles: &Obstacles) -> f64 {
    iproduct!(poses.iter(), obstacles.iter())
        .map(|(p, o)| OrderedFloat((p.x - o.x).powi(2) + (p.y - o.y).powi(2)))
        .min()
        .map_or(f64::INFINITY, |d| d.into_inner().sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn selector() -> PathSelector {
        PathSelector::new(&PlannerConfig::default())
    }

    fn straight(speed: f64, turn_rate: f64, length: usize, y: f64) -> Trajectory {
        let poses: Vec<Pose2D> = (1..=length)
            .map(|i| Pose2D::new(i as f64 * 0.1, y, 0.0))
            .collect();
        Trajectory {
            speed,
            turn_rate,
            final_yaw: 0.0,
            poses,
        }
    }

    #[rstest]
    #[case(0.0, -10.0)]
    #[case(0.44, -10.0)]
    #[case(0.45, 0.0)]
    #[case(0.6, 0.3)]
    #[case(0.8, 1.5)]
    #[case(f64::INFINITY, 1.5)]
    fn test_clearance_score_shape(#[case] distance: f64, #[case] expected: f64) {
        assert_relative_eq!(selector().clearance_score(distance), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_min_clearance() {
        let poses = vec![Pose2D::new(0.0, 0.0, 0.0), Pose2D::new(1.0, 0.0, 0.0)];
        let obstacles =
            Obstacles::from_points(vec![Point2D::new(4.0, 4.0), Point2D::new(1.0, 3.0)]);
        assert_relative_eq!(min_clearance(&poses, &obstacles), 3.0, epsilon = 1e-12);
        assert!(min_clearance(&poses, &Obstacles::new()).is_infinite());
    }

    #[test]
    fn test_score_components() {
        let s = selector();
        let goal = Point2D::new(5.0, 0.0);
        let t = straight(0.15, 0.1, 10, 0.0);
        let score = s.score(&t, &Obstacles::new(), &Pose2D::origin(), &goal).unwrap();
        assert_relative_eq!(score.goal_distance, -4.0, epsilon = 1e-9);
        assert_relative_eq!(score.heading, 0.0, epsilon = 1e-12);
        assert_relative_eq!(score.smoothness, -0.1, epsilon = 1e-12);
        assert_relative_eq!(score.clearance, 1.5, epsilon = 1e-12);
        assert_relative_eq!(score.velocity, 1.0, epsilon = 1e-12);
        let total = 5.0 * -4.0 + 1.5 * 0.0 + 1.0 * -0.1 + 3.0 * 1.5 + 3.0 * 1.0;
        assert_relative_eq!(score.total, total, epsilon = 1e-9);
    }

    #[test]
    fn test_all_colliding_gives_no_valid_path() {
        let s = selector();
        let mut goal = GoalState::new(5.0, 0.0);
        let obstacles = Obstacles::from_points(vec![Point2D::new(0.5, 0.0)]);
        let candidates = vec![straight(0.15, 0.0, 10, 0.0), straight(0.1, 0.2, 10, 0.1)];
        let selection = s.select(candidates, &obstacles, &Pose2D::origin(), &mut goal);
        assert_eq!(selection, Selection::NoValidPath { yaw: 0.0 });
        assert!(selection.trajectory().control().is_zero());
        assert!(!goal.is_reached());
    }

    #[test]
    fn test_single_survivor_is_selected_regardless_of_score() {
        let s = selector();
        let mut goal = GoalState::new(5.0, 0.0);
        let obstacles = Obstacles::from_points(vec![Point2D::new(1.0, 0.0)]);
        // Slow, wobbly and moving away from the goal, but the only one clear of the obstacle
        let lone = Trajectory {
            speed: 0.01,
            turn_rate: -0.8,
            final_yaw: std::f64::consts::PI,
            poses: vec![Pose2D::new(-3.0, 0.0, std::f64::consts::PI)],
        };
        let candidates = vec![
            straight(0.15, 0.0, 10, 0.0),
            lone.clone(),
            straight(0.15, 0.0, 12, 0.0),
        ];
        match s.select(candidates, &obstacles, &Pose2D::origin(), &mut goal) {
            Selection::Best { trajectory, survivors, .. } => {
                assert_eq!(trajectory, lone);
                assert_eq!(survivors, 1);
            }
            other => panic!("expected a selection, got {:?}", other),
        }
    }

    #[test]
    fn test_closer_to_goal_wins() {
        let s = selector();
        let mut goal = GoalState::new(5.0, 0.0);
        let short = straight(0.15, 0.0, 10, 0.0);
        let long = straight(0.15, 0.0, 20, 0.0);
        let candidates = vec![short, long.clone()];
        let selection = s.select(candidates, &Obstacles::new(), &Pose2D::origin(), &mut goal);
        match selection {
            Selection::Best { trajectory, survivors, .. } => {
                assert_eq!(trajectory, long);
                assert_eq!(survivors, 2);
            }
            other => panic!("expected a selection, got {:?}", other),
        }
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let s = selector();
        let mut goal = GoalState::new(5.0, 0.0);
        let first = straight(0.15, 0.0, 10, 0.0);
        let mut second = first.clone();
        second.turn_rate = -0.0;
        // Identical scores; distinguishable only by the sign of zero
        let candidates = vec![first, second];
        let selection = s.select(candidates, &Obstacles::new(), &Pose2D::origin(), &mut goal);
        match selection {
            Selection::Best { trajectory, .. } => {
                assert!(trajectory.turn_rate.is_sign_positive());
            }
            other => panic!("expected a selection, got {:?}", other),
        }
    }

    #[test]
    fn test_within_tolerance_marks_goal_reached_once() {
        let s = selector();
        let mut goal = GoalState::new(0.05, 0.0);
        let pose = Pose2D::new(0.0, 0.0, 0.3);
        let candidates = vec![straight(0.15, 0.0, 10, 0.0)];

        let selection = s.select(candidates.clone(), &Obstacles::new(), &pose, &mut goal);
        assert_eq!(selection, Selection::GoalReached(Trajectory::stopped(0.3)));
        assert!(goal.is_reached());
        assert_eq!(goal.reached_transitions(), 1);

        s.select(candidates, &Obstacles::new(), &pose, &mut goal);
        assert_eq!(goal.reached_transitions(), 1);
    }

    #[test]
    fn test_unreachable_obstacles_are_dropped() {
        let s = selector();
        let candidates = vec![straight(0.15, 0.0, 20, 0.0)];
        // Farthest pose at 2.0 m; reach is 2.0 + hypot(1.0, 0.8) + 0.8
        let obstacles = Obstacles::from_points(vec![
            Point2D::new(4.0, 0.0),
            Point2D::new(-4.0, 0.0),
            Point2D::new(0.0, 8.0),
            Point2D::new(30.0, 1.0),
        ]);
        let nearby = s.relevant_obstacles(&candidates, &obstacles, &Pose2D::origin());
        assert_eq!(nearby.points, vec![Point2D::new(4.0, 0.0), Point2D::new(-4.0, 0.0)]);
    }

    #[test]
    fn test_pruning_leaves_selection_unchanged() {
        let s = selector();
        let pose = Pose2D::origin();
        let candidates = vec![
            straight(0.15, 0.0, 20, 0.0),
            straight(0.1, 0.1, 20, 0.5),
            straight(0.05, -0.2, 20, -0.6),
        ];
        // A ring of unreachable points plus one point near the middle rollout
        let mut points: Vec<Point2D> = (0..72)
            .map(|k| {
                let a = k as f64 * std::f64::consts::PI / 36.0;
                Point2D::new(7.0 * a.cos(), 7.0 * a.sin())
            })
            .collect();
        points.push(Point2D::new(1.0, 1.9));
        let obstacles = Obstacles::from_points(points);

        let mut goal = GoalState::new(5.0, 0.0);
        let selection = s.select(candidates.clone(), &obstacles, &pose, &mut goal);
        let (trajectory, score) = match selection {
            Selection::Best { trajectory, score, .. } => (trajectory, score),
            other => panic!("expected a selection, got {:?}", other),
        };

        // Exhaustive reference: every candidate scored against every point
        let reference = candidates
            .iter()
            .filter(|c| s.footprint().is_collision_free(&c.poses, &obstacles))
            .filter_map(|c| s.score(c, &obstacles, &pose, &goal.target()).map(|sc| (c, sc)))
            .fold(None, |best: Option<(&Trajectory, ScoreBreakdown)>, (c, sc)| match best {
                Some((_, b)) if sc.total <= b.total => best,
                _ => Some((c, sc)),
            });
        let (expected, expected_score) = reference.unwrap();
        assert_eq!(&trajectory, expected);
        assert_relative_eq!(score.total, expected_score.total, epsilon = 1e-12);
        assert_relative_eq!(score.clearance, expected_score.clearance, epsilon = 1e-12);
    }
}
