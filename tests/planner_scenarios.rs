//! End-to-end planner scenarios driven through the public API

use std::time::Duration;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use dwa_planner::common::{ControlInput, Obstacles, Point2D, Pose2D, RecordingSink};
use dwa_planner::config::PlannerConfig;
use dwa_planner::control::{ControlCycle, GoalState, TickOutcome};
use dwa_planner::path_planning::dwa::{min_clearance, PathSelector, Selection, TrajectorySampler};
use dwa_planner::perception::PoseSample;
use dwa_planner::simulation::{CircleObstacle, SimLidar, SimRobot, Simulation, World};

fn seeded_parts(config: &PlannerConfig, seed: u64) -> (TrajectorySampler<StdRng>, PathSelector) {
    let sampler = TrajectorySampler::with_rng(
        config.motion.clone(),
        config.sampling.clone(),
        StdRng::seed_from_u64(seed),
    );
    (sampler, PathSelector::new(config))
}

#[test]
fn open_field_heads_straight_for_goal() {
    let config = PlannerConfig::default();
    let (mut sampler, selector) = seeded_parts(&config, 1);
    let pose = Pose2D::origin();
    let mut goal = GoalState::new(5.0, 0.0);

    let candidates = sampler.sample(&pose, &goal.target());
    assert_eq!(candidates.len(), 400);
    assert!(candidates.iter().all(|c| c.len() == 199));

    match selector.select(candidates, &Obstacles::new(), &pose, &mut goal) {
        Selection::Best { trajectory, survivors, .. } => {
            assert_eq!(survivors, 400);
            assert!(trajectory.speed > 0.1);
            assert!(trajectory.turn_rate.abs() < 0.2);
            assert!(trajectory.terminal().map_or(false, |p| p.x > 0.0));
        }
        other => panic!("expected a trajectory, got {:?}", other),
    }
    assert!(!goal.is_reached());
}

#[test]
fn goal_within_tolerance_is_reached_once() {
    let config = PlannerConfig::default();
    let (mut sampler, selector) = seeded_parts(&config, 2);
    let pose = Pose2D::origin();
    let mut goal = GoalState::new(0.05, 0.0);

    for _ in 0..2 {
        let candidates = sampler.sample(&pose, &goal.target());
        match selector.select(candidates, &Obstacles::new(), &pose, &mut goal) {
            Selection::GoalReached(trajectory) => {
                assert_eq!(trajectory.control(), ControlInput::zero());
                assert!(trajectory.is_empty());
            }
            other => panic!("expected goal reached, got {:?}", other),
        }
    }
    assert!(goal.is_reached());
    assert_eq!(goal.reached_transitions(), 1);
}

#[test]
fn wall_inside_footprint_leaves_no_valid_path() {
    let config = PlannerConfig::default();
    let (mut sampler, selector) = seeded_parts(&config, 3);
    let pose = Pose2D::new(0.0, 0.0, 0.4);
    let mut goal = GoalState::new(5.0, 0.0);
    let wall = Obstacles::from_points(
        (0..=60)
            .map(|i| Point2D::new(0.5, -3.0 + 0.1 * i as f64))
            .collect(),
    );

    let candidates = sampler.sample(&pose, &goal.target());
    match selector.select(candidates, &wall, &pose, &mut goal) {
        Selection::NoValidPath { yaw } => assert_relative_eq!(yaw, 0.4, epsilon = 1e-12),
        other => panic!("expected no valid path, got {:?}", other),
    }
}

#[test]
fn chosen_path_avoids_obstacle_ahead() {
    let config = PlannerConfig::default();
    let (mut sampler, selector) = seeded_parts(&config, 4);
    let pose = Pose2D::origin();
    let mut goal = GoalState::new(6.0, 0.0);
    let obstacle = CircleObstacle::new(4.0, 0.0, 0.3);
    let obstacles = Obstacles::from_points(World::new(vec![obstacle]).outline(36));

    let candidates = sampler.sample(&pose, &goal.target());
    let selection = selector.select(candidates, &obstacles, &pose, &mut goal);
    let survivors = selection.survivors();
    let trajectory = match selection {
        Selection::Best { trajectory, .. } => trajectory,
        other => panic!("expected a trajectory, got {:?}", other),
    };

    assert!(survivors > 0 && survivors < 400);
    assert!(selector.footprint().is_collision_free(&trajectory.poses, &obstacles));
    assert!(min_clearance(&trajectory.poses, &obstacles) > 0.8);
}

#[test]
fn boxed_in_cycle_reports_stuck_and_stops() {
    let mut config = PlannerConfig::default();
    config.sampling.num_candidates = 40;
    config.motion.prediction_horizon = 3.0;
    let mut cycle = ControlCycle::with_rng(config, StdRng::seed_from_u64(5)).unwrap();
    let mut sink = RecordingSink::new();
    cycle.set_goal(5.0, 0.0);

    let world = World::new(vec![CircleObstacle::new(1.2, 0.0, 0.5)]);
    let pose = Pose2D::origin();
    cycle.on_pose(PoseSample::from_pose(&pose));
    cycle.on_scan(SimLidar::default().scan(&world, &pose));

    let report = cycle.tick(&mut sink);
    assert_eq!(report.outcome, TickOutcome::Stuck);
    assert!(report.obstacles > 0);
    assert_eq!(sink.last_command(), Some(ControlInput::zero()));
}

#[test]
fn default_tick_over_dense_scan_fits_in_step_time() {
    let config = PlannerConfig::default();
    let step_time = Duration::from_secs_f64(config.motion.step_time);
    let mut cycle = ControlCycle::with_rng(config, StdRng::seed_from_u64(6)).unwrap();
    let mut sink = RecordingSink::new();
    cycle.set_goal(5.0, 0.0);

    // Ring of overlapping circles at 7 m: every one of the 360 beams returns
    let ring = (0..90)
        .map(|k| {
            let a = k as f64 * std::f64::consts::PI / 45.0;
            CircleObstacle::new(7.0 * a.cos(), 7.0 * a.sin(), 0.3)
        })
        .collect();
    let world = World::new(ring);
    let pose = Pose2D::origin();
    let scan = SimLidar::default().scan(&world, &pose);
    assert_eq!(scan.valid_count(), 360);
    cycle.on_pose(PoseSample::from_pose(&pose));
    cycle.on_scan(scan);

    let fastest = (0..3)
        .map(|_| {
            let report = cycle.tick(&mut sink);
            assert!(matches!(report.outcome, TickOutcome::Moving { .. }));
            assert_eq!(report.obstacles, 360);
            assert_eq!(report.survivors, 400);
            report.elapsed
        })
        .min()
        .unwrap();
    assert!(fastest < step_time, "tick took {:?}", fastest);
}

#[test]
fn same_seed_gives_same_commands() {
    let mut config = PlannerConfig::default();
    config.sampling.num_candidates = 80;
    config.sampling.seed = Some(99);
    config.motion.prediction_horizon = 5.0;

    let run = |config: PlannerConfig| {
        let mut cycle = ControlCycle::new(config).unwrap();
        cycle.set_goal(3.0, 1.0);
        let mut sim = Simulation::new(cycle, SimRobot::new(Pose2D::origin()), World::default(), 0.2)
            .with_lidar(SimLidar::new(36, 10.0));
        sim.run(10);
        sim.sink.commands
    };

    assert_eq!(run(config.clone()), run(config));
}

#[test]
fn simulated_robot_reaches_offset_goal() {
    let mut config = PlannerConfig::default();
    config.sampling.num_candidates = 80;
    config.motion.prediction_horizon = 4.0;
    let mut cycle = ControlCycle::with_rng(config, StdRng::seed_from_u64(7)).unwrap();
    cycle.set_goal(1.5, 0.5);

    let mut sim = Simulation::new(cycle, SimRobot::new(Pose2D::origin()), World::default(), 0.5)
        .with_lidar(SimLidar::new(72, 10.0));
    let result = sim.run(400);

    assert!(result.reached, "stopped after {} steps", result.steps);
    assert!(!result.collided);
    assert_eq!(result.stuck_ticks, 0);
    let end = sim.robot.pose().position();
    assert!(end.distance(&Point2D::new(1.5, 0.5)) < 0.1);
}

#[test]
fn shipped_config_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/dwa_planner.yaml");
    let config = PlannerConfig::load(path).unwrap();
    assert_eq!(config, PlannerConfig::default());
}
