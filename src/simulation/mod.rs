//! Closed-loop simulation: a kinematic robot, a simulated lidar and the control cycle

pub mod robot;
pub mod world;

pub use robot::*;
pub use world::*;

use rand::Rng;

use crate::common::{Path2D, RecordingSink};
use crate::control::{ControlCycle, TickOutcome};

/// What happened over one simulated run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Robot positions, starting pose included
    pub trajectory: Path2D,
    /// Rollout chosen by the last tick that moved the robot
    pub last_plan: Path2D,
    pub reached: bool,
    pub steps: usize,
    pub stuck_ticks: usize,
    pub collided: bool,
}

/// Drives a [`ControlCycle`] against a simulated world, one tick per step
pub struct Simulation<R: Rng> {
    pub cycle: ControlCycle<R>,
    pub robot: SimRobot,
    pub lidar: SimLidar,
    pub world: World,
    pub sink: RecordingSink,
    /// Seconds each command is held before the next tick
    pub dt: f64,
}

impl<R: Rng> Simulation<R> {
    pub fn new(cycle: ControlCycle<R>, robot: SimRobot, world: World, dt: f64) -> Self {
        Self {
            cycle,
            robot,
            lidar: SimLidar::default(),
            world,
            sink: RecordingSink::new(),
            dt,
        }
    }

    pub fn with_lidar(mut self, lidar: SimLidar) -> Self {
        self.lidar = lidar;
        self
    }

    /// Tick until the goal is reached, the robot enters an obstacle, or
    /// `max_steps` ticks have run.
    pub fn run(&mut self, max_steps: usize) -> SimulationResult {
        let mut trajectory = Path2D::new();
        trajectory.push(self.robot.pose().position());
        let mut last_plan = Path2D::new();
        let mut reached = false;
        let mut collided = false;
        let mut stuck_ticks = 0;
        let mut steps = 0;

        while steps < max_steps {
            let pose = self.robot.pose();
            self.cycle.on_pose(self.robot.odometry());
            self.cycle.on_scan(self.lidar.scan(&self.world, &pose));

            let report = self.cycle.tick(&mut self.sink);
            steps += 1;

            match report.outcome {
                TickOutcome::GoalReached => {
                    reached = true;
                    break;
                }
                TickOutcome::Moving { command, .. } => {
                    if let Some(marker) = self.sink.last_marker() {
                        last_plan = Path2D::from_points(marker.points.clone());
                    }
                    self.robot.step(&command, self.dt);
                    trajectory.push(self.robot.pose().position());
                }
                TickOutcome::Stuck => stuck_ticks += 1,
                TickOutcome::Idle(reason) => {
                    log::warn!("Simulation tick idle: {:?}", reason);
                }
            }

            if self.world.is_occupied(&self.robot.pose().position()) {
                log::warn!("Robot center entered an obstacle at step {}", steps);
                collided = true;
                break;
            }
        }

        self.cycle.shutdown(&mut self.sink);
        log::info!(
            "Simulation finished after {} steps (reached: {}, stuck ticks: {})",
            steps,
            reached,
            stuck_ticks
        );

        SimulationResult {
            trajectory,
            last_plan,
            reached,
            steps,
            stuck_ticks,
            collided,
        }
    }
}
