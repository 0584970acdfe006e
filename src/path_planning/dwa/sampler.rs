//! Stochastic trajectory sampler
//!
//! Each candidate draws one (speed, turn rate) command from a mix of three
//! regimes and rolls it out over the prediction horizon:
//!
//! - random: uniform over the whole velocity window
//! - target-oriented: full speed, turn rate steering toward the goal plus noise
//! - straight: full speed, near-zero turn rate
//!
//! The random share keeps coverage when the goal direction is blocked.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use super::trajectory::Trajectory;
use crate::common::{normalize_angle, ControlInput, MotionModel, Point2D, Pose2D, UnicycleModel};
use crate::config::{MotionConfig, SamplingConfig};

/// Which sampling regime produced a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplingRegime {
    Random,
    TargetOriented,
    Straight,
}

/// Draws a fixed-size population of candidate trajectories per tick
pub struct TrajectorySampler<R: Rng = StdRng> {
    motion: MotionConfig,
    sampling: SamplingConfig,
    model: UnicycleModel,
    rng: R,
}

impl TrajectorySampler<StdRng> {
    /// Seeded from `sampling.seed` when present, otherwise from OS entropy
    pub fn new(motion: MotionConfig, sampling: SamplingConfig) -> Self {
        let rng = match sampling.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(motion, sampling, rng)
    }
}

impl<R: Rng> TrajectorySampler<R> {
    pub fn with_rng(motion: MotionConfig, sampling: SamplingConfig, rng: R) -> Self {
        Self {
            motion,
            sampling,
            model: UnicycleModel,
            rng,
        }
    }

    /// Number of poses in every rollout
    pub fn poses_per_candidate(&self) -> usize {
        self.motion.horizon_steps().saturating_sub(1)
    }

    /// Generate the configured number of candidates from `pose` toward `goal`
    pub fn sample(&mut self, pose: &Pose2D, goal: &Point2D) -> Vec<Trajectory> {
        let angle_diff = normalize_angle(pose.position().angle_to(goal) - pose.yaw);
        (0..self.sampling.num_candidates)
            .map(|_| {
                let (_, command) = self.draw_command(angle_diff);
                self.rollout(pose, &command)
            })
            .collect()
    }

    /// Pick a regime and draw a command from it.
    ///
    /// `angle_diff` is the normalized bearing of the goal relative to the heading.
    pub fn draw_command(&mut self, angle_diff: f64) -> (SamplingRegime, ControlInput) {
        let max_speed = self.motion.max_speed;
        let max_turn = self.motion.max_turn;

        let regime = self.draw_regime();
        let command = match regime {
            SamplingRegime::Random => ControlInput::new(
                Uniform::new_inclusive(0.0, max_speed).sample(&mut self.rng),
                Uniform::new_inclusive(-max_turn, max_turn).sample(&mut self.rng),
            ),
            SamplingRegime::TargetOriented => {
                let noise = self.sampling.target_turn_noise;
                let steer = angle_diff.max(-max_turn).min(max_turn);
                ControlInput::new(
                    max_speed,
                    steer + Uniform::new_inclusive(-noise, noise).sample(&mut self.rng),
                )
            }
            SamplingRegime::Straight => {
                let noise = self.sampling.straight_turn_noise;
                ControlInput::new(
                    max_speed,
                    Uniform::new_inclusive(-noise, noise).sample(&mut self.rng),
                )
            }
        };
        (regime, command)
    }

    /// Forward-integrate a constant command over the horizon
    pub fn rollout(&self, pose: &Pose2D, command: &ControlInput) -> Trajectory {
        let dt = self.motion.step_time;
        let mut current = *pose;
        let mut poses = Vec::with_capacity(self.poses_per_candidate());
        for _ in 1..self.motion.horizon_steps() {
            current = self.model.propagate(&current, command, dt);
            poses.push(current);
        }
        Trajectory {
            speed: command.v,
            turn_rate: command.omega,
            final_yaw: current.yaw,
            poses,
        }
    }

    fn draw_regime(&mut self) -> SamplingRegime {
        let r: f64 = self.rng.gen();
        if r < self.sampling.random_threshold {
            SamplingRegime::Random
        } else if r < self.sampling.target_threshold {
            SamplingRegime::TargetOriented
        } else {
            SamplingRegime::Straight
        }
    }
}
