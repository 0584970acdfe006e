//! Common traits defining the seams between the planner and its collaborators

use crate::common::types::*;
use crate::control::PathMarker;

/// Trait for vehicle/robot motion models
pub trait MotionModel {
    /// Propagate a pose forward under a constant command for `dt` seconds
    fn propagate(&self, pose: &Pose2D, control: &ControlInput, dt: f64) -> Pose2D;
}

/// Differential drive kinematics integrated with forward Euler.
///
/// Heading is advanced first and the translation uses the new heading,
/// which is the integration order the trajectory rollouts rely on.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicycleModel;

impl MotionModel for UnicycleModel {
    fn propagate(&self, pose: &Pose2D, control: &ControlInput, dt: f64) -> Pose2D {
        let yaw = normalize_angle(pose.yaw + control.omega * dt);
        Pose2D {
            x: pose.x + control.v * yaw.cos() * dt,
            y: pose.y + control.v * yaw.sin() * dt,
            yaw,
        }
    }
}

/// Outbound transport for the planner's decisions (cmd_vel + visual path)
pub trait CommandSink {
    /// Send a velocity command to the base
    fn publish_command(&mut self, command: ControlInput);

    /// Send the chosen trajectory for display
    fn publish_path(&mut self, marker: &PathMarker);
}

/// Sink that keeps everything it receives; used by the simulator and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub commands: Vec<ControlInput>,
    pub markers: Vec<PathMarker>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_command(&self) -> Option<ControlInput> {
        self.commands.last().copied()
    }

    pub fn last_marker(&self) -> Option<&PathMarker> {
        self.markers.last()
    }
}

impl CommandSink for RecordingSink {
    fn publish_command(&mut self, command: ControlInput) {
        self.commands.push(command);
    }

    fn publish_path(&mut self, marker: &PathMarker) {
        self.markers.push(marker.clone());
    }
}
