//! The periodic sample-score-select-emit decision cycle

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;

use super::goal::GoalState;
use super::output::PathMarker;
use super::shared::SharedInputs;
use crate::common::{CommandSink, ControlInput, PlannerResult};
use crate::config::PlannerConfig;
use crate::path_planning::dwa::{PathSelector, ScoreBreakdown, Selection, TrajectorySampler};
use crate::perception::{estimate_pose, project_obstacles, PoseSample, ScanSample};

/// Why a tick did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleReason {
    NoGoal,
    NoPose,
    NoScan,
}

/// What a tick decided
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Preconditions unmet; nothing was emitted
    Idle(IdleReason),
    /// Goal reached; a zero command was emitted
    GoalReached,
    /// A collision-free trajectory was chosen and its command emitted
    Moving {
        command: ControlInput,
        score: ScoreBreakdown,
    },
    /// Local minimum: no candidate survived, a zero command was emitted
    Stuck,
}

/// Summary of one tick, for logging and tests
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub obstacles: usize,
    pub candidates: usize,
    pub survivors: usize,
    pub path_len: usize,
    pub elapsed: Duration,
}

impl TickReport {
    fn idle(reason: IdleReason, started: Instant) -> Self {
        Self {
            outcome: TickOutcome::Idle(reason),
            obstacles: 0,
            candidates: 0,
            survivors: 0,
            path_len: 0,
            elapsed: started.elapsed(),
        }
    }

    pub fn emitted(&self) -> bool {
        !matches!(self.outcome, TickOutcome::Idle(_))
    }
}

/// Owns the planner state and runs one decision per call to [`ControlCycle::tick`]
pub struct ControlCycle<R: Rng = StdRng> {
    config: PlannerConfig,
    inputs: SharedInputs,
    goal: Option<GoalState>,
    sampler: TrajectorySampler<R>,
    selector: PathSelector,
    local_minima: u64,
}

impl ControlCycle<StdRng> {
    pub fn new(config: PlannerConfig) -> PlannerResult<Self> {
        config.validate()?;
        let sampler = TrajectorySampler::new(config.motion.clone(), config.sampling.clone());
        Ok(Self::assemble(config, sampler))
    }
}

impl<R: Rng> ControlCycle<R> {
    /// Build with an explicit random source, e.g. a seeded generator in tests
    pub fn with_rng(config: PlannerConfig, rng: R) -> PlannerResult<Self> {
        config.validate()?;
        let sampler =
            TrajectorySampler::with_rng(config.motion.clone(), config.sampling.clone(), rng);
        Ok(Self::assemble(config, sampler))
    }

    fn assemble(config: PlannerConfig, sampler: TrajectorySampler<R>) -> Self {
        let selector = PathSelector::new(&config);
        Self {
            config,
            inputs: SharedInputs::new(),
            goal: None,
            sampler,
            selector,
            local_minima: 0,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Handle for producers running elsewhere (callbacks, threads)
    pub fn inputs(&self) -> SharedInputs {
        self.inputs.clone()
    }

    pub fn on_pose(&self, sample: PoseSample) {
        self.inputs.set_pose(sample);
    }

    pub fn on_scan(&self, sample: ScanSample) {
        self.inputs.set_scan(sample);
    }

    /// Start a new episode toward (x, y)
    pub fn set_goal(&mut self, x: f64, y: f64) {
        log::info!("New goal set: ({}, {})", x, y);
        self.goal = Some(GoalState::new(x, y));
    }

    pub fn goal(&self) -> Option<&GoalState> {
        self.goal.as_ref()
    }

    /// Ticks that ended in a local minimum since construction
    pub fn local_minima(&self) -> u64 {
        self.local_minima
    }

    /// Control period implied by the configured step time
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(self.config.motion.step_time)
    }

    /// Run one decision. Never blocks on inputs and never fails.
    pub fn tick<S: CommandSink>(&mut self, sink: &mut S) -> TickReport {
        let started = Instant::now();

        let goal = match self.goal.as_mut() {
            Some(goal) => goal,
            None => return TickReport::idle(IdleReason::NoGoal, started),
        };
        if goal.is_reached() {
            Self::emit_stop(&self.config, sink);
            return TickReport {
                outcome: TickOutcome::GoalReached,
                obstacles: 0,
                candidates: 0,
                survivors: 0,
                path_len: 0,
                elapsed: started.elapsed(),
            };
        }

        let snapshot = self.inputs.snapshot();
        let pose = match estimate_pose(snapshot.pose.as_ref()) {
            Some(pose) => pose,
            None => return TickReport::idle(IdleReason::NoPose, started),
        };
        let scan = match snapshot.scan {
            Some(scan) => scan,
            None => return TickReport::idle(IdleReason::NoScan, started),
        };

        let obstacles = project_obstacles(Some(&pose), Some(&scan));
        let target = goal.target();
        let candidates = self.sampler.sample(&pose, &target);
        let candidate_count = candidates.len();

        let selection = self.selector.select(candidates, &obstacles, &pose, goal);
        let survivors = selection.survivors();

        let (outcome, path_len) = match selection {
            Selection::GoalReached(_) => {
                Self::emit_stop(&self.config, sink);
                (TickOutcome::GoalReached, 0)
            }
            Selection::NoValidPath { .. } => {
                self.local_minima += 1;
                log::warn!(
                    "Local minimum: no collision-free trajectory among {} candidates",
                    candidate_count
                );
                Self::emit_stop(&self.config, sink);
                (TickOutcome::Stuck, 0)
            }
            Selection::Best { trajectory, score, .. } => {
                let command = trajectory.control();
                sink.publish_command(command);
                let marker =
                    PathMarker::line_strip(&self.config.visualization, &trajectory.to_path());
                sink.publish_path(&marker);
                (TickOutcome::Moving { command, score }, trajectory.len())
            }
        };

        let report = TickReport {
            outcome,
            obstacles: obstacles.len(),
            candidates: candidate_count,
            survivors,
            path_len,
            elapsed: started.elapsed(),
        };
        log::debug!(
            "tick: obstacles={} candidates={} survivors={} outcome={:?} in {:?}",
            report.obstacles,
            report.candidates,
            report.survivors,
            report.outcome,
            report.elapsed
        );
        report
    }

    /// Leave a zero command outstanding
    pub fn shutdown<S: CommandSink>(&mut self, sink: &mut S) {
        Self::emit_stop(&self.config, sink);
    }

    fn emit_stop<S: CommandSink>(config: &PlannerConfig, sink: &mut S) {
        sink.publish_command(ControlInput::zero());
        sink.publish_path(&PathMarker::empty(&config.visualization));
    }
}
