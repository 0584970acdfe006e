//! Planner configuration.
//!
//! All parameters are fixed once the planner is built. Defaults match the
//! values the planner was tuned with on the reference differential drive
//! base; any subset can be overridden from YAML:
//!
//! ```yaml
//! motion:
//!   max_speed: 0.15
//!   max_turn: 0.8
//! sampling:
//!   num_candidates: 400
//!   seed: 42
//! footprint:
//!   padding: 0.4
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{PlannerError, PlannerResult};

/// Speed limits and integration timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Maximum linear speed [m/s]
    pub max_speed: f64,
    /// Maximum turn rate [rad/s]
    pub max_turn: f64,
    /// Control period and integration step [s]
    pub step_time: f64,
    /// Rollout length [s]
    pub prediction_horizon: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 0.15,
            max_turn: 0.8,
            step_time: 0.1,
            prediction_horizon: 20.0,
        }
    }
}

impl MotionConfig {
    /// Number of integration steps in one rollout.
    ///
    /// The small bias keeps 20.0 / 0.1 from flooring to 199.
    pub fn horizon_steps(&self) -> usize {
        (self.prediction_horizon / self.step_time + 1e-9).floor() as usize
    }
}

/// Candidate population and regime mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Candidates drawn per tick
    pub num_candidates: usize,
    /// Fixed seed for reproducible sampling; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Draws below this pick the random regime
    pub random_threshold: f64,
    /// Draws below this (and above `random_threshold`) pick the goal-oriented regime
    pub target_threshold: f64,
    /// Half-width of the noise added to the goal-oriented turn rate [rad/s]
    pub target_turn_noise: f64,
    /// Half-width of the turn rate used by the straight regime [rad/s]
    pub straight_turn_noise: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            num_candidates: 400,
            seed: None,
            random_threshold: 0.5,
            target_threshold: 0.8,
            target_turn_noise: 0.2,
            straight_turn_noise: 0.05,
        }
    }
}

/// Rectangular robot outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintConfig {
    /// Length along the heading [m]
    pub length: f64,
    /// Width across the heading [m]
    pub width: f64,
    /// Safety inflation applied on every side [m]
    pub padding: f64,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        Self {
            length: 1.0,
            width: 0.6,
            padding: 0.5,
        }
    }
}

/// Objective weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    pub goal_distance: f64,
    pub heading: f64,
    pub smoothness: f64,
    pub clearance: f64,
    pub velocity: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            goal_distance: 5.0,
            heading: 1.5,
            smoothness: 1.0,
            clearance: 3.0,
            velocity: 3.0,
        }
    }
}

/// Goal tolerance, clearance shaping and objective weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Distance under which the goal counts as reached [m]
    pub goal_tolerance: f64,
    /// Clearance below this is penalized [m]
    pub clearance_danger: f64,
    /// Clearance at or above this earns the full bonus [m]
    pub clearance_safe: f64,
    pub clearance_penalty: f64,
    pub clearance_ramp_gain: f64,
    pub clearance_bonus: f64,
    pub weights: WeightsConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            goal_tolerance: 0.1,
            clearance_danger: 0.45,
            clearance_safe: 0.8,
            clearance_penalty: -10.0,
            clearance_ramp_gain: 2.0,
            clearance_bonus: 1.5,
            weights: WeightsConfig::default(),
        }
    }
}

/// Appearance of the published trajectory marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub frame_id: String,
    pub line_width: f64,
    /// RGBA, each in [0, 1]
    pub color: [f32; 4],
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            frame_id: "odom".to_string(),
            line_width: 0.03,
            color: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Complete planner configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub motion: MotionConfig,
    pub sampling: SamplingConfig,
    pub footprint: FootprintConfig,
    pub scoring: ScoringConfig,
    pub visualization: VisualizationConfig,
}

impl PlannerConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> PlannerResult<Self> {
        let config: PlannerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        log::info!("Loaded planner configuration from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    /// Serialize back to YAML
    pub fn to_yaml_string(&self) -> PlannerResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> PlannerResult<()> {
        let m = &self.motion;
        require_positive("motion.max_speed", m.max_speed)?;
        require_positive("motion.max_turn", m.max_turn)?;
        require_positive("motion.step_time", m.step_time)?;
        require_positive("motion.prediction_horizon", m.prediction_horizon)?;
        if m.horizon_steps() < 2 {
            return Err(PlannerError::InvalidParameter(format!(
                "motion.prediction_horizon ({}) must span at least two steps of {}",
                m.prediction_horizon, m.step_time
            )));
        }

        let s = &self.sampling;
        if s.num_candidates == 0 {
            return Err(PlannerError::InvalidParameter(
                "sampling.num_candidates must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&s.random_threshold)
            || !(0.0..=1.0).contains(&s.target_threshold)
            || s.random_threshold > s.target_threshold
        {
            return Err(PlannerError::InvalidParameter(format!(
                "sampling thresholds must satisfy 0 <= random ({}) <= target ({}) <= 1",
                s.random_threshold, s.target_threshold
            )));
        }
        require_non_negative("sampling.target_turn_noise", s.target_turn_noise)?;
        require_non_negative("sampling.straight_turn_noise", s.straight_turn_noise)?;

        let f = &self.footprint;
        require_positive("footprint.length", f.length)?;
        require_positive("footprint.width", f.width)?;
        require_non_negative("footprint.padding", f.padding)?;

        let sc = &self.scoring;
        require_positive("scoring.goal_tolerance", sc.goal_tolerance)?;
        require_non_negative("scoring.clearance_danger", sc.clearance_danger)?;
        if sc.clearance_safe < sc.clearance_danger {
            return Err(PlannerError::InvalidParameter(format!(
                "scoring.clearance_safe ({}) is below scoring.clearance_danger ({})",
                sc.clearance_safe, sc.clearance_danger
            )));
        }

        let v = &self.visualization;
        require_non_negative("visualization.line_width", v.line_width)?;
        if v.color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(PlannerError::InvalidParameter(
                "visualization.color components must lie in [0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> PlannerResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlannerError::InvalidParameter(format!("{} must be positive, got {}", name, value)))
    }
}

fn require_non_negative(name: &str, value: f64) -> PlannerResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlannerError::InvalidParameter(format!("{} must be non-negative, got {}", name, value)))
    }
}
