//! Error types for dwa_planner

use std::fmt;

/// Main error type for the planner.
///
/// Only construction, configuration and I/O can fail. A control tick
/// never returns an error; degraded outcomes are reported as values.
#[derive(Debug)]
pub enum PlannerError {
    /// Invalid parameter
    InvalidParameter(String),
    /// Configuration file could not be parsed
    ParseError(String),
    /// I/O error
    IoError(std::io::Error),
    /// Visualization error
    VisualizationError(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            PlannerError::IoError(e) => write!(f, "I/O error: {}", e),
            PlannerError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(e: std::io::Error) -> Self {
        PlannerError::IoError(e)
    }
}

impl From<serde_yaml::Error> for PlannerError {
    fn from(e: serde_yaml::Error) -> Self {
        PlannerError::ParseError(e.to_string())
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
