use std::error::Error;
use std::fmt::{self, Display};

use crate::factor_graph::Key;
use crate::Float;

/// Errors raised while building or solving an inertial odometry problem
#[derive(Debug)]
pub enum ImuOdometryError {
    /// A reference timestamp has no bracketing IMU samples, or too few keyframes remain
    Alignment(String),
    /// A keyframe pair covers zero IMU samples
    DegenerateWindow { start: usize, end: usize },
    /// A factor references a key that has no initial value
    MissingInitialValue(Key),
    /// A key holds a variable of the wrong kind
    VariableTypeMismatch(Key),
    /// The optimizer used up its iteration budget without meeting its tolerances
    NonConvergence { iterations: usize, final_cost: Float },
    /// Visual factors are a known broken path and are not built
    VisualFactorsUnsupported,
    /// A landmark lies behind the camera observing it
    Cheirality(Key),
    /// The normal equations could not be solved
    LinearSolve(String),
    Io(std::io::Error),
    Parse(String),
    Config(String),
}

impl Display for ImuOdometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImuOdometryError::Alignment(msg) => write!(f, "Alignment error: {msg}"),
            ImuOdometryError::DegenerateWindow { start, end } => write!(f, "Degenerate window: keyframe pair ({start}, {end}) contains no IMU samples"),
            ImuOdometryError::MissingInitialValue(key) => write!(f, "Missing initial value for key {key}"),
            ImuOdometryError::VariableTypeMismatch(key) => write!(f, "Variable stored under {key} has the wrong type"),
            ImuOdometryError::NonConvergence { iterations, final_cost } => write!(f, "Optimizer did not converge after {iterations} iterations, final cost: {final_cost}"),
            ImuOdometryError::VisualFactorsUnsupported => write!(f, "Visual factors are not supported, disable enable_visual_factors"),
            ImuOdometryError::Cheirality(key) => write!(f, "Landmark {key} is behind the camera"),
            ImuOdometryError::LinearSolve(msg) => write!(f, "Linear solve failed: {msg}"),
            ImuOdometryError::Io(err) => write!(f, "IO error: {err}"),
            ImuOdometryError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ImuOdometryError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl Error for ImuOdometryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ImuOdometryError::Io(err) => Some(err),
            _ => None
        }
    }
}

impl From<std::io::Error> for ImuOdometryError {
    fn from(err: std::io::Error) -> Self {
        ImuOdometryError::Io(err)
    }
}

impl From<serde_yaml::Error> for ImuOdometryError {
    fn from(err: serde_yaml::Error) -> Self {
        ImuOdometryError::Config(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for ImuOdometryError {
    fn from(err: std::num::ParseFloatError) -> Self {
        ImuOdometryError::Parse(err.to_string())
    }
}
