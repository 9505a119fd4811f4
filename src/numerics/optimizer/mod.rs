use crate::factor_graph::values::Values;
use crate::{Float, ImuOdometryError, Result};

pub mod gauss_newton;

/// Outcome of a solve. Reaching the iteration cap is reported here, not as an error.
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct ConvergenceStatus {
    pub converged: bool,
    pub iterations: usize,
    pub initial_cost: Float,
    pub final_cost: Float
}

#[derive(Debug,Clone)]
pub struct OptimizationResult {
    pub values: Values,
    pub status: ConvergenceStatus,
    pub cost_history: Option<Vec<Float>>
}

impl OptimizationResult {
    pub fn into_converged(self) -> Result<Values> {
        match self.status.converged {
            true => Ok(self.values),
            false => Err(ImuOdometryError::NonConvergence {iterations: self.status.iterations, final_cost: self.status.final_cost})
        }
    }
}
