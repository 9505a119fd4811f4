use serde::{Serialize, Deserialize};
use std::fmt;

use crate::Float;

/**
 * Stopping criteria and damping of the nonlinear least squares solver
 */
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct RuntimeParameters {
    pub max_iterations: usize,
    /// Stop once sqrt(cost) drops below eps
    pub eps: Float,
    pub absolute_eps: Float,
    pub relative_eps: Float,
    pub delta_eps: Float,
    pub tau: Float,
    pub lm: bool,
    /// Keep the cost of every iteration
    pub debug: bool
}

impl Default for RuntimeParameters {
    fn default() -> Self {
        RuntimeParameters {
            max_iterations: 100,
            eps: 1e-10,
            absolute_eps: 1e-5,
            relative_eps: 1e-5,
            delta_eps: 1e-10,
            tau: 1e-6,
            lm: false,
            debug: false
        }
    }
}

impl fmt::Display for RuntimeParameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut display = String::from(format!("max_its_{}_eps_{:+e}_abs_{:+e}_rel_{:+e}",self.max_iterations,self.eps,self.absolute_eps,self.relative_eps));
        match self.lm {
            true => display.push_str(format!("_lm_delta_eps_{:+e}_t_{:+e}",self.delta_eps,self.tau).as_str()),
            false => display.push_str(format!("_gn_delta_eps_{:+e}",self.delta_eps).as_str())
        }
        write!(f, "{}", display)
    }
}
