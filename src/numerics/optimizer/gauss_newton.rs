use log::{debug,info,warn};

use crate::factor_graph::{FactorGraph, values::{Ordering,Values}};
use crate::numerics::{max_norm, least_squares::{build_normal_equations,gauss_newton_step}};
use crate::numerics::optimizer::{ConvergenceStatus,OptimizationResult};
use crate::odometry::runtime_parameters::RuntimeParameters;
use crate::{Float, Result};

/**
 * Gauss-Newton on a factor graph with optional Levenberg-Marquardt damping
 */
pub struct OptimizerGn<'a> {
    graph: &'a FactorGraph
}

impl<'a> OptimizerGn<'a> {
    pub fn new(graph: &'a FactorGraph) -> OptimizerGn<'a> {
        OptimizerGn {graph}
    }

    pub fn optimize(&self, initial_values: &Values, runtime_parameters: &RuntimeParameters) -> Result<OptimizationResult> {
        self.graph.check_initial_values(initial_values)?;
        let keys = self.graph.keys();
        let ordering = Ordering::from_keys(initial_values, keys.iter())?;
        let max_iterations = runtime_parameters.max_iterations;

        let mut cost_history = match runtime_parameters.debug {
            true => Some(Vec::<Float>::with_capacity(max_iterations+1)),
            false => None
        };

        let mut state = initial_values.clone();
        let mut normal_equations = build_normal_equations(&self.graph.linearize(&state)?, &ordering);
        let mut cost = normal_equations.cost;
        let initial_cost = cost;

        let two: Float = 2.0;
        let mut nu: Float = two;
        let mut mu: Option<Float> = match runtime_parameters.lm {
            true => None,
            false => Some(0.0)
        };

        let mut iteration_count = 0;
        let mut converged = cost.sqrt() < runtime_parameters.eps;
        while !converged && iteration_count < max_iterations {
            if let Some(history) = cost_history.as_mut() {
                history.push(cost);
            }

            let (delta, g, gain_ratio_denom, mu_val) = gauss_newton_step(&normal_equations, mu, runtime_parameters.tau)?;
            mu = Some(mu_val);

            let new_state = state.retract(&delta, &ordering);
            let new_cost = self.graph.cost(&new_state)?;
            let cost_diff = cost - new_cost;
            let gain_ratio = match gain_ratio_denom {
                v if v != 0.0 => cost_diff/v,
                _ => Float::NAN
            };
            iteration_count += 1;

            debug!("it: {}, cost: {}, new cost: {}, mu: {:?}, gain: {}, nu: {}, max |g|: {}", iteration_count, cost, new_cost, mu, gain_ratio, nu, max_norm(&g));

            let accepted = match runtime_parameters.lm {
                true => !gain_ratio.is_nan() && gain_ratio > 0.0 && cost_diff > 0.0,
                false => cost_diff >= -(runtime_parameters.absolute_eps + runtime_parameters.relative_eps*cost)
            };

            if accepted {
                let delta_norm = delta.norm();
                let delta_thresh = runtime_parameters.delta_eps*(new_state.norm() + runtime_parameters.delta_eps);

                state = new_state;
                cost = new_cost;
                normal_equations = build_normal_equations(&self.graph.linearize(&state)?, &ordering);

                converged = cost_diff.abs() < runtime_parameters.absolute_eps
                    || (cost > 0.0 && cost_diff.abs()/cost < runtime_parameters.relative_eps)
                    || delta_norm < delta_thresh
                    || cost.sqrt() < runtime_parameters.eps;

                if runtime_parameters.lm {
                    let v: Float = 1.0/3.0;
                    mu = Some(mu_val*v.max(1.0 - (two*gain_ratio - 1.0).powi(3)));
                    nu = two;
                }
            } else if runtime_parameters.lm {
                mu = Some(nu*mu_val);
                nu *= two;
                if mu_val.is_infinite() || nu.is_infinite() {
                    warn!("Damping diverged after {} iterations", iteration_count);
                    break;
                }
            } else {
                warn!("Cost increased from {} to {}, keeping the previous estimate", cost, new_cost);
                break;
            }
        }

        if let Some(history) = cost_history.as_mut() {
            history.push(cost);
        }

        info!("Solver finished: converged: {}, it: {}, initial cost: {}, final cost: {}", converged, iteration_count, initial_cost, cost);

        Ok(OptimizationResult {
            values: state,
            status: ConvergenceStatus {converged, iterations: iteration_count, initial_cost, final_cost: cost},
            cost_history
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;
    use crate::factor_graph::{Key, noise::NoiseModel, factors::prior::{PriorPoseFactor,PriorVectorFactor}};
    use crate::numerics::{lie::exp_r, pose::Pose};
    use crate::ImuOdometryError;

    fn pose_prior_graph(prior: Pose) -> FactorGraph {
        let mut graph = FactorGraph::new();
        graph.push(Box::new(PriorPoseFactor::new(Key::pose(0), prior, NoiseModel::isotropic(6, 0.1))));
        graph
    }

    #[test]
    fn converges_onto_pose_prior() {
        let prior = Pose::new(exp_r(&Vector3::<Float>::new(0.3,-0.2,0.5)), Vector3::<Float>::new(1.0,2.0,3.0));
        let graph = pose_prior_graph(prior);
        let mut initial = Values::new();
        initial.insert_pose(Key::pose(0), Pose::identity()).unwrap();

        for lm in [false, true] {
            let runtime_parameters = RuntimeParameters {lm, debug: true, ..RuntimeParameters::default()};
            let result = OptimizerGn::new(&graph).optimize(&initial, &runtime_parameters).unwrap();
            assert!(result.status.converged);
            assert!(result.status.final_cost < result.status.initial_cost);
            assert!(result.cost_history.is_some());
            let pose = result.values.pose(&Key::pose(0)).unwrap();
            assert_abs_diff_eq!(pose.translation, prior.translation, epsilon = 1e-5);
            assert_abs_diff_eq!(pose.rotation, prior.rotation, epsilon = 1e-5);
        }
    }

    #[test]
    fn iteration_cap_is_reported_as_status() {
        let mut graph = FactorGraph::new();
        graph.push(Box::new(PriorVectorFactor::new(Key::velocity(0), Vector3::<Float>::new(1.0,0.0,0.0), NoiseModel::isotropic(3, 1.0))));
        let mut initial = Values::new();
        initial.insert_point(Key::velocity(0), Vector3::<Float>::zeros()).unwrap();

        let runtime_parameters = RuntimeParameters {max_iterations: 0, ..RuntimeParameters::default()};
        let result = OptimizerGn::new(&graph).optimize(&initial, &runtime_parameters).unwrap();
        assert!(!result.status.converged);
        assert!(matches!(result.into_converged(), Err(ImuOdometryError::NonConvergence {iterations: 0, ..})));
    }
}
