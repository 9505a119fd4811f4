extern crate nalgebra as na;

use na::{DMatrix,DVector};
use std::any::Any;

use crate::factor_graph::{Key, noise::NoiseModel, values::Values};
use crate::{Float, Result};

pub mod prior;
pub mod imu_factor;
pub mod projection;

/// Step of the central differences in tangent space
const NUMERICAL_DERIVATIVE_STEP: Float = 1e-6;

/**
 * Whitened residual and one jacobian block per key, in the order of keys()
 */
#[derive(Debug,Clone)]
pub struct LinearizedFactor {
    pub keys: Vec<Key>,
    pub residual: DVector<Float>,
    pub jacobians: Vec<DMatrix<Float>>
}

pub trait Factor {
    fn keys(&self) -> &[Key];
    fn noise_model(&self) -> &NoiseModel;
    fn name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;

    /// Residual before whitening, evaluated on the variables of keys()
    fn unwhitened_residual(&self, values: &Values) -> Result<DVector<Float>>;

    fn dim(&self) -> usize {
        self.noise_model().dim()
    }

    fn whitened_residual(&self, values: &Values) -> Result<DVector<Float>> {
        Ok(self.noise_model().whiten(&self.unwhitened_residual(values)?))
    }

    fn cost(&self, values: &Values) -> Result<Float> {
        Ok(self.whitened_residual(values)?.norm_squared())
    }

    /**
     * Jacobians by central differences through the retraction of each variable.
     * Factors with closed form jacobians can override this.
     */
    fn linearize(&self, values: &Values) -> Result<LinearizedFactor> {
        let mut local_values = values.subset(self.keys())?;
        let residual = self.unwhitened_residual(&local_values)?;
        let two_h = 2.0*NUMERICAL_DERIVATIVE_STEP;

        let mut jacobians = Vec::<DMatrix<Float>>::with_capacity(self.keys().len());
        for key in self.keys() {
            let variable = match local_values.get(key) {
                Some(v) => *v,
                None => return Err(crate::ImuOdometryError::MissingInitialValue(*key))
            };
            let dim = variable.dim();
            let mut jacobian = DMatrix::<Float>::zeros(residual.nrows(), dim);
            for j in 0..dim {
                let mut delta = DVector::<Float>::zeros(dim);

                delta[j] = NUMERICAL_DERIVATIVE_STEP;
                local_values.retract_variable(key, &delta.rows(0, dim))?;
                let residual_plus = self.unwhitened_residual(&local_values)?;
                local_values.insert(*key, variable)?;

                delta[j] = -NUMERICAL_DERIVATIVE_STEP;
                local_values.retract_variable(key, &delta.rows(0, dim))?;
                let residual_minus = self.unwhitened_residual(&local_values)?;
                local_values.insert(*key, variable)?;

                jacobian.set_column(j, &((residual_plus - residual_minus)/two_h));
            }
            jacobians.push(self.noise_model().whiten_jacobian(&jacobian));
        }

        Ok(LinearizedFactor {
            keys: self.keys().to_vec(),
            residual: self.noise_model().whiten(&residual),
            jacobians
        })
    }
}
