extern crate nalgebra as na;

use na::{DMatrix,DVector};

use std::any::Any;

use crate::factor_graph::{Key, factors::Factor, noise::NoiseModel, values::Values};
use crate::odometry::imu_odometry::{nav_state::NavState, preintegration::PreintegratedImuMeasurements};
use crate::{Float, Result};

/**
 * Preintegrated motion constraint between (x_i, v_i) and (x_j, v_j) sharing the bias b.
 * Keys are ordered [x_i, v_i, x_j, v_j, b].
 */
pub struct ImuFactor {
    keys: [Key; 5],
    measurement: PreintegratedImuMeasurements,
    noise_model: NoiseModel
}

impl ImuFactor {
    /**
     * Uses the preintegrated covariance as the noise model
     */
    pub fn new(pose_i: Key, velocity_i: Key, pose_j: Key, velocity_j: Key, bias: Key, measurement: PreintegratedImuMeasurements) -> ImuFactor {
        let covariance = DMatrix::<Float>::from_column_slice(9, 9, measurement.covariance().as_slice());
        let noise_model = NoiseModel::from_covariance(&covariance);
        ImuFactor::with_noise_model(pose_i, velocity_i, pose_j, velocity_j, bias, measurement, noise_model)
    }

    pub fn with_noise_model(pose_i: Key, velocity_i: Key, pose_j: Key, velocity_j: Key, bias: Key, measurement: PreintegratedImuMeasurements, noise_model: NoiseModel) -> ImuFactor {
        assert_eq!(noise_model.dim(), 9);
        ImuFactor {keys: [pose_i, velocity_i, pose_j, velocity_j, bias], measurement, noise_model}
    }

    pub fn measurement(&self) -> &PreintegratedImuMeasurements {
        &self.measurement
    }
}

impl Factor for ImuFactor {
    fn keys(&self) -> &[Key] {
        &self.keys
    }

    fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    fn name(&self) -> &str {
        "Imu"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwhitened_residual(&self, values: &Values) -> Result<DVector<Float>> {
        let state_i = NavState::new(*values.pose(&self.keys[0])?, *values.velocity(&self.keys[1])?);
        let state_j = NavState::new(*values.pose(&self.keys[2])?, *values.velocity(&self.keys[3])?);
        let bias = values.bias(&self.keys[4])?;
        let residual = self.measurement.compute_error(&state_i, &state_j, bias);
        Ok(DVector::<Float>::from_column_slice(residual.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;
    use crate::odometry::imu_odometry::{bias::ImuBias, preintegration::PreintegrationParameters};

    #[test]
    fn jacobian_blocks_have_expected_shapes() {
        let mut measurement = PreintegratedImuMeasurements::new(PreintegrationParameters::default(), ImuBias::zeros());
        for _ in 0..50 {
            measurement.integrate(&Vector3::<Float>::new(0.1,0.0,9.81), &Vector3::<Float>::new(0.0,0.0,0.2), 0.01);
        }
        let state_i = NavState::identity();
        let state_j = measurement.predict(&state_i, &ImuBias::zeros());

        let mut values = Values::new();
        values.insert_pose(Key::pose(0), state_i.pose).unwrap();
        values.insert_point(Key::velocity(0), state_i.velocity).unwrap();
        values.insert_pose(Key::pose(5), state_j.pose).unwrap();
        values.insert_point(Key::velocity(5), state_j.velocity).unwrap();
        values.insert_bias(Key::bias(0), ImuBias::zeros()).unwrap();

        let factor = ImuFactor::new(Key::pose(0), Key::velocity(0), Key::pose(5), Key::velocity(5), Key::bias(0), measurement);
        let linearized = factor.linearize(&values).unwrap();
        let dims = linearized.jacobians.iter().map(|j| (j.nrows(), j.ncols())).collect::<Vec<_>>();
        assert_eq!(dims, vec![(9,6),(9,3),(9,6),(9,3),(9,6)]);
        assert_abs_diff_eq!(linearized.residual.norm(), 0.0, epsilon = 1e-6);
    }
}
