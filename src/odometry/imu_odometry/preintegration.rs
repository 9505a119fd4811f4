extern crate nalgebra as na;

use log::warn;
use na::{Vector3,Matrix3};
use serde::{Serialize, Deserialize};

use crate::Float;
use crate::numerics::lie::{exp_r,ln_SO3,right_jacobian,skew_symmetric};
use crate::numerics::pose::Pose;
use crate::odometry::imu_odometry::{
    bias::{ImuBias,BiasJacobians},
    imu_delta::ImuDelta,
    imu_measurement::{ImuCovariance,ImuResidual,ImuNoiseJacobian,ROTATION_OFFSET,POSITION_OFFSET,VELOCITY_OFFSET},
    nav_state::NavState
};

/**
 * Continuous time noise densities and gravity. The world frame has Z pointing up.
 */
#[derive(Debug,Copy,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct PreintegrationParameters {
    pub gyroscope_sigma: Float,
    pub accelerometer_sigma: Float,
    pub integration_sigma: Float,
    pub gravity_magnitude: Float
}

impl PreintegrationParameters {
    pub fn gravity(&self) -> Vector3<Float> {
        Vector3::<Float>::new(0.0, 0.0, -self.gravity_magnitude)
    }
}

impl Default for PreintegrationParameters {
    fn default() -> Self {
        PreintegrationParameters {
            gyroscope_sigma: (0.5 as Float).to_radians()/60.0,
            accelerometer_sigma: 0.1/60.0,
            integration_sigma: 1e-7,
            gravity_magnitude: 9.81
        }
    }
}

/**
 * Accumulates IMU samples into a single relative motion measurement expressed in the body frame at window start.
 * The deltas are integrated with a fixed bias. Small bias changes are applied to first order through the bias jacobians.
 */
#[derive(Debug,Clone)]
pub struct PreintegratedImuMeasurements {
    parameters: PreintegrationParameters,
    bias: ImuBias,
    delta: ImuDelta,
    covariance: ImuCovariance,
    bias_jacobians: BiasJacobians,
    sample_count: usize
}

impl PreintegratedImuMeasurements {
    pub fn new(parameters: PreintegrationParameters, bias: ImuBias) -> PreintegratedImuMeasurements {
        PreintegratedImuMeasurements {
            parameters,
            bias,
            delta: ImuDelta::empty(),
            covariance: ImuCovariance::zeros(),
            bias_jacobians: BiasJacobians::zeros(),
            sample_count: 0
        }
    }

    pub fn reset(&mut self) -> () {
        self.delta = ImuDelta::empty();
        self.covariance = ImuCovariance::zeros();
        self.bias_jacobians = BiasJacobians::zeros();
        self.sample_count = 0;
    }

    #[allow(non_snake_case)]
    pub fn integrate(&mut self, acceleration: &Vector3<Float>, angular_velocity: &Vector3<Float>, dt: Float) -> () {
        if !(dt > 0.0) {
            warn!("Skipping IMU sample with non-positive dt: {}", dt);
            return;
        }

        let a = acceleration - self.bias.accelerometer;
        let w_dt = (angular_velocity - self.bias.gyroscope)*dt;
        let dt_sqr = dt*dt;
        let I = Matrix3::<Float>::identity();

        let delta_R = self.delta.delta_rotation;
        let delta_R_increment = exp_r(&w_dt);
        let delta_R_increment_t = delta_R_increment.transpose();
        let J_r = right_jacobian(&w_dt);
        let delta_R_a_x = delta_R*skew_symmetric(&a);

        let mut A = ImuCovariance::identity();
        A.fixed_view_mut::<3,3>(ROTATION_OFFSET,ROTATION_OFFSET).copy_from(&delta_R_increment_t);
        A.fixed_view_mut::<3,3>(POSITION_OFFSET,ROTATION_OFFSET).copy_from(&(-0.5*delta_R_a_x*dt_sqr));
        A.fixed_view_mut::<3,3>(POSITION_OFFSET,VELOCITY_OFFSET).copy_from(&(I*dt));
        A.fixed_view_mut::<3,3>(VELOCITY_OFFSET,ROTATION_OFFSET).copy_from(&(-delta_R_a_x*dt));

        let mut B_g = ImuNoiseJacobian::zeros();
        B_g.fixed_view_mut::<3,3>(ROTATION_OFFSET,0).copy_from(&(J_r*dt));

        let mut B_a = ImuNoiseJacobian::zeros();
        B_a.fixed_view_mut::<3,3>(POSITION_OFFSET,0).copy_from(&(0.5*delta_R*dt_sqr));
        B_a.fixed_view_mut::<3,3>(VELOCITY_OFFSET,0).copy_from(&(delta_R*dt));

        let gyro_discrete = self.parameters.gyroscope_sigma.powi(2)/dt;
        let acc_discrete = self.parameters.accelerometer_sigma.powi(2)/dt;
        let integration = self.parameters.integration_sigma.powi(2)*dt;

        let mut covariance = A*self.covariance*A.transpose() + gyro_discrete*B_g*B_g.transpose() + acc_discrete*B_a*B_a.transpose();
        for k in POSITION_OFFSET..POSITION_OFFSET+3 {
            covariance[(k,k)] += integration;
        }
        self.covariance = covariance;

        // Jacobians are updated with the values before this sample
        let J = self.bias_jacobians;
        self.bias_jacobians = BiasJacobians {
            position_jacobian_bias_a: J.position_jacobian_bias_a + J.velocity_jacobian_bias_a*dt - 0.5*delta_R*dt_sqr,
            position_jacobian_bias_g: J.position_jacobian_bias_g + J.velocity_jacobian_bias_g*dt - 0.5*delta_R_a_x*J.rotation_jacobian_bias_g*dt_sqr,
            velocity_jacobian_bias_a: J.velocity_jacobian_bias_a - delta_R*dt,
            velocity_jacobian_bias_g: J.velocity_jacobian_bias_g - delta_R_a_x*J.rotation_jacobian_bias_g*dt,
            rotation_jacobian_bias_g: delta_R_increment_t*J.rotation_jacobian_bias_g - J_r*dt
        };

        let delta_R_a = delta_R*a;
        self.delta.delta_position += self.delta.delta_velocity*dt + 0.5*delta_R_a*dt_sqr;
        self.delta.delta_velocity += delta_R_a*dt;
        self.delta.delta_rotation = delta_R*delta_R_increment;
        self.delta.delta_time += dt;
        self.sample_count += 1;
    }

    /**
     * Deltas corrected to first order for the difference between bias and the integration bias
     */
    #[allow(non_snake_case)]
    pub fn bias_corrected_delta(&self, bias: &ImuBias) -> ImuDelta {
        let delta_bias = bias.difference(&self.bias);
        let J = &self.bias_jacobians;
        ImuDelta {
            delta_rotation: self.delta.delta_rotation*exp_r(&(J.rotation_jacobian_bias_g*delta_bias.gyroscope)),
            delta_velocity: self.delta.delta_velocity + J.velocity_jacobian_bias_a*delta_bias.accelerometer + J.velocity_jacobian_bias_g*delta_bias.gyroscope,
            delta_position: self.delta.delta_position + J.position_jacobian_bias_a*delta_bias.accelerometer + J.position_jacobian_bias_g*delta_bias.gyroscope,
            delta_time: self.delta.delta_time
        }
    }

    /**
     * Strapdown mechanization of the corrected deltas onto state_i
     */
    #[allow(non_snake_case)]
    pub fn predict(&self, state_i: &NavState, bias: &ImuBias) -> NavState {
        let delta = self.bias_corrected_delta(bias);
        let g = self.parameters.gravity();
        let t = delta.delta_time;
        let R_i = state_i.rotation();

        let rotation = R_i*delta.delta_rotation;
        let velocity = state_i.velocity + g*t + R_i*delta.delta_velocity;
        let position = state_i.position() + state_i.velocity*t + 0.5*g*t*t + R_i*delta.delta_position;

        NavState::new(Pose::new(rotation, position), velocity)
    }

    /**
     * Residual [theta, p, v] of state_j against the prediction from state_i
     */
    #[allow(non_snake_case)]
    pub fn compute_error(&self, state_i: &NavState, state_j: &NavState, bias: &ImuBias) -> ImuResidual {
        let delta = self.bias_corrected_delta(bias);
        let g = self.parameters.gravity();
        let t = delta.delta_time;
        let R_i_t = state_i.rotation().transpose();

        let r_rotation = ln_SO3(&(delta.delta_rotation.transpose()*R_i_t*state_j.rotation()));
        let r_position = R_i_t*(state_j.position() - state_i.position() - state_i.velocity*t - 0.5*g*t*t) - delta.delta_position;
        let r_velocity = R_i_t*(state_j.velocity - state_i.velocity - g*t) - delta.delta_velocity;

        let mut residual = ImuResidual::zeros();
        residual.fixed_rows_mut::<3>(ROTATION_OFFSET).copy_from(&r_rotation);
        residual.fixed_rows_mut::<3>(POSITION_OFFSET).copy_from(&r_position);
        residual.fixed_rows_mut::<3>(VELOCITY_OFFSET).copy_from(&r_velocity);
        residual
    }

    pub fn delta(&self) -> &ImuDelta {
        &self.delta
    }

    pub fn covariance(&self) -> &ImuCovariance {
        &self.covariance
    }

    pub fn bias_jacobians(&self) -> &BiasJacobians {
        &self.bias_jacobians
    }

    pub fn bias(&self) -> &ImuBias {
        &self.bias
    }

    pub fn parameters(&self) -> &PreintegrationParameters {
        &self.parameters
    }

    pub fn delta_time(&self) -> Float {
        self.delta.delta_time
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}
