extern crate nalgebra as na;

use na::Vector3;
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use crate::{Float, ImuOdometryError, Result};
use crate::odometry::imu_odometry::{bias::ImuBias, preintegration::PreintegrationParameters};
use crate::odometry::runtime_parameters::RuntimeParameters;

/**
 * Everything needed to turn a measurement sequence into a factor graph and solve it.
 * Missing fields in a YAML file fall back to the defaults.
 */
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct ImuOdometryConfig {
    pub preintegration: PreintegrationParameters,
    pub initial_bias: ImuBias,
    pub initial_velocity: Vector3<Float>,
    pub initial_position: Vector3<Float>,
    pub pose_sigma: Float,
    pub velocity_sigma: Float,
    pub bias_sigma: Float,
    pub keyframe_stride: usize,
    pub return_to_start_prior: bool,
    pub enable_visual_factors: bool,
    pub runtime_parameters: RuntimeParameters
}

impl Default for ImuOdometryConfig {
    fn default() -> Self {
        ImuOdometryConfig {
            preintegration: PreintegrationParameters::default(),
            initial_bias: ImuBias::zeros(),
            initial_velocity: Vector3::<Float>::zeros(),
            initial_position: Vector3::<Float>::zeros(),
            pose_sigma: 0.02,
            velocity_sigma: 0.1,
            bias_sigma: 1.0,
            keyframe_stride: 6,
            return_to_start_prior: true,
            enable_visual_factors: false,
            runtime_parameters: RuntimeParameters::default()
        }
    }
}

impl ImuOdometryConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<ImuOdometryConfig> {
        let config: ImuOdometryConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<ImuOdometryConfig> {
        let contents = fs::read_to_string(path)?;
        ImuOdometryConfig::from_yaml_str(&contents)
    }

    /**
     * Prior sigmas have to be positive, noise densities non-negative and the stride at least 1
     */
    pub fn validate(&self) -> Result<()> {
        let prior_sigmas = [("pose_sigma", self.pose_sigma), ("velocity_sigma", self.velocity_sigma), ("bias_sigma", self.bias_sigma)];
        if let Some((name, value)) = prior_sigmas.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(ImuOdometryError::Config(format!("{} has to be positive and finite, got {}", name, value)));
        }

        let densities = [
            ("preintegration.gyroscope_sigma", self.preintegration.gyroscope_sigma),
            ("preintegration.accelerometer_sigma", self.preintegration.accelerometer_sigma),
            ("preintegration.integration_sigma", self.preintegration.integration_sigma)
        ];
        if let Some((name, value)) = densities.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
            return Err(ImuOdometryError::Config(format!("{} has to be non-negative and finite, got {}", name, value)));
        }

        if self.keyframe_stride == 0 {
            return Err(ImuOdometryError::Config(String::from("keyframe stride has to be at least 1")));
        }
        Ok(())
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
