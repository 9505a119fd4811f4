extern crate nalgebra as na;

use na::{DVector,Vector3};

use std::any::Any;

use crate::factor_graph::{Key, factors::Factor, noise::NoiseModel, values::Values};
use crate::numerics::pose::Pose;
use crate::odometry::imu_odometry::bias::ImuBias;
use crate::{Float, Result};

/**
 * Prior on a pose. The residual is the tangent vector from the prior to the estimate.
 */
pub struct PriorPoseFactor {
    keys: [Key; 1],
    prior: Pose,
    noise_model: NoiseModel
}

impl PriorPoseFactor {
    pub fn new(key: Key, prior: Pose, noise_model: NoiseModel) -> PriorPoseFactor {
        assert_eq!(noise_model.dim(), 6);
        PriorPoseFactor {keys: [key], prior, noise_model}
    }

    pub fn prior(&self) -> &Pose {
        &self.prior
    }
}

impl Factor for PriorPoseFactor {
    fn keys(&self) -> &[Key] {
        &self.keys
    }

    fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    fn name(&self) -> &str {
        "PriorPose"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwhitened_residual(&self, values: &Values) -> Result<DVector<Float>> {
        let pose = values.pose(&self.keys[0])?;
        Ok(DVector::<Float>::from_column_slice(self.prior.local(pose).as_slice()))
    }
}

/**
 * Prior on a 3-vector variable (velocity, landmark)
 */
pub struct PriorVectorFactor {
    keys: [Key; 1],
    prior: Vector3<Float>,
    noise_model: NoiseModel
}

impl PriorVectorFactor {
    pub fn new(key: Key, prior: Vector3<Float>, noise_model: NoiseModel) -> PriorVectorFactor {
        assert_eq!(noise_model.dim(), 3);
        PriorVectorFactor {keys: [key], prior, noise_model}
    }

    pub fn prior(&self) -> &Vector3<Float> {
        &self.prior
    }
}

impl Factor for PriorVectorFactor {
    fn keys(&self) -> &[Key] {
        &self.keys
    }

    fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    fn name(&self) -> &str {
        "PriorVector"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwhitened_residual(&self, values: &Values) -> Result<DVector<Float>> {
        let point = values.point(&self.keys[0])?;
        Ok(DVector::<Float>::from_column_slice((point - self.prior).as_slice()))
    }
}

pub struct PriorBiasFactor {
    keys: [Key; 1],
    prior: ImuBias,
    noise_model: NoiseModel
}

impl PriorBiasFactor {
    pub fn new(key: Key, prior: ImuBias, noise_model: NoiseModel) -> PriorBiasFactor {
        assert_eq!(noise_model.dim(), 6);
        PriorBiasFactor {keys: [key], prior, noise_model}
    }

    pub fn prior(&self) -> &ImuBias {
        &self.prior
    }
}

impl Factor for PriorBiasFactor {
    fn keys(&self) -> &[Key] {
        &self.keys
    }

    fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    fn name(&self) -> &str {
        "PriorBias"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwhitened_residual(&self, values: &Values) -> Result<DVector<Float>> {
        let bias = values.bias(&self.keys[0])?;
        Ok(DVector::<Float>::from_column_slice(bias.difference(&self.prior).to_vector().as_slice()))
    }
}
