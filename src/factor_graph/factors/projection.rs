extern crate nalgebra as na;

use na::{DVector,Vector2};

use std::any::Any;

use crate::factor_graph::{Key, factors::Factor, noise::NoiseModel, values::Values};
use crate::sensors::camera::{Camera, pinhole::Pinhole};
use crate::{Float, ImuOdometryError, Result};

/**
 * Reprojection error of landmark l observed from the camera mounted on body pose x with extrinsic r (camera in body).
 * Keys are ordered [x, r, l]. This factor is not part of the inertial graph.
 */
pub struct ProjectionFactor {
    keys: [Key; 3],
    measured: Vector2<Float>,
    camera: Pinhole,
    noise_model: NoiseModel
}

impl ProjectionFactor {
    pub fn new(pose: Key, extrinsic: Key, landmark: Key, measured: Vector2<Float>, camera: Pinhole, pixel_sigma: Float) -> ProjectionFactor {
        ProjectionFactor {keys: [pose, extrinsic, landmark], measured, camera, noise_model: NoiseModel::isotropic(2, pixel_sigma)}
    }

    pub fn measured(&self) -> &Vector2<Float> {
        &self.measured
    }
}

impl Factor for ProjectionFactor {
    fn keys(&self) -> &[Key] {
        &self.keys
    }

    fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    fn name(&self) -> &str {
        "Projection"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwhitened_residual(&self, values: &Values) -> Result<DVector<Float>> {
        let world_from_camera = values.pose(&self.keys[0])?.compose(values.pose(&self.keys[1])?);
        let landmark = values.point(&self.keys[2])?;
        let camera_from_world = world_from_camera.inverse();
        let position_in_camera = camera_from_world.rotation*landmark + camera_from_world.translation;
        match self.camera.project(&position_in_camera) {
            Some(projected) => Ok(DVector::<Float>::from_column_slice((projected - self.measured).as_slice())),
            None => Err(ImuOdometryError::Cheirality(self.keys[2]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;
    use crate::numerics::pose::Pose;

    fn values_with_landmark(landmark: Vector3<Float>) -> Values {
        let mut values = Values::new();
        values.insert_pose(Key::pose(0), Pose::new(nalgebra::Matrix3::<Float>::identity(), Vector3::<Float>::new(0.0,0.0,-1.0))).unwrap();
        values.insert_pose(Key::camera_extrinsic(0), Pose::identity()).unwrap();
        values.insert_point(Key::landmark(0), landmark).unwrap();
        values
    }

    #[test]
    fn zero_residual_at_measurement() {
        let camera = Pinhole::new(500.0, 500.0, 320.0, 240.0);
        let values = values_with_landmark(Vector3::<Float>::new(0.2,0.1,1.0));
        let expected = camera.project(&Vector3::<Float>::new(0.2,0.1,2.0)).unwrap();
        let factor = ProjectionFactor::new(Key::pose(0), Key::camera_extrinsic(0), Key::landmark(0), expected, camera, 2.0);
        assert_abs_diff_eq!(factor.unwhitened_residual(&values).unwrap().norm(), 0.0, epsilon = 1e-10);

        let linearized = factor.linearize(&values).unwrap();
        assert_eq!(linearized.jacobians[2].shape(), (2,3));
    }

    #[test]
    fn landmark_behind_camera_is_rejected() {
        let camera = Pinhole::new(500.0, 500.0, 320.0, 240.0);
        let values = values_with_landmark(Vector3::<Float>::new(0.0,0.0,-3.0));
        let factor = ProjectionFactor::new(Key::pose(0), Key::camera_extrinsic(0), Key::landmark(0), Vector2::<Float>::zeros(), camera, 2.0);
        assert!(matches!(factor.unwhitened_residual(&values), Err(ImuOdometryError::Cheirality(_))));
    }
}
