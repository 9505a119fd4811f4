extern crate nalgebra as na;

use na::{U1,U3,Vector,Vector2,Vector3,Matrix2x3,Matrix3, base::storage::Storage};
use crate::Float;

pub mod pinhole;

/**
 * Projection of points given in the camera frame. Points with non-positive depth do not project.
 */
pub trait Camera {
    fn get_projection(&self) -> Matrix3<Float>;
    fn get_inverse_projection(&self) -> Matrix3<Float>;
    fn get_jacobian_with_respect_to_position_in_camera_frame<T>(&self, position: &Vector<Float,U3,T>) -> Option<Matrix2x3<Float>> where T: Storage<Float,U3,U1>;
    fn project<T>(&self, position: &Vector<Float,U3,T>) -> Option<Vector2<Float>> where T: Storage<Float,U3,U1>;
    fn backproject(&self, point: &Vector2<Float>, depth: Float) -> Vector3<Float>;
}
