extern crate nalgebra as na;

use na::{U1,U3,Matrix2x3,Matrix3,Vector,Vector2,Vector3,base::storage::Storage};
use crate::Float;
use crate::sensors::camera::Camera;

#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Pinhole {
    pub projection: Matrix3<Float>,
    pub inverse_projection: Matrix3<Float>
}

impl Pinhole {
    pub fn new(fx: Float, fy: Float, cx: Float, cy: Float) -> Pinhole {
        let projection = Matrix3::<Float>::new(
            fx, 0.0, cx,
            0.0, fy, cy,
            0.0, 0.0, 1.0);
        let inverse_projection = Matrix3::<Float>::new(
            1.0/fx, 0.0, -cx/fx,
            0.0, 1.0/fy, -cy/fy,
            0.0, 0.0, 1.0);
        Pinhole {projection, inverse_projection}
    }

    pub fn from_matrix(mat: &Matrix3<Float>) -> Pinhole {
        Pinhole::new(mat[(0,0)],mat[(1,1)],mat[(0,2)],mat[(1,2)])
    }

    pub fn get_fx(&self) -> Float {
        self.projection[(0,0)]
    }

    pub fn get_fy(&self) -> Float {
        self.projection[(1,1)]
    }

    pub fn get_cx(&self) -> Float {
        self.projection[(0,2)]
    }

    pub fn get_cy(&self) -> Float {
        self.projection[(1,2)]
    }
}

impl Camera for Pinhole {
    fn get_projection(&self) -> Matrix3<Float> {
        self.projection
    }

    fn get_inverse_projection(&self) -> Matrix3<Float> {
        self.inverse_projection
    }

    fn get_jacobian_with_respect_to_position_in_camera_frame<T>(&self, position: &Vector<Float,U3,T>) -> Option<Matrix2x3<Float>> where T: Storage<Float,U3,U1> {
        let x = position[0];
        let y = position[1];
        let z = position[2];
        match z {
            z if z > 0.0 => {
                let z_sqrd = z.powi(2);
                Some(Matrix2x3::<Float>::new(self.get_fx()/z, 0.0, -(self.get_fx()*x)/z_sqrd,
                                             0.0, self.get_fy()/z, -(self.get_fy()*y)/z_sqrd))
            },
            _ => None
        }
    }

    fn project<T>(&self, position: &Vector<Float,U3,T>) -> Option<Vector2<Float>> where T: Storage<Float,U3,U1> {
        match position[2] {
            z if z > 0.0 => {
                let projected_coordinates = self.projection*(position/z);
                Some(Vector2::<Float>::new(projected_coordinates[0], projected_coordinates[1]))
            },
            _ => None
        }
    }

    fn backproject(&self, point: &Vector2<Float>, depth: Float) -> Vector3<Float> {
        let homogeneous = Vector3::<Float>::new(point[0], point[1], 1.0);
        (self.inverse_projection*homogeneous).scale(depth)
    }
}
