extern crate nalgebra as na;

use na::{Vector,Vector3,Vector6,Matrix3,Const,storage::Storage};
use serde::{Serialize, Deserialize};
use std::fmt;

use crate::Float;

/**
 * Constant additive sensor offsets. Tangent vectors are ordered [accelerometer, gyroscope].
 */
#[derive(Debug,Copy,Clone,PartialEq,Serialize,Deserialize)]
pub struct ImuBias {
    pub accelerometer: Vector3<Float>,
    pub gyroscope: Vector3<Float>
}

impl ImuBias {
    pub fn new(accelerometer: Vector3<Float>, gyroscope: Vector3<Float>) -> ImuBias {
        ImuBias {accelerometer, gyroscope}
    }

    pub fn zeros() -> ImuBias {
        ImuBias {
            accelerometer: Vector3::<Float>::zeros(),
            gyroscope: Vector3::<Float>::zeros()
        }
    }

    pub fn add_pertb<R>(&self, new_pertb: &Vector<Float,Const<6>,R>) -> ImuBias where R: Storage<Float,Const<6>,Const<1>> {
        ImuBias {
            accelerometer: self.accelerometer + new_pertb.fixed_rows::<3>(0),
            gyroscope: self.gyroscope + new_pertb.fixed_rows::<3>(3)
        }
    }

    pub fn difference(&self, other: &ImuBias) -> ImuBias {
        ImuBias {
            accelerometer: self.accelerometer - other.accelerometer,
            gyroscope: self.gyroscope - other.gyroscope
        }
    }

    pub fn to_vector(&self) -> Vector6<Float> {
        let mut v = Vector6::<Float>::zeros();
        v.fixed_rows_mut::<3>(0).copy_from(&self.accelerometer);
        v.fixed_rows_mut::<3>(3).copy_from(&self.gyroscope);
        v
    }

    pub fn norm(&self) -> Float {
        self.accelerometer.norm() + self.gyroscope.norm()
    }
}

impl Default for ImuBias {
    fn default() -> Self {
        ImuBias::zeros()
    }
}

impl fmt::Display for ImuBias {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "acc: [{:.6}, {:.6}, {:.6}], gyro: [{:.6}, {:.6}, {:.6}]",
            self.accelerometer[0],self.accelerometer[1],self.accelerometer[2],
            self.gyroscope[0],self.gyroscope[1],self.gyroscope[2])
    }
}

/**
 * First order sensitivities of the preintegrated deltas with respect to the bias used during integration
 */
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct BiasJacobians {
    pub rotation_jacobian_bias_g: Matrix3<Float>,
    pub velocity_jacobian_bias_a: Matrix3<Float>,
    pub velocity_jacobian_bias_g: Matrix3<Float>,
    pub position_jacobian_bias_a: Matrix3<Float>,
    pub position_jacobian_bias_g: Matrix3<Float>
}

impl BiasJacobians {
    pub fn zeros() -> BiasJacobians {
        BiasJacobians {
            rotation_jacobian_bias_g: Matrix3::<Float>::zeros(),
            velocity_jacobian_bias_a: Matrix3::<Float>::zeros(),
            velocity_jacobian_bias_g: Matrix3::<Float>::zeros(),
            position_jacobian_bias_a: Matrix3::<Float>::zeros(),
            position_jacobian_bias_g: Matrix3::<Float>::zeros()
        }
    }
}
