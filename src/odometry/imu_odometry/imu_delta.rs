extern crate nalgebra as na;

use na::{Vector3,Matrix3};
use crate::Float;

/**
 * Relative motion in the body frame at window start. Gravity is not included.
 */
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct ImuDelta {
    pub delta_position: Vector3<Float>,
    pub delta_velocity: Vector3<Float>,
    pub delta_rotation: Matrix3<Float>,
    pub delta_time: Float
}

impl ImuDelta {
    pub fn empty() -> ImuDelta {
        ImuDelta {
            delta_position: Vector3::<Float>::zeros(),
            delta_velocity: Vector3::<Float>::zeros(),
            delta_rotation: Matrix3::<Float>::identity(),
            delta_time: 0.0
        }
    }
}

impl Default for ImuDelta {
    fn default() -> Self {
        ImuDelta::empty()
    }
}
