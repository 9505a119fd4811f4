use nalgebra as na;

use na::Vector3;
use crate::Float;

pub mod imu_data_frame;
pub mod synthetic;

/// Single timestamped reading in the sensor frame
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct ImuSample {
    pub timestamp: Float,
    pub accelerometer: Vector3<Float>,
    pub gyroscope: Vector3<Float>
}

impl ImuSample {
    pub fn new(timestamp: Float, accelerometer: Vector3<Float>, gyroscope: Vector3<Float>) -> ImuSample {
        ImuSample {timestamp, accelerometer, gyroscope}
    }
}
