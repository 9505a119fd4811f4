extern crate nalgebra as na;

use na::Vector3;
use crate::Float;

pub mod camera;
pub mod imu;

/**
 * Random access to a recorded sequence of IMU samples and the coarser reference (keyframe) timestamps
 */
pub trait MeasurementsSource {
    fn imu_count(&self) -> usize;
    fn reference_count(&self) -> usize;
    fn accelerometer_at(&self, i: usize) -> Vector3<Float>;
    fn gyroscope_at(&self, i: usize) -> Vector3<Float>;
    fn timestamp_imu(&self, i: usize) -> Float;
    fn timestamp_reference(&self, j: usize) -> Float;

    /**
     * Interval to the next sample. The last sample reuses the previous interval.
     */
    fn dt_imu(&self, i: usize) -> Float {
        let count = self.imu_count();
        match i {
            i if i + 1 < count => self.timestamp_imu(i+1) - self.timestamp_imu(i),
            i if i > 0 && count >= 2 => self.timestamp_imu(i) - self.timestamp_imu(i-1),
            _ => 0.0
        }
    }
}
