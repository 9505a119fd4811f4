extern crate nalgebra as na;

use na::{Matrix3,Rotation3,Vector3};
use crate::{float, Float};

pub mod bias;
pub mod imu_delta;
pub mod imu_measurement;
pub mod nav_state;
pub mod preintegration;
pub mod windowing;
pub mod imu_config;
pub mod graph_builder;
pub mod initial_values;
pub mod solver;

pub use imu_measurement::{ImuCovariance,ImuResidual};

/**
 * Orientation that maps a resting accelerometer reading onto world +Z. Assumes the platform does not accelerate.
 */
pub fn estimate_initial_orientation(accelerometer: &Vector3<Float>) -> Matrix3<Float> {
    match Rotation3::rotation_between(accelerometer, &Vector3::<Float>::z()) {
        Some(rotation) => rotation.into_inner(),
        // Reading points straight down
        None => Rotation3::from_axis_angle(&Vector3::<Float>::x_axis(), float::consts::PI).into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::numerics::lie::exp_r;

    #[test]
    fn level_reading_gives_identity() {
        let rotation = estimate_initial_orientation(&Vector3::<Float>::new(0.0,0.0,9.81));
        assert_abs_diff_eq!(rotation, Matrix3::<Float>::identity(), epsilon = 1e-12);
    }

    #[test]
    fn tilted_reading_is_leveled() {
        let world_from_body = exp_r(&Vector3::<Float>::new(0.2,-0.1,0.0));
        let reading = world_from_body.transpose()*Vector3::<Float>::new(0.0,0.0,9.81);
        let rotation = estimate_initial_orientation(&reading);
        assert_abs_diff_eq!(rotation*reading, Vector3::<Float>::new(0.0,0.0,9.81), epsilon = 1e-10);
    }

    #[test]
    fn upside_down_reading() {
        let rotation = estimate_initial_orientation(&Vector3::<Float>::new(0.0,0.0,-9.81));
        assert_abs_diff_eq!(rotation*Vector3::<Float>::new(0.0,0.0,-9.81), Vector3::<Float>::new(0.0,0.0,9.81), epsilon = 1e-10);
    }
}
