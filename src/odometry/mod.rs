pub mod imu_odometry;
pub mod runtime_parameters;
