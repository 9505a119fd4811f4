extern crate inertial_odometry;

use color_eyre::eyre::{eyre, Result};
use std::path::Path;
use inertial_odometry::io::csv_loader::{self, CsvLoadingParameters};
use inertial_odometry::odometry::imu_odometry::{imu_config::ImuOdometryConfig, solver::run_trajectory};

/**
 * Usage: imu_only_dataset <dataset dir> [config.yaml]
 * The dataset directory holds imu.csv and frames.csv with timestamps in nanoseconds.
 */
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = std::env::args().collect::<Vec<String>>();
    let root_path = args.get(1).ok_or_else(|| eyre!("Usage: {} <dataset dir> [config.yaml]", args[0]))?;
    let config = match args.get(2) {
        Some(config_path) => ImuOdometryConfig::from_yaml_file(Path::new(config_path))?,
        None => ImuOdometryConfig::default()
    };

    let loading_parameters = CsvLoadingParameters {timestamp_scale: 1e-9, ..CsvLoadingParameters::default()};
    let data = csv_loader::load(Path::new(root_path), &loading_parameters)?;
    let estimate = run_trajectory(&data, &config)?.into_converged()?;

    for (index, state) in estimate.states.iter() {
        println!("{} {} {}", estimate.timestamps[index], state.position().transpose(), state.velocity.transpose());
    }
    println!("bias: {}", estimate.bias);

    Ok(())
}
