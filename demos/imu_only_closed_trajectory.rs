extern crate nalgebra as na;
extern crate inertial_odometry;

use color_eyre::eyre::Result;
use inertial_odometry::numerics::pose::{rsme, Pose};
use inertial_odometry::odometry::imu_odometry::{imu_config::ImuOdometryConfig, solver::run_trajectory};
use inertial_odometry::sensors::imu::synthetic::{closed_circle, generate, SyntheticNoise, SyntheticParameters};
use inertial_odometry::Float;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let radius: Float = 2.0;
    let period: Float = 6.0;
    let synthetic_parameters = SyntheticParameters {
        imu_rate: 200.0,
        reference_rate: 20.0,
        duration: period,
        gravity_magnitude: 9.81,
        noise: Some(SyntheticNoise {accelerometer_sigma: 0.01, gyroscope_sigma: 0.001, seed: 42})
    };
    let sequence = generate(&synthetic_parameters, closed_circle(radius, period))?;

    let config = ImuOdometryConfig::default();
    println!("{}", config.to_yaml_string()?);

    let estimate = run_trajectory(&sequence.data, &config)?;
    let circle = closed_circle(radius, period);
    let ground_truth = estimate.timestamps.values().map(|&t| circle(t).nav_state().pose).collect::<Vec<Pose>>();

    for ((index, state), initial) in estimate.states.iter().zip(estimate.initial_states.values()) {
        println!("{:>5} t: {:.3} estimated: {} dead reckoning: {}", index, estimate.timestamps[index], state.position().transpose(), initial.position().transpose());
    }

    println!("bias: {}", estimate.bias);
    println!("converged: {}, iterations: {}, cost: {} -> {}", estimate.status.converged, estimate.status.iterations, estimate.status.initial_cost, estimate.status.final_cost);
    println!("RMSE estimated: {}", rsme(&estimate.poses(), &ground_truth));
    println!("RMSE dead reckoning: {}", rsme(&estimate.initial_poses(), &ground_truth));

    Ok(())
}
