use log::{debug,info};

use crate::factor_graph::{FactorGraph, Key, noise::NoiseModel};
use crate::factor_graph::factors::{imu_factor::ImuFactor, prior::{PriorBiasFactor,PriorPoseFactor,PriorVectorFactor}};
use crate::odometry::imu_odometry::{
    imu_config::ImuOdometryConfig,
    nav_state::NavState,
    preintegration::PreintegratedImuMeasurements,
    windowing::KeyframeSchedule
};
use crate::sensors::MeasurementsSource;
use crate::{ImuOdometryError, Result};

/// Index of the single bias shared by all motion factors
pub const BIAS_INDEX: usize = 0;

/**
 * One motion factor per keyframe pair plus priors on the first keyframe and the bias.
 * With return_to_start_prior the last keyframe is tied to the initial state as well.
 */
pub fn build_factor_graph<S>(source: &S, schedule: &KeyframeSchedule, initial_state: &NavState, config: &ImuOdometryConfig) -> Result<FactorGraph> where S: MeasurementsSource + ?Sized {
    if config.enable_visual_factors {
        return Err(ImuOdometryError::VisualFactorsUnsupported);
    }
    config.validate()?;

    let bias_key = Key::bias(BIAS_INDEX);
    let mut graph = FactorGraph::new();
    let mut preintegrated = PreintegratedImuMeasurements::new(config.preintegration, config.initial_bias);
    let mut pairs = schedule.pairs().iter().peekable();
    let dt = schedule.dt();

    for i in 0..schedule.last_keyframe() {
        if let Some(pair) = pairs.peek() {
            if i == pair.end {
                graph.push(Box::new(close_window(pair.start, pair.end, bias_key, &preintegrated)?));
                preintegrated.reset();
                pairs.next();
            }
        }
        preintegrated.integrate(&source.accelerometer_at(i), &source.gyroscope_at(i), dt[i]);
    }

    // The last sample is never integrated, its timestamp only closes the final window
    if let Some(pair) = pairs.next() {
        graph.push(Box::new(close_window(pair.start, pair.end, bias_key, &preintegrated)?));
    }

    let first = Key::pose(schedule.first_keyframe());
    let first_velocity = Key::velocity(schedule.first_keyframe());
    graph.push(Box::new(PriorPoseFactor::new(first, initial_state.pose, NoiseModel::isotropic(6, config.pose_sigma))));
    graph.push(Box::new(PriorVectorFactor::new(first_velocity, initial_state.velocity, NoiseModel::isotropic(3, config.velocity_sigma))));
    graph.push(Box::new(PriorBiasFactor::new(bias_key, config.initial_bias, NoiseModel::isotropic(6, config.bias_sigma))));

    if config.return_to_start_prior {
        let last = schedule.last_keyframe();
        graph.push(Box::new(PriorPoseFactor::new(Key::pose(last), initial_state.pose, NoiseModel::isotropic(6, config.pose_sigma))));
        graph.push(Box::new(PriorVectorFactor::new(Key::velocity(last), initial_state.velocity, NoiseModel::isotropic(3, config.velocity_sigma))));
    }

    info!("Factor graph: {} factors over {} keyframes", graph.len(), schedule.keyframes().len());
    Ok(graph)
}

fn close_window(start: usize, end: usize, bias_key: Key, preintegrated: &PreintegratedImuMeasurements) -> Result<ImuFactor> {
    if preintegrated.is_empty() {
        return Err(ImuOdometryError::DegenerateWindow {start, end});
    }
    debug!("Motion factor x{} -> x{}: {} samples over {}s", start, end, preintegrated.sample_count(), preintegrated.delta_time());
    Ok(ImuFactor::new(Key::pose(start), Key::velocity(start), Key::pose(end), Key::velocity(end), bias_key, preintegrated.clone()))
}
