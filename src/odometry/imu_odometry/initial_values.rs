use std::collections::BTreeMap;

use crate::factor_graph::{Key, values::Values};
use crate::odometry::imu_odometry::{
    graph_builder::BIAS_INDEX,
    imu_config::ImuOdometryConfig,
    nav_state::NavState,
    preintegration::PreintegratedImuMeasurements,
    windowing::KeyframeSchedule
};
use crate::sensors::MeasurementsSource;
use crate::Result;

/**
 * Dead reckoning from the initial state with the configured bias. The stream is integrated without resets
 * and every keyframe receives the prediction over all samples before it.
 */
pub fn generate_initial_values<S>(source: &S, schedule: &KeyframeSchedule, initial_state: &NavState, config: &ImuOdometryConfig) -> Result<(Values, BTreeMap<usize,NavState>)> where S: MeasurementsSource + ?Sized {
    let mut values = Values::new();
    let mut states = BTreeMap::<usize,NavState>::new();
    values.insert_bias(Key::bias(BIAS_INDEX), config.initial_bias)?;

    let mut preintegrated = PreintegratedImuMeasurements::new(config.preintegration, config.initial_bias);
    let dt = schedule.dt();
    let last = schedule.last_keyframe();

    for i in 0..=last {
        if schedule.is_keyframe(i) {
            let predicted = preintegrated.predict(initial_state, &config.initial_bias);
            values.insert_pose(Key::pose(i), predicted.pose)?;
            values.insert_point(Key::velocity(i), predicted.velocity)?;
            states.insert(i, predicted);
        }
        if i < last {
            preintegrated.integrate(&source.accelerometer_at(i), &source.gyroscope_at(i), dt[i]);
        }
    }

    Ok((values, states))
}
