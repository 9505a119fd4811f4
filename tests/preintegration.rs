extern crate nalgebra as na;

use approx::assert_abs_diff_eq;
use na::{Matrix3,Vector3,Rotation3};
use rand::{thread_rng, Rng};

use inertial_odometry::numerics::{lie::{exp_r,ln_SO3}, pose::Pose};
use inertial_odometry::odometry::imu_odometry::{
    bias::ImuBias,
    nav_state::NavState,
    preintegration::{PreintegratedImuMeasurements,PreintegrationParameters}
};
use inertial_odometry::sensors::{MeasurementsSource, imu::synthetic::{generate,constant_acceleration_then_coast as synthetic_constant_acceleration_then_coast,constant_rotation,SyntheticParameters}};
use inertial_odometry::Float;

fn random_state() -> NavState {
    let mut rng = thread_rng();
    let rotation = rng.gen::<Rotation3<Float>>();
    let position = Vector3::<Float>::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
    let velocity = Vector3::<Float>::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
    NavState::new(Pose::new(rotation.into_inner(), position), velocity)
}

#[test]
fn empty_window_predicts_reference_state() {
    let mut preintegrated = PreintegratedImuMeasurements::new(PreintegrationParameters::default(), ImuBias::zeros());
    preintegrated.integrate(&Vector3::<Float>::new(1.0,2.0,3.0), &Vector3::<Float>::new(0.1,0.2,0.3), 0.01);
    preintegrated.reset();

    let reference = random_state();
    let bias = ImuBias::new(Vector3::<Float>::new(0.01,0.02,0.03), Vector3::<Float>::new(0.001,0.0,0.0));
    let predicted = preintegrated.predict(&reference, &bias);

    assert_eq!(preintegrated.delta_time(), 0.0);
    assert_eq!(preintegrated.delta().delta_rotation, Matrix3::<Float>::identity());
    assert_eq!(predicted, reference);
}

#[test]
fn constant_rate_matches_closed_form_rotation() {
    let omega = Vector3::<Float>::new(0.3, -0.5, 0.8);
    let sequence = generate(&SyntheticParameters::default(), constant_rotation(omega)).unwrap();
    let data = &sequence.data;

    let mut preintegrated = PreintegratedImuMeasurements::new(PreintegrationParameters::default(), ImuBias::zeros());
    for i in 0..data.imu_count()-1 {
        preintegrated.integrate(&data.accelerometer_at(i), &data.gyroscope_at(i), data.dt_imu(i));
    }

    let total_time = data.timestamp_imu(data.imu_count()-1) - data.timestamp_imu(0);
    let expected = exp_r(&(omega*total_time));
    assert_abs_diff_eq!(preintegrated.delta_time(), total_time, epsilon = 1e-12);
    assert_abs_diff_eq!(ln_SO3(&(expected.transpose()*preintegrated.delta().delta_rotation)).norm(), 0.0, epsilon = 1e-10);

    // Rotating in place: the specific force only cancels gravity
    let predicted = preintegrated.predict(&NavState::identity(), &ImuBias::zeros());
    assert_abs_diff_eq!(predicted.velocity, Vector3::<Float>::zeros(), epsilon = 1e-9);
    assert_abs_diff_eq!(*predicted.position(), Vector3::<Float>::zeros(), epsilon = 1e-9);
}

#[test]
fn constant_acceleration_then_coast() {
    let acceleration = Vector3::<Float>::new(0.4, -0.2, 0.0);
    let switch_time: Float = 1.0;
    let parameters = SyntheticParameters {imu_rate: 100.0, reference_rate: 1.0, duration: 2.0, ..SyntheticParameters::default()};
    let sequence = generate(&parameters, synthetic_constant_acceleration_then_coast(acceleration, switch_time)).unwrap();
    let data = &sequence.data;

    let mut preintegrated = PreintegratedImuMeasurements::new(PreintegrationParameters::default(), ImuBias::zeros());
    let start = NavState::identity();
    let switch_index = 100;
    for i in 0..switch_index {
        preintegrated.integrate(&data.accelerometer_at(i), &data.gyroscope_at(i), data.dt_imu(i));
    }
    let at_switch = preintegrated.predict(&start, &ImuBias::zeros());
    assert_abs_diff_eq!(at_switch.velocity, acceleration*switch_time, epsilon = 1e-9);

    for i in switch_index..data.imu_count()-1 {
        preintegrated.integrate(&data.accelerometer_at(i), &data.gyroscope_at(i), data.dt_imu(i));
    }
    let at_end = preintegrated.predict(&start, &ImuBias::zeros());
    let expected_position = 0.5*acceleration*switch_time.powi(2) + acceleration*switch_time*switch_time;
    assert_abs_diff_eq!(at_end.velocity, acceleration*switch_time, epsilon = 1e-9);
    assert_abs_diff_eq!(*at_end.position(), expected_position, epsilon = 1e-9);
    assert_abs_diff_eq!(*at_end.rotation(), Matrix3::<Float>::identity(), epsilon = 1e-12);
}

#[test]
fn prediction_is_frame_consistent() {
    // Integrating the same body frame samples from any start state yields zero residual against the prediction
    let mut preintegrated = PreintegratedImuMeasurements::new(PreintegrationParameters::default(), ImuBias::zeros());
    for i in 0..200 {
        let t = i as Float*0.005;
        preintegrated.integrate(&Vector3::<Float>::new(t.cos(), 0.3, 9.81), &Vector3::<Float>::new(0.05, 0.1*t, -0.2), 0.005);
    }
    for _ in 0..5 {
        let state_i = random_state();
        let state_j = preintegrated.predict(&state_i, &ImuBias::zeros());
        assert_abs_diff_eq!(preintegrated.compute_error(&state_i, &state_j, &ImuBias::zeros()).norm(), 0.0, epsilon = 1e-9);
    }
}
