use nalgebra as na;

use na::{DVector,Matrix3,Vector3};
use approx::assert_abs_diff_eq;

use inertial_odometry::factor_graph::{Key, values::{Ordering,Values}};
use inertial_odometry::factor_graph::factors::{Factor, imu_factor::ImuFactor, prior::{PriorBiasFactor,PriorPoseFactor,PriorVectorFactor}};
use inertial_odometry::numerics::optimizer::gauss_newton::OptimizerGn;
use inertial_odometry::odometry::imu_odometry::{
    imu_config::ImuOdometryConfig,
    nav_state::NavState,
    solver::{estimate_trajectory, initial_state_from_source, run_trajectory, ImuProblem}
};
use inertial_odometry::sensors::MeasurementsSource;
use inertial_odometry::sensors::imu::synthetic::{closed_circle, generate, stationary, SyntheticParameters};
use inertial_odometry::{Float, ImuOdometryError};

#[test]
fn stationary_sequence_stays_at_origin() {
    let sequence = generate(&SyntheticParameters::default(), stationary()).unwrap();
    let estimate = run_trajectory(&sequence.data, &ImuOdometryConfig::default()).unwrap().into_converged().unwrap();

    assert_eq!(*estimate.states.keys().next().unwrap(), 0);
    assert_eq!(*estimate.states.keys().last().unwrap(), 400);
    for state in estimate.states.values() {
        assert_abs_diff_eq!(state.pose.rotation, Matrix3::<Float>::identity(), epsilon = 1e-6);
        assert_abs_diff_eq!(state.pose.translation, Vector3::<Float>::zeros(), epsilon = 1e-6);
        assert_abs_diff_eq!(state.velocity, Vector3::<Float>::zeros(), epsilon = 1e-6);
    }
    assert!(estimate.bias.norm() < 1e-6);
    assert_abs_diff_eq!(*estimate.timestamps.get(&400).unwrap(), 2.0, epsilon = 1e-12);
}

#[test]
fn closed_circle_returns_to_start() {
    let period = 4.0;
    let parameters = SyntheticParameters {duration: period, ..SyntheticParameters::default()};
    let sequence = generate(&parameters, closed_circle(1.5, period)).unwrap();
    let config = ImuOdometryConfig::default();

    let estimate = run_trajectory(&sequence.data, &config).unwrap();
    assert!(estimate.status.converged);
    assert!(estimate.status.final_cost <= estimate.status.initial_cost*(1.0 + 1e-5) + 1e-5);

    let start = estimate.states.values().next().unwrap();
    let end = estimate.states.values().last().unwrap();
    let origin = Vector3::<Float>::zeros();

    assert_abs_diff_eq!(start.pose.translation, origin, epsilon = 0.05);
    assert_abs_diff_eq!(end.pose.translation, origin, epsilon = 0.05);
    assert_abs_diff_eq!(end.velocity, origin, epsilon = 0.05);
    assert_eq!(estimate.poses().len(), estimate.initial_poses().len());
}

#[test]
fn initial_cost_grows_with_worse_initial_values() {
    let sequence = generate(&SyntheticParameters::default(), stationary()).unwrap();
    let config = ImuOdometryConfig::default();
    let initial_state = initial_state_from_source(&sequence.data, &config);
    let problem = ImuProblem::build(&sequence.data, &initial_state, &config).unwrap();

    let ordering = Ordering::from_values(&problem.initial_values);
    let direction = DVector::<Float>::from_fn(ordering.dim(), |i, _| 0.01*((i % 7) as Float - 3.0));
    let slightly_off = problem.initial_values.retract(&(0.5*&direction), &ordering);
    let far_off = problem.initial_values.retract(&direction, &ordering);

    let exact_cost = problem.initial_cost().unwrap();
    let slightly_off_cost = problem.graph.cost(&slightly_off).unwrap();
    let far_off_cost = problem.graph.cost(&far_off).unwrap();

    assert!(exact_cost < 1e-12);
    assert!(exact_cost < slightly_off_cost);
    assert!(slightly_off_cost < far_off_cost);
}

#[test]
fn optimizer_rejects_missing_initial_values() {
    let sequence = generate(&SyntheticParameters::default(), stationary()).unwrap();
    let config = ImuOdometryConfig::default();
    let problem = ImuProblem::build(&sequence.data, &NavState::identity(), &config).unwrap();
    let missing = Key::velocity(problem.schedule.last_keyframe());

    let mut partial = Values::new();
    for (key, variable) in problem.initial_values.iter().filter(|(k, _)| **k != missing) {
        partial.insert(*key, *variable).unwrap();
    }

    let result = OptimizerGn::new(&problem.graph).optimize(&partial, &config.runtime_parameters);
    assert!(matches!(result, Err(ImuOdometryError::MissingInitialValue(key)) if key == missing));
}

#[test]
fn visual_factors_are_refused() {
    let sequence = generate(&SyntheticParameters::default(), stationary()).unwrap();
    let config = ImuOdometryConfig {enable_visual_factors: true, ..ImuOdometryConfig::default()};
    let result = estimate_trajectory(&sequence.data, &NavState::identity(), &config);
    assert!(matches!(result, Err(ImuOdometryError::VisualFactorsUnsupported)));
}

#[test]
fn one_motion_factor_per_keyframe_pair() {
    let sequence = generate(&SyntheticParameters::default(), stationary()).unwrap();

    for (return_to_start_prior, expected_factors) in [(true, 12), (false, 10)] {
        let config = ImuOdometryConfig {return_to_start_prior, ..ImuOdometryConfig::default()};
        let initial_state = initial_state_from_source(&sequence.data, &config);
        let problem = ImuProblem::build(&sequence.data, &initial_state, &config).unwrap();
        let pairs = problem.schedule.pairs();
        let last = problem.schedule.last_keyframe();

        assert_eq!(pairs.len(), 7);
        assert_eq!(problem.graph.len(), expected_factors);

        let motion_factors = problem.graph.factors_of::<ImuFactor>().collect::<Vec<&ImuFactor>>();
        assert_eq!(motion_factors.len(), pairs.len());
        for (factor, pair) in motion_factors.iter().zip(pairs.iter()) {
            assert_eq!(factor.keys(), &[Key::pose(pair.start), Key::velocity(pair.start), Key::pose(pair.end), Key::velocity(pair.end), Key::bias(0)]);
            assert_eq!(factor.measurement().sample_count(), pair.end - pair.start);
            assert_eq!(factor.measurement().sample_count(), pair.sample_count());
        }
        let integrated = motion_factors.iter().map(|f| f.measurement().sample_count()).sum::<usize>();
        assert_eq!(integrated, sequence.data.imu_count() - 1);

        let pose_prior_keys = problem.graph.factors_of::<PriorPoseFactor>().map(|f| f.keys()[0]).collect::<Vec<Key>>();
        let velocity_prior_keys = problem.graph.factors_of::<PriorVectorFactor>().map(|f| f.keys()[0]).collect::<Vec<Key>>();
        assert_eq!(problem.graph.factors_of::<PriorBiasFactor>().count(), 1);
        match return_to_start_prior {
            true => {
                assert_eq!(pose_prior_keys, vec![Key::pose(0), Key::pose(last)]);
                assert_eq!(velocity_prior_keys, vec![Key::velocity(0), Key::velocity(last)]);
            },
            false => {
                assert_eq!(pose_prior_keys, vec![Key::pose(0)]);
                assert_eq!(velocity_prior_keys, vec![Key::velocity(0)]);
            }
        }
    }
}

#[test]
fn non_positive_prior_sigma_is_a_config_error() {
    let sequence = generate(&SyntheticParameters::default(), stationary()).unwrap();

    let config = ImuOdometryConfig {velocity_sigma: 0.0, ..ImuOdometryConfig::default()};
    assert!(matches!(run_trajectory(&sequence.data, &config), Err(ImuOdometryError::Config(_))));

    let config = ImuOdometryConfig {pose_sigma: -0.02, ..ImuOdometryConfig::default()};
    assert!(matches!(run_trajectory(&sequence.data, &config), Err(ImuOdometryError::Config(_))));
}

#[test]
fn closed_circle_converges_from_perturbed_initial_values() {
    let period = 4.0;
    let parameters = SyntheticParameters {duration: period, ..SyntheticParameters::default()};
    let sequence = generate(&parameters, closed_circle(1.5, period)).unwrap();
    let config = ImuOdometryConfig::default();
    let initial_state = initial_state_from_source(&sequence.data, &config);
    let problem = ImuProblem::build(&sequence.data, &initial_state, &config).unwrap();

    let ordering = Ordering::from_values(&problem.initial_values);
    let direction = DVector::<Float>::from_fn(ordering.dim(), |i, _| 0.01*((i % 5) as Float - 2.0));

    let mut previous_initial_cost = problem.initial_cost().unwrap();
    for scale in [0.5, 1.0] {
        let perturbed = problem.initial_values.retract(&(scale*&direction), &ordering);
        let result = OptimizerGn::new(&problem.graph).optimize(&perturbed, &config.runtime_parameters).unwrap();

        assert!(result.status.initial_cost > previous_initial_cost);
        assert!(result.status.converged);
        assert!(result.status.final_cost < result.status.initial_cost);
        previous_initial_cost = result.status.initial_cost;

        let end = result.values.pose(&Key::pose(problem.schedule.last_keyframe())).unwrap();
        assert_abs_diff_eq!(end.translation, Vector3::<Float>::zeros(), epsilon = 0.05);
    }
}
