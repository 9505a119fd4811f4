use log::info;
use std::collections::BTreeMap;

use crate::factor_graph::{FactorGraph, Key, values::Values};
use crate::numerics::{optimizer::{ConvergenceStatus, gauss_newton::OptimizerGn}, pose::Pose};
use crate::odometry::imu_odometry::{
    bias::ImuBias,
    estimate_initial_orientation,
    graph_builder::{build_factor_graph, BIAS_INDEX},
    imu_config::ImuOdometryConfig,
    initial_values::generate_initial_values,
    nav_state::NavState,
    windowing::KeyframeSchedule
};
use crate::sensors::MeasurementsSource;
use crate::{Float, ImuOdometryError, Result};

/**
 * A factor graph over the keyframes of a sequence together with its dead reckoning initial guess
 */
pub struct ImuProblem {
    pub schedule: KeyframeSchedule,
    pub graph: FactorGraph,
    pub initial_values: Values,
    pub initial_states: BTreeMap<usize,NavState>
}

impl ImuProblem {
    pub fn build<S>(source: &S, initial_state: &NavState, config: &ImuOdometryConfig) -> Result<ImuProblem> where S: MeasurementsSource + ?Sized {
        let schedule = KeyframeSchedule::build_steps(source, config.keyframe_stride)?;
        let graph = build_factor_graph(source, &schedule, initial_state, config)?;
        let (initial_values, initial_states) = generate_initial_values(source, &schedule, initial_state, config)?;
        graph.check_initial_values(&initial_values)?;
        Ok(ImuProblem {schedule, graph, initial_values, initial_states})
    }

    pub fn initial_cost(&self) -> Result<Float> {
        self.graph.cost(&self.initial_values)
    }
}

/**
 * Optimized states per keyframe (IMU sample index), the dead reckoning guess they started from and the solver status
 */
#[derive(Debug,Clone)]
pub struct TrajectoryEstimate {
    pub states: BTreeMap<usize,NavState>,
    pub initial_states: BTreeMap<usize,NavState>,
    pub timestamps: BTreeMap<usize,Float>,
    pub bias: ImuBias,
    pub status: ConvergenceStatus
}

impl TrajectoryEstimate {
    pub fn into_converged(self) -> Result<TrajectoryEstimate> {
        match self.status.converged {
            true => Ok(self),
            false => Err(ImuOdometryError::NonConvergence {iterations: self.status.iterations, final_cost: self.status.final_cost})
        }
    }

    pub fn poses(&self) -> Vec<Pose> {
        self.states.values().map(|s| s.pose).collect()
    }

    pub fn initial_poses(&self) -> Vec<Pose> {
        self.initial_states.values().map(|s| s.pose).collect()
    }
}

/**
 * The initial orientation is leveled from the first accelerometer sample
 */
pub fn initial_state_from_source<S>(source: &S, config: &ImuOdometryConfig) -> NavState where S: MeasurementsSource + ?Sized {
    let orientation = estimate_initial_orientation(&source.accelerometer_at(0));
    NavState::new(Pose::new(orientation, config.initial_position), config.initial_velocity)
}

pub fn run_trajectory<S>(source: &S, config: &ImuOdometryConfig) -> Result<TrajectoryEstimate> where S: MeasurementsSource + ?Sized {
    let initial_state = initial_state_from_source(source, config);
    estimate_trajectory(source, &initial_state, config)
}

pub fn estimate_trajectory<S>(source: &S, initial_state: &NavState, config: &ImuOdometryConfig) -> Result<TrajectoryEstimate> where S: MeasurementsSource + ?Sized {
    info!("Runtime parameters: {}", config.runtime_parameters);
    let problem = ImuProblem::build(source, initial_state, config)?;
    let result = OptimizerGn::new(&problem.graph).optimize(&problem.initial_values, &config.runtime_parameters)?;

    let mut states = BTreeMap::<usize,NavState>::new();
    let mut timestamps = BTreeMap::<usize,Float>::new();
    for &index in problem.schedule.keyframes() {
        let pose = result.values.pose(&Key::pose(index))?;
        let velocity = result.values.velocity(&Key::velocity(index))?;
        states.insert(index, NavState::new(*pose, *velocity));
        timestamps.insert(index, source.timestamp_imu(index));
    }
    let bias = *result.values.bias(&Key::bias(BIAS_INDEX))?;
    info!("Estimated bias: {}", bias);

    Ok(TrajectoryEstimate {
        states,
        initial_states: problem.initial_states,
        timestamps,
        bias,
        status: result.status
    })
}
