extern crate nalgebra as na;
extern crate rand_distr;

use na::{Vector3,Matrix3};
use rand::{SeedableRng,rngs::SmallRng};
use rand_distr::{Normal,Distribution};

use crate::{float, Float, ImuOdometryError, Result};
use crate::numerics::{lie::exp_r, pose::Pose};
use crate::odometry::imu_odometry::nav_state::NavState;
use crate::sensors::imu::{ImuSample, imu_data_frame::ImuDataFrame};

/**
 * Ground truth of a trajectory at time t. Acceleration is in the world frame, angular velocity in the body frame.
 */
#[derive(Debug,Copy,Clone)]
pub struct TrajectorySample {
    pub rotation: Matrix3<Float>,
    pub position: Vector3<Float>,
    pub velocity: Vector3<Float>,
    pub acceleration: Vector3<Float>,
    pub angular_velocity: Vector3<Float>
}

impl TrajectorySample {
    pub fn nav_state(&self) -> NavState {
        NavState::new(Pose::new(self.rotation, self.position), self.velocity)
    }
}

#[derive(Debug,Copy,Clone)]
pub struct SyntheticNoise {
    pub accelerometer_sigma: Float,
    pub gyroscope_sigma: Float,
    pub seed: u64
}

#[derive(Debug,Copy,Clone)]
pub struct SyntheticParameters {
    pub imu_rate: Float,
    pub reference_rate: Float,
    pub duration: Float,
    pub gravity_magnitude: Float,
    pub noise: Option<SyntheticNoise>
}

impl Default for SyntheticParameters {
    fn default() -> Self {
        SyntheticParameters {
            imu_rate: 200.0,
            reference_rate: 20.0,
            duration: 2.0,
            gravity_magnitude: 9.81,
            noise: None
        }
    }
}

pub struct SyntheticSequence {
    pub data: ImuDataFrame,
    /// Ground truth at every reference timestamp
    pub ground_truth: Vec<NavState>
}

/**
 * Samples specific force and angular rate of a trajectory. Gravity points along -Z in the world frame.
 */
pub fn generate<F>(parameters: &SyntheticParameters, trajectory: F) -> Result<SyntheticSequence> where F: Fn(Float) -> TrajectorySample {
    let imu_count = (parameters.duration*parameters.imu_rate).round() as usize + 1;
    let reference_count = (parameters.duration*parameters.reference_rate + 1e-9).floor() as usize + 1;
    let gravity = Vector3::<Float>::new(0.0, 0.0, -parameters.gravity_magnitude);

    let mut noise = match parameters.noise {
        Some(n) => {
            let acc = Normal::new(0.0, n.accelerometer_sigma).map_err(|e| ImuOdometryError::Config(e.to_string()))?;
            let gyro = Normal::new(0.0, n.gyroscope_sigma).map_err(|e| ImuOdometryError::Config(e.to_string()))?;
            Some((SmallRng::seed_from_u64(n.seed), acc, gyro))
        },
        None => None
    };

    let mut samples = Vec::<ImuSample>::with_capacity(imu_count);
    for i in 0..imu_count {
        let t = i as Float/parameters.imu_rate;
        let state = trajectory(t);
        let mut accelerometer = state.rotation.transpose()*(state.acceleration - gravity);
        let mut gyroscope = state.angular_velocity;
        if let Some((rng, acc, gyro)) = noise.as_mut() {
            accelerometer += Vector3::<Float>::from_fn(|_,_| acc.sample(rng));
            gyroscope += Vector3::<Float>::from_fn(|_,_| gyro.sample(rng));
        }
        samples.push(ImuSample::new(t, accelerometer, gyroscope));
    }

    let last_ts = samples.last().map_or(0.0, |s| s.timestamp);
    let reference_ts = (0..reference_count).map(|j| (j as Float/parameters.reference_rate).min(last_ts)).collect::<Vec<Float>>();
    let ground_truth = reference_ts.iter().map(|&t| trajectory(t).nav_state()).collect::<Vec<NavState>>();

    Ok(SyntheticSequence {data: ImuDataFrame::new(samples, reference_ts), ground_truth})
}

pub fn stationary() -> impl Fn(Float) -> TrajectorySample {
    |_: Float| TrajectorySample {
        rotation: Matrix3::<Float>::identity(),
        position: Vector3::<Float>::zeros(),
        velocity: Vector3::<Float>::zeros(),
        acceleration: Vector3::<Float>::zeros(),
        angular_velocity: Vector3::<Float>::zeros()
    }
}

/**
 * Constant world acceleration until switch_time, then constant velocity. The body does not rotate.
 */
pub fn constant_acceleration_then_coast(acceleration: Vector3<Float>, switch_time: Float) -> impl Fn(Float) -> TrajectorySample {
    move |t: Float| {
        let (position, velocity, current_acceleration) = match t {
            t if t < switch_time => (0.5*acceleration*t*t, acceleration*t, acceleration),
            t => {
                let switch_velocity = acceleration*switch_time;
                (0.5*acceleration*switch_time*switch_time + switch_velocity*(t - switch_time), switch_velocity, Vector3::<Float>::zeros())
            }
        };
        TrajectorySample {
            rotation: Matrix3::<Float>::identity(),
            position,
            velocity,
            acceleration: current_acceleration,
            angular_velocity: Vector3::<Float>::zeros()
        }
    }
}

/**
 * Constant body rate about a fixed axis, no translation
 */
pub fn constant_rotation(angular_velocity: Vector3<Float>) -> impl Fn(Float) -> TrajectorySample {
    move |t: Float| TrajectorySample {
        rotation: exp_r(&(angular_velocity*t)),
        position: Vector3::<Float>::zeros(),
        velocity: Vector3::<Float>::zeros(),
        acceleration: Vector3::<Float>::zeros(),
        angular_velocity
    }
}

/**
 * One horizontal lap of a circle of the given radius, starting and ending at rest at the origin.
 * The heading follows the direction of travel.
 */
pub fn closed_circle(radius: Float, period: Float) -> impl Fn(Float) -> TrajectorySample {
    let two_pi = 2.0*float::consts::PI;
    move |t: Float| {
        let s = (t/period).min(1.0);
        let theta = two_pi*s - (two_pi*s).sin();
        let theta_dot = (two_pi/period)*(1.0 - (two_pi*s).cos());
        let theta_ddot = (two_pi/period).powi(2)*(two_pi*s).sin();
        let (sin, cos) = theta.sin_cos();

        TrajectorySample {
            rotation: exp_r(&Vector3::<Float>::new(0.0, 0.0, theta)),
            position: radius*Vector3::<Float>::new(sin, 1.0 - cos, 0.0),
            velocity: radius*theta_dot*Vector3::<Float>::new(cos, sin, 0.0),
            acceleration: radius*theta_ddot*Vector3::<Float>::new(cos, sin, 0.0) + radius*theta_dot.powi(2)*Vector3::<Float>::new(-sin, cos, 0.0),
            angular_velocity: Vector3::<Float>::new(0.0, 0.0, theta_dot)
        }
    }
}
