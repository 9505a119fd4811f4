extern crate nalgebra as na;

use na::{SMatrix,SVector};
use crate::Float;

/// Covariance over [dtheta, dp, dv]
pub type ImuCovariance = SMatrix<Float,9,9>;
/// Residual of a preintegrated motion constraint, ordered [theta, p, v]
pub type ImuResidual = SVector<Float,9>;
/// Discrete noise input [eta_g, eta_a]
pub type ImuNoiseJacobian = SMatrix<Float,9,3>;

pub const ROTATION_OFFSET: usize = 0;
pub const POSITION_OFFSET: usize = 3;
pub const VELOCITY_OFFSET: usize = 6;
