extern crate nalgebra as na;

use na::{Vector3,Matrix3};
use std::fmt;

use crate::Float;
use crate::numerics::pose::Pose;

/**
 * Pose and velocity at a keyframe, both expressed in the world frame
 */
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct NavState {
    pub pose: Pose,
    pub velocity: Vector3<Float>
}

impl NavState {
    pub fn new(pose: Pose, velocity: Vector3<Float>) -> NavState {
        NavState {pose, velocity}
    }

    pub fn identity() -> NavState {
        NavState::new(Pose::identity(), Vector3::<Float>::zeros())
    }

    pub fn rotation(&self) -> &Matrix3<Float> {
        &self.pose.rotation
    }

    pub fn position(&self) -> &Vector3<Float> {
        &self.pose.translation
    }
}

impl Default for NavState {
    fn default() -> Self {
        NavState::identity()
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, v: [{:.6}, {:.6}, {:.6}]", self.pose, self.velocity[0], self.velocity[1], self.velocity[2])
    }
}
