extern crate nalgebra as na;

use na::{Vector3,Vector6,Matrix3,Vector,Const,storage::Storage};
use std::fmt;
use crate::numerics::lie::{exp_r,ln_SO3,optimal_correction_of_rotation};
use crate::Float;

/**
 * Rigid body pose (world from body). Tangent vectors are ordered [rotation, translation].
 */
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Pose {
    pub rotation: Matrix3<Float>,
    pub translation: Vector3<Float>
}

impl Pose {
    pub fn identity() -> Pose {
        Pose {rotation: Matrix3::<Float>::identity(), translation: Vector3::<Float>::zeros()}
    }

    pub fn new(rotation: Matrix3<Float>, translation: Vector3<Float>) -> Pose {
        Pose {rotation, translation}
    }

    /**
     * R <- R*Exp(dtheta), p <- p + R*dp
     */
    pub fn retract<S>(&self, delta: &Vector<Float,Const<6>,S>) -> Pose where S: Storage<Float,Const<6>> {
        let rotation = optimal_correction_of_rotation(&(self.rotation*exp_r(&delta.fixed_rows::<3>(0))));
        let translation = self.translation + self.rotation*delta.fixed_rows::<3>(3);
        Pose {rotation, translation}
    }

    /**
     * Inverse of retract: the tangent vector at self that reaches other
     */
    pub fn local(&self, other: &Pose) -> Vector6<Float> {
        let mut delta = Vector6::<Float>::zeros();
        delta.fixed_rows_mut::<3>(0).copy_from(&ln_SO3(&(self.rotation.transpose()*other.rotation)));
        delta.fixed_rows_mut::<3>(3).copy_from(&(self.rotation.transpose()*(other.translation - self.translation)));
        delta
    }

    pub fn compose(&self, other: &Pose) -> Pose {
        Pose {
            rotation: self.rotation*other.rotation,
            translation: self.translation + self.rotation*other.translation
        }
    }

    pub fn inverse(&self) -> Pose {
        let rotation_transpose = self.rotation.transpose();
        Pose {
            rotation: rotation_transpose,
            translation: -(rotation_transpose*self.translation)
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rotation_vector = ln_SO3(&self.rotation);
        write!(f, "rot: [{:.6}, {:.6}, {:.6}], t: [{:.6}, {:.6}, {:.6}]",
            rotation_vector[0],rotation_vector[1],rotation_vector[2],
            self.translation[0],self.translation[1],self.translation[2])
    }
}

pub fn rsme(data: &Vec<Pose>, ground_truth: &Vec<Pose>) -> Float {
    assert_eq!(data.len(), ground_truth.len());
    let norm_sum = data.iter().zip(ground_truth.iter()).fold(0.0, |acc, (x, gt)| acc + (x.translation - gt.translation).norm_squared());
    (norm_sum/(data.len() as Float)).sqrt()
}
