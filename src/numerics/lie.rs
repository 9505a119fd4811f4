extern crate nalgebra as na;

use na::{Vector,Vector3,Matrix3,Matrix,U3,U1,base::storage::Storage};
use crate::{float,Float};

/// Below this angle the closed forms are replaced by their Taylor expansions.
const SMALL_ANGLE: Float = 1e-8;

pub fn skew_symmetric<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1>  {
    Matrix3::<Float>::new(0.0, -w[2], w[1],
                          w[2], 0.0, -w[0],
                          -w[1], w[0], 0.0)
}

pub fn vector_from_skew_symmetric(w_x: &Matrix3<Float>) -> Vector3<Float> {
    Vector3::<Float>::new(w_x[(2,1)],w_x[(0,2)],w_x[(1,0)])
}

/**
 * Exponential map so(3) -> SO(3) (Rodrigues)
 */
#[allow(non_snake_case)]
pub fn exp_r<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1> {
    let omega = w.norm();
    let w_x = skew_symmetric(w);
    let w_x_sqr = w_x*w_x;
    let I = Matrix3::<Float>::identity();

    if omega < SMALL_ANGLE {
        return I + w_x + 0.5*w_x_sqr;
    }

    let omega_sqr = omega.powi(2);
    let A = omega.sin()/omega;
    let B = (1.0 - omega.cos())/omega_sqr;
    I + A*w_x + B*w_x_sqr
}

/**
 * Logarithm map SO(3) -> so(3), returned as a rotation vector
 */
#[allow(non_snake_case)]
pub fn ln_SO3<T>(R: &Matrix<Float,U3,U3,T>) -> Vector3<Float> where T: Storage<Float,U3,U3> {
    let cos_omega = ((R.trace() - 1.0)/2.0).max(-1.0).min(1.0);
    let omega = cos_omega.acos();
    let antisymmetric = R - R.transpose();

    match omega {
        o if o < SMALL_ANGLE => 0.5*vector_from_skew_symmetric(&antisymmetric),
        o if (float::consts::PI - o) < 1e-6 => {
            // Near pi the antisymmetric part vanishes, the axis comes from the symmetric part
            let B = 0.5*(R.clone_owned() + Matrix3::<Float>::identity());
            let column = (0..3).max_by(|&a,&b| B[(a,a)].partial_cmp(&B[(b,b)]).unwrap_or(std::cmp::Ordering::Equal)).unwrap_or(0);
            let axis = B.column(column).normalize();
            let signed_axis = match axis.dot(&vector_from_skew_symmetric(&antisymmetric)) {
                d if d < 0.0 => -axis,
                _ => axis
            };
            o*signed_axis
        },
        o => {
            let factor = o/(2.0*o.sin());
            factor*vector_from_skew_symmetric(&antisymmetric)
        }
    }
}

#[allow(non_snake_case)]
pub fn right_jacobian<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1> {
    let w_x = skew_symmetric(&w);
    let w_x_sqr = w_x*w_x;
    let w_norm = w.norm();
    let I = Matrix3::<Float>::identity();

    if w_norm < SMALL_ANGLE {
        return I - 0.5*w_x + (1.0/6.0)*w_x_sqr;
    }

    let w_norm_sqrd = w_norm.powi(2);
    let w_norm_cubed = w_norm_sqrd*w_norm;
    let A = (1.0 - w_norm.cos())/(w_norm_sqrd);
    let B = (w_norm - w_norm.sin())/(w_norm_cubed);

    I - A*w_x + B*w_x_sqr
}

#[allow(non_snake_case)]
pub fn right_inverse_jacobian<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1> {
    let w_x = skew_symmetric(&w);
    let w_x_sqr = w_x*w_x;
    let w_norm = w.norm();
    let I = Matrix3::<Float>::identity();

    if w_norm < SMALL_ANGLE {
        return I + 0.5*w_x + (1.0/12.0)*w_x_sqr;
    }

    let w_norm_sqrd = w_norm.powi(2);
    let A = 1.0/w_norm_sqrd;
    let B = (1.0+w_norm.cos())/(2.0*w_norm*w_norm.sin());

    I + 0.5*w_x + (A-B)*w_x_sqr
}

/**
 * 3D Rotations - Kanatani p.35
 */
pub fn optimal_correction_of_rotation(rotation: &Matrix3<Float>) -> Matrix3<Float> {
    let svd = rotation.svd(true,true);
    match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => {
            let det = (u*v_t).determinant();
            u*Matrix3::<Float>::from_diagonal(&Vector3::<Float>::new(1.0,1.0,det))*v_t
        },
        _ => *rotation
    }
}
