extern crate nalgebra as na;
extern crate nalgebra_sparse;

use log::warn;
use na::{DMatrix,DVector};
use nalgebra_sparse::{CooMatrix,CscMatrix,factorization::CscCholesky};

use crate::factor_graph::{factors::LinearizedFactor, values::Ordering};
use crate::{Float, ImuOdometryError, Result};

/**
 * J^T*J, J^T*r and r^T*r of the whitened system, accumulated block wise
 */
#[derive(Debug,Clone)]
pub struct NormalEquations {
    pub hessian: CooMatrix<Float>,
    pub gradient: DVector<Float>,
    pub diagonal: DVector<Float>,
    pub cost: Float
}

impl NormalEquations {
    pub fn dim(&self) -> usize {
        self.gradient.nrows()
    }
}

/**
 * Factors touching keys outside of the ordering contribute to the cost only
 */
pub fn build_normal_equations(linearized_factors: &[LinearizedFactor], ordering: &Ordering) -> NormalEquations {
    let dim = ordering.dim();
    let mut hessian = CooMatrix::<Float>::zeros(dim, dim);
    let mut gradient = DVector::<Float>::zeros(dim);
    let mut diagonal = DVector::<Float>::zeros(dim);
    let mut cost = 0.0;

    for factor in linearized_factors {
        cost += factor.residual.norm_squared();
        for (key_a, jacobian_a) in factor.keys.iter().zip(factor.jacobians.iter()) {
            let offset_a = match ordering.offset(key_a) {
                Some(o) => o,
                None => continue
            };
            let jacobian_a_t = jacobian_a.transpose();
            let mut gradient_block = gradient.rows_mut(offset_a, jacobian_a.ncols());
            gradient_block += &jacobian_a_t*&factor.residual;

            for (key_b, jacobian_b) in factor.keys.iter().zip(factor.jacobians.iter()) {
                let offset_b = match ordering.offset(key_b) {
                    Some(o) => o,
                    None => continue
                };
                let block = &jacobian_a_t*jacobian_b;
                if offset_a == offset_b {
                    for i in 0..block.nrows() {
                        diagonal[offset_a+i] += block[(i,i)];
                    }
                }
                hessian.push_matrix(offset_a, offset_b, &block);
            }
        }
    }

    NormalEquations {hessian, gradient, diagonal, cost}
}

/**
 * Solves (J^T*J + mu*I)h = -J^T*r. With mu = None the damping is initialized to tau*max(diag(J^T*J)).
 * Returns the step, the gradient, the predicted cost decrease h^T*(mu*h - g) and mu.
 */
#[allow(non_snake_case)]
pub fn gauss_newton_step(normal_equations: &NormalEquations, mu: Option<Float>, tau: Float) -> Result<(DVector<Float>,DVector<Float>,Float,Float)> {
    let g = &normal_equations.gradient;
    let mu_val = match mu {
        None => tau*normal_equations.diagonal.max(),
        Some(v) => v
    };

    let mut A = normal_equations.hessian.clone();
    if mu_val != 0.0 {
        for i in 0..normal_equations.dim() {
            A.push(i, i, mu_val);
        }
    }
    let A_csc = CscMatrix::from(&A);
    let rhs = DMatrix::<Float>::from_column_slice(g.nrows(), 1, (-g).as_slice());

    let h = match CscCholesky::factor(&A_csc) {
        Ok(cholesky) => DVector::<Float>::from_column_slice(cholesky.solve(&rhs).as_slice()),
        Err(e) => {
            warn!("Sparse Cholesky failed: {:?}, falling back to dense LU", e);
            DMatrix::<Float>::from(&A_csc).lu().solve(&(-g)).ok_or(ImuOdometryError::LinearSolve(String::from("Dense LU solve failed, the normal equations are singular")))?
        }
    };

    let gain_ratio_denom = (&h).transpose()*(mu_val*(&h) - g);
    Ok((h, g.clone(), gain_ratio_denom[0], mu_val))
}
