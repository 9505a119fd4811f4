extern crate nalgebra as na;

use log::warn;
use na::{DMatrix,DVector};

use crate::Float;

/**
 * Gaussian measurement noise. Residuals and jacobians are whitened so that the
 * cost of a factor is the squared norm of its whitened residual.
 */
#[derive(Debug,Clone)]
pub enum NoiseModel {
    Isotropic { dim: usize, sigma: Float },
    Gaussian { sqrt_information: DMatrix<Float> }
}

impl NoiseModel {
    pub fn isotropic(dim: usize, sigma: Float) -> NoiseModel {
        assert!(sigma > 0.0, "isotropic sigma has to be positive");
        NoiseModel::Isotropic {dim, sigma}
    }

    /**
     * W = Σ^-1 = L*L^T, whitening with L^T
     */
    pub fn from_covariance(covariance: &DMatrix<Float>) -> NoiseModel {
        let dim = covariance.nrows();
        let identity = DMatrix::<Float>::identity(dim, dim);
        let weights = match covariance.clone().cholesky() {
            Some(v) => v.inverse(),
            None => {
                warn!("Cholesky failed for covariance, falling back to unit weights");
                identity.clone()
            }
        };
        let sqrt_information = match weights.cholesky() {
            Some(v) => v.l().transpose(),
            None => {
                warn!("Cholesky failed for information matrix, falling back to unit weights");
                identity
            }
        };
        NoiseModel::Gaussian {sqrt_information}
    }

    pub fn dim(&self) -> usize {
        match self {
            NoiseModel::Isotropic {dim, ..} => *dim,
            NoiseModel::Gaussian {sqrt_information} => sqrt_information.nrows()
        }
    }

    pub fn whiten(&self, residual: &DVector<Float>) -> DVector<Float> {
        match self {
            NoiseModel::Isotropic {sigma, ..} => residual/(*sigma),
            NoiseModel::Gaussian {sqrt_information} => sqrt_information*residual
        }
    }

    pub fn whiten_jacobian(&self, jacobian: &DMatrix<Float>) -> DMatrix<Float> {
        match self {
            NoiseModel::Isotropic {sigma, ..} => jacobian/(*sigma),
            NoiseModel::Gaussian {sqrt_information} => sqrt_information*jacobian
        }
    }
}
