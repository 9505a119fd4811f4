extern crate nalgebra as na;

use na::{Vector,Dim,storage::Storage};
use crate::Float;

pub mod lie;
pub mod pose;
pub mod least_squares;
pub mod optimizer;

pub fn max_norm<D,S>(vector: &Vector<Float,D,S>) -> Float where D: Dim, S: Storage<Float,D> {
    vector.iter().fold(0.0,|max,v|
        match v.abs() {
            v_abs if v_abs > max => v_abs,
            _ => max
        }
    )
}
