use std::collections::BTreeSet;

use crate::{Float, ImuOdometryError, Result};

pub mod key;
pub mod values;
pub mod noise;
pub mod factors;

pub use key::{Key,KeyKind};

use factors::{Factor, LinearizedFactor};
use values::Values;

/**
 * Collection of factors over symbolic keys. The graph does not own any estimate.
 */
#[derive(Default)]
pub struct FactorGraph {
    factors: Vec<Box<dyn Factor>>
}

impl FactorGraph {
    pub fn new() -> FactorGraph {
        FactorGraph {factors: Vec::new()}
    }

    pub fn push(&mut self, factor: Box<dyn Factor>) -> () {
        self.factors.push(factor);
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factors(&self) -> &Vec<Box<dyn Factor>> {
        &self.factors
    }

    /// Factors of concrete type T, in insertion order
    pub fn factors_of<T: 'static>(&self) -> impl Iterator<Item = &T> {
        self.factors.iter().filter_map(|f| f.as_any().downcast_ref::<T>())
    }

    pub fn keys(&self) -> BTreeSet<Key> {
        self.factors.iter().flat_map(|f| f.keys().iter().copied()).collect()
    }

    /**
     * Every key referenced by a factor has to have an initial value
     */
    pub fn check_initial_values(&self, values: &Values) -> Result<()> {
        match self.keys().into_iter().find(|k| !values.contains(k)) {
            Some(key) => Err(ImuOdometryError::MissingInitialValue(key)),
            None => Ok(())
        }
    }

    pub fn linearize(&self, values: &Values) -> Result<Vec<LinearizedFactor>> {
        self.factors.iter().map(|f| f.linearize(values)).collect()
    }

    /// Sum of squared whitened residuals
    pub fn cost(&self, values: &Values) -> Result<Float> {
        self.factors.iter().try_fold(0.0, |acc, f| Ok(acc + f.cost(values)?))
    }
}
