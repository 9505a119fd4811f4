extern crate nalgebra as na;

use na::{DVector,DVectorView,Vector3,Vector6};
use std::collections::BTreeMap;

use crate::factor_graph::{Key, KeyKind};
use crate::numerics::pose::Pose;
use crate::odometry::imu_odometry::bias::ImuBias;
use crate::{Float, ImuOdometryError, Result};

/// A single unknown of the optimization problem
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum Variable {
    Pose(Pose),
    Point(Vector3<Float>),
    Bias(ImuBias)
}

impl Variable {
    pub fn dim(&self) -> usize {
        match self {
            Variable::Pose(_) => 6,
            Variable::Point(_) => 3,
            Variable::Bias(_) => 6
        }
    }

    /**
     * Applies a tangent space update. delta has to be of length dim()
     */
    pub fn retract(&self, delta: &DVectorView<Float>) -> Variable {
        match self {
            Variable::Pose(pose) => Variable::Pose(pose.retract(&Vector6::<Float>::from_iterator(delta.iter().copied()))),
            Variable::Point(point) => Variable::Point(point + Vector3::<Float>::from_iterator(delta.iter().copied())),
            Variable::Bias(bias) => Variable::Bias(bias.add_pertb(&Vector6::<Float>::from_iterator(delta.iter().copied())))
        }
    }

    fn matches(&self, kind: KeyKind) -> bool {
        match (self, kind) {
            (Variable::Pose(_), KeyKind::Pose) | (Variable::Pose(_), KeyKind::CameraExtrinsic) => true,
            (Variable::Point(_), KeyKind::Velocity) | (Variable::Point(_), KeyKind::Landmark) => true,
            (Variable::Bias(_), KeyKind::Bias) => true,
            _ => false
        }
    }
}

/**
 * Current estimate of every unknown, ordered by key
 */
#[derive(Debug,Clone,Default)]
pub struct Values {
    values: BTreeMap<Key,Variable>
}

impl Values {
    pub fn new() -> Values {
        Values {values: BTreeMap::new()}
    }

    /**
     * Returns the previous variable if the key was already present
     */
    pub fn insert(&mut self, key: Key, variable: Variable) -> Result<Option<Variable>> {
        if !variable.matches(key.kind) {
            return Err(ImuOdometryError::VariableTypeMismatch(key));
        }
        Ok(self.values.insert(key, variable))
    }

    pub fn insert_pose(&mut self, key: Key, pose: Pose) -> Result<Option<Variable>> {
        self.insert(key, Variable::Pose(pose))
    }

    pub fn insert_point(&mut self, key: Key, point: Vector3<Float>) -> Result<Option<Variable>> {
        self.insert(key, Variable::Point(point))
    }

    pub fn insert_bias(&mut self, key: Key, bias: ImuBias) -> Result<Option<Variable>> {
        self.insert(key, Variable::Bias(bias))
    }

    pub fn get(&self, key: &Key) -> Option<&Variable> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.values.contains_key(key)
    }

    pub fn pose(&self, key: &Key) -> Result<&Pose> {
        match self.values.get(key) {
            Some(Variable::Pose(pose)) => Ok(pose),
            Some(_) => Err(ImuOdometryError::VariableTypeMismatch(*key)),
            None => Err(ImuOdometryError::MissingInitialValue(*key))
        }
    }

    pub fn point(&self, key: &Key) -> Result<&Vector3<Float>> {
        match self.values.get(key) {
            Some(Variable::Point(point)) => Ok(point),
            Some(_) => Err(ImuOdometryError::VariableTypeMismatch(*key)),
            None => Err(ImuOdometryError::MissingInitialValue(*key))
        }
    }

    pub fn velocity(&self, key: &Key) -> Result<&Vector3<Float>> {
        self.point(key)
    }

    pub fn bias(&self, key: &Key) -> Result<&ImuBias> {
        match self.values.get(key) {
            Some(Variable::Bias(bias)) => Ok(bias),
            Some(_) => Err(ImuOdometryError::VariableTypeMismatch(*key)),
            None => Err(ImuOdometryError::MissingInitialValue(*key))
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Variable)> {
        self.values.iter()
    }

    /// Norm of the stacked variables, each taken as its tangent vector at the identity
    pub fn norm(&self) -> Float {
        self.values.values().map(|variable| match variable {
            Variable::Pose(pose) => Pose::identity().local(pose).norm_squared(),
            Variable::Point(point) => point.norm_squared(),
            Variable::Bias(bias) => bias.to_vector().norm_squared()
        }).sum::<Float>().sqrt()
    }

    /**
     * Copies the variables of the given keys. Missing keys are an error.
     */
    pub fn subset(&self, keys: &[Key]) -> Result<Values> {
        let mut values = BTreeMap::new();
        for key in keys {
            let variable = self.values.get(key).ok_or(ImuOdometryError::MissingInitialValue(*key))?;
            values.insert(*key, *variable);
        }
        Ok(Values {values})
    }

    pub fn retract_variable(&mut self, key: &Key, delta: &DVectorView<Float>) -> Result<()> {
        match self.values.get_mut(key) {
            Some(variable) => {
                *variable = variable.retract(delta);
                Ok(())
            },
            None => Err(ImuOdometryError::MissingInitialValue(*key))
        }
    }

    /**
     * Applies a stacked update laid out by the ordering
     */
    pub fn retract(&self, delta: &DVector<Float>, ordering: &Ordering) -> Values {
        let values = self.values.iter().map(|(key, variable)| {
            let updated = match ordering.offset(key) {
                Some(offset) => variable.retract(&delta.rows(offset, variable.dim())),
                None => *variable
            };
            (*key, updated)
        }).collect::<BTreeMap<Key,Variable>>();
        Values {values}
    }
}

/**
 * Column layout of the stacked tangent space
 */
#[derive(Debug,Clone)]
pub struct Ordering {
    offsets: BTreeMap<Key,usize>,
    dim: usize
}

impl Ordering {
    pub fn from_values(values: &Values) -> Ordering {
        let mut offsets = BTreeMap::new();
        let mut dim = 0;
        for (key, variable) in values.iter() {
            offsets.insert(*key, dim);
            dim += variable.dim();
        }
        Ordering {offsets, dim}
    }

    /**
     * Layout restricted to the given keys. Variables outside of it are left untouched by retract.
     */
    pub fn from_keys<'a, I>(values: &Values, keys: I) -> Result<Ordering> where I: IntoIterator<Item = &'a Key> {
        let mut offsets = BTreeMap::new();
        let mut dim = 0;
        for key in keys {
            let variable = values.get(key).ok_or(ImuOdometryError::MissingInitialValue(*key))?;
            offsets.insert(*key, dim);
            dim += variable.dim();
        }
        Ok(Ordering {offsets, dim})
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.offsets.keys()
    }

    pub fn offset(&self, key: &Key) -> Option<usize> {
        self.offsets.get(key).copied()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_variable() {
        let mut values = Values::new();
        let result = values.insert_bias(Key::pose(0), ImuBias::zeros());
        assert!(matches!(result, Err(ImuOdometryError::VariableTypeMismatch(_))));
    }

    #[test]
    fn ordering_follows_key_order() {
        let mut values = Values::new();
        values.insert_point(Key::velocity(4), Vector3::<Float>::zeros()).unwrap();
        values.insert_pose(Key::pose(4), Pose::identity()).unwrap();
        values.insert_bias(Key::bias(0), ImuBias::zeros()).unwrap();

        let ordering = Ordering::from_values(&values);
        assert_eq!(ordering.dim(), 15);
        assert_eq!(ordering.offset(&Key::pose(4)), Some(0));
        assert_eq!(ordering.offset(&Key::velocity(4)), Some(6));
        assert_eq!(ordering.offset(&Key::bias(0)), Some(9));
    }

    #[test]
    fn retract_skips_keys_outside_ordering() {
        let mut values = Values::new();
        values.insert_point(Key::velocity(0), Vector3::<Float>::zeros()).unwrap();
        values.insert_point(Key::landmark(0), Vector3::<Float>::zeros()).unwrap();
        let ordering = Ordering::from_keys(&values, &[Key::velocity(0)]).unwrap();
        let moved = values.retract(&DVector::<Float>::from_element(3, 1.0), &ordering);
        assert_eq!(*moved.point(&Key::velocity(0)).unwrap(), Vector3::<Float>::from_element(1.0));
        assert_eq!(*moved.point(&Key::landmark(0)).unwrap(), Vector3::<Float>::zeros());
    }
}
