use std::fmt;

/// Kind of unknown a key refers to
#[derive(Debug,Copy,Clone,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub enum KeyKind {
    Pose,
    Velocity,
    Bias,
    Landmark,
    CameraExtrinsic
}

impl KeyKind {
    pub fn letter(&self) -> char {
        match self {
            KeyKind::Pose => 'x',
            KeyKind::Velocity => 'v',
            KeyKind::Bias => 'b',
            KeyKind::Landmark => 'l',
            KeyKind::CameraExtrinsic => 'r'
        }
    }
}

/**
 * Symbolic variable name, e.g. x12 for the pose at sample 12
 */
#[derive(Debug,Copy,Clone,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct Key {
    pub kind: KeyKind,
    pub index: usize
}

impl Key {
    pub fn new(kind: KeyKind, index: usize) -> Key {
        Key {kind, index}
    }

    pub fn pose(index: usize) -> Key {
        Key::new(KeyKind::Pose, index)
    }

    pub fn velocity(index: usize) -> Key {
        Key::new(KeyKind::Velocity, index)
    }

    pub fn bias(index: usize) -> Key {
        Key::new(KeyKind::Bias, index)
    }

    pub fn landmark(index: usize) -> Key {
        Key::new(KeyKind::Landmark, index)
    }

    pub fn camera_extrinsic(index: usize) -> Key {
        Key::new(KeyKind::CameraExtrinsic, index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.kind.letter(), self.index)
    }
}
