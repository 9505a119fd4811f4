pub mod error;
pub mod factor_graph;
pub mod io;
pub mod numerics;
pub mod odometry;
pub mod sensors;

pub use error::ImuOdometryError;

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f64);

pub type Result<T> = std::result::Result<T, ImuOdometryError>;
