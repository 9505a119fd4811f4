use nalgebra as na;

use na::Vector3;
use crate::Float;
use crate::sensors::{MeasurementsSource, imu::ImuSample};

/**
 * In memory measurement sequence
 */
#[derive(Debug,Clone,Default)]
pub struct ImuDataFrame {
    pub samples: Vec<ImuSample>,
    pub reference_ts: Vec<Float>
}

impl ImuDataFrame {
    pub fn new(samples: Vec<ImuSample>, reference_ts: Vec<Float>) -> ImuDataFrame {
        ImuDataFrame {samples, reference_ts}
    }

    pub fn from_data(imu_ts: &Vec<Float>, acceleration_data: &Vec<Vector3<Float>>, gyro_data: &Vec<Vector3<Float>>, reference_ts: Vec<Float>) -> ImuDataFrame {
        assert_eq!(imu_ts.len(), acceleration_data.len());
        assert_eq!(imu_ts.len(), gyro_data.len());
        let samples = imu_ts.iter().zip(acceleration_data.iter()).zip(gyro_data.iter())
            .map(|((&t,&acc),&gyro)| ImuSample::new(t, acc, gyro))
            .collect::<Vec<ImuSample>>();
        ImuDataFrame {samples, reference_ts}
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl MeasurementsSource for ImuDataFrame {
    fn imu_count(&self) -> usize {
        self.samples.len()
    }

    fn reference_count(&self) -> usize {
        self.reference_ts.len()
    }

    fn accelerometer_at(&self, i: usize) -> Vector3<Float> {
        self.samples[i].accelerometer
    }

    fn gyroscope_at(&self, i: usize) -> Vector3<Float> {
        self.samples[i].gyroscope
    }

    fn timestamp_imu(&self, i: usize) -> Float {
        self.samples[i].timestamp
    }

    fn timestamp_reference(&self, j: usize) -> Float {
        self.reference_ts[j]
    }
}
