use log::debug;

use crate::io::closest_ts_index;
use crate::sensors::MeasurementsSource;
use crate::{Float, ImuOdometryError, Result};

/**
 * IMU samples start..end (exclusive) are preintegrated into one motion factor between keyframes start and end
 */
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct KeyframePair {
    pub start: usize,
    pub end: usize
}

impl KeyframePair {
    pub fn sample_count(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/**
 * Keyframe indices into the IMU stream and the per sample integration intervals
 */
#[derive(Debug,Clone)]
pub struct KeyframeSchedule {
    dt: Vec<Float>,
    keyframes: Vec<usize>,
    pairs: Vec<KeyframePair>
}

impl KeyframeSchedule {
    /**
     * Maps every reference timestamp to its nearest IMU sample and keeps every stride-th of them.
     * The first and last IMU samples are always keyframes.
     */
    pub fn build_steps<S>(source: &S, stride: usize) -> Result<KeyframeSchedule> where S: MeasurementsSource + ?Sized {
        if stride == 0 {
            return Err(ImuOdometryError::Config(String::from("keyframe stride has to be at least 1")));
        }

        let imu_count = source.imu_count();
        if imu_count < 2 {
            return Err(ImuOdometryError::Alignment(format!("need at least two IMU samples, got {}", imu_count)));
        }

        let imu_ts = (0..imu_count).map(|i| source.timestamp_imu(i)).collect::<Vec<Float>>();
        if let Some(i) = (1..imu_count).find(|&i| !(imu_ts[i] > imu_ts[i-1])) {
            return Err(ImuOdometryError::Alignment(format!("IMU timestamps are not strictly increasing at sample {}: {} -> {}", i, imu_ts[i-1], imu_ts[i])));
        }

        let first_ts = imu_ts[0];
        let last_ts = imu_ts[imu_count-1];
        let mut reference_indices = Vec::<usize>::with_capacity(source.reference_count());
        let mut cursor = 0;
        let mut previous_ts = Float::NEG_INFINITY;
        for j in 0..source.reference_count() {
            let ts = source.timestamp_reference(j);
            if ts < first_ts || ts > last_ts {
                return Err(ImuOdometryError::Alignment(format!("reference timestamp {} is outside of the IMU range [{}, {}]", ts, first_ts, last_ts)));
            }
            if ts < previous_ts {
                return Err(ImuOdometryError::Alignment(format!("reference timestamps are not sorted at index {}", j)));
            }
            cursor = closest_ts_index(ts, &imu_ts, cursor);
            reference_indices.push(cursor);
            previous_ts = ts;
        }

        let mut keyframes = reference_indices.into_iter().step_by(stride).collect::<Vec<usize>>();
        if keyframes.first() != Some(&0) {
            keyframes.insert(0, 0);
        }
        if keyframes.last() != Some(&(imu_count-1)) {
            keyframes.push(imu_count-1);
        }

        let dt = (0..imu_count).map(|i| source.dt_imu(i)).collect::<Vec<Float>>();
        let schedule = KeyframeSchedule::from_indices(dt, keyframes)?;
        debug!("Keyframe schedule: {} samples, {} keyframes, stride {}", imu_count, schedule.keyframes.len(), stride);
        Ok(schedule)
    }

    /**
     * Fails if fewer than two keyframes remain or a pair covers no samples
     */
    pub fn from_indices(dt: Vec<Float>, keyframes: Vec<usize>) -> Result<KeyframeSchedule> {
        if keyframes.len() < 2 {
            return Err(ImuOdometryError::Alignment(format!("need at least two keyframes, got {}", keyframes.len())));
        }
        if let Some(&last) = keyframes.last() {
            if last >= dt.len() {
                return Err(ImuOdometryError::Alignment(format!("keyframe {} is past the last IMU sample {}", last, dt.len().saturating_sub(1))));
            }
        }

        let pairs = keyframes.windows(2).map(|w| KeyframePair {start: w[0], end: w[1]}).collect::<Vec<KeyframePair>>();
        if let Some(pair) = pairs.iter().find(|p| p.start >= p.end) {
            return Err(ImuOdometryError::DegenerateWindow {start: pair.start, end: pair.end});
        }

        Ok(KeyframeSchedule {dt, keyframes, pairs})
    }

    pub fn dt(&self) -> &Vec<Float> {
        &self.dt
    }

    pub fn keyframes(&self) -> &Vec<usize> {
        &self.keyframes
    }

    pub fn pairs(&self) -> &Vec<KeyframePair> {
        &self.pairs
    }

    pub fn is_keyframe(&self, index: usize) -> bool {
        self.keyframes.binary_search(&index).is_ok()
    }

    pub fn first_keyframe(&self) -> usize {
        self.keyframes[0]
    }

    pub fn last_keyframe(&self) -> usize {
        self.keyframes[self.keyframes.len()-1]
    }

    pub fn imu_count(&self) -> usize {
        self.dt.len()
    }
}
