extern crate nalgebra as na;

use log::info;
use na::Vector3;
use serde::{Serialize, Deserialize};
use std::fs::File;
use std::io::{BufRead,BufReader};
use std::path::Path;

use crate::io::parse_to_float;
use crate::sensors::imu::imu_data_frame::ImuDataFrame;
use crate::{Float, ImuOdometryError, Result};

/**
 * Layout of a dataset directory. Timestamps are multiplied by timestamp_scale, e.g. 1e-9 for nanoseconds.
 */
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct CsvLoadingParameters {
    pub imu_file: String,
    pub frames_file: String,
    pub timestamp_scale: Float
}

impl Default for CsvLoadingParameters {
    fn default() -> Self {
        CsvLoadingParameters {
            imu_file: String::from("imu.csv"),
            frames_file: String::from("frames.csv"),
            timestamp_scale: 1.0
        }
    }
}

/**
 * imu.csv rows are: timestamp, ax, ay, az, gx, gy, gz. frames.csv holds one reference timestamp per row in its first column.
 */
pub fn load(root_path: &Path, parameters: &CsvLoadingParameters) -> Result<ImuDataFrame> {
    let (imu_ts, acceleration, gyro) = load_imu(&root_path.join(&parameters.imu_file), parameters.timestamp_scale)?;
    let reference_ts = load_reference_timestamps(&root_path.join(&parameters.frames_file), parameters.timestamp_scale)?;
    info!("Loaded {} IMU samples and {} reference timestamps from {}", imu_ts.len(), reference_ts.len(), root_path.display());
    Ok(ImuDataFrame::from_data(&imu_ts, &acceleration, &gyro, reference_ts))
}

pub fn load_imu(file_path: &Path, timestamp_scale: Float) -> Result<(Vec<Float>, Vec<Vector3<Float>>, Vec<Vector3<Float>>)> {
    let mut imu_ts = Vec::<Float>::new();
    let mut acceleration = Vec::<Vector3<Float>>::new();
    let mut gyro = Vec::<Vector3<Float>>::new();

    for (line_number, values) in data_rows(file_path)? {
        if values.len() < 7 {
            return Err(ImuOdometryError::Parse(format!("{}:{}: expected 7 columns, got {}", file_path.display(), line_number, values.len())));
        }
        imu_ts.push(values[0]*timestamp_scale);
        acceleration.push(Vector3::<Float>::new(values[1], values[2], values[3]));
        gyro.push(Vector3::<Float>::new(values[4], values[5], values[6]));
    }

    Ok((imu_ts, acceleration, gyro))
}

pub fn load_reference_timestamps(file_path: &Path, timestamp_scale: Float) -> Result<Vec<Float>> {
    Ok(data_rows(file_path)?.into_iter().map(|(_, values)| values[0]*timestamp_scale).collect())
}

/**
 * Numeric rows with their line numbers. Empty lines, comments and headers are skipped.
 */
fn data_rows(file_path: &Path) -> Result<Vec<(usize, Vec<Float>)>> {
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    let mut rows = Vec::<(usize, Vec<Float>)>::new();

    for (idx, line) in reader.lines().enumerate() {
        let contents = line?;
        let fields = contents.trim().split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()).collect::<Vec<&str>>();
        let is_data = match fields.first() {
            Some(first) => !first.starts_with('#') && first.parse::<Float>().is_ok(),
            None => false
        };
        if !is_data {
            continue;
        }
        let values = fields.iter().map(|f| parse_to_float(f, false)).collect::<Result<Vec<Float>>>()
            .map_err(|e| ImuOdometryError::Parse(format!("{}:{}: {}", file_path.display(), idx+1, e)))?;
        rows.push((idx+1, values));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::MeasurementsSource;
    use std::fs;

    fn write_dataset(name: &str, imu: &str, frames: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("inertial_odometry_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("imu.csv"), imu).unwrap();
        fs::write(dir.join("frames.csv"), frames).unwrap();
        dir
    }

    #[test]
    fn loads_and_scales() {
        let dir = write_dataset("scale",
            "#timestamp [ns],ax,ay,az,gx,gy,gz\n1000000000,0,0,9.81,0,0,0.1\n1005000000, 0.1, 0, 9.81, 0, 0, 0.1\n",
            "timestamp\n1000000000\n1005000000\n");
        let parameters = CsvLoadingParameters {timestamp_scale: 1e-9, ..CsvLoadingParameters::default()};
        let data = load(&dir, &parameters).unwrap();
        assert_eq!(data.imu_count(), 2);
        assert_eq!(data.reference_count(), 2);
        assert!((data.dt_imu(0) - 0.005).abs() < 1e-12);
        assert_eq!(data.accelerometer_at(1), Vector3::<Float>::new(0.1, 0.0, 9.81));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn short_rows_are_rejected() {
        let dir = write_dataset("short", "0,0,0,9.81\n", "0\n");
        let result = load(&dir, &CsvLoadingParameters::default());
        assert!(matches!(result, Err(ImuOdometryError::Parse(_))));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_directory_is_io_error() {
        let result = load(Path::new("/nonexistent/dataset"), &CsvLoadingParameters::default());
        assert!(matches!(result, Err(ImuOdometryError::Io(_))));
    }
}
