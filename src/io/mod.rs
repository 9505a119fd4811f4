use crate::{float, Float, ImuOdometryError, Result};

pub mod csv_loader;

/**
 * Parses a float that may carry an exponent, e.g. 1.5e-3
 */
pub fn parse_to_float(string: &str, negate_value: bool) -> Result<Float> {
    let factor = match negate_value {
        true => -1.0,
        false => 1.0
    };
    let value = string.trim().parse::<Float>().map_err(|e| ImuOdometryError::Parse(format!("'{}': {}", string, e)))?;
    Ok(factor*value)
}

/**
 * Index of the entry of the sorted list closest to ts, searching forward from start
 */
pub fn closest_ts_index(ts: Float, list: &[Float], start: usize) -> usize {
    let mut min_delta = float::MAX;
    let mut min_idx = list.len().saturating_sub(1);

    for (idx, target_ts) in list.iter().enumerate().skip(start) {
        let delta = (ts-target_ts).abs();

        if delta < min_delta {
            min_delta = delta;
            min_idx = idx;
        } else {
            break;
        }
    }

    min_idx
}
