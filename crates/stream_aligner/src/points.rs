//! Per-activity point construction.

use chrono::{DateTime, TimeDelta, Utc};
use contracts::{MergeError, StreamSet, UnifiedPoint};

/// Absolute timestamp of a sample `offset_s` seconds after `start`
///
/// Sub-second offsets are kept to millisecond precision.
///
/// # Errors
/// `Decode` for a non-finite offset or one that leaves the representable
/// time range.
pub fn sample_time(start: DateTime<Utc>, offset_s: f64) -> Result<DateTime<Utc>, MergeError> {
    let out_of_range = || MergeError::Decode {
        message: format!("time offset {offset_s} s is out of range"),
    };
    if !offset_s.is_finite() {
        return Err(out_of_range());
    }

    let millis = (offset_s * 1000.0).round();
    if millis.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    TimeDelta::try_milliseconds(millis as i64)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(out_of_range)
}

/// Build one point per entry of the time channel
///
/// Every other channel is sampled by position and yields `None` past its own
/// length. An empty time channel yields no points.
///
/// # Errors
/// `Decode` when a time offset cannot be turned into a timestamp.
pub fn build_points(
    start: DateTime<Utc>,
    streams: &StreamSet,
) -> Result<Vec<UnifiedPoint>, MergeError> {
    streams
        .time
        .iter()
        .enumerate()
        .map(|(i, &offset)| {
            let position = streams.latlng.get(i);
            Ok(UnifiedPoint {
                time: sample_time(start, offset)?,
                latitude: position.map(|p| p[0]),
                longitude: position.map(|p| p[1]),
                distance: streams.distance.get(i).copied(),
                altitude: streams.altitude.get(i).copied(),
                heart_rate: streams.heartrate.get(i).copied(),
                cadence: streams.cadence.get(i).copied(),
                power: streams.watts.get(i).copied(),
            })
        })
        .collect()
}
