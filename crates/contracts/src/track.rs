//! MergedTrack - Stream Aligner output
//!
//! Unified point sequence plus aggregate metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ActivityId;

/// One instant in the merged timeline
///
/// `time` is always present. Every other field is independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedPoint {
    /// Absolute timestamp
    pub time: DateTime<Utc>,

    /// Latitude (degrees)
    pub latitude: Option<f64>,

    /// Longitude (degrees)
    pub longitude: Option<f64>,

    /// Cumulative distance across the merged track (meters)
    pub distance: Option<f64>,

    /// Altitude (meters)
    pub altitude: Option<f64>,

    /// Heart rate (bpm)
    pub heart_rate: Option<f64>,

    /// Cadence
    pub cadence: Option<f64>,

    /// Power (watts)
    pub power: Option<f64>,
}

impl UnifiedPoint {
    /// Point with only a timestamp
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            time,
            latitude: None,
            longitude: None,
            distance: None,
            altitude: None,
            heart_rate: None,
            cadence: None,
            power: None,
        }
    }

    /// Both coordinates, or nothing
    pub fn position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Merged track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTrack {
    /// Sport / activity type of the first input activity
    pub sport: String,

    /// Sum of the activities' elapsed times (seconds)
    pub total_elapsed_time: u64,

    /// Sum of the activities' reported distances (meters)
    pub total_distance: f64,

    /// Points sorted ascending by time (stable)
    pub points: Vec<UnifiedPoint>,
}

impl MergedTrack {
    /// Timestamp of the first point
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.time)
    }

    /// Timestamp of the last point
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.time)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Per-activity alignment details (for diagnostics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityAlignment {
    /// Source activity
    pub activity_id: ActivityId,

    /// Points contributed (length of the time channel)
    pub points: usize,

    /// Distance offset added to this activity's samples (meters)
    pub offset_m: f64,

    /// Peak native distance of this activity (meters, 0 if none)
    pub peak_m: f64,
}

/// Alignment report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignReport {
    /// One entry per input activity, in input order
    pub activities: Vec<ActivityAlignment>,

    /// Final running distance after the last activity (meters)
    pub cumulative_distance_m: f64,
}

impl AlignReport {
    /// Total points produced
    pub fn total_points(&self) -> usize {
        self.activities.iter().map(|a| a.points).sum()
    }

    /// Activities that contributed no points
    pub fn empty_activities(&self) -> Vec<ActivityId> {
        self.activities
            .iter()
            .filter(|a| a.points == 0)
            .map(|a| a.activity_id)
            .collect()
    }
}
