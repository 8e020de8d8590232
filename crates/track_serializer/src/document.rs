//! Typed training-log document.
//!
//! Mirrors the fixed TCX v2 subset the merge emits. Optional fields are
//! plain `Option`s; rendering decides presence from them alone.

use chrono::{DateTime, Utc};
use contracts::{MergedTrack, UnifiedPoint};

/// TCX v2 namespace
pub const TCX_NAMESPACE: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";

/// Root document (one activity)
#[derive(Debug, Clone, PartialEq)]
pub struct TcxDocument {
    pub activity: TcxActivity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TcxActivity {
    /// Sport attribute, copied verbatim from the track
    pub sport: String,
    /// Synthetic id: the time the merge was performed
    pub id: DateTime<Utc>,
    pub lap: TcxLap,
}

/// Single lap spanning the whole merged track
#[derive(Debug, Clone, PartialEq)]
pub struct TcxLap {
    pub start_time: DateTime<Utc>,
    pub total_time_seconds: u64,
    pub distance_meters: f64,
    pub trackpoints: Vec<Trackpoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trackpoint {
    pub time: DateTime<Utc>,
    pub position: Option<Position>,
    pub altitude_meters: Option<f64>,
    pub distance_meters: Option<f64>,
    pub heart_rate_bpm: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude_degrees: f64,
    pub longitude_degrees: f64,
}

impl TcxDocument {
    /// Build the document for `track`, stamped at `now`
    ///
    /// Trackpoints keep the track's order. An empty track gets a lap
    /// starting at `now`.
    pub fn from_track(track: &MergedTrack, now: DateTime<Utc>) -> Self {
        let trackpoints: Vec<Trackpoint> = track.points.iter().map(Trackpoint::from).collect();

        Self {
            activity: TcxActivity {
                sport: track.sport.clone(),
                id: now,
                lap: TcxLap {
                    start_time: track.start_time().unwrap_or(now),
                    total_time_seconds: track.total_elapsed_time,
                    distance_meters: track.total_distance,
                    trackpoints,
                },
            },
        }
    }
}

impl From<&UnifiedPoint> for Trackpoint {
    // Cadence and power have no element in this document
    fn from(point: &UnifiedPoint) -> Self {
        Self {
            time: point.time,
            position: point.position().map(|(lat, lon)| Position {
                latitude_degrees: lat,
                longitude_degrees: lon,
            }),
            altitude_meters: point.altitude,
            distance_meters: point.distance,
            heart_rate_bpm: point.heart_rate,
        }
    }
}
