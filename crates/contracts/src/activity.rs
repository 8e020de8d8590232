//! ActivitySummary - Activity lookup output
//!
//! Summary fields the remote service reports for one recorded activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActivityId, StreamSet};

/// Activity summary
///
/// The totals here are the service's source of truth. They are summed into
/// the merged lap as-is, independent of the points actually produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Remote identifier
    pub id: ActivityId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Sport / activity type (e.g. "Run", "Ride")
    #[serde(rename = "type")]
    pub sport_type: String,

    /// Absolute start timestamp (UTC)
    #[serde(rename = "start_date")]
    pub start_time: DateTime<Utc>,

    /// Elapsed time (seconds)
    pub elapsed_time: u64,

    /// Reported distance (meters)
    pub distance: f64,
}

/// One fully fetched activity: summary plus its sample channels.
///
/// Owned by a single merge request.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityInput {
    pub summary: ActivitySummary,
    pub streams: StreamSet,
}

impl ActivityInput {
    /// Pair a summary with its streams
    pub fn new(summary: ActivitySummary, streams: StreamSet) -> Self {
        Self { summary, streams }
    }
}
