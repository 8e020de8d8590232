//! StreamSet - Stream fetch output
//!
//! Per-activity sample channels, indexed by sample position.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Latitude / longitude pair (degrees)
pub type LatLng = [f64; 2];

/// Sample channel kinds the remote service can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Offsets from activity start (seconds)
    Time,
    /// Position pairs (degrees)
    Latlng,
    /// Cumulative distance (meters)
    Distance,
    /// Altitude (meters)
    Altitude,
    /// Heart rate (bpm)
    Heartrate,
    /// Cadence (rpm / spm)
    Cadence,
    /// Power (watts)
    Watts,
}

impl ChannelKind {
    /// Every channel, in request order
    pub const ALL: [ChannelKind; 7] = [
        ChannelKind::Time,
        ChannelKind::Latlng,
        ChannelKind::Distance,
        ChannelKind::Altitude,
        ChannelKind::Heartrate,
        ChannelKind::Cadence,
        ChannelKind::Watts,
    ];

    /// Wire name used by the remote API
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Time => "time",
            ChannelKind::Latlng => "latlng",
            ChannelKind::Distance => "distance",
            ChannelKind::Altitude => "altitude",
            ChannelKind::Heartrate => "heartrate",
            ChannelKind::Cadence => "cadence",
            ChannelKind::Watts => "watts",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown channel '{s}'"))
    }
}

/// Activity stream set
///
/// Fixed-shape record with one vector per channel. An absent channel is an
/// empty vector. Channels may have different lengths; nothing here
/// truncates or pads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSet {
    #[serde(default)]
    pub time: Vec<f64>,
    #[serde(default)]
    pub latlng: Vec<LatLng>,
    #[serde(default)]
    pub distance: Vec<f64>,
    #[serde(default)]
    pub altitude: Vec<f64>,
    #[serde(default)]
    pub heartrate: Vec<f64>,
    #[serde(default)]
    pub cadence: Vec<f64>,
    #[serde(default)]
    pub watts: Vec<f64>,
}

impl StreamSet {
    /// Create a stream set with only the time channel populated
    pub fn with_time(time: Vec<f64>) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    pub fn latlng(mut self, values: Vec<LatLng>) -> Self {
        self.latlng = values;
        self
    }

    pub fn distance(mut self, values: Vec<f64>) -> Self {
        self.distance = values;
        self
    }

    pub fn altitude(mut self, values: Vec<f64>) -> Self {
        self.altitude = values;
        self
    }

    pub fn heartrate(mut self, values: Vec<f64>) -> Self {
        self.heartrate = values;
        self
    }

    pub fn cadence(mut self, values: Vec<f64>) -> Self {
        self.cadence = values;
        self
    }

    pub fn watts(mut self, values: Vec<f64>) -> Self {
        self.watts = values;
        self
    }

    /// Number of samples (length of the time channel)
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.time.len()
    }

    /// Length of an individual channel
    pub fn channel_len(&self, kind: ChannelKind) -> usize {
        match kind {
            ChannelKind::Time => self.time.len(),
            ChannelKind::Latlng => self.latlng.len(),
            ChannelKind::Distance => self.distance.len(),
            ChannelKind::Altitude => self.altitude.len(),
            ChannelKind::Heartrate => self.heartrate.len(),
            ChannelKind::Cadence => self.cadence.len(),
            ChannelKind::Watts => self.watts.len(),
        }
    }

    /// Keep only the requested channels, clearing the rest
    pub fn retain(mut self, channels: &[ChannelKind]) -> Self {
        for kind in ChannelKind::ALL {
            if channels.contains(&kind) {
                continue;
            }
            match kind {
                ChannelKind::Time => self.time.clear(),
                ChannelKind::Latlng => self.latlng.clear(),
                ChannelKind::Distance => self.distance.clear(),
                ChannelKind::Altitude => self.altitude.clear(),
                ChannelKind::Heartrate => self.heartrate.clear(),
                ChannelKind::Cadence => self.cadence.clear(),
                ChannelKind::Watts => self.watts.clear(),
            }
        }
        self
    }
}
