//! Remote payload decoding
//!
//! Pure functions over response bodies, independent of the HTTP stack.

use std::collections::HashMap;

use contracts::{ActivityId, ActivitySummary, ChannelKind, LatLng, StreamSet};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SourceError};

/// Stream endpoint entry (`key_by_type=true` shape)
#[derive(Debug, Deserialize)]
struct RawStream {
    #[serde(default)]
    data: Value,
}

/// Upload endpoint acknowledgement
#[derive(Debug, Deserialize)]
struct UploadAck {
    id: u64,
}

/// Decode an activity summary
pub fn decode_summary(body: &str) -> Result<ActivitySummary> {
    serde_json::from_str(body).map_err(|e| SourceError::decode("activity summary", e.to_string()))
}

/// Decode an activity list page
pub fn decode_summaries(body: &str) -> Result<Vec<ActivitySummary>> {
    serde_json::from_str(body).map_err(|e| SourceError::decode("activity list", e.to_string()))
}

/// Decode the stream endpoint response into a fixed-shape set
///
/// Unknown stream types are ignored. Missing ones stay empty.
pub fn decode_streams(body: &str) -> Result<StreamSet> {
    let raw: HashMap<String, RawStream> = serde_json::from_str(body)
        .map_err(|e| SourceError::decode("activity streams", e.to_string()))?;

    let mut set = StreamSet::default();
    for (key, stream) in raw {
        let Ok(kind) = key.parse::<ChannelKind>() else {
            tracing::trace!(stream = %key, "Ignoring unrequested stream type");
            continue;
        };
        match kind {
            ChannelKind::Latlng => set.latlng = decode_channel::<LatLng>(kind, stream.data)?,
            ChannelKind::Time => set.time = decode_scalar(kind, stream.data)?,
            ChannelKind::Distance => set.distance = decode_scalar(kind, stream.data)?,
            ChannelKind::Altitude => set.altitude = decode_scalar(kind, stream.data)?,
            ChannelKind::Heartrate => set.heartrate = decode_scalar(kind, stream.data)?,
            ChannelKind::Cadence => set.cadence = decode_scalar(kind, stream.data)?,
            ChannelKind::Watts => set.watts = decode_scalar(kind, stream.data)?,
        }
    }
    Ok(set)
}

/// Decode the stream response, keeping only `channels`
///
/// The service may answer with more stream types than were asked for.
pub fn decode_requested_streams(body: &str, channels: &[ChannelKind]) -> Result<StreamSet> {
    decode_streams(body).map(|set| set.retain(channels))
}

/// Decode the upload acknowledgement
pub fn decode_upload_id(body: &str) -> Result<u64> {
    serde_json::from_str::<UploadAck>(body)
        .map(|ack| ack.id)
        .map_err(|e| SourceError::decode("upload response", e.to_string()))
}

/// Map a non-success HTTP status onto a source error
///
/// `activity` is the id the request was about, if any.
pub fn classify_status(
    activity: Option<ActivityId>,
    endpoint: &str,
    status: u16,
    body: String,
) -> SourceError {
    match (activity, status) {
        (Some(id), 404) => SourceError::NotFound { id },
        (Some(id), 401 | 403) => SourceError::Forbidden {
            id,
            status,
            message: body,
        },
        (None, 401 | 403) => SourceError::CredentialRefused {
            status,
            message: body,
        },
        _ => SourceError::Status {
            endpoint: endpoint.to_string(),
            status,
            body,
        },
    }
}

fn decode_scalar(kind: ChannelKind, data: Value) -> Result<Vec<f64>> {
    decode_channel::<f64>(kind, data)
}

fn decode_channel<T: serde::de::DeserializeOwned>(kind: ChannelKind, data: Value) -> Result<Vec<T>> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(data)
        .map_err(|e| SourceError::decode(format!("{kind} stream"), e.to_string()))
}
