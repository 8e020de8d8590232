//! Configuration validation module
//!
//! Rules:
//! - field ranges (timeout, concurrency, page size) via `validator` derive
//! - base_url is an http(s) URL
//! - requested channels contain `time` and have no duplicates
//! - sink names non-empty and unique
//! - at most one upload sink

use std::collections::HashSet;

use contracts::{ChannelKind, MergeBlueprint, MergeError, SinkType};
use validator::Validate;

/// Validate a MergeBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &MergeBlueprint) -> Result<(), MergeError> {
    validate_field_ranges(blueprint)?;
    validate_api(blueprint)?;
    validate_channels(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_field_ranges(blueprint: &MergeBlueprint) -> Result<(), MergeError> {
    blueprint
        .validate()
        .map_err(|e| MergeError::config_validation("blueprint", e.to_string()))
}

fn validate_api(blueprint: &MergeBlueprint) -> Result<(), MergeError> {
    let base_url = blueprint.api.base_url.trim();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(MergeError::config_validation(
            "api.base_url",
            format!("base_url must be an http(s) URL, got '{base_url}'"),
        ));
    }
    Ok(())
}

fn validate_channels(blueprint: &MergeBlueprint) -> Result<(), MergeError> {
    let channels = &blueprint.merge.channels;

    if !channels.contains(&ChannelKind::Time) {
        return Err(MergeError::config_validation(
            "merge.channels",
            "channels must include 'time'",
        ));
    }

    let mut seen = HashSet::new();
    for channel in channels {
        if !seen.insert(channel) {
            return Err(MergeError::config_validation(
                format!("merge.channels[{channel}]"),
                "duplicate channel",
            ));
        }
    }
    Ok(())
}

fn validate_sinks(blueprint: &MergeBlueprint) -> Result<(), MergeError> {
    let mut seen = HashSet::new();
    let mut upload_sinks = 0;

    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(MergeError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(MergeError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        match sink.sink_type {
            SinkType::Upload => upload_sinks += 1,
            SinkType::File => {
                if sink.params.get("base_path").is_some_and(|p| p.is_empty()) {
                    return Err(MergeError::config_validation(
                        format!("sinks[{}].params.base_path", sink.name),
                        "base_path cannot be empty",
                    ));
                }
            }
            SinkType::Log => {}
        }
    }

    if upload_sinks > 1 {
        return Err(MergeError::config_validation(
            "sinks",
            format!("at most one upload sink allowed, found {upload_sinks}"),
        ));
    }
    Ok(())
}
