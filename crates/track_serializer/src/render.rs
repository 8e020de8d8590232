//! XML text rendering for `TcxDocument`.

use std::fmt::{self, Write};

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

use crate::document::{TcxDocument, Trackpoint, TCX_NAMESPACE};

const INDENT: &str = "  ";

/// RFC 3339 in UTC with a `Z` suffix; milliseconds only when non-zero
pub fn format_time(time: &DateTime<Utc>) -> String {
    let format = if time.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Millis
    };
    time.to_rfc3339_opts(format, true)
}

/// Escape text for element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for TcxDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activity = &self.activity;
        let lap = &activity.lap;

        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(f, r#"<TrainingCenterDatabase xmlns="{TCX_NAMESPACE}">"#)?;
        writeln!(f, "{INDENT}<Activities>")?;
        writeln!(
            f,
            r#"{}<Activity Sport="{}">"#,
            INDENT.repeat(2),
            escape(&activity.sport)
        )?;
        writeln!(f, "{}<Id>{}</Id>", INDENT.repeat(3), format_time(&activity.id))?;
        writeln!(
            f,
            r#"{}<Lap StartTime="{}">"#,
            INDENT.repeat(3),
            format_time(&lap.start_time)
        )?;
        writeln!(
            f,
            "{}<TotalTimeSeconds>{}</TotalTimeSeconds>",
            INDENT.repeat(4),
            lap.total_time_seconds
        )?;
        writeln!(
            f,
            "{}<DistanceMeters>{}</DistanceMeters>",
            INDENT.repeat(4),
            lap.distance_meters
        )?;
        writeln!(f, "{}<Track>", INDENT.repeat(4))?;
        for point in &lap.trackpoints {
            write_trackpoint(f, point, 5)?;
        }
        writeln!(f, "{}</Track>", INDENT.repeat(4))?;
        writeln!(f, "{}</Lap>", INDENT.repeat(3))?;
        writeln!(f, "{}</Activity>", INDENT.repeat(2))?;
        writeln!(f, "{INDENT}</Activities>")?;
        writeln!(f, "</TrainingCenterDatabase>")
    }
}

fn write_trackpoint<W: Write>(out: &mut W, point: &Trackpoint, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);

    writeln!(out, "{pad}<Trackpoint>")?;
    writeln!(out, "{inner}<Time>{}</Time>", format_time(&point.time))?;
    if let Some(position) = &point.position {
        writeln!(out, "{inner}<Position>")?;
        writeln!(
            out,
            "{inner}{INDENT}<LatitudeDegrees>{}</LatitudeDegrees>",
            position.latitude_degrees
        )?;
        writeln!(
            out,
            "{inner}{INDENT}<LongitudeDegrees>{}</LongitudeDegrees>",
            position.longitude_degrees
        )?;
        writeln!(out, "{inner}</Position>")?;
    }
    if let Some(altitude) = point.altitude_meters {
        writeln!(out, "{inner}<AltitudeMeters>{altitude}</AltitudeMeters>")?;
    }
    if let Some(distance) = point.distance_meters {
        writeln!(out, "{inner}<DistanceMeters>{distance}</DistanceMeters>")?;
    }
    if let Some(bpm) = point.heart_rate_bpm {
        writeln!(out, "{inner}<HeartRateBpm>")?;
        writeln!(out, "{inner}{INDENT}<Value>{bpm}</Value>")?;
        writeln!(out, "{inner}</HeartRateBpm>")?;
    }
    writeln!(out, "{pad}</Trackpoint>")
}
