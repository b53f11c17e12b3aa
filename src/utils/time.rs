use crate::audit::types::EventStamp;
use chrono::{DateTime, Local, TimeZone, Utc};

/// Convert an event stamp to a UTC instant.
pub fn stamp_to_utc(stamp: &EventStamp) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(stamp.seconds, u32::from(stamp.millis) * 1_000_000)
        .single()
}

/// Format an event stamp in the local timezone, with milliseconds.
pub fn format_stamp(stamp: &EventStamp) -> String {
    match stamp_to_utc(stamp) {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string(),
        None => format!("{}.{:03}", stamp.seconds, stamp.millis),
    }
}

/// RFC 3339 rendering in UTC, used for machine-readable output.
pub fn stamp_rfc3339(stamp: &EventStamp) -> Option<String> {
    stamp_to_utc(stamp).map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}
