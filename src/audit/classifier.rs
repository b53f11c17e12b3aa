//! Classify a raw log line and turn it into a [`LogEntry`].
//!
//! Accepted shapes:
//!
//! - `type=AVC msg=audit(1700000000.123:45): ...` (audit.log, ausearch)
//! - `[  12.3] audit: type=1400 audit(1700000000.123:45): ...` (dmesg)
//! - `AVC avc:  denied ...` (journalctl `-o cat`)

use crate::audit::error::AuditError;
use crate::audit::tokenizer::tokenize;
use crate::audit::types::{EventStamp, LogEntry, RecordType};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn typed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)^(?:\[[^\]]*\]\s*)?(?:audit:\s+)?(?:node=\S+\s+)?type=([A-Za-z0-9_\[\]]+)\s+(?:msg=)?audit\((\d+)(?:\.([^:)]*))?:(\d+)\):\s*(.*)$",
        )
        .expect("valid typed line regex")
    })
}

fn bare_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^([A-Z][A-Z0-9_]*)(?:\s+(.*))?$").expect("valid bare line regex")
    })
}

/// Result of classifying one line, before tokenization.
#[derive(Debug, PartialEq, Eq)]
pub enum Classified<'a> {
    Event {
        record_type: RecordType,
        stamp: Option<EventStamp>,
        payload: &'a str,
    },
    /// Separator or prologue text emitted by log tools.
    Prologue,
    Unrecognized,
}

/// Determine the record type, event stamp and payload of `line`.
pub fn classify(line: &str) -> Result<Classified<'_>, AuditError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == "----" || trimmed.starts_with("time->") {
        return Ok(Classified::Prologue);
    }

    if let Some(caps) = typed_re().captures(trimmed) {
        let record_type = record_type_from_tag(caps.get(1).map_or("", |m| m.as_str()))?;
        let millis = caps.get(3).map_or("", |m| m.as_str());
        let stamp = parse_stamp(&caps[2], millis, &caps[4])?;
        let payload = caps.get(5).map_or("", |m| m.as_str());
        return Ok(Classified::Event {
            record_type,
            stamp: Some(stamp),
            payload,
        });
    }

    if let Some(caps) = bare_re().captures(trimmed) {
        if let Some(record_type) = RecordType::known(&caps[1]) {
            return Ok(Classified::Event {
                record_type,
                stamp: None,
                payload: caps.get(2).map_or("", |m| m.as_str()),
            });
        }
    }

    Ok(Classified::Unrecognized)
}

/// `type=` tag to record type. Numeric codes and auditd's `UNKNOWN[code]`
/// spelling must resolve through the catalog.
fn record_type_from_tag(tag: &str) -> Result<RecordType, AuditError> {
    let code = tag
        .strip_prefix("UNKNOWN[")
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(tag);
    if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
        let code = code
            .parse::<u32>()
            .map_err(|_| AuditError::UnknownRecordType(u32::MAX))?;
        return RecordType::from_code(code);
    }
    Ok(RecordType::from_name(tag))
}

fn parse_stamp(seconds: &str, millis: &str, serial: &str) -> Result<EventStamp, AuditError> {
    if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AuditError::MalformedTimestamp(millis.to_string()));
    }
    let malformed = || AuditError::MalformedTimestamp(format!("{seconds}.{millis}:{serial}"));
    Ok(EventStamp {
        seconds: seconds.parse().map_err(|_| malformed())?,
        millis: millis.parse().map_err(|_| malformed())?,
        serial: serial.parse().map_err(|_| malformed())?,
    })
}

/// Classify and tokenize one line.
///
/// Returns `Ok(None)` for lines that carry no event; those are logged and
/// skipped. Errors are fatal for the whole run.
pub fn parse_line(line: &str) -> Result<Option<LogEntry>, AuditError> {
    match classify(line)? {
        Classified::Event {
            record_type,
            stamp,
            payload,
        } => Ok(Some(LogEntry {
            record_type,
            stamp,
            fields: tokenize(payload)?,
        })),
        Classified::Prologue => {
            debug!(line, "skipping separator line");
            Ok(None)
        }
        Classified::Unrecognized => {
            warn!(line, "skipping unrecognized line");
            Ok(None)
        }
    }
}
