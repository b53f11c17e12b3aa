//! Split an audit payload into an ordered, typed key/value [`Record`].
//!
//! Nested sections (`avc:` decisions, `pam:` payloads, `SADDR={ ... }`,
//! `msg='...'`) are flattened into the same record under a slash-separated
//! key prefix, e.g. `msg/avc/for/scontext`.

use crate::audit::error::AuditError;
use crate::audit::fields::decode_value;
use crate::audit::types::{FieldValue, Record};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// ASCII group separator, placed before the enriched (`UID="root"`) fields.
pub const GROUP_SEPARATOR: char = '\x1d';

fn key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_-]+)=").expect("valid key regex"))
}

fn avc_decision_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^avc:\s+(denied|granted)\s+\{\s*([^}]*?)\s*\}\s+for\b\s*(.*)$")
            .expect("valid avc regex")
    })
}

fn avc_notice_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^avc:\s+received\s+(policyload|setenforce)\s+notice\s+\(([^)]*)\)\s*(.*)$")
            .expect("valid avc notice regex")
    })
}

/// Tokenize a whole payload.
pub fn tokenize(payload: &str) -> Result<Record, AuditError> {
    let mut record = Record::new();
    tokenize_into(&mut record, payload, "")?;
    Ok(record)
}

/// Tokenize `text` into `record`, prepending `prefix` to every key.
pub fn tokenize_into(record: &mut Record, text: &str, prefix: &str) -> Result<(), AuditError> {
    if text.contains(GROUP_SEPARATOR) {
        for segment in text.split(GROUP_SEPARATOR) {
            tokenize_into(record, segment, prefix)?;
        }
        return Ok(());
    }

    let text = text.trim();
    if text.starts_with("avc:") {
        return tokenize_avc(record, text, prefix);
    }
    if let Some(rest) = text.strip_prefix("pam: ") {
        return tokenize_into(record, rest, &format!("{prefix}pam/"));
    }
    tokenize_pairs(record, text, prefix)
}

fn tokenize_avc(record: &mut Record, text: &str, prefix: &str) -> Result<(), AuditError> {
    if let Some(caps) = avc_decision_re().captures(text) {
        record.insert(format!("{prefix}avc/result"), FieldValue::from(&caps[1]));
        record.insert(
            format!("{prefix}avc/perms"),
            FieldValue::List(caps[2].split_whitespace().map(str::to_string).collect()),
        );
        return tokenize_into(record, &caps[3], &format!("{prefix}avc/for/"));
    }
    if let Some(caps) = avc_notice_re().captures(text) {
        record.insert(format!("{prefix}avc/notice"), FieldValue::from(&caps[1]));
        tokenize_into(record, &caps[2], &format!("{prefix}avc/notice/"))?;
        return tokenize_into(record, &caps[3], prefix);
    }
    Err(AuditError::MalformedAvc(text.to_string()))
}

/// A value as cut out of the payload, before decoding.
enum RawValue<'a> {
    Plain(&'a str),
    Section(&'a str),
    Message(&'a str),
}

fn tokenize_pairs(record: &mut Record, text: &str, prefix: &str) -> Result<(), AuditError> {
    let mut rest = text;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(());
        }

        let key_len = key_re()
            .find(rest)
            .map(|m| m.end())
            .ok_or_else(|| AuditError::UnparseableField(rest.to_string()))?;
        let key = &rest[..key_len - 1];
        let (value, remaining) = split_value(key, &rest[key_len..])?;

        match value {
            RawValue::Plain(raw) => {
                record.insert(format!("{prefix}{key}"), decode_value(key, raw));
            }
            RawValue::Section(inner) => {
                tokenize_into(record, inner, &format!("{prefix}{key}/"))?;
            }
            RawValue::Message(inner) => {
                tokenize_into(record, inner, &format!("{prefix}msg/"))?;
            }
        }
        rest = remaining;
    }
}

/// Cut the value of `key` from the start of `after`, returning it together
/// with the unconsumed text.
fn split_value<'a>(key: &str, after: &'a str) -> Result<(RawValue<'a>, &'a str), AuditError> {
    const MASS_RELABEL: &str = "mass relabel";
    if key == "op" && after.starts_with(MASS_RELABEL) {
        let tail = &after[MASS_RELABEL.len()..];
        if tail.is_empty() || tail.starts_with(char::is_whitespace) {
            return Ok((RawValue::Plain(MASS_RELABEL), tail));
        }
    }

    if key == "SADDR" && after.starts_with('{') {
        let close = matching_brace(after).ok_or_else(|| AuditError::UnterminatedSection {
            key: key.to_string(),
            value: after.to_string(),
        })?;
        return Ok((RawValue::Section(&after[1..close]), &after[close + 1..]));
    }

    if key == "msg" && after.starts_with('\'') {
        let body = &after[1..];
        return Ok(match body.find('\'') {
            Some(end) => (RawValue::Message(&body[..end]), &body[end + 1..]),
            None => {
                warn!(value = after, "unterminated msg quote, accepting truncated value");
                (RawValue::Message(body), "")
            }
        });
    }

    if after.starts_with('"') {
        return match after[1..].find('"') {
            Some(end) => Ok((RawValue::Plain(&after[..end + 2]), &after[end + 2..])),
            None if key == "cmdline" => Err(AuditError::UnterminatedQuote {
                key: key.to_string(),
                value: after.to_string(),
            }),
            None => {
                warn!(key, value = after, "unterminated quote, accepting truncated value");
                Ok((RawValue::Plain(after), ""))
            }
        };
    }

    let end = after.find(char::is_whitespace).unwrap_or(after.len());
    Ok((RawValue::Plain(&after[..end]), &after[end..]))
}

/// Byte offset of the `}` closing the `{` that starts `text`.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}
