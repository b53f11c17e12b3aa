//! Per-key value decoding.
//!
//! Every known field name maps to one [`ValueKind`] through the
//! [`FIELD_KINDS`] table. Keys outside the table are kept as raw strings and
//! reported once per occurrence.

use crate::audit::types::FieldValue;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

/// How the raw text of a field is turned into a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Hexadecimal integer without `0x` prefix (syscall arguments, arch).
    HexInt,
    /// Hexadecimal ioctl request, named from the ioctl table when rendered.
    Ioctl,
    /// Octal integer (file mode).
    OctalInt,
    /// Hex-encoded raw bytes (`saddr`).
    HexBytes,
    /// Decimal integer, `n/a` meaning no value.
    DecimalOrNull,
    /// Double-quoted or hex-encoded UTF-8 text.
    Text,
    /// Unquoted identifier such as a security context.
    Bare,
    /// Boolean outcome (`yes`/`no`, `success`/`failed`, `1`/`0`).
    Bool,
}

pub const FIELD_KINDS: &[(&str, ValueKind)] = &[
    ("a0", ValueKind::HexInt),
    ("a1", ValueKind::HexInt),
    ("a2", ValueKind::HexInt),
    ("a3", ValueKind::HexInt),
    ("a4", ValueKind::HexInt),
    ("a5", ValueKind::HexInt),
    ("a6", ValueKind::HexInt),
    ("arch", ValueKind::HexInt),
    ("ioctlcmd", ValueKind::Ioctl),
    ("mode", ValueKind::OctalInt),
    ("saddr", ValueKind::HexBytes),
    ("argc", ValueKind::DecimalOrNull),
    ("auid", ValueKind::DecimalOrNull),
    ("egid", ValueKind::DecimalOrNull),
    ("enforcing", ValueKind::DecimalOrNull),
    ("euid", ValueKind::DecimalOrNull),
    ("exit", ValueKind::DecimalOrNull),
    ("fsgid", ValueKind::DecimalOrNull),
    ("fsuid", ValueKind::DecimalOrNull),
    ("gid", ValueKind::DecimalOrNull),
    ("ino", ValueKind::DecimalOrNull),
    ("item", ValueKind::DecimalOrNull),
    ("items", ValueKind::DecimalOrNull),
    ("lport", ValueKind::DecimalOrNull),
    ("new-ses", ValueKind::DecimalOrNull),
    ("ogid", ValueKind::DecimalOrNull),
    ("old-auid", ValueKind::DecimalOrNull),
    ("old-ses", ValueKind::DecimalOrNull),
    ("old_enforcing", ValueKind::DecimalOrNull),
    ("ouid", ValueKind::DecimalOrNull),
    ("pid", ValueKind::DecimalOrNull),
    ("ppid", ValueKind::DecimalOrNull),
    ("sauid", ValueKind::DecimalOrNull),
    ("seqno", ValueKind::DecimalOrNull),
    ("ses", ValueKind::DecimalOrNull),
    ("sgid", ValueKind::DecimalOrNull),
    ("suid", ValueKind::DecimalOrNull),
    ("syscall", ValueKind::DecimalOrNull),
    ("uid", ValueKind::DecimalOrNull),
    ("ver", ValueKind::DecimalOrNull),
    ("acct", ValueKind::Text),
    ("cmd", ValueKind::Text),
    ("cmdline", ValueKind::Text),
    ("comm", ValueKind::Text),
    ("cwd", ValueKind::Text),
    ("dev", ValueKind::Text),
    ("exe", ValueKind::Text),
    ("invalid_context", ValueKind::Text),
    ("key", ValueKind::Text),
    ("msg", ValueKind::Text),
    ("name", ValueKind::Text),
    ("path", ValueKind::Text),
    ("proctitle", ValueKind::Text),
    ("reason", ValueKind::Text),
    ("ARCH", ValueKind::Text),
    ("AUID", ValueKind::Text),
    ("EGID", ValueKind::Text),
    ("EUID", ValueKind::Text),
    ("FSGID", ValueKind::Text),
    ("FSUID", ValueKind::Text),
    ("GID", ValueKind::Text),
    ("OGID", ValueKind::Text),
    ("OUID", ValueKind::Text),
    ("SGID", ValueKind::Text),
    ("SUID", ValueKind::Text),
    ("SYSCALL", ValueKind::Text),
    ("UID", ValueKind::Text),
    ("addr", ValueKind::Bare),
    ("cap_fe", ValueKind::Bare),
    ("cap_fi", ValueKind::Bare),
    ("cap_fp", ValueKind::Bare),
    ("cap_fver", ValueKind::Bare),
    ("family", ValueKind::Bare),
    ("format", ValueKind::Bare),
    ("grantors", ValueKind::Bare),
    ("hostname", ValueKind::Bare),
    ("kernel", ValueKind::Bare),
    ("laddr", ValueKind::Bare),
    ("nametype", ValueKind::Bare),
    ("obj", ValueKind::Bare),
    ("op", ValueKind::Bare),
    ("rdev", ValueKind::Bare),
    ("saddr_fam", ValueKind::Bare),
    ("scontext", ValueKind::Bare),
    ("srawcon", ValueKind::Bare),
    ("subj", ValueKind::Bare),
    ("tclass", ValueKind::Bare),
    ("tcontext", ValueKind::Bare),
    ("terminal", ValueKind::Bare),
    ("trawcon", ValueKind::Bare),
    ("tty", ValueKind::Bare),
    ("unit", ValueKind::Bare),
    ("permissive", ValueKind::Bool),
    ("res", ValueKind::Bool),
    ("success", ValueKind::Bool),
];

fn kind_index() -> &'static HashMap<&'static str, ValueKind> {
    static INDEX: OnceLock<HashMap<&'static str, ValueKind>> = OnceLock::new();
    INDEX.get_or_init(|| FIELD_KINDS.iter().copied().collect())
}

/// Kind of a field, by its bare key name.
pub fn kind_of(key: &str) -> Option<ValueKind> {
    kind_index().get(key).copied()
}

/// Decode the raw text of `key` according to its kind.
///
/// Decoding never fails: a value that does not fit its kind is kept as the
/// raw string and reported.
pub fn decode_value(key: &str, raw: &str) -> FieldValue {
    let Some(kind) = kind_of(key) else {
        warn!(key, value = raw, "unknown audit field, keeping raw value");
        return FieldValue::Str(raw.to_string());
    };

    if raw == "?" {
        return FieldValue::Str(raw.to_string());
    }

    let decoded = match kind {
        ValueKind::HexInt | ValueKind::Ioctl => parse_radix(raw, 16),
        ValueKind::OctalInt => parse_radix(raw, 8),
        ValueKind::DecimalOrNull => {
            if raw == "n/a" {
                Some(FieldValue::Null)
            } else {
                raw.parse::<i64>().ok().map(FieldValue::Int)
            }
        }
        ValueKind::HexBytes => decode_hex(raw).map(FieldValue::Bytes),
        ValueKind::Text => decode_text(raw),
        ValueKind::Bare => Some(decode_bare(key, raw)),
        ValueKind::Bool => decode_bool(raw),
    };

    decoded.unwrap_or_else(|| {
        warn!(key, value = raw, kind = ?kind, "value does not match its field kind");
        FieldValue::Str(raw.to_string())
    })
}

fn parse_radix(raw: &str, radix: u32) -> Option<FieldValue> {
    let digits = match radix {
        16 => raw.strip_prefix("0x").unwrap_or(raw),
        8 => raw.strip_prefix("0o").unwrap_or(raw),
        _ => raw,
    };
    // Register-sized values such as a0=ffffffffffffff9c keep their bit pattern.
    u64::from_str_radix(digits, radix)
        .ok()
        .map(|n| FieldValue::Int(n as i64))
}

pub(crate) fn decode_hex(raw: &str) -> Option<Vec<u8>> {
    if raw.is_empty() || raw.len() % 2 != 0 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..raw.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&raw[i..i + 2], 16).ok())
        .collect()
}

fn decode_text(raw: &str) -> Option<FieldValue> {
    if let Some(inner) = raw.strip_prefix('"') {
        return Some(FieldValue::Str(
            inner.strip_suffix('"').unwrap_or(inner).to_string(),
        ));
    }
    if raw == "(null)" {
        return Some(FieldValue::Null);
    }
    let bytes = decode_hex(raw)?;
    String::from_utf8(bytes)
        .ok()
        .map(|s| FieldValue::Str(s.replace('\0', " ")))
}

fn decode_bare(key: &str, raw: &str) -> FieldValue {
    match raw.strip_prefix('"') {
        Some(inner) => {
            warn!(key, value = raw, "identifier field is unexpectedly quoted");
            FieldValue::Str(inner.strip_suffix('"').unwrap_or(inner).to_string())
        }
        None => FieldValue::Str(raw.to_string()),
    }
}

fn decode_bool(raw: &str) -> Option<FieldValue> {
    match raw.trim_matches('\'') {
        "yes" | "success" | "1" => Some(FieldValue::Bool(true)),
        "no" | "failed" | "0" => Some(FieldValue::Bool(false)),
        _ => None,
    }
}
