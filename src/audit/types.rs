//! Data structures representing parsed Linux audit log lines.
//!
//! A line is turned into a [`LogEntry`]: its [`RecordType`], an optional
//! [`EventStamp`] taken from the `audit(S.mmm:N)` marker, and a flat
//! [`Record`] of typed field values keyed by slash-separated paths.

use crate::audit::catalog;
use crate::audit::error::AuditError;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered mapping from field path (e.g. `avc/for/scontext`) to value.
///
/// Keys keep their first-seen position; a repeated key overwrites the value
/// in place.
pub type Record = IndexMap<String, FieldValue>;

/// Record types rendered by default.
pub const SELINUX_TYPES: &[&str] = &["AVC", "USER_AVC", "SELINUX_ERR", "USER_SELINUX_ERR"];

/// Kind of event reported on one log line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordType {
    name: String,
}

impl RecordType {
    /// Resolve a numeric code through the catalog.
    ///
    /// An unknown code is an error: the catalog is expected to cover every
    /// type the kernel and user space can emit.
    pub fn from_code(code: u32) -> Result<Self, AuditError> {
        catalog::record_type_name(code)
            .map(|name| Self {
                name: name.to_string(),
            })
            .ok_or(AuditError::UnknownRecordType(code))
    }

    /// Symbolic name as written by auditd, which may know types the catalog
    /// does not.
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Symbolic name, only when the catalog knows it.
    pub fn known(name: &str) -> Option<Self> {
        catalog::record_type_code(name).map(|_| Self::from_name(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> Option<u32> {
        catalog::record_type_code(&self.name)
    }

    pub fn is_avc(&self) -> bool {
        self.name == "AVC" || self.name == "USER_AVC"
    }

    pub fn is_selinux(&self) -> bool {
        SELINUX_TYPES.contains(&self.name.as_str())
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Bytes(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
    List(Vec<String>),
    Null,
}

impl FieldValue {
    /// Placeholders the kernel emits for "nothing here".
    pub fn is_placeholder(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Str(s) => s.is_empty() || s == "?",
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    serializer.serialize_str(&hex)
}

/// The `audit(seconds.millis:serial)` marker shared by all lines of one
/// kernel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EventStamp {
    pub seconds: i64,
    pub millis: u16,
    pub serial: u64,
}

/// One classified and tokenized log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub stamp: Option<EventStamp>,
    pub fields: Record,
}

impl LogEntry {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// `policyload` / `setenforce` notices, which are never displayed.
    pub fn is_internal_notice(&self) -> bool {
        ["avc/notice", "msg/avc/notice"].iter().any(|key| {
            matches!(
                self.fields.get(*key).and_then(FieldValue::as_str),
                Some("policyload") | Some("setenforce")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_from_code() {
        let avc = RecordType::from_code(1400).unwrap();
        assert_eq!(avc.name(), "AVC");
        assert!(avc.is_avc());
        assert!(avc.is_selinux());
        assert_eq!(avc, RecordType::from_name("AVC"));
    }

    #[test]
    fn test_unknown_code_is_error() {
        assert_eq!(
            RecordType::from_code(1999),
            Err(AuditError::UnknownRecordType(1999))
        );
    }

    #[test]
    fn test_known_name() {
        assert!(RecordType::known("SYSCALL").is_some());
        assert!(RecordType::known("HELLO").is_none());
        assert!(!RecordType::from_name("SYSCALL").is_selinux());
    }

    #[test]
    fn test_placeholder_values() {
        assert!(FieldValue::Null.is_placeholder());
        assert!(FieldValue::from("?").is_placeholder());
        assert!(FieldValue::from("").is_placeholder());
        assert!(!FieldValue::from("x").is_placeholder());
        assert!(!FieldValue::Int(0).is_placeholder());
    }

    #[test]
    fn test_json_serialization() {
        let mut fields = Record::new();
        fields.insert("saddr".into(), FieldValue::Bytes(vec![0x01, 0xab]));
        fields.insert("auid".into(), FieldValue::Null);
        fields.insert("perms".into(), FieldValue::List(vec!["read".into()]));
        let entry = LogEntry {
            record_type: RecordType::from_name("SOCKADDR"),
            stamp: None,
            fields,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"type":"SOCKADDR","stamp":null,"fields":{"saddr":"01ab","auid":null,"perms":["read"]}}"#
        );
    }
}
