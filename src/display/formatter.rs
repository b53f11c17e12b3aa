//! Human-readable and JSON rendering of log entries.
//!
//! Text output produces one header line per displayed event followed by
//! indented `key = value` detail lines. AVC decisions get a dense one-line
//! summary instead:
//!
//! ```text
//! 2001-09-09 03:46:40.123 denied sshd_t etc_t:file { read write } comm='sshd' pid=100
//! ```

use crate::audit::catalog::ioctl_name;
use crate::audit::fields::{kind_of, ValueKind};
use crate::audit::types::{EventStamp, FieldValue, LogEntry, Record};
use crate::utils::color::{Color, Palette};
use crate::utils::time::{format_stamp, stamp_rfc3339};
use serde::Serialize;

const DETAIL_INDENT: &str = "    ";
const CONTINUATION_INDENT: &str = "  ";

/// Fields folded into the AVC summary line, relative to `avc/for/`.
const AVC_SUMMARY_FIELDS: &[&str] = &[
    "scontext",
    "tcontext",
    "tclass",
    "ioctlcmd",
    "path",
    "name",
    "ino",
    "comm",
    "pid",
    "permissive",
];

/// Format a decoded value for display, using the key to pick a radix.
pub fn format_value(key: &str, value: &FieldValue) -> String {
    let leaf = key.rsplit('/').next().unwrap_or(key);
    match value {
        FieldValue::Str(s) => format!("'{}'", s.replace('\'', "\\'")),
        FieldValue::Int(n) => match kind_of(leaf) {
            Some(ValueKind::HexInt) => format!("0x{:x}", n),
            Some(ValueKind::Ioctl) => match ioctl_name(*n) {
                Some(name) => format!("0x{:x} ({})", n, name),
                None => format!("0x{:x}", n),
            },
            Some(ValueKind::OctalInt) => format!("0o{:o}", n),
            _ => n.to_string(),
        },
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Bytes(bytes) => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
        FieldValue::List(items) => format!("{{ {} }}", items.join(" ")),
        FieldValue::Null => "null".to_string(),
    }
}

/// Type component of a `user:role:type:level` security context.
pub fn context_type(context: &str) -> &str {
    context.split(':').nth(2).unwrap_or(context)
}

#[derive(Debug, Clone, Copy)]
pub struct TextFormatter {
    palette: Palette,
}

impl TextFormatter {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Lines for an event that starts a new display block.
    pub fn event(&self, entry: &LogEntry) -> Vec<String> {
        self.avc_summary(entry)
            .unwrap_or_else(|| self.generic(entry))
    }

    /// Lines for a record attached to the previously displayed event.
    pub fn continuation(&self, entry: &LogEntry) -> Vec<String> {
        if entry.record_type.is_avc() {
            if let Some(lines) = self.avc_summary(entry) {
                return lines;
            }
        }
        let mut indent = String::from(CONTINUATION_INDENT);
        indent.push_str(DETAIL_INDENT);
        let mut lines = vec![format!(
            "{}{}",
            CONTINUATION_INDENT,
            self.palette.paint(Color::Cyan, entry.record_type.name())
        )];
        lines.extend(self.details(entry, &[], &indent));
        lines
    }

    fn generic(&self, entry: &LogEntry) -> Vec<String> {
        let color = if entry.record_type.name().ends_with("_ERR") {
            Color::Red
        } else {
            Color::Blue
        };
        let mut header = self.time_prefix(entry.stamp.as_ref());
        header.push_str(&self.palette.paint(color, entry.record_type.name()));

        let mut lines = vec![header];
        lines.extend(self.details(entry, &[], DETAIL_INDENT));
        lines
    }

    fn time_prefix(&self, stamp: Option<&EventStamp>) -> String {
        match stamp {
            Some(stamp) => format!("{} ", self.palette.paint(Color::Dim, &format_stamp(stamp))),
            None => String::new(),
        }
    }

    /// The one-line AVC rendering, when the entry carries an AVC decision
    /// either directly or inside a user-space `msg='...'`.
    fn avc_summary(&self, entry: &LogEntry) -> Option<Vec<String>> {
        let base = ["", "msg/"]
            .into_iter()
            .find(|base| entry.fields.contains_key(&format!("{base}avc/result")))?;
        let field = |name: &str| entry.get(&format!("{base}avc/for/{name}"));
        let text = |name: &str| field(name).and_then(FieldValue::as_str).unwrap_or("?");

        let result = entry
            .get(&format!("{base}avc/result"))
            .and_then(FieldValue::as_str)
            .unwrap_or("?");
        let perms = match entry.get(&format!("{base}avc/perms")) {
            Some(FieldValue::List(perms)) => perms.join(" "),
            _ => String::new(),
        };

        let scontext = text("scontext");
        let tcontext = text("tcontext");
        let source = context_type(scontext);
        let target = if tcontext == scontext {
            "self"
        } else {
            context_type(tcontext)
        };

        let mut line = self.time_prefix(entry.stamp.as_ref());
        let result_color = if result == "denied" {
            Color::Red
        } else {
            Color::Green
        };
        line.push_str(&self.palette.paint(result_color, result));
        line.push(' ');
        line.push_str(&self.palette.paint(Color::Yellow, source));
        line.push(' ');
        line.push_str(&self.palette.paint(Color::Cyan, target));
        line.push(':');
        line.push_str(&self.palette.paint(Color::Magenta, text("tclass")));
        line.push_str(&format!(" {{ {} }}", perms));

        for name in ["ioctlcmd", "path", "name", "ino", "comm", "pid"] {
            if let Some(value) = field(name).filter(|v| !v.is_placeholder()) {
                let label = if name == "ioctlcmd" { "ioctl" } else { name };
                let shown = match value {
                    FieldValue::Str(s) => format!("'{}'", s),
                    _ => format_value(name, value),
                };
                line.push_str(&format!(" {}={}", label, shown));
            }
        }
        if field("permissive") == Some(&FieldValue::Bool(true)) {
            line.push_str(&format!(" {}", self.palette.paint(Color::Bold, "(permissive)")));
        }

        let mut consumed: Vec<String> = vec![
            format!("{base}avc/result"),
            format!("{base}avc/perms"),
        ];
        consumed.extend(
            AVC_SUMMARY_FIELDS
                .iter()
                .map(|name| format!("{base}avc/for/{name}")),
        );

        let mut lines = vec![line];
        lines.extend(self.details(entry, &consumed, DETAIL_INDENT));
        Some(lines)
    }

    fn details(&self, entry: &LogEntry, consumed: &[String], indent: &str) -> Vec<String> {
        entry
            .fields
            .iter()
            .filter(|(key, value)| !value.is_placeholder() && !consumed.contains(*key))
            .map(|(key, value)| {
                format!(
                    "{}{} = {}",
                    indent,
                    self.palette.paint(Color::Bold, key),
                    format_value(key, value)
                )
            })
            .collect()
    }
}

/// Shape of one JSON Lines record.
#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    time: Option<String>,
    serial: Option<u64>,
    continuation: bool,
    fields: &'a Record,
}

/// Serialize an entry as a single JSON object.
pub fn json_line(entry: &LogEntry, continuation: bool) -> serde_json::Result<String> {
    serde_json::to_string(&JsonEntry {
        record_type: entry.record_type.name(),
        time: entry.stamp.as_ref().and_then(stamp_rfc3339),
        serial: entry.stamp.map(|s| s.serial),
        continuation,
        fields: &entry.fields,
    })
}
