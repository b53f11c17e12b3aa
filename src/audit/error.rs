//! Fatal parse errors.
//!
//! Anything in here aborts the run: the line either names an event the
//! catalog does not know, or it is malformed in a way that would make the
//! rendered output misleading. Recoverable gaps (unknown keys, unexpected
//! quoting) are reported through `tracing::warn!` instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuditError {
    #[error("unknown audit record type code {0}")]
    UnknownRecordType(u32),

    #[error("malformed timestamp: millisecond field {0:?} must be exactly 3 digits")]
    MalformedTimestamp(String),

    #[error("malformed avc message: {0:?}")]
    MalformedAvc(String),

    #[error("unterminated quote in value of {key}: {value:?}")]
    UnterminatedQuote { key: String, value: String },

    #[error("unterminated {{ }} section in value of {key}: {value:?}")]
    UnterminatedSection { key: String, value: String },

    #[error("unparseable field text: {0:?}")]
    UnparseableField(String),
}
