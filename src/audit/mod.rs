//! Core audit log parsing and data structures.
//!
//! - [`catalog`] - record type and ioctl name tables
//! - [`fields`] - per-key value kinds and decoding
//! - [`tokenizer`] - payload → ordered key/value record
//! - [`classifier`] - line shape detection and [`types::LogEntry`] construction
//! - [`error`] - fatal parse errors

pub mod catalog;
pub mod classifier;
pub mod error;
pub mod fields;
pub mod tokenizer;
pub mod types;
