//! Utility functions and helpers.
//!
//! - [`source`] - input selection and helper command construction
//! - [`reader`] - file reader with automatic decompression, lossy lines
//! - [`time`] - event stamp formatting
//! - [`color`] - ANSI palette
//!
//! # Examples
//!
//! ## Reading compressed files
//!
//! ```no_run
//! use selinux_audit_tools::utils::reader::{open_file, LossyLines};
//! use std::io::BufReader;
//!
//! // Automatically decompresses .gz and .zst files
//! let reader = BufReader::new(open_file("audit.log.gz").unwrap());
//! for line in LossyLines::new(reader) {
//!     println!("{}", line.unwrap());
//! }
//! ```

pub mod color;
pub mod reader;
pub mod source;
pub mod time;
