//! File opening with transparent decompression, and raw line reading.
//!
//! Rotated audit logs are often compressed by logrotate, so `.gz` and `.zst`
//! files are decompressed on the fly. Lines are read as bytes and decoded
//! lossily: audit text is mostly ASCII but may carry arbitrary bytes from
//! untrusted paths and command lines.
//!
//! # Examples
//!
//! ```no_run
//! use selinux_audit_tools::utils::reader::{open_file, LossyLines};
//! use std::io::BufReader;
//!
//! let reader = open_file("/var/log/audit/audit.log.1.gz").unwrap();
//! for line in LossyLines::new(BufReader::new(reader)) {
//!     println!("{}", line.unwrap());
//! }
//! ```

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, Read};
use std::path::Path;

/// Opens a file with automatic decompression based on extension.
///
/// - `.gz` → Gzip decompression
/// - `.zst` → Zstandard decompression
/// - Otherwise → Plain file
pub fn open_file(path: impl AsRef<Path>) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension {
        "gz" => Ok(Box::new(GzDecoder::new(file))),
        "zst" => {
            let decoder = zstd::Decoder::new(file).with_context(|| {
                format!("Failed to create zstd decoder for: {}", path.display())
            })?;
            Ok(Box::new(decoder))
        }
        _ => Ok(Box::new(file)),
    }
}

/// Iterator over `\n`-terminated lines of a byte stream, decoded as lossy
/// UTF-8 with the line terminator (`\n` or `\r\n`) removed.
pub struct LossyLines<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                if self.buffer.ends_with(b"\n") {
                    self.buffer.pop();
                    if self.buffer.ends_with(b"\r") {
                        self.buffer.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buffer).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
