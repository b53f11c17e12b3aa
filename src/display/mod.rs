//! Deciding what is shown and how.
//!
//! - [`policy`] - which record types start a displayed event
//! - [`tracker`] - continuation detection across consecutive lines
//! - [`formatter`] - text and JSON rendering
//!
//! [`Viewer`] ties them together and owns the only state carried from one
//! line to the next: the stamp of the last displayed event.

pub mod formatter;
pub mod policy;
pub mod tracker;

use crate::audit::types::LogEntry;
use crate::utils::color::Palette;
use anyhow::Result;
use formatter::{json_line, TextFormatter};
use policy::DisplayPolicy;
use std::io::Write;
use tracker::ContinuationTracker;

/// Output lines end with CRLF so they stay aligned when the stream is shown
/// through a terminal left in raw mode by `ssh -t`.
pub const LINE_TERMINATOR: &str = "\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    pub show_all: bool,
    pub color: bool,
    pub json: bool,
}

/// What happened to an entry handed to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Shown,
    Continuation,
    Hidden,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Text(TextFormatter),
    Json,
}

pub struct Viewer {
    policy: DisplayPolicy,
    tracker: ContinuationTracker,
    format: OutputFormat,
}

impl Viewer {
    pub fn new(options: &DisplayOptions) -> Self {
        let format = if options.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text(TextFormatter::new(Palette::new(options.color)))
        };
        Self {
            policy: DisplayPolicy::new(options.show_all),
            tracker: ContinuationTracker::new(),
            format,
        }
    }

    /// Decide the fate of `entry` and return the lines to print, without
    /// terminators.
    pub fn render(&mut self, entry: &LogEntry) -> Result<(Disposition, Vec<String>)> {
        let continuation = self.tracker.is_continuation(entry.stamp.as_ref());

        if entry.is_internal_notice() {
            if !continuation {
                self.tracker.reset();
            }
            return Ok((Disposition::Hidden, Vec::new()));
        }

        let disposition = if continuation {
            Disposition::Continuation
        } else if self.policy.shows(&entry.record_type) {
            self.tracker.start(entry.stamp);
            Disposition::Shown
        } else {
            self.tracker.reset();
            return Ok((Disposition::Hidden, Vec::new()));
        };

        let lines = match (&self.format, disposition) {
            (OutputFormat::Json, _) => vec![json_line(entry, continuation)?],
            (OutputFormat::Text(text), Disposition::Continuation) => text.continuation(entry),
            (OutputFormat::Text(text), _) => text.event(entry),
        };
        Ok((disposition, lines))
    }

    /// Render `entry` and write it to `out`.
    pub fn write_entry<W: Write>(&mut self, entry: &LogEntry, out: &mut W) -> Result<Disposition> {
        let (disposition, lines) = self.render(entry)?;
        for line in lines {
            out.write_all(line.as_bytes())?;
            out.write_all(LINE_TERMINATOR.as_bytes())?;
        }
        Ok(disposition)
    }
}
