//! Display audit events from a file, stdin, or a helper command.
//!
//! # Usage
//!
//! ```bash
//! # SELinux denials from the local audit log
//! selinux-audit
//!
//! # Every record type, from rotated (compressed) logs
//! selinux-audit --all /var/log/audit/audit.log.1.gz /var/log/audit/audit.log
//!
//! # Follow the journal on a remote machine
//! selinux-audit --journal -f --sudo --remote server.example.org
//!
//! # Kernel ring buffer, JSON Lines output
//! selinux-audit --dmesg --json
//! ```
//!
//! Lines are processed strictly in arrival order. A fatal parse error stops
//! the run and names the offending line. When a helper command is used, its
//! exit status becomes the exit status of the run.

use crate::audit::classifier::parse_line;
use crate::display::{Disposition, DisplayOptions, Viewer};
use crate::utils::reader::{open_file, LossyLines};
use crate::utils::source::{ChildSource, SourcePlan, SourceSpec};
use anyhow::{Context, Result};
use std::io::{self, BufRead, BufReader, Write};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ShowOptions {
    pub source: SourceSpec,
    pub display: DisplayOptions,
}

/// Counters collected while processing, reported at debug level.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShowStats {
    pub lines: usize,
    pub skipped: usize,
    pub shown: usize,
    pub continuations: usize,
    pub hidden: usize,
}

impl ShowStats {
    pub fn report(&self) {
        debug!(
            lines = self.lines,
            skipped = self.skipped,
            shown = self.shown,
            continuations = self.continuations,
            hidden = self.hidden,
            "processing summary"
        );
    }
}

/// Run the pipeline and return the process exit status.
pub fn run(options: &ShowOptions) -> Result<i32> {
    let plan = options.source.plan()?;
    let mut viewer = Viewer::new(&options.display);
    let mut stats = ShowStats::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let status = match plan {
        SourcePlan::Files(paths) => {
            for path in &paths {
                let reader = BufReader::new(open_file(path)?);
                let label = path.display().to_string();
                process_lines(reader, &mut out, &mut viewer, &mut stats, &label)?;
            }
            0
        }
        SourcePlan::Stdin => {
            let stdin = io::stdin();
            process_lines(stdin.lock(), &mut out, &mut viewer, &mut stats, "<stdin>")?;
            0
        }
        SourcePlan::Command(argv) => {
            let mut child = ChildSource::spawn(&argv)?;
            let reader = child.stdout()?;
            if let Err(e) = process_lines(reader, &mut out, &mut viewer, &mut stats, &argv[0]) {
                child.abort();
                return Err(e);
            }
            child.finish()?
        }
    };

    stats.report();
    Ok(status)
}

/// Classify, tokenize and render every line of `reader`.
///
/// Unrecognized lines are skipped; malformed ones abort with the source
/// label and line number attached.
pub fn process_lines<R: BufRead, W: Write>(
    reader: R,
    out: &mut W,
    viewer: &mut Viewer,
    stats: &mut ShowStats,
    label: &str,
) -> Result<()> {
    for (idx, line) in LossyLines::new(reader).enumerate() {
        let line = line.with_context(|| format!("Failed to read from {}", label))?;
        stats.lines += 1;

        let entry = parse_line(&line)
            .with_context(|| format!("{}: line {}: {}", label, idx + 1, line))?;
        let Some(entry) = entry else {
            stats.skipped += 1;
            continue;
        };

        match viewer.write_entry(&entry, out)? {
            Disposition::Shown => stats.shown += 1,
            Disposition::Continuation => stats.continuations += 1,
            Disposition::Hidden => stats.hidden += 1,
        }
    }
    out.flush()?;
    Ok(())
}
