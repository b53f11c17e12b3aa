//! Command-line interface and its mapping onto [`ShowOptions`].

use crate::commands::show::ShowOptions;
use crate::display::DisplayOptions;
use crate::utils::source::{RemoteTarget, SourceKind, SourceSpec};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "selinux-audit")]
#[command(about = "Show Linux audit events, SELinux denials first", long_about = None)]
#[command(version)]
#[command(group(
    ArgGroup::new("source").args(["stdin", "dmesg", "dmesg_busybox", "journal", "ausearch"])
))]
pub struct Cli {
    /// Audit log file(s), plain or compressed (.gz, .zst); "-" reads stdin
    #[arg(conflicts_with = "source")]
    pub files: Vec<PathBuf>,

    /// Read standard input
    #[arg(long)]
    pub stdin: bool,

    /// Read the kernel ring buffer with dmesg
    #[arg(long)]
    pub dmesg: bool,

    /// Read the kernel ring buffer with busybox dmesg
    #[arg(long)]
    pub dmesg_busybox: bool,

    /// Read audit messages from the systemd journal
    #[arg(short, long)]
    pub journal: bool,

    /// Read today's events with ausearch
    #[arg(long)]
    pub ausearch: bool,

    /// Only read the last N lines (file and journal sources)
    #[arg(short = 'n', long, value_name = "N")]
    pub lines: Option<usize>,

    /// Keep reading as new events arrive
    #[arg(short, long)]
    pub follow: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Show every record type, not only SELinux ones
    #[arg(short, long)]
    pub all: bool,

    /// Print JSON Lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Run the source command with sudo
    #[arg(short, long)]
    pub sudo: bool,

    /// Run the source command on HOST through ssh
    #[arg(short, long, value_name = "HOST", conflicts_with = "guest")]
    pub remote: Option<String>,

    /// Run the source command in a Vagrant guest
    #[arg(long, value_name = "NAME")]
    pub guest: Option<String>,

    /// Show debug diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub generate_completion: Option<clap_complete::Shell>,
}

impl Cli {
    /// Default diagnostics filter, used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    fn remote_target(&self) -> Option<RemoteTarget> {
        match (&self.remote, &self.guest) {
            (Some(host), _) => Some(RemoteTarget::Host(host.clone())),
            (None, Some(guest)) => Some(RemoteTarget::Guest(guest.clone())),
            (None, None) => None,
        }
    }

    fn source_kind(&self, stdin_is_terminal: bool, remote: bool) -> SourceKind {
        if self.stdin {
            SourceKind::Stdin
        } else if self.dmesg {
            SourceKind::Dmesg
        } else if self.dmesg_busybox {
            SourceKind::DmesgBusybox
        } else if self.journal {
            SourceKind::Journal
        } else if self.ausearch {
            SourceKind::Ausearch
        } else if self.files.len() == 1 && self.files[0].as_os_str() == "-" {
            SourceKind::Stdin
        } else if !self.files.is_empty() {
            SourceKind::Files(self.files.clone())
        } else {
            SourceKind::implicit(stdin_is_terminal, remote)
        }
    }

    pub fn show_options(&self, stdin_is_terminal: bool, stdout_is_terminal: bool) -> ShowOptions {
        let remote = self.remote_target();
        ShowOptions {
            source: SourceSpec {
                kind: self.source_kind(stdin_is_terminal, remote.is_some()),
                lines: self.lines,
                follow: self.follow,
                sudo: self.sudo,
                remote,
            },
            display: DisplayOptions {
                show_all: self.all,
                color: stdout_is_terminal && !self.no_color && !self.json,
                json: self.json,
            },
        }
    }
}
