//! Where log lines come from.
//!
//! A [`SourceSpec`] describes the user's choice (files, stdin, or one of the
//! helper tools) plus the modifiers that apply to it (line limit, follow,
//! sudo, remote target). [`SourceSpec::plan`] turns it into a concrete
//! [`SourcePlan`]: either reading local files/stdin directly or running a
//! single command whose stdout is the log stream.

use anyhow::{bail, Context, Result};
use std::io::BufReader;
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, warn};

/// Standard location of the audit daemon's log.
pub const DEFAULT_AUDIT_LOG: &str = "/var/log/audit/audit.log";

/// Environment variable overriding [`DEFAULT_AUDIT_LOG`].
pub const AUDIT_LOG_ENV: &str = "AUDIT_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Files(Vec<PathBuf>),
    Stdin,
    /// Kernel ring buffer via `dmesg`.
    Dmesg,
    /// Kernel ring buffer via `busybox dmesg`, for minimal systems.
    DmesgBusybox,
    /// `journalctl` restricted to the audit transport.
    Journal,
    /// `ausearch` over today's events.
    Ausearch,
}

impl SourceKind {
    /// Source used when none was requested: the audit log when the user is
    /// at a terminal (or targeting a remote machine), stdin otherwise.
    pub fn implicit(stdin_is_terminal: bool, remote: bool) -> Self {
        if stdin_is_terminal || remote {
            SourceKind::Files(vec![default_log_path()])
        } else {
            SourceKind::Stdin
        }
    }
}

pub fn default_log_path() -> PathBuf {
    std::env::var_os(AUDIT_LOG_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIT_LOG))
}

/// Machine the source command runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    /// Reached with `ssh -t`.
    Host(String),
    /// Virtual machine reached with `vagrant ssh`.
    Guest(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub kind: SourceKind,
    pub lines: Option<usize>,
    pub follow: bool,
    pub sudo: bool,
    pub remote: Option<RemoteTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePlan {
    Files(Vec<PathBuf>),
    Stdin,
    Command(Vec<String>),
}

impl SourceSpec {
    pub fn plan(&self) -> Result<SourcePlan> {
        let base: Vec<String> = match &self.kind {
            SourceKind::Stdin => {
                if self.remote.is_some() || self.sudo {
                    bail!("standard input cannot be combined with --sudo, --remote or --guest");
                }
                if self.lines.is_some() || self.follow {
                    bail!("--lines and --follow need a file or journal source");
                }
                return Ok(SourcePlan::Stdin);
            }
            SourceKind::Files(paths) => {
                if self.lines.is_none() && !self.follow && !self.sudo && self.remote.is_none() {
                    return Ok(SourcePlan::Files(paths.clone()));
                }
                file_command(paths, self.lines, self.follow)?
            }
            SourceKind::Dmesg => {
                self.reject_line_limit("dmesg")?;
                let mut cmd = vec!["dmesg".to_string()];
                if self.follow {
                    cmd.push("--follow".to_string());
                }
                cmd
            }
            SourceKind::DmesgBusybox => {
                self.reject_line_limit("busybox dmesg")?;
                if self.follow {
                    bail!("busybox dmesg cannot follow the kernel log");
                }
                vec!["busybox".to_string(), "dmesg".to_string()]
            }
            SourceKind::Journal => {
                let mut cmd = strings(&["journalctl", "-o", "cat", "_TRANSPORT=audit"]);
                if let Some(n) = self.lines {
                    cmd.push("-n".to_string());
                    cmd.push(n.to_string());
                }
                if self.follow {
                    cmd.push("-f".to_string());
                }
                cmd
            }
            SourceKind::Ausearch => {
                self.reject_line_limit("ausearch")?;
                if self.follow {
                    bail!("ausearch cannot follow the audit log");
                }
                strings(&["ausearch", "-ts", "today"])
            }
        };

        let mut command = Vec::with_capacity(base.len() + 1);
        if self.sudo {
            command.push("sudo".to_string());
        }
        command.extend(base);

        Ok(SourcePlan::Command(match &self.remote {
            None => command,
            Some(RemoteTarget::Host(host)) => {
                let mut ssh = strings(&["ssh", "-t", host.as_str(), "--"]);
                ssh.push(shell_join(&command));
                ssh
            }
            Some(RemoteTarget::Guest(guest)) => {
                let mut vagrant = strings(&["vagrant", "ssh", guest.as_str(), "-c"]);
                vagrant.push(shell_join(&command));
                vagrant
            }
        }))
    }

    fn reject_line_limit(&self, tool: &str) -> Result<()> {
        if self.lines.is_some() {
            bail!("--lines is not supported with {tool}");
        }
        Ok(())
    }
}

fn file_command(paths: &[PathBuf], lines: Option<usize>, follow: bool) -> Result<Vec<String>> {
    let paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    if lines.is_none() && !follow {
        let mut cmd = vec!["cat".to_string()];
        cmd.extend(paths);
        return Ok(cmd);
    }
    if paths.len() != 1 {
        bail!("--lines and --follow apply to exactly one log file");
    }
    let mut cmd = vec!["tail".to_string()];
    if let Some(n) = lines {
        cmd.push("-n".to_string());
        cmd.push(n.to_string());
    }
    if follow {
        cmd.push("-F".to_string());
    }
    cmd.extend(paths);
    Ok(cmd)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Quote one argument for a POSIX shell.
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_./=:,@%+".contains(&b));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

pub fn shell_join(argv: &[String]) -> String {
    argv.iter()
        .map(|a| shell_quote(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A spawned helper whose stdout is the log stream.
pub struct ChildSource {
    program: String,
    child: Child,
}

impl ChildSource {
    pub fn spawn(argv: &[String]) -> Result<Self> {
        let (program, args) = argv.split_first().context("Empty source command")?;
        debug!(command = %shell_join(argv), "spawning log source");
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to run {}", program))?;
        Ok(Self {
            program: program.clone(),
            child,
        })
    }

    pub fn stdout(&mut self) -> Result<BufReader<ChildStdout>> {
        self.child
            .stdout
            .take()
            .map(BufReader::new)
            .context("Source command stdout already taken")
    }

    /// Wait for the child once its output is drained. A failing status is
    /// reported and returned, never turned into an error.
    pub fn finish(mut self) -> Result<i32> {
        let status = self
            .child
            .wait()
            .with_context(|| format!("Failed to wait for {}", self.program))?;
        if status.success() {
            return Ok(0);
        }
        warn!(program = %self.program, %status, "log source exited with failure");
        Ok(status.code().unwrap_or(1))
    }

    /// Stop the child after a fatal parse error.
    pub fn abort(mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
