//! # SELinux Audit Tools
//!
//! Command-line viewer for Linux audit records with an emphasis on SELinux
//! access decisions.
//!
//! ## Overview
//!
//! Audit records arrive from many places: `/var/log/audit/audit.log`, the
//! kernel ring buffer, the systemd journal or `ausearch`, possibly on
//! another machine. This crate classifies each line, tokenizes its payload
//! into typed fields and renders the interesting events in a compact,
//! colored form. AVC denials are collapsed into a single summary line such as:
//!
//! ```text
//! 2001-09-09 01:46:40.123 denied sshd_t self:file { read } path='/etc/shadow' comm='sshd' pid=1234
//! ```
//!
//! ## Features
//!
//! - **All record formats** - `type=NAME msg=audit(...)`, numeric
//!   `type=1400`, kernel `audit:` prefixes and `ausearch` output
//! - **Typed fields** - hex, octal and ioctl numbers, hex-encoded strings,
//!   nested `msg='...'` payloads and `SADDR={...}` sections
//! - **Continuation tracking** - records belonging to a displayed event are
//!   printed underneath it
//! - **Compressed files** - `.gz` and `.zst` are read transparently
//! - **Remote sources** - `ssh` and `vagrant ssh` wrappers, optional `sudo`
//! - **JSON Lines output** for further processing
//!
//! ## Architecture
//!
//! - [`audit`] - record catalog, line classification and tokenization
//! - [`display`] - filtering, continuation tracking and rendering
//! - [`commands`] - the end-to-end pipeline
//! - [`cli`] - command-line flags
//! - [`utils`] - input sources, readers, colors and time formatting
//!
//! ## Example Usage
//!
//! ```bash
//! # SELinux events from the local audit log
//! selinux-audit
//!
//! # Everything, from a rotated log
//! selinux-audit --all /var/log/audit/audit.log.1.gz
//!
//! # Follow the journal of a Vagrant guest
//! selinux-audit --journal -f --sudo --guest default
//! ```

pub mod audit;
pub mod cli;
pub mod commands;
pub mod display;
pub mod utils;
