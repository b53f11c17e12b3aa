/// End-to-end tests for the show pipeline: lines in, rendered lines out.
use selinux_audit_tools::commands::show::{process_lines, run, ShowOptions, ShowStats};
use selinux_audit_tools::display::{DisplayOptions, Viewer};
use selinux_audit_tools::utils::reader::open_file;
use selinux_audit_tools::utils::source::{SourceKind, SourceSpec};
use std::fs::File;
use std::io::{BufReader, Cursor, Write};
use tempfile::TempDir;

const AVC_SELF: &str = "type=AVC msg=audit(1000000000.123:45): avc:  denied  { read write } for  pid=100 comm=\"sshd\" scontext=system_u:system_r:sshd_t:s0 tcontext=system_u:system_r:sshd_t:s0 tclass=file";
const SYSCALL: &str = "type=SYSCALL msg=audit(1000000000.123:45): arch=c000003e syscall=2 success=no exit=-13 pid=100 comm=\"sshd\"";
const PROCTITLE: &str = "type=PROCTITLE msg=audit(1000000000.123:45): proctitle=2F7573722F7362696E2F73736864002D44";
const LOGIN: &str = "type=USER_LOGIN msg=audit(1000000002.000:50): pid=5 uid=0 auid=1000 ses=3 msg='op=login id=1000 exe=\"/usr/sbin/sshd\" hostname=? addr=10.0.0.1 terminal=ssh res=success'";

fn render(input: &str, display: DisplayOptions) -> (Vec<String>, ShowStats) {
    let mut viewer = Viewer::new(&display);
    let mut stats = ShowStats::default();
    let mut out = Vec::new();
    process_lines(Cursor::new(input), &mut out, &mut viewer, &mut stats, "test").unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.is_empty() || text.ends_with("\r\n"));
    let lines = text
        .split_terminator("\r\n")
        .map(str::to_string)
        .collect();
    (lines, stats)
}

fn spec(kind: SourceKind) -> SourceSpec {
    SourceSpec {
        kind,
        lines: None,
        follow: false,
        sudo: false,
        remote: None,
    }
}

#[test]
fn test_avc_on_self_is_a_single_line() {
    let (lines, _) = render(AVC_SELF, DisplayOptions::default());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("denied sshd_t self:file { read write } comm='sshd' pid=100"));
}

#[test]
fn test_avc_on_other_target() {
    let input = "type=AVC msg=audit(1000000000.123:45): avc:  denied  { read write } for  pid=100 comm=\"sshd\" scontext=system_u:system_r:sshd_t:s0 tcontext=system_u:object_r:etc_t:s0 tclass=file";
    let (lines, _) = render(input, DisplayOptions::default());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("denied sshd_t etc_t:file { read write }"));
}

#[test]
fn test_numeric_type_renders_like_symbolic() {
    let numeric = "type=1400 audit(1000000000.000:1): avc:  granted  { read } for  pid=1 comm=\"init\" scontext=a:b:init_t:s0 tcontext=a:b:bin_t:s0 tclass=file";
    let symbolic = numeric.replacen("type=1400 ", "type=AVC msg=", 1);
    let (from_numeric, _) = render(numeric, DisplayOptions::default());
    let (from_symbolic, _) = render(&symbolic, DisplayOptions::default());
    assert_eq!(from_numeric, from_symbolic);
    assert!(from_numeric[0].contains("granted init_t bin_t:file { read }"));
}

#[test]
fn test_separator_produces_no_output() {
    let (lines, stats) = render("----\n", DisplayOptions::default());
    assert!(lines.is_empty());
    assert_eq!(stats.skipped, 1);
}

#[test]
fn test_event_records_follow_their_avc() {
    let input = [AVC_SELF, SYSCALL, PROCTITLE, LOGIN].join("\n");
    let (lines, stats) = render(&input, DisplayOptions::default());

    assert_eq!(stats.shown, 1);
    assert_eq!(stats.continuations, 2);
    assert_eq!(stats.hidden, 1);
    assert!(lines.contains(&"  SYSCALL".to_string()));
    assert!(lines.contains(&"      exit = -13".to_string()));
    assert!(lines.contains(&"  PROCTITLE".to_string()));
    assert!(lines.contains(&"      proctitle = '/usr/sbin/sshd -D'".to_string()));
    assert!(!lines.iter().any(|l| l.contains("USER_LOGIN")));
}

#[test]
fn test_show_all_includes_other_types() {
    let input = [AVC_SELF, SYSCALL, LOGIN].join("\n");
    let (lines, stats) = render(
        &input,
        DisplayOptions {
            show_all: true,
            ..DisplayOptions::default()
        },
    );
    assert_eq!(stats.shown, 2);
    assert!(lines.iter().any(|l| l.ends_with("USER_LOGIN")));
    assert!(lines.contains(&"    msg/addr = '10.0.0.1'".to_string()));
    assert!(lines.contains(&"    msg/res = true".to_string()));
}

#[test]
fn test_json_lines() {
    let input = [AVC_SELF, SYSCALL].join("\n");
    let (lines, _) = render(
        &input,
        DisplayOptions {
            json: true,
            ..DisplayOptions::default()
        },
    );
    assert_eq!(lines.len(), 2);
    let avc: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(avc["type"], "AVC");
    assert_eq!(avc["serial"], 45);
    assert_eq!(avc["continuation"], false);
    assert_eq!(avc["fields"]["avc/perms"], serde_json::json!(["read", "write"]));
    let syscall: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(syscall["continuation"], true);
    assert_eq!(syscall["fields"]["success"], false);
}

#[test]
fn test_colors_are_ansi() {
    let (lines, _) = render(
        AVC_SELF,
        DisplayOptions {
            color: true,
            ..DisplayOptions::default()
        },
    );
    assert!(lines[0].contains("\x1b["));
}

#[test]
fn test_compressed_log_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.log.gz");
    let file = File::create(&path).unwrap();
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    writeln!(encoder, "{}\n{}", AVC_SELF, SYSCALL).unwrap();
    encoder.finish().unwrap();

    let mut viewer = Viewer::new(&DisplayOptions::default());
    let mut stats = ShowStats::default();
    let mut out = Vec::new();
    let reader = BufReader::new(open_file(&path).unwrap());
    process_lines(reader, &mut out, &mut viewer, &mut stats, "audit.log.gz").unwrap();
    assert_eq!(stats.lines, 2);
    assert_eq!(stats.shown, 1);
    assert_eq!(stats.continuations, 1);
}

#[test]
fn test_run_over_files() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("audit.log.1");
    let second = dir.path().join("audit.log");
    std::fs::write(&first, format!("{AVC_SELF}\n")).unwrap();
    std::fs::write(&second, format!("{SYSCALL}\n")).unwrap();

    let options = ShowOptions {
        source: spec(SourceKind::Files(vec![first, second])),
        display: DisplayOptions::default(),
    };
    assert_eq!(run(&options).unwrap(), 0);
}

#[test]
fn test_run_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let options = ShowOptions {
        source: spec(SourceKind::Files(vec![dir.path().join("missing.log")])),
        display: DisplayOptions::default(),
    };
    let err = run(&options).unwrap_err();
    assert!(format!("{err:#}").contains("missing.log"));
}

#[test]
fn test_run_with_line_limit_uses_tail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.log");
    std::fs::write(&path, format!("{AVC_SELF}\n{SYSCALL}\n")).unwrap();

    let mut source = spec(SourceKind::Files(vec![path]));
    source.lines = Some(1);
    let options = ShowOptions {
        source,
        display: DisplayOptions::default(),
    };
    assert_eq!(run(&options).unwrap(), 0);
}
