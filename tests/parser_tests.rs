/// Parsing properties checked across the public API: type catalog
/// equivalence, value kinds, idempotence and timestamp boundaries.
use selinux_audit_tools::audit::catalog::RECORD_TYPES;
use selinux_audit_tools::audit::classifier::parse_line;
use selinux_audit_tools::audit::error::AuditError;
use selinux_audit_tools::audit::tokenizer::tokenize;
use selinux_audit_tools::audit::types::{EventStamp, FieldValue, LogEntry};

fn entry(line: &str) -> LogEntry {
    parse_line(line)
        .unwrap_or_else(|e| panic!("{line}: {e}"))
        .unwrap_or_else(|| panic!("{line}: skipped"))
}

#[test]
fn test_numeric_and_symbolic_types_are_equivalent() {
    let payload = "pid=100 uid=0 auid=n/a ses=4 comm=\"sshd\" res=success";
    for (code, name) in RECORD_TYPES {
        let numeric = entry(&format!("type={code} msg=audit(1000000000.123:45): {payload}"));
        let symbolic = entry(&format!("type={name} msg=audit(1000000000.123:45): {payload}"));
        assert_eq!(numeric, symbolic, "type {code} / {name}");
        assert_eq!(numeric.record_type.code(), Some(*code));
    }
}

#[test]
fn test_unknown_numeric_type_is_fatal() {
    let result = parse_line("type=9999 msg=audit(1000000000.123:45): pid=1");
    assert_eq!(result, Err(AuditError::UnknownRecordType(9999)));
    let result = parse_line("type=UNKNOWN[9999] msg=audit(1000000000.123:45): pid=1");
    assert_eq!(result, Err(AuditError::UnknownRecordType(9999)));
}

#[test]
fn test_unknown_bracket_spelling_matches_numeric_form() {
    let payload = "pid=100 uid=0 res=success";
    for (code, _) in RECORD_TYPES {
        let bracketed = entry(&format!("type=UNKNOWN[{code}] msg=audit(1000000000.123:45): {payload}"));
        let numeric = entry(&format!("type={code} msg=audit(1000000000.123:45): {payload}"));
        assert_eq!(bracketed, numeric, "type {code}");
    }
}

#[test]
fn test_every_value_kind_decodes() {
    let pairs = [
        ("a0", "ff", FieldValue::Int(0xff)),
        ("ioctlcmd", "0x5401", FieldValue::Int(0x5401)),
        ("mode", "0100644", FieldValue::Int(0o100644)),
        ("saddr", "0200", FieldValue::Bytes(vec![0x02, 0x00])),
        ("uid", "1000", FieldValue::Int(1000)),
        ("auid", "n/a", FieldValue::Null),
        ("comm", "\"bash\"", FieldValue::from("bash")),
        ("proctitle", "2F62696E2F7368", FieldValue::from("/bin/sh")),
        ("tclass", "file", FieldValue::from("file")),
        ("success", "yes", FieldValue::Bool(true)),
    ];
    let line: Vec<String> = pairs.iter().map(|(k, v, _)| format!("{k}={v}")).collect();
    let record = tokenize(&line.join(" ")).unwrap();

    assert_eq!(record.len(), pairs.len());
    for (key, _, expected) in &pairs {
        assert_eq!(record.get(*key), Some(expected), "{key}");
    }
    let keys: Vec<&str> = record.keys().map(String::as_str).collect();
    let expected_keys: Vec<&str> = pairs.iter().map(|(k, _, _)| *k).collect();
    assert_eq!(keys, expected_keys);
}

#[test]
fn test_tokenize_is_idempotent() {
    let payload = "avc:  denied  { read write } for  pid=100 comm=\"sshd\" path=\"/etc/shadow\" \
                   scontext=system_u:system_r:sshd_t:s0 tcontext=system_u:object_r:shadow_t:s0 tclass=file permissive=0";
    assert_eq!(tokenize(payload).unwrap(), tokenize(payload).unwrap());
}

#[test]
fn test_millisecond_field_must_have_three_digits() {
    for stamp in [
        "1000000000.12:45",
        "1000000000.1234:45",
        "1000000000.1:45",
        "1000000000:45",
        "1000000000.:45",
        "1000000000.12a:45",
    ] {
        let line = format!("type=AVC msg=audit({stamp}): pid=1");
        assert!(
            matches!(parse_line(&line), Err(AuditError::MalformedTimestamp(_))),
            "{line}"
        );
    }
    assert!(matches!(
        parse_line("type=1400 audit(1000000000:45): pid=1"),
        Err(AuditError::MalformedTimestamp(_))
    ));
    let ok = entry("type=AVC msg=audit(1000000000.000:45): pid=1");
    assert_eq!(
        ok.stamp,
        Some(EventStamp {
            seconds: 1_000_000_000,
            millis: 0,
            serial: 45,
        })
    );
}

#[test]
fn test_not_applicable_is_null() {
    let record = tokenize("auid=n/a uid=0").unwrap();
    assert_eq!(record.get("auid"), Some(&FieldValue::Null));
    assert_eq!(record.get("uid"), Some(&FieldValue::Int(0)));
}

#[test]
fn test_line_shapes() {
    let kernel = entry(
        "[  12.345678] audit: type=1400 audit(1000000000.123:45): avc:  denied  { read } for  pid=1 comm=\"a\" \
         scontext=u:r:a_t:s0 tcontext=u:r:b_t:s0 tclass=file",
    );
    assert_eq!(kernel.record_type.name(), "AVC");
    assert_eq!(kernel.get("avc/result"), Some(&FieldValue::from("denied")));

    let node = entry("node=host1 type=EOE msg=audit(1000000000.123:45): ");
    assert_eq!(node.record_type.name(), "EOE");
    assert!(node.fields.is_empty());

    let bare = entry("DAEMON_END op=terminate auid=0 pid=1 res=success");
    assert_eq!(bare.stamp, None);
    assert_eq!(bare.get("res"), Some(&FieldValue::Bool(true)));

    assert_eq!(parse_line("----"), Ok(None));
    assert_eq!(parse_line("time->Sun Sep  9 03:46:40 2001"), Ok(None));
    assert_eq!(parse_line("Linux version 6.1.0 (gcc)"), Ok(None));
}

#[test]
fn test_user_avc_nests_decision() {
    let user_avc = entry(
        "type=USER_AVC msg=audit(1000000000.123:46): pid=1 uid=0 auid=4294967295 ses=4294967295 \
         subj=system_u:system_r:init_t:s0 msg='avc:  denied  { status } for auid=n/a uid=0 gid=0 \
         cmdline=\"/usr/bin/systemctl status\" scontext=system_u:system_r:init_t:s0 \
         tcontext=system_u:system_r:init_t:s0 tclass=system permissive=0  exe=\"/usr/lib/systemd/systemd\" \
         sauid=0 hostname=? addr=? terminal=?'",
    );
    assert_eq!(
        user_avc.get("msg/avc/perms"),
        Some(&FieldValue::List(vec!["status".into()]))
    );
    assert_eq!(
        user_avc.get("msg/avc/for/cmdline"),
        Some(&FieldValue::from("/usr/bin/systemctl status"))
    );
    assert_eq!(
        user_avc.get("msg/avc/for/permissive"),
        Some(&FieldValue::Bool(false))
    );
}
