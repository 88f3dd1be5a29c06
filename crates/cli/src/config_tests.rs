// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use respcap_capture::StatusClass;
use std::io::Write;
use std::time::Duration;

fn parse(toml_str: &str) -> ScopeFile {
    toml::from_str(toml_str).unwrap()
}

#[test]
fn test_empty_file_has_disabled_root() {
    let scopes = parse("").resolve().unwrap();
    assert_eq!(scopes.len(), 1);
    let root = scopes.get("").unwrap();
    assert!(!root.config().enabled);
    assert_eq!(root.config().variable, "response_body");
}

#[test]
fn test_nested_scopes_inherit() {
    let file = parse(
        r#"
[capture]
enabled = true
skip_status = ["2xx"]
latency_floor = "500ms"
buffer_size = "1 KiB"

[[servers]]
name = "api"
capture = { latency_floor = "200ms", request_headers = ["X-Debug="] }

[[servers.locations]]
name = "upload"
capture = { buffer_size = "64 KiB", skip_status = ["404"] }

[[servers.locations]]
name = "health"
capture = { enabled = false }
"#,
    );
    let scopes = file.resolve().unwrap();

    let paths: Vec<&str> = scopes.iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec!["", "api", "api/upload", "api/health"]);

    let upload = scopes.get("api/upload").unwrap().config();
    assert!(upload.enabled);
    assert!(upload.skip_classes.contains(StatusClass::Success));
    assert_eq!(upload.skip_codes, vec![404]);
    assert_eq!(upload.latency_floor, Duration::from_millis(200));
    assert_eq!(upload.buffer_size, 64 * 1024);
    assert_eq!(upload.request_headers.len(), 1);

    assert!(!scopes.get("api/health").unwrap().config().enabled);
}

#[test]
fn test_table_falls_back_to_server() {
    let file = parse(
        r#"
[[servers]]
name = "api"
capture = { enabled = true }
"#,
    );
    let table = file.resolve().unwrap().table();
    assert!(table.lookup("api/unknown").enabled);
    assert!(!table.lookup("static").enabled);
}

#[test]
fn test_unknown_directive_rejected() {
    let err = toml::from_str::<ScopeFile>(
        r#"
[capture]
enable = true
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown field"));
}

#[test]
fn test_invalid_directive_names_scope() {
    let file = parse(
        r#"
[[servers]]
name = "api"

[[servers.locations]]
name = "upload"
capture = { response_headers = ["X-Cache"] }
"#,
    );
    let err = file.resolve().unwrap_err();
    assert!(matches!(
        &err,
        ScopeFileError::Scope {
            path,
            source: ConfigError::HeaderCondition(_),
        } if path == "api/upload"
    ));
    assert_eq!(
        err.to_string(),
        "Invalid scope 'api/upload': invalid header condition \"X-Cache\": expected name=value"
    );
}

#[test]
fn test_invalid_root_directive_names_root() {
    let file = parse(
        r#"
[capture]
skip_status = ["6xx"]
"#,
    );
    let err = file.resolve().unwrap_err();
    assert!(err.to_string().starts_with("Invalid scope '(root)'"));
}

#[test]
fn test_duplicate_server_rejected() {
    let file = parse(
        r#"
[[servers]]
name = "api"

[[servers]]
name = "api"
"#,
    );
    let err = file.resolve().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: duplicate server name 'api'"
    );
}

#[test]
fn test_same_location_name_on_different_servers() {
    let file = parse(
        r#"
[[servers]]
name = "a"
[[servers.locations]]
name = "x"

[[servers]]
name = "b"
[[servers.locations]]
name = "x"
"#,
    );
    assert_eq!(file.resolve().unwrap().len(), 5);
}

#[test]
fn test_slash_in_name_rejected() {
    let file = parse(
        r#"
[[servers]]
name = "a/b"
"#,
    );
    assert!(matches!(
        file.resolve().unwrap_err(),
        ScopeFileError::Validation(_)
    ));
}

#[test]
fn test_load_json_by_extension() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{"capture": {"enabled": true, "variable": "body"}}"#)
        .unwrap();
    file.flush().unwrap();

    let scopes = ScopeFile::load(file.path()).unwrap().resolve().unwrap();
    assert_eq!(scopes.get("").unwrap().config().variable, "body");
}

#[test]
fn test_load_missing_file() {
    let err = ScopeFile::load(Path::new("/nonexistent/scopes.toml")).unwrap_err();
    assert!(matches!(err, ScopeFileError::Io(_)));
}
