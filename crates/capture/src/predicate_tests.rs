// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::status::StatusClass;
use rstest::rstest;
use std::collections::HashMap;

// =========================================================================
// HeaderCondition
// =========================================================================

#[test]
fn test_parse_header_with_value() {
    let cond = HeaderCondition::parse("X-Debug=1").unwrap();
    assert_eq!(cond, HeaderCondition::new("X-Debug", "1"));
}

#[test]
fn test_parse_header_presence_only() {
    let cond = HeaderCondition::parse("X-Debug=").unwrap();
    assert_eq!(cond.name, "X-Debug");
    assert!(cond.value.is_empty());
}

#[test]
fn test_parse_header_value_keeps_later_separators() {
    let cond = HeaderCondition::parse("Cookie=a=b").unwrap();
    assert_eq!(cond.value, "a=b");
}

#[rstest]
#[case("X-Debug")]
#[case("=1")]
#[case("")]
fn test_parse_header_invalid(#[case] s: &str) {
    assert!(matches!(
        HeaderCondition::parse(s),
        Err(ConfigError::HeaderCondition(_))
    ));
}

#[rstest]
#[case("x-debug", "", true)]
#[case("X-DEBUG", "1", true)]
#[case("X-Debug", "ON", true)]
#[case("X-Debug", "off", false)]
#[case("X-Other", "", false)]
fn test_header_matching(#[case] name: &str, #[case] value: &str, #[case] expected: bool) {
    let headers = Headers::new()
        .with("Accept", "*/*")
        .with("X-Debug", "1")
        .with("X-Debug", "on");
    assert_eq!(HeaderCondition::new(name, value).matches(&headers), expected);
}

#[test]
fn test_header_matching_skips_deleted() {
    let mut headers = Headers::new().with("X-Debug", "1");
    headers.remove("X-Debug");
    assert!(!HeaderCondition::new("X-Debug", "").matches(&headers));
}

// =========================================================================
// Expected / ValueCondition
// =========================================================================

#[rstest]
#[case(None, Expected::Any)]
#[case(Some(""), Expected::Any)]
#[case(Some("*"), Expected::Any)]
#[case(Some(" * "), Expected::Any)]
#[case(Some("yes"), Expected::Exact("yes".to_string()))]
fn test_expected_parse(#[case] raw: Option<&str>, #[case] expected: Expected) {
    assert_eq!(Expected::parse(raw), expected);
}

#[rstest]
#[case(Expected::Any, "", false)]
#[case(Expected::Any, "anything", true)]
#[case(Expected::Exact("Yes".to_string()), "yes", true)]
#[case(Expected::Exact("Yes".to_string()), "no", false)]
#[case(Expected::Exact("Yes".to_string()), "", false)]
fn test_expected_matches(#[case] expected: Expected, #[case] value: &str, #[case] hit: bool) {
    assert_eq!(expected.matches(value), hit);
}

#[test]
fn test_value_condition_unresolved_never_matches() {
    let cond = ValueCondition::compile("$missing", Some("*")).unwrap();
    let vars: HashMap<String, String> = HashMap::new();
    assert!(!cond.matches(&vars));
}

#[test]
fn test_value_condition_matches_evaluated() {
    let cond = ValueCondition::compile("$arg_trace", Some("ON")).unwrap();
    let mut vars = HashMap::new();
    vars.insert("arg_trace".to_string(), "on".to_string());
    assert!(cond.matches(&vars));
}

// =========================================================================
// PredicateSet::compile
// =========================================================================

#[test]
fn test_compile_full_directives() {
    let toml_str = r#"
enabled = true
variable = "upstream_body"
skip_status = ["2xx", "3XX", "404"]
latency_floor = "250ms"
buffer_size = "8 KiB"
request_headers = ["X-Debug=", "X-Mode=quiet"]
response_headers = ["Content-Type=image/png"]

[[values]]
expr = "$arg_nocapture"

[[values]]
expr = "$cookie_mode"
expected = "silent"
"#;
    let directives: ScopeDirectives = toml::from_str(toml_str).unwrap();
    let set = PredicateSet::compile(&directives).unwrap();

    assert_eq!(set.enabled, Some(true));
    assert_eq!(set.variable.as_deref(), Some("upstream_body"));
    assert!(set.skip_classes.contains(StatusClass::Success));
    assert!(set.skip_classes.contains(StatusClass::Redirection));
    assert!(!set.skip_classes.contains(StatusClass::ClientError));
    assert_eq!(set.skip_codes, vec![404]);
    assert_eq!(set.latency_floor, Some(Duration::from_millis(250)));
    assert_eq!(set.buffer_size, Some(8 * 1024));
    assert_eq!(set.request_headers.len(), 2);
    assert_eq!(set.response_headers.len(), 1);
    assert_eq!(set.values.len(), 2);
    assert_eq!(set.values[0].expected, Expected::Any);
    assert_eq!(set.values[1].expected, Expected::Exact("silent".to_string()));
}

#[test]
fn test_compile_empty_directives_leaves_everything_unset() {
    let set = PredicateSet::compile(&ScopeDirectives::default()).unwrap();
    assert_eq!(set, PredicateSet::new());
}

#[test]
fn test_compile_numeric_buffer_size() {
    let directives: ScopeDirectives = toml::from_str("buffer_size = 1024").unwrap();
    let set = PredicateSet::compile(&directives).unwrap();
    assert_eq!(set.buffer_size, Some(1024));
}

#[test]
fn test_compile_zero_buffer_size_rejected() {
    let directives: ScopeDirectives = toml::from_str("buffer_size = 0").unwrap();
    assert_eq!(
        PredicateSet::compile(&directives),
        Err(ConfigError::BufferSize)
    );
}

#[rstest]
#[case("1500us")]
#[case("250ms 10us")]
#[case("999ns")]
fn test_compile_sub_millisecond_floor_rejected(#[case] floor: &str) {
    let directives: ScopeDirectives =
        toml::from_str(&format!("latency_floor = \"{}\"", floor)).unwrap();
    assert!(matches!(
        PredicateSet::compile(&directives),
        Err(ConfigError::LatencyFloor(_))
    ));
}

#[test]
fn test_compile_whole_millisecond_floor_accepted() {
    let directives: ScopeDirectives = toml::from_str(r#"latency_floor = "1s 5ms""#).unwrap();
    let set = PredicateSet::compile(&directives).unwrap();
    assert_eq!(set.latency_floor, Some(Duration::from_millis(1005)));
}

#[test]
fn test_compile_strips_variable_sigil() {
    let directives: ScopeDirectives = toml::from_str(r#"variable = "$body""#).unwrap();
    let set = PredicateSet::compile(&directives).unwrap();
    assert_eq!(set.variable.as_deref(), Some("body"));
}

#[rstest]
#[case(r#"variable = "bad name""#)]
#[case(r#"skip_status = ["teapot"]"#)]
#[case(r#"skip_status = ["0"]"#)]
#[case(r#"request_headers = ["X-Debug"]"#)]
#[case(r#"response_headers = ["=x"]"#)]
#[case(r#"values = [{ expr = "$" }]"#)]
fn test_compile_rejects_malformed(#[case] toml_str: &str) {
    let directives: ScopeDirectives = toml::from_str(toml_str).unwrap();
    assert!(PredicateSet::compile(&directives).is_err());
}

#[test]
fn test_unknown_directive_rejected() {
    let result: Result<ScopeDirectives, _> = toml::from_str("capture_everything = true");
    assert!(result.is_err());
}

#[test]
fn test_builder() {
    let set = PredicateSet::new()
        .enabled(true)
        .skip(StatusRule::Class(StatusClass::Success))
        .skip(StatusRule::Code(418))
        .latency_floor(Duration::from_secs(1))
        .buffer_size(16)
        .request_header(HeaderCondition::new("X-Debug", ""))
        .response_header(HeaderCondition::new("Content-Type", "image/png"));

    assert_eq!(set.enabled, Some(true));
    assert!(set.skip_classes.contains(StatusClass::Success));
    assert_eq!(set.skip_codes, vec![418]);
    assert_eq!(set.buffer_size, Some(16));
    assert_eq!(set.request_headers.len(), 1);
    assert_eq!(set.response_headers.len(), 1);
}
