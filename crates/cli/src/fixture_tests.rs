// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use respcap_capture::VariableSource;
use proptest::prelude::*;
use rstest::rstest;

fn parse(toml_str: &str) -> ExchangeFixture {
    toml::from_str(toml_str).unwrap()
}

#[test]
fn test_minimal_fixture() {
    let fixture = parse("status = 200");
    assert_eq!(fixture.route, "");
    assert_eq!(fixture.elapsed, Duration::ZERO);
    assert_eq!(fixture.chunks(), vec![BodyChunk::Last]);
}

#[test]
fn test_chunks_in_order_with_file_offsets() {
    let fixture = parse(
        r#"
status = 200
body = ["abc", { file = 10 }, { flush = true }, "de", { file = 4 }]
"#,
    );
    assert_eq!(
        fixture.chunks(),
        vec![
            BodyChunk::from("abc"),
            BodyChunk::File { offset: 3, len: 10 },
            BodyChunk::Flush,
            BodyChunk::from("de"),
            BodyChunk::File { offset: 15, len: 4 },
            BodyChunk::Last,
        ]
    );
}

#[test]
fn test_exchange_carries_request_side() {
    let fixture = parse(
        r#"
route = "api/users"
status = 404
request_headers = [{ name = "X-Debug", value = "1" }, { name = "X-Flag" }]
response_headers = [{ name = "Content-Type", value = "text/plain" }]

[vars]
arg_trace = "on"
"#,
    );
    let mut ex = fixture.exchange(1_000);
    assert_eq!(ex.scope, "api/users");
    assert_eq!(ex.started_at_ms, 1_000);
    assert_eq!(ex.request_headers.get("x-debug"), Some("1"));
    assert_eq!(ex.request_headers.get("X-Flag"), Some(""));
    assert_eq!(ex.variable("arg_trace").as_deref(), Some("on"));
    assert_eq!(ex.status, 0);
    assert!(ex.response_headers.is_empty());

    fixture.respond(&mut ex);
    assert_eq!(ex.status, 404);
    assert_eq!(ex.response_headers.get("content-type"), Some("text/plain"));
}

#[rstest]
#[case("elapsed = \"250ms\"", 250)]
#[case("elapsed = \"2s\"", 2_000)]
#[case("elapsed = \"1m 5s\"", 65_000)]
fn test_elapsed_parsing(#[case] line: &str, #[case] millis: u64) {
    let fixture = parse(&format!("status = 200\n{}", line));
    assert_eq!(fixture.elapsed, Duration::from_millis(millis));
}

#[rstest]
#[case(0)]
#[case(99)]
#[case(1000)]
fn test_invalid_status_rejected(#[case] status: u16) {
    let fixture = parse(&format!("status = {}", status));
    assert!(matches!(
        fixture.validate(),
        Err(FixtureError::Validation(_))
    ));
}

#[test]
fn test_unknown_field_rejected() {
    let err = toml::from_str::<ExchangeFixture>("status = 200\nstatsu = 1").unwrap_err();
    assert!(err.to_string().contains("unknown field"));
}

#[test]
fn test_missing_status_rejected() {
    assert!(toml::from_str::<ExchangeFixture>("route = \"api\"").is_err());
}

#[test]
fn test_json_fixture() {
    let fixture: ExchangeFixture =
        serde_json::from_str(r#"{"status": 500, "body": ["oops", {"file": 8}]}"#).unwrap();
    assert_eq!(fixture.chunks().len(), 3);
}

#[test]
fn test_file_offsets_saturate() {
    let json = format!(
        r#"{{"status": 200, "body": [{{"file": {max}}}, {{"file": {max}}}, "x"]}}"#,
        max = u64::MAX
    );
    let fixture: ExchangeFixture = serde_json::from_str(&json).unwrap();
    let chunks = fixture.chunks();
    assert_eq!(
        chunks[1],
        BodyChunk::File {
            offset: u64::MAX,
            len: u64::MAX
        }
    );
    assert_eq!(chunks[2], BodyChunk::from("x"));
}

proptest! {
    #[test]
    fn file_offsets_follow_preceding_chunks(
        lens in proptest::collection::vec(0u64..10_000, 0..16)
    ) {
        let fixture = ExchangeFixture {
            body: lens.iter().map(|&file| ChunkSpec::File { file }).collect(),
            ..parse("status = 200")
        };
        let mut expected = 0;
        let chunks = fixture.chunks();
        prop_assert_eq!(chunks.len(), lens.len() + 1);
        for (chunk, len) in chunks.iter().zip(&lens) {
            prop_assert_eq!(chunk, &BodyChunk::File { offset: expected, len: *len });
            expected += len;
        }
        prop_assert_eq!(chunks.last(), Some(&BodyChunk::Last));
    }
}
