// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

/// Create a temporary file.
/// Detects JSON vs TOML content and uses the matching extension.
pub fn write_file(content: &str) -> NamedTempFile {
    let is_json = content.trim().starts_with('{');

    let mut file = if is_json {
        tempfile::Builder::new().suffix(".json").tempfile().unwrap()
    } else {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    };

    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Command for the respcap binary with a clean logging environment.
pub fn respcap() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_respcap"));
    cmd.env_remove("RESPCAP_LOG").env_remove("RESPCAP_FORMAT");
    cmd
}

pub fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}
