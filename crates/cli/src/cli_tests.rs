// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

#[test]
fn test_parse_check() {
    let cli = Cli::try_parse_from(["respcap", "check", "scopes.toml"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Check { ref scopes } if scopes == &PathBuf::from("scopes.toml")
    ));
    assert_eq!(cli.format, OutputFormat::Text);
    assert_eq!(cli.verbose, 0);
}

#[test]
fn test_parse_replay() {
    let cli = Cli::try_parse_from(["respcap", "replay", "s.toml", "e.toml"]).unwrap();
    match cli.command {
        Command::Replay { scopes, exchange } => {
            assert_eq!(scopes, PathBuf::from("s.toml"));
            assert_eq!(exchange, PathBuf::from("e.toml"));
        }
        other => panic!("Expected replay, got {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli =
        Cli::try_parse_from(["respcap", "check", "s.toml", "--format", "json", "-vv"]).unwrap();
    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.verbose, 2);
}

#[test]
fn test_replay_requires_exchange() {
    assert!(Cli::try_parse_from(["respcap", "replay", "s.toml"]).is_err());
}

#[test]
fn test_unknown_format_rejected() {
    assert!(Cli::try_parse_from(["respcap", "--format", "yaml", "check", "s.toml"]).is_err());
}
