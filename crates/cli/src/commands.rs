// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand execution.

use crate::cli::{Cli, Command};
use crate::config::{ResolvedScopes, ScopeFile, ScopeFileError};
use crate::fixture::{ExchangeFixture, FixtureError};
use crate::output;
use crate::replay::replay;
use respcap_capture::StageError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reported by the binary.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{}: {source}", .path.display())]
    Scopes {
        path: PathBuf,
        #[source]
        source: ScopeFileError,
    },

    #[error("{}: {source}", .path.display())]
    Exchange {
        path: PathBuf,
        #[source]
        source: FixtureError,
    },

    #[error("Replay failed: {0}")]
    Stage(#[from] StageError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Run the parsed command, writing results to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CommandError> {
    match &cli.command {
        Command::Check { scopes } => {
            let resolved = load_scopes(scopes)?;
            tracing::debug!(scopes = resolved.len(), "scope file compiled");
            output::write_check(out, &resolved, cli.format)?;
        }
        Command::Replay { scopes, exchange } => {
            let table = load_scopes(scopes)?.table();
            let fixture =
                ExchangeFixture::load(exchange).map_err(|source| CommandError::Exchange {
                    path: exchange.clone(),
                    source,
                })?;
            let outcome = replay(table, &fixture)?;
            output::write_replay(out, &outcome, cli.format)?;
        }
    }
    Ok(())
}

fn load_scopes(path: &Path) -> Result<ResolvedScopes, CommandError> {
    ScopeFile::load(path)
        .and_then(|file| file.resolve())
        .map_err(|source| CommandError::Scopes {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
