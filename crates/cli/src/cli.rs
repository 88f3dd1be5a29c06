// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command line interface.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Conditional response body capture
#[derive(Parser, Debug)]
#[command(name = "respcap", version, about = "Conditional response body capture")]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "text", env = "RESPCAP_FORMAT", global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace); RESPCAP_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a scope file and print every resolved scope
    Check {
        /// Scope file (TOML, or JSON by .json extension)
        #[arg(value_name = "SCOPES")]
        scopes: PathBuf,
    },

    /// Run a recorded exchange through the capture stage
    Replay {
        /// Scope file (TOML, or JSON by .json extension)
        #[arg(value_name = "SCOPES")]
        scopes: PathBuf,

        /// Recorded exchange file
        #[arg(value_name = "EXCHANGE")]
        exchange: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// A single JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
