// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to stderr.
//!
//! Filter priority: `RESPCAP_LOG`, then the `-v` count, then `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV: &str = "RESPCAP_LOG";

/// Default directive for a `-v` count.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Build the filter. Unparseable `RESPCAP_LOG` values fall back to the
/// verbosity default.
pub fn build_filter(env_value: Option<&str>, verbose: u8) -> EnvFilter {
    if let Some(filter) = env_value.and_then(|d| EnvFilter::try_new(d).ok()) {
        return filter;
    }
    EnvFilter::new(level_for(verbose))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: u8) {
    let env_value = std::env::var(LOG_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(env_value.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
