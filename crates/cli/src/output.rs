// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of check and replay results as text or JSON.

use crate::cli::OutputFormat;
use crate::config::ResolvedScopes;
use crate::replay::ReplayOutcome;
use respcap_capture::{CaptureConfig, Expected, HeaderCondition};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Flattened view of one resolved scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    pub path: String,
    pub enabled: bool,
    pub variable: String,
    pub buffer_size: usize,
    /// `None` when the latency check is off
    pub latency_floor_ms: Option<u128>,
    pub skip_status: Vec<String>,
    pub request_headers: Vec<String>,
    pub response_headers: Vec<String>,
    pub values: Vec<String>,
}

impl ScopeSummary {
    pub fn new(path: &str, config: &CaptureConfig) -> Self {
        let skip_status = config
            .skip_classes
            .iter()
            .map(|c| c.to_string())
            .chain(config.skip_codes.iter().map(|c| c.to_string()))
            .collect();
        let values = config
            .values
            .iter()
            .map(|v| match &v.expected {
                Expected::Any => v.expr.source().to_string(),
                Expected::Exact(expected) => format!("{}={}", v.expr.source(), expected),
            })
            .collect();

        Self {
            path: path.to_string(),
            enabled: config.enabled,
            variable: config.variable.clone(),
            buffer_size: config.buffer_size,
            latency_floor_ms: (!config.latency_floor.is_zero())
                .then(|| config.latency_floor.as_millis()),
            skip_status,
            request_headers: header_list(&config.request_headers),
            response_headers: header_list(&config.response_headers),
            values,
        }
    }
}

fn header_list(conditions: &[HeaderCondition]) -> Vec<String> {
    conditions
        .iter()
        .map(|h| format!("{}={}", h.name, h.value))
        .collect()
}

pub fn summarize(scopes: &ResolvedScopes) -> Vec<ScopeSummary> {
    scopes
        .iter()
        .map(|(path, scope)| ScopeSummary::new(path, scope.config()))
        .collect()
}

/// Write `check` results.
pub fn write_check<W: Write>(
    w: &mut W,
    scopes: &ResolvedScopes,
    format: OutputFormat,
) -> io::Result<()> {
    let summaries = summarize(scopes);
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, &summaries)?;
            writeln!(w)
        }
        OutputFormat::Text => {
            for s in &summaries {
                write_scope_text(w, s)?;
            }
            Ok(())
        }
    }
}

fn write_scope_text<W: Write>(w: &mut W, s: &ScopeSummary) -> io::Result<()> {
    let path = if s.path.is_empty() { "(root)" } else { &s.path };
    writeln!(w, "scope {}", path)?;
    writeln!(w, "  enabled: {}", if s.enabled { "yes" } else { "no" })?;
    writeln!(w, "  variable: {}", s.variable)?;
    writeln!(w, "  buffer_size: {}", s.buffer_size)?;
    match s.latency_floor_ms {
        Some(ms) => writeln!(w, "  latency_floor: {}ms", ms)?,
        None => writeln!(w, "  latency_floor: off")?,
    }
    for (label, list) in [
        ("skip_status", &s.skip_status),
        ("request_headers", &s.request_headers),
        ("response_headers", &s.response_headers),
        ("values", &s.values),
    ] {
        if !list.is_empty() {
            writeln!(w, "  {}: {}", label, list.join(", "))?;
        }
    }
    Ok(())
}

/// Write a `replay` outcome.
pub fn write_replay<W: Write>(
    w: &mut W,
    outcome: &ReplayOutcome,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, outcome)?;
            writeln!(w)
        }
        OutputFormat::Text => {
            let route = if outcome.route.is_empty() {
                "(root)"
            } else {
                &outcome.route
            };
            writeln!(w, "route: {}", route)?;
            writeln!(w, "status: {}", outcome.status)?;
            writeln!(w, "elapsed: {}ms", outcome.elapsed_ms)?;
            match (&outcome.declined, outcome.captured) {
                (Some(reason), _) => writeln!(w, "capture: declined ({})", reason)?,
                (None, true) => writeln!(w, "capture: accepted")?,
                (None, false) => writeln!(w, "capture: declined")?,
            }
            writeln!(
                w,
                "forwarded: {} bytes in memory, {} bytes from file",
                outcome.forwarded_bytes, outcome.file_bytes
            )?;
            match &outcome.value {
                Some(value) => writeln!(
                    w,
                    "${} ({} of {} bytes): {}",
                    outcome.variable,
                    value.len(),
                    outcome.capacity,
                    String::from_utf8_lossy(value)
                ),
                None => writeln!(w, "${}: not found", outcome.variable),
            }
        }
    }
}

/// Print an error message to stderr, in red on a terminal.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_error(&mut io::stderr(), msg, is_tty);
}

fn write_error<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[31mError: {}\x1b[0m", msg);
    } else {
        let _ = writeln!(writer, "Error: {}", msg);
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
