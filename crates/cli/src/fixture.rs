// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded exchanges for replay.
//!
//! ```toml
//! route = "api/users"
//! elapsed = "120ms"
//! status = 404
//! request_headers = [{ name = "X-Debug", value = "1" }]
//! response_headers = [{ name = "Content-Type", value = "text/plain" }]
//! body = ["not ", "found", { file = 4096 }]
//!
//! [vars]
//! arg_trace = "1"
//! ```

use bytes::Bytes;
use respcap_capture::{BodyChunk, Exchange, Headers};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read exchange file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderEntry {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// One recorded body chunk.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ChunkSpec {
    /// In-memory text
    Text(String),
    /// File-backed region of the given length
    File { file: u64 },
    /// Flush marker
    Flush { flush: bool },
}

impl ChunkSpec {
    fn to_chunk(&self, offset: u64) -> BodyChunk {
        match self {
            ChunkSpec::Text(text) => BodyChunk::Data(Bytes::from(text.clone())),
            ChunkSpec::File { file } => BodyChunk::File { offset, len: *file },
            ChunkSpec::Flush { .. } => BodyChunk::Flush,
        }
    }

    fn len(&self) -> u64 {
        match self {
            ChunkSpec::Text(text) => text.len() as u64,
            ChunkSpec::File { file } => *file,
            ChunkSpec::Flush { .. } => 0,
        }
    }
}

/// A recorded request/response exchange.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeFixture {
    /// Scope path that served the request
    #[serde(default)]
    pub route: String,

    /// Time from request start to final response headers
    #[serde(default, with = "humantime_serde")]
    pub elapsed: Duration,

    pub status: u16,

    #[serde(default)]
    pub request_headers: Vec<HeaderEntry>,

    #[serde(default)]
    pub response_headers: Vec<HeaderEntry>,

    /// Host variables visible to value conditions
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    #[serde(default)]
    pub body: Vec<ChunkSpec>,
}

impl ExchangeFixture {
    /// Load an exchange file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        let fixture: Self = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        fixture.validate()?;
        Ok(fixture)
    }

    pub fn validate(&self) -> Result<(), FixtureError> {
        if !(100..=999).contains(&self.status) {
            return Err(FixtureError::Validation(format!(
                "status {} is not a valid HTTP status",
                self.status
            )));
        }
        Ok(())
    }

    /// Build the exchange as it stands when the request starts at `started_at_ms`.
    ///
    /// Status and response headers are not applied; see [`respond`](Self::respond).
    pub fn exchange(&self, started_at_ms: u64) -> Exchange {
        let mut exchange = Exchange::new(self.route.clone(), started_at_ms);
        for h in &self.request_headers {
            exchange.request_headers.append(h.name.clone(), h.value.clone());
        }
        for (name, value) in &self.vars {
            exchange.vars.insert(name.clone(), value.clone());
        }
        exchange
    }

    /// Apply the recorded status and response headers.
    pub fn respond(&self, exchange: &mut Exchange) {
        let headers: Headers = self
            .response_headers
            .iter()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect();
        exchange.respond(self.status, headers);
    }

    /// Body chunks in delivery order, ending with the last-chunk marker.
    pub fn chunks(&self) -> Vec<BodyChunk> {
        let mut offset: u64 = 0;
        let mut chunks = Vec::with_capacity(self.body.len() + 1);
        for spec in &self.body {
            chunks.push(spec.to_chunk(offset));
            offset = offset.saturating_add(spec.len());
        }
        chunks.push(BodyChunk::Last);
        chunks
    }
}

#[cfg(test)]
#[path = "fixture_tests.rs"]
mod tests;
