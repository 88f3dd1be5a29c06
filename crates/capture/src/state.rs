// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request capture state.

use crate::accumulator::BodyAccumulator;
use crate::error::CaptureError;
use crate::pipeline::BodyChunk;
use crate::scope::CaptureConfig;
use bytes::Bytes;
use std::sync::Arc;

/// Capture state for a response that was accepted for capture.
///
/// Created at most once per request and owned by that request's exchange.
/// There is no way back to "not capturing": once created, every later body
/// chunk goes through the accumulator until the request ends.
#[derive(Clone, Debug)]
pub struct CaptureState {
    config: Arc<CaptureConfig>,
    body: BodyAccumulator,
}

impl CaptureState {
    pub fn new(config: Arc<CaptureConfig>) -> Self {
        let body = BodyAccumulator::new(config.buffer_size);
        Self { config, body }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Name under which the captured body is exposed.
    pub fn variable(&self) -> &str {
        &self.config.variable
    }

    /// Feed one body chunk. Only in-memory data is retained; file-backed
    /// chunks and control signals are skipped.
    pub fn on_chunk(&mut self, chunk: &BodyChunk) -> Result<usize, CaptureError> {
        match chunk.data() {
            Some(data) => self.body.push(data),
            None => Ok(0),
        }
    }

    pub fn accumulator(&self) -> &BodyAccumulator {
        &self.body
    }

    /// Captured bytes, or `None` when nothing was ever written.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_slice()
    }

    pub fn snapshot(&self) -> Option<Bytes> {
        self.body.snapshot()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
