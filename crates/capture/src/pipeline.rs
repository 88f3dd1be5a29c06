// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered output-filter pipeline.
//!
//! Stages are composed once at startup into a [`Pipeline`]. Each response
//! passes through every stage twice over: once when its metadata is
//! finalized, then once per body chunk. Chunks are lent to each stage by
//! reference, so a stage can observe but never alter what is forwarded.

use crate::error::CaptureError;
use crate::exchange::Exchange;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;

/// A unit of response body delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyChunk {
    /// In-memory body bytes
    Data(Bytes),
    /// Body bytes that live in a file and are not resident in memory
    File { offset: u64, len: u64 },
    /// Flush request with no payload
    Flush,
    /// End of the response body
    Last,
}

impl BodyChunk {
    /// In-memory payload, if this chunk carries one.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            BodyChunk::Data(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<&'static str> for BodyChunk {
    fn from(s: &'static str) -> Self {
        BodyChunk::Data(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Vec<u8>> for BodyChunk {
    fn from(v: Vec<u8>) -> Self {
        BodyChunk::Data(Bytes::from(v))
    }
}

/// Errors a stage can return to the pipeline.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("{stage}: {source}")]
    Capture {
        stage: &'static str,
        #[source]
        source: CaptureError,
    },
}

/// One filter in the output pipeline.
pub trait Stage: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Called once, when status and headers are final.
    fn on_response_header(&self, _exchange: &mut Exchange) -> Result<(), StageError> {
        Ok(())
    }

    /// Called for every body chunk, in arrival order.
    fn on_body_chunk(
        &self,
        _exchange: &mut Exchange,
        _chunk: &BodyChunk,
    ) -> Result<(), StageError> {
        Ok(())
    }
}

/// Fixed, ordered list of stages.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage after the existing ones.
    pub fn with(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Deliver the header event to every stage in order.
    ///
    /// Stops at the first stage that fails.
    pub fn send_header(&self, exchange: &mut Exchange) -> Result<(), StageError> {
        for stage in &self.stages {
            stage.on_response_header(exchange)?;
        }
        Ok(())
    }

    /// Deliver a body chunk to every stage in order.
    ///
    /// Stops at the first stage that fails.
    pub fn send_body(&self, exchange: &mut Exchange, chunk: &BodyChunk) -> Result<(), StageError> {
        for stage in &self.stages {
            stage.on_body_chunk(exchange, chunk)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
