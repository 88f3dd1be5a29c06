// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay a recorded exchange through the capture pipeline.

use crate::fixture::ExchangeFixture;
use bytes::Bytes;
use parking_lot::Mutex;
use respcap_capture::{
    captured_value, decide, BodyChunk, CaptureFilter, CaptureState, Clock, DeclineReason,
    Exchange, FakeClock, Pipeline, ResponseMeta, ScopeTable, Stage, StageError, Verdict,
};
use serde::Serialize;
use std::sync::Arc;

/// Downstream stage that records what the pipeline forwards.
#[derive(Default)]
pub struct Sink {
    forwarded: Mutex<Vec<u8>>,
    file_bytes: Mutex<u64>,
}

impl Sink {
    pub fn forwarded(&self) -> Vec<u8> {
        self.forwarded.lock().clone()
    }

    pub fn file_bytes(&self) -> u64 {
        *self.file_bytes.lock()
    }
}

impl Stage for Sink {
    fn name(&self) -> &'static str {
        "sink"
    }

    fn on_body_chunk(&self, _exchange: &mut Exchange, chunk: &BodyChunk) -> Result<(), StageError> {
        match chunk {
            BodyChunk::Data(data) => self.forwarded.lock().extend_from_slice(data),
            BodyChunk::File { len, .. } => *self.file_bytes.lock() += len,
            BodyChunk::Flush | BodyChunk::Last => {}
        }
        Ok(())
    }
}

/// What happened to one replayed exchange.
#[derive(Clone, Debug, Serialize)]
pub struct ReplayOutcome {
    pub route: String,
    pub status: u16,
    pub elapsed_ms: u128,
    pub captured: bool,
    /// Name the captured value is exposed under
    pub variable: String,
    pub capacity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declined: Option<DeclineReason>,
    /// Captured body, `None` when nothing was written
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "lossy")]
    pub value: Option<Bytes>,
    /// In-memory body bytes forwarded downstream
    pub forwarded_bytes: usize,
    /// File-backed body bytes forwarded downstream
    pub file_bytes: u64,
}

fn lossy<S: serde::Serializer>(value: &Option<Bytes>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(bytes) => s.serialize_some(&String::from_utf8_lossy(bytes)),
        None => s.serialize_none(),
    }
}

/// Replay `fixture` against `scopes`.
///
/// The request starts at clock zero and headers are finalized after the
/// fixture's recorded elapsed time.
pub fn replay(scopes: ScopeTable, fixture: &ExchangeFixture) -> Result<ReplayOutcome, StageError> {
    let config = scopes.lookup(&fixture.route);
    let clock = FakeClock::new(0);
    let sink = Arc::new(Sink::default());
    let pipeline = Pipeline::new()
        .with(Arc::new(CaptureFilter::with_clock(
            scopes,
            Arc::new(clock.clone()),
        )))
        .with(Arc::clone(&sink) as Arc<dyn Stage>);
    tracing::debug!(stages = ?pipeline.stage_names(), route = %fixture.route, "replaying exchange");

    let mut exchange = fixture.exchange(0);
    clock.advance(fixture.elapsed);
    fixture.respond(&mut exchange);
    pipeline.send_header(&mut exchange)?;

    for chunk in fixture.chunks() {
        pipeline.send_body(&mut exchange, &chunk)?;
    }

    let captured = exchange.extensions.get::<CaptureState>().is_some();
    let declined = if captured {
        None
    } else {
        // Re-run the decision against the same inputs to report why.
        let meta = ResponseMeta {
            status: exchange.status,
            elapsed: clock.elapsed_since(exchange.started_at_ms),
            request_headers: &exchange.request_headers,
            response_headers: &exchange.response_headers,
        };
        match decide(&config, &meta, &exchange) {
            Verdict::Decline(reason) => Some(reason),
            Verdict::Accept => None,
        }
    };

    Ok(ReplayOutcome {
        route: fixture.route.clone(),
        status: fixture.status,
        elapsed_ms: fixture.elapsed.as_millis(),
        captured,
        variable: config.variable.clone(),
        capacity: config.buffer_size,
        declined,
        value: captured_value(&exchange, &config.variable),
        forwarded_bytes: sink.forwarded().len(),
        file_bytes: sink.file_bytes(),
    })
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
