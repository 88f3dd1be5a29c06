// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The response body capture stage.

use crate::decision::{decide, ResponseMeta, Verdict};
use crate::exchange::Exchange;
use crate::pipeline::{BodyChunk, Stage, StageError};
use crate::scope::ScopeTable;
use crate::state::CaptureState;
use crate::time::{Clock, SystemClock};
use bytes::Bytes;
use std::sync::Arc;

/// Marks an exchange whose capture decision has been made.
#[derive(Clone, Copy, Debug)]
struct Decided;

/// Pipeline stage that captures a bounded prefix of qualifying response
/// bodies.
pub struct CaptureFilter {
    scopes: ScopeTable,
    clock: Arc<dyn Clock>,
}

impl CaptureFilter {
    pub fn new(scopes: ScopeTable) -> Self {
        Self::with_clock(scopes, Arc::new(SystemClock))
    }

    pub fn with_clock(scopes: ScopeTable, clock: Arc<dyn Clock>) -> Self {
        Self { scopes, clock }
    }
}

impl Stage for CaptureFilter {
    fn name(&self) -> &'static str {
        "response_body"
    }

    fn on_response_header(&self, exchange: &mut Exchange) -> Result<(), StageError> {
        if exchange.extensions.get::<Decided>().is_some() {
            return Ok(());
        }

        let config = self.scopes.lookup(&exchange.scope);
        let meta = ResponseMeta {
            status: exchange.status,
            elapsed: self.clock.elapsed_since(exchange.started_at_ms),
            request_headers: &exchange.request_headers,
            response_headers: &exchange.response_headers,
        };
        let verdict = decide(&config, &meta, &*exchange);

        match verdict {
            Verdict::Accept => {
                tracing::debug!(
                    scope = %exchange.scope,
                    status = exchange.status,
                    variable = %config.variable,
                    capacity = config.buffer_size,
                    "capturing response body"
                );
                exchange.extensions.insert(CaptureState::new(config));
            }
            Verdict::Decline(reason) => {
                tracing::debug!(
                    scope = %exchange.scope,
                    status = exchange.status,
                    %reason,
                    "response body capture declined"
                );
            }
        }
        exchange.extensions.insert(Decided);
        Ok(())
    }

    fn on_body_chunk(&self, exchange: &mut Exchange, chunk: &BodyChunk) -> Result<(), StageError> {
        let Some(state) = exchange.extensions.get_mut::<CaptureState>() else {
            return Ok(());
        };

        match state.on_chunk(chunk) {
            Ok(copied) => {
                tracing::trace!(
                    copied,
                    filled = state.accumulator().filled(),
                    "captured body chunk"
                );
                Ok(())
            }
            Err(source) => {
                tracing::warn!(error = %source, "response body capture failed");
                Err(StageError::Capture {
                    stage: self.name(),
                    source,
                })
            }
        }
    }
}

/// Read a captured body exposed under `name`.
///
/// `None` when the response was not captured, was captured under another
/// name, or no body bytes were ever written.
pub fn captured_value(exchange: &Exchange, name: &str) -> Option<Bytes> {
    let state = exchange.extensions.get::<CaptureState>()?;
    if state.variable() != name {
        return None;
    }
    state.snapshot()
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
