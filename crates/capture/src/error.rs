// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for configuration compile and request-time capture.

use std::collections::TryReserveError;
use std::time::Duration;
use thiserror::Error;

/// Errors detected while compiling scope directives.
///
/// These are raised once, when a scope is activated, and never at request time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid header condition \"{0}\": expected name=value")]
    HeaderCondition(String),

    #[error("invalid status \"{0}\": expected a class such as 4xx or a numeric code")]
    Status(String),

    #[error("invalid expression \"{expr}\": {reason}")]
    Expression { expr: String, reason: &'static str },

    #[error("invalid buffer size: must be greater than zero")]
    BufferSize,

    #[error("invalid latency floor {0:?}: must be a whole number of milliseconds")]
    LatencyFloor(Duration),

    #[error("invalid variable name \"{0}\"")]
    Variable(String),
}

/// Errors raised while capturing a single response.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to allocate {capacity} byte capture buffer: {source}")]
    Allocation {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}
