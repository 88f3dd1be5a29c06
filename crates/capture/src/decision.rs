// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The capture decision, made once per response at the header boundary.

use crate::expr::VariableSource;
use crate::headers::Headers;
use crate::scope::CaptureConfig;
use crate::status::StatusClass;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Response metadata available when headers are finalized.
#[derive(Clone, Copy, Debug)]
pub struct ResponseMeta<'a> {
    pub status: u16,
    pub elapsed: Duration,
    pub request_headers: &'a Headers,
    pub response_headers: &'a Headers,
}

/// Why capture was declined. Only used for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DeclineReason {
    Disabled,
    StatusClass { class: String },
    StatusCode { code: u16 },
    Latency { floor_ms: u128, elapsed_ms: u128 },
    RequestHeader { name: String },
    ResponseHeader { name: String },
    Value { expr: String },
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::Disabled => write!(f, "capture disabled"),
            DeclineReason::StatusClass { class } => write!(f, "status class {} skipped", class),
            DeclineReason::StatusCode { code } => write!(f, "status {} skipped", code),
            DeclineReason::Latency {
                floor_ms,
                elapsed_ms,
            } => write!(f, "elapsed {}ms reached floor {}ms", elapsed_ms, floor_ms),
            DeclineReason::RequestHeader { name } => write!(f, "request header {} matched", name),
            DeclineReason::ResponseHeader { name } => {
                write!(f, "response header {} matched", name)
            }
            DeclineReason::Value { expr } => write!(f, "value {} matched", expr),
        }
    }
}

/// Outcome of a capture decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Decline(DeclineReason),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Evaluate `config` against one response. The first disqualifier wins.
pub fn decide(
    config: &CaptureConfig,
    meta: &ResponseMeta<'_>,
    vars: &dyn VariableSource,
) -> Verdict {
    if !config.enabled {
        return Verdict::Decline(DeclineReason::Disabled);
    }

    let class = StatusClass::from_code(meta.status);
    if config.skip_classes.contains(class) {
        return Verdict::Decline(DeclineReason::StatusClass {
            class: class.to_string(),
        });
    }
    if config.skip_codes.contains(&meta.status) {
        return Verdict::Decline(DeclineReason::StatusCode { code: meta.status });
    }

    // A floor declines responses at least this slow.
    if !config.latency_floor.is_zero() && config.latency_floor <= meta.elapsed {
        return Verdict::Decline(DeclineReason::Latency {
            floor_ms: config.latency_floor.as_millis(),
            elapsed_ms: meta.elapsed.as_millis(),
        });
    }

    if let Some(cond) = config
        .request_headers
        .iter()
        .find(|c| c.matches(meta.request_headers))
    {
        return Verdict::Decline(DeclineReason::RequestHeader {
            name: cond.name.clone(),
        });
    }

    if let Some(cond) = config
        .response_headers
        .iter()
        .find(|c| c.matches(meta.response_headers))
    {
        return Verdict::Decline(DeclineReason::ResponseHeader {
            name: cond.name.clone(),
        });
    }

    if let Some(cond) = config.values.iter().find(|c| c.matches(vars)) {
        return Verdict::Decline(DeclineReason::Value {
            expr: cond.expr.source().to_string(),
        });
    }

    Verdict::Accept
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
