// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request state shared by pipeline stages.

use crate::expr::VariableSource;
use crate::headers::Headers;
use crate::state::CaptureState;
use http::Extensions;
use std::borrow::Cow;
use std::collections::HashMap;

/// One request/response exchange as seen by the output pipeline.
///
/// Stages attach their own per-request state through `extensions`, keyed by
/// type; that state is dropped together with the exchange.
#[derive(Debug, Default)]
pub struct Exchange {
    /// Configuration scope path that served this request (e.g. "api/v1")
    pub scope: String,
    /// Request start, in clock milliseconds
    pub started_at_ms: u64,
    pub request_headers: Headers,
    pub status: u16,
    pub response_headers: Headers,
    /// Host-supplied variables (query arguments, cookies, ...)
    pub vars: HashMap<String, String>,
    pub extensions: Extensions,
}

impl Exchange {
    pub fn new(scope: impl Into<String>, started_at_ms: u64) -> Self {
        Self {
            scope: scope.into(),
            started_at_ms,
            ..Self::default()
        }
    }

    pub fn request_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.append(name, value);
        self
    }

    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Set the final response status and headers.
    pub fn respond(&mut self, status: u16, headers: Headers) {
        self.status = status;
        self.response_headers = headers;
    }
}

/// Header variable lookup: `http_x_debug` finds `X-Debug`.
fn header_var<'a>(headers: &'a Headers, suffix: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|l| {
            l.name.len() == suffix.len()
                && l.name
                    .bytes()
                    .zip(suffix.bytes())
                    .all(|(n, s)| n.to_ascii_lowercase() == s || (n == b'-' && s == b'_'))
        })
        .map(|l| l.value.as_str())
}

/// Resolves, in order: `status`, `http_<name>` (request header),
/// `sent_http_<name>` (response header), a captured body exposed under its
/// configured name, then host-supplied variables.
impl VariableSource for Exchange {
    fn variable(&self, name: &str) -> Option<Cow<'_, str>> {
        if name == "status" {
            return (self.status != 0).then(|| Cow::Owned(self.status.to_string()));
        }
        if let Some(suffix) = name.strip_prefix("sent_http_") {
            return header_var(&self.response_headers, suffix).map(Cow::Borrowed);
        }
        if let Some(suffix) = name.strip_prefix("http_") {
            return header_var(&self.request_headers, suffix).map(Cow::Borrowed);
        }
        if let Some(state) = self.extensions.get::<CaptureState>() {
            if state.variable() == name {
                return state.body().map(String::from_utf8_lossy);
            }
        }
        self.vars.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod tests;
