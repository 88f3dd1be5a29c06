// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture predicates declared on a single configuration scope.
//!
//! [`ScopeDirectives`] is the raw, deserializable form of a scope's settings.
//! [`PredicateSet`] is its compiled form: every condition parsed, every
//! expression compiled, and every option left as `None` when the scope does
//! not set it so that inheritance can tell "unset" from "explicitly off".

use crate::error::ConfigError;
use crate::expr::{Expression, VariableSource};
use crate::headers::Headers;
use crate::status::{StatusClassSet, StatusRule};
use bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw directives for one scope, as written in a configuration file.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeDirectives {
    /// Turn capture on or off for this scope
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Name of the exposed value (default: "response_body")
    #[serde(default)]
    pub variable: Option<String>,

    /// Status classes ("4xx") or exact codes ("404") that skip capture
    #[serde(default)]
    pub skip_status: Vec<String>,

    /// Responses at least this slow skip capture
    #[serde(default, with = "humantime_serde")]
    pub latency_floor: Option<Duration>,

    /// Capture buffer capacity (default: one memory page)
    #[serde(default)]
    pub buffer_size: Option<ByteSize>,

    /// Request header disqualifiers, as `name=value` or `name=`
    #[serde(default)]
    pub request_headers: Vec<String>,

    /// Response header disqualifiers, as `name=value` or `name=`
    #[serde(default)]
    pub response_headers: Vec<String>,

    /// Generic expression disqualifiers
    #[serde(default)]
    pub values: Vec<ValueDirective>,
}

/// Raw `(expression, expected)` pair.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValueDirective {
    pub expr: String,

    /// Expected value; absent, empty or `*` match any non-empty result
    #[serde(default)]
    pub expected: Option<String>,
}

/// A header disqualifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCondition {
    pub name: String,
    /// Empty means "present with any value"
    pub value: String,
}

impl HeaderCondition {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse `name=value`. The separator is required; the value may be empty.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let Some((name, value)) = s.split_once('=') else {
            return Err(ConfigError::HeaderCondition(s.to_string()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::HeaderCondition(s.to_string()));
        }
        Ok(Self::new(name, value.trim()))
    }

    /// Whether any live header line satisfies this condition.
    pub fn matches(&self, headers: &Headers) -> bool {
        headers.iter().any(|line| {
            line.name.eq_ignore_ascii_case(&self.name)
                && (self.value.is_empty() || line.value.eq_ignore_ascii_case(&self.value))
        })
    }
}

/// What a value condition's evaluated result is compared against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    /// Any non-empty result
    Any,
    /// Case-insensitive equality
    Exact(String),
}

impl Expected {
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            None | Some("") | Some("*") => Expected::Any,
            Some(v) => Expected::Exact(v.to_string()),
        }
    }

    /// Whether an already-evaluated result disqualifies capture.
    pub fn matches(&self, evaluated: &str) -> bool {
        if evaluated.is_empty() {
            return false;
        }
        match self {
            Expected::Any => true,
            Expected::Exact(v) => evaluated.eq_ignore_ascii_case(v),
        }
    }
}

/// A generic expression disqualifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueCondition {
    pub expr: Expression,
    pub expected: Expected,
}

impl ValueCondition {
    pub fn compile(expr: &str, expected: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            expr: Expression::compile(expr)?,
            expected: Expected::parse(expected),
        })
    }

    /// Evaluate the expression and compare. Evaluation failures count as
    /// an empty result and never disqualify.
    pub fn matches(&self, vars: &dyn VariableSource) -> bool {
        self.expected.matches(&self.expr.evaluate(vars))
    }
}

/// Compiled capture predicates for one scope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredicateSet {
    pub enabled: Option<bool>,
    pub variable: Option<String>,
    pub skip_classes: StatusClassSet,
    pub skip_codes: Vec<u16>,
    pub latency_floor: Option<Duration>,
    pub buffer_size: Option<usize>,
    pub request_headers: Vec<HeaderCondition>,
    pub response_headers: Vec<HeaderCondition>,
    pub values: Vec<ValueCondition>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile raw directives, rejecting malformed conditions.
    pub fn compile(directives: &ScopeDirectives) -> Result<Self, ConfigError> {
        let mut set = Self {
            enabled: directives.enabled,
            latency_floor: directives.latency_floor,
            ..Self::default()
        };

        // Request latency is measured in whole milliseconds.
        if let Some(floor) = directives.latency_floor {
            if floor.subsec_nanos() % 1_000_000 != 0 {
                return Err(ConfigError::LatencyFloor(floor));
            }
        }

        if let Some(ref name) = directives.variable {
            set.variable = Some(validate_variable(name)?);
        }

        if let Some(size) = directives.buffer_size {
            let size = usize::try_from(size.as_u64()).map_err(|_| ConfigError::BufferSize)?;
            if size == 0 {
                return Err(ConfigError::BufferSize);
            }
            set.buffer_size = Some(size);
        }

        for status in &directives.skip_status {
            match StatusRule::parse(status)? {
                StatusRule::Class(class) => set.skip_classes.insert(class),
                StatusRule::Code(code) => set.skip_codes.push(code),
            }
        }

        set.request_headers = directives
            .request_headers
            .iter()
            .map(|s| HeaderCondition::parse(s))
            .collect::<Result<_, _>>()?;
        set.response_headers = directives
            .response_headers
            .iter()
            .map(|s| HeaderCondition::parse(s))
            .collect::<Result<_, _>>()?;
        set.values = directives
            .values
            .iter()
            .map(|v| ValueCondition::compile(&v.expr, v.expected.as_deref()))
            .collect::<Result<_, _>>()?;

        Ok(set)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variable = Some(name.into());
        self
    }

    pub fn skip(mut self, rule: StatusRule) -> Self {
        match rule {
            StatusRule::Class(class) => self.skip_classes.insert(class),
            StatusRule::Code(code) => self.skip_codes.push(code),
        }
        self
    }

    pub fn latency_floor(mut self, floor: Duration) -> Self {
        self.latency_floor = Some(floor);
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    pub fn request_header(mut self, condition: HeaderCondition) -> Self {
        self.request_headers.push(condition);
        self
    }

    pub fn response_header(mut self, condition: HeaderCondition) -> Self {
        self.response_headers.push(condition);
        self
    }

    pub fn value(mut self, condition: ValueCondition) -> Self {
        self.values.push(condition);
        self
    }
}

fn validate_variable(name: &str) -> Result<String, ConfigError> {
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Variable(name.to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
#[path = "predicate_tests.rs"]
mod tests;
