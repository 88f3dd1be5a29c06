// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Conditional, bounded capture of HTTP response bodies.
//!
//! A [`CaptureFilter`] sits in an output [`Pipeline`]. When a response's
//! headers are final it decides, once, whether the response qualifies for
//! capture under the configuration scope that served it. Qualifying bodies
//! have their leading bytes copied into a fixed-capacity buffer while every
//! chunk is forwarded unchanged; the result is read back by name through
//! [`captured_value`].

mod accumulator;
mod decision;
mod error;
mod exchange;
mod expr;
mod filter;
mod headers;
mod pipeline;
mod predicate;
mod scope;
mod state;
mod status;
mod time;

pub use accumulator::BodyAccumulator;
pub use decision::{decide, DeclineReason, ResponseMeta, Verdict};
pub use error::{CaptureError, ConfigError};
pub use exchange::Exchange;
pub use expr::{Expression, VariableSource};
pub use filter::{captured_value, CaptureFilter};
pub use headers::{HeaderLine, Headers};
pub use pipeline::{BodyChunk, Pipeline, Stage, StageError};
pub use predicate::{
    Expected, HeaderCondition, PredicateSet, ScopeDirectives, ValueCondition, ValueDirective,
};
pub use scope::{
    merge, CaptureConfig, ResolvedScope, ScopeTable, DEFAULT_BUFFER_SIZE, DEFAULT_VARIABLE,
};
pub use state::CaptureState;
pub use status::{StatusClass, StatusClassSet, StatusRule};
pub use time::{Clock, FakeClock, SystemClock};
