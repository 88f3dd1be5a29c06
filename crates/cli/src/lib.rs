// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scope checker and exchange replayer for conditional response body capture.
//!
//! `respcap check` compiles a scope file and prints the effective capture
//! configuration of every scope. `respcap replay` pushes a recorded exchange
//! through a pipeline holding the capture stage and reports what was captured.

pub mod cli;
pub mod commands;
pub mod config;
pub mod fixture;
pub mod logging;
pub mod output;
pub mod replay;
