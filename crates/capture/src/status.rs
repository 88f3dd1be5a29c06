// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Response status classes and status skip rules.

use crate::error::ConfigError;
use serde::Serialize;
use std::fmt;

/// One of the five HTTP status classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusClass {
    pub const ALL: [StatusClass; 5] = [
        StatusClass::Informational,
        StatusClass::Success,
        StatusClass::Redirection,
        StatusClass::ClientError,
        StatusClass::ServerError,
    ];

    /// Classify a status code.
    ///
    /// Total over `u16`: codes below 100 land in 1xx and codes of 600 and
    /// above land in 5xx.
    pub fn from_code(code: u16) -> Self {
        match code {
            0..=199 => StatusClass::Informational,
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirection,
            400..=499 => StatusClass::ClientError,
            _ => StatusClass::ServerError,
        }
    }

    /// Parse a class token such as `4xx` (case-insensitive).
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "1xx" => Some(StatusClass::Informational),
            "2xx" => Some(StatusClass::Success),
            "3xx" => Some(StatusClass::Redirection),
            "4xx" => Some(StatusClass::ClientError),
            "5xx" => Some(StatusClass::ServerError),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            StatusClass::Informational => 1 << 0,
            StatusClass::Success => 1 << 1,
            StatusClass::Redirection => 1 << 2,
            StatusClass::ClientError => 1 << 3,
            StatusClass::ServerError => 1 << 4,
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            StatusClass::Informational => "1xx",
            StatusClass::Success => "2xx",
            StatusClass::Redirection => "3xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
        };
        f.write_str(token)
    }
}

/// Set of status classes whose responses skip capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusClassSet {
    bits: u8,
}

impl StatusClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: StatusClass) {
        self.bits |= class.bit();
    }

    pub fn with(mut self, class: StatusClass) -> Self {
        self.insert(class);
        self
    }

    pub fn contains(&self, class: StatusClass) -> bool {
        self.bits & class.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Flag-wise OR: a class set in either side stays set.
    pub fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusClass> + '_ {
        StatusClass::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

/// A single `skip_status` entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusRule {
    Class(StatusClass),
    Code(u16),
}

impl StatusRule {
    /// Parse `4xx`-style class tokens or exact numeric codes.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        if let Some(class) = StatusClass::parse(s) {
            return Ok(StatusRule::Class(class));
        }
        match s.parse::<u16>() {
            Ok(code) if code > 0 => Ok(StatusRule::Code(code)),
            _ => Err(ConfigError::Status(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
