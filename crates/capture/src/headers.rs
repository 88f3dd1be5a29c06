// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered header lines as seen by the capture stage.
//!
//! Header lines may repeat and keep their arrival order. A line removed by an
//! earlier stage stays in the list with its `deleted` marker set, so lookups
//! must skip it rather than rely on it being gone.

use http::HeaderMap;

/// A single header line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderLine {
    pub name: String,
    pub value: String,
    pub deleted: bool,
}

impl HeaderLine {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            deleted: false,
        }
    }
}

/// Ordered multimap of header lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    lines: Vec<HeaderLine>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, keeping any existing lines with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.lines.push(HeaderLine::new(name, value));
    }

    /// Builder form of [`Headers::append`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Mark every line named `name` as deleted. Returns how many were marked.
    pub fn remove(&mut self, name: &str) -> usize {
        let mut marked = 0;
        for line in self.lines.iter_mut() {
            if !line.deleted && line.name.eq_ignore_ascii_case(name) {
                line.deleted = true;
                marked += 1;
            }
        }
        marked
    }

    /// Live (non-deleted) lines in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines.iter().filter(|l| !l.deleted)
    }

    /// First live value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .map(|l| l.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            lines: iter
                .into_iter()
                .map(|(n, v)| HeaderLine::new(n, v))
                .collect(),
        }
    }
}

/// Converts an `http` header map. Values that are not valid visible ASCII
/// are carried over lossily.
impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        map.iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "headers_tests.rs"]
mod tests;
