// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-capacity body accumulator.

use crate::error::CaptureError;
use bytes::Bytes;

/// Append-only buffer that keeps at most `capacity` leading body bytes.
///
/// The backing storage is allocated on the first non-empty write and never
/// grows afterwards. Bytes past capacity are dropped without error.
#[derive(Clone, Debug)]
pub struct BodyAccumulator {
    capacity: usize,
    buf: Option<Vec<u8>>,
}

impl BodyAccumulator {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buf: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes retained so far.
    pub fn filled(&self) -> usize {
        self.buf.as_ref().map_or(0, Vec::len)
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.filled()
    }

    pub fn is_allocated(&self) -> bool {
        self.buf.is_some()
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// Copy as much of `chunk` as still fits. Returns the number of bytes
    /// retained from this chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Result<usize, CaptureError> {
        if chunk.is_empty() || self.capacity == 0 {
            return Ok(0);
        }

        if self.buf.is_none() {
            let mut buf = Vec::new();
            buf.try_reserve_exact(self.capacity)
                .map_err(|source| CaptureError::Allocation {
                    capacity: self.capacity,
                    source,
                })?;
            self.buf = Some(buf);
        }
        let buf = self.buf.get_or_insert_with(Vec::new);

        let take = (self.capacity - buf.len()).min(chunk.len());
        buf.extend_from_slice(&chunk[..take]);
        Ok(take)
    }

    /// Borrow the retained bytes, or `None` before the first write.
    pub fn as_slice(&self) -> Option<&[u8]> {
        self.buf.as_deref()
    }

    /// Owned copy of the retained bytes, or `None` before the first write.
    ///
    /// The copy is unaffected by later writes.
    pub fn snapshot(&self) -> Option<Bytes> {
        self.as_slice().map(Bytes::copy_from_slice)
    }
}

#[cfg(test)]
#[path = "accumulator_tests.rs"]
mod tests;
