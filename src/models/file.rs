// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Downloaded workout file.

use bytes::Bytes;

/// A FIT file held in memory for the duration of one webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// Name used by every sink, `"{workout_id}.fit"`
    pub file_name: String,
    pub bytes: Bytes,
}

impl FileBlob {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
