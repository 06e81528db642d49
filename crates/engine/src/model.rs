// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Owned model buffers.

use std::path::Path;

use crate::ModelError;

/// The raw bytes of a serialized model.
///
/// Engines may keep referring to the buffer after the model is built, so a
/// backend model takes ownership of it and keeps it alive for as long as the
/// model itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBytes(Vec<u8>);

impl ModelBytes {
    /// Reads a model file into memory.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path.as_ref())?;
        tracing::debug!(
            path = %path.as_ref().display(),
            bytes = bytes.len(),
            "read model file"
        );
        Ok(Self(bytes))
    }

    /// Returns the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Buffer length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ModelBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ModelBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<String> for ModelBytes {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl AsRef<[u8]> for ModelBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
