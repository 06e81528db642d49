// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for model loading.

/// Errors that can occur when an engine backend builds a model from bytes.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The model buffer is empty.
    #[error("model buffer is empty")]
    Empty,

    /// The model file could not be read.
    #[error("failed to read model: {0}")]
    Read(#[from] std::io::Error),

    /// The model bytes are not in the backend's format.
    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    /// The model parsed but describes an unusable graph.
    #[error("invalid model '{model}': {detail}")]
    Invalid { model: String, detail: String },
}
