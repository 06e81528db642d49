// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor storage.

use crate::ElementType;

/// Errors that can occur while managing tensor storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    /// Storage cannot be sized for this element type.
    #[error("cannot allocate storage for element type {element_type}")]
    UnsizedElementType { element_type: ElementType },

    /// The declared byte size does not fit in `usize`.
    #[error("tensor of shape {shape} and element type {element_type} is too large to address")]
    SizeOverflow { shape: String, element_type: ElementType },

    /// Storage could not be reserved.
    #[error("failed to allocate {bytes} bytes of tensor storage")]
    AllocationFailed { bytes: usize },

    /// The provided buffer size does not match the tensor's declared size.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}
