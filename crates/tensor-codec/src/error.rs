// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor transfers.
//!
//! Leaf errors are small structs carrying the facts of one failure. The
//! per-direction enums ([`LoadInputError`], [`ReadOutputError`]) compose
//! them transparently, so `to_string()` always yields the leaf's message.

use std::fmt;

use tensor_core::{ElementType, Status};

/// Which side of the graph a tensor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TensorRole {
    Input,
    Output,
}

impl fmt::Display for TensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorRole::Input => f.write_str("input"),
            TensorRole::Output => f.write_str("output"),
        }
    }
}

/// The engine has not allocated the tensor's storage yet.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{role} tensor not yet created")]
pub struct TensorNotCreated {
    pub role: TensorRole,
}

/// The tensor's element type differs from the caller's buffer type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot transfer {expected} values to the {role} tensor, its element type is {actual}")]
pub struct ElementTypeMismatch {
    pub role: TensorRole,
    pub expected: ElementType,
    pub actual: ElementType,
}

/// The caller's buffer length differs from the tensor's element count.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{role} buffer ({provided} elements) does not match expected {expected} elements from tensor")]
pub struct ElementCountMismatch {
    pub role: TensorRole,
    pub provided: usize,
    pub expected: usize,
}

/// The engine refused a byte copy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to copy {role} tensor data: {status}")]
pub struct TensorCopyError {
    pub role: TensorRole,
    pub status: Status,
}

/// A quantized tensor uses a storage type the codec cannot convert.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid quantized {role} type: {element_type}")]
pub struct InvalidQuantizedType {
    pub role: TensorRole,
    pub element_type: ElementType,
}

/// Quantization parameters are not a single scale / zero-point pair.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("only single scale and zero point quantization is supported ({scales} scales, {zero_points} zero points)")]
pub struct AsymmetricQuantization {
    pub scales: usize,
    pub zero_points: usize,
}

/// Float and quantized buffers have different lengths.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("float values ({values}) and quantized values ({quantized}) do not match")]
pub struct QuantizationElementsMismatch {
    pub values: usize,
    pub quantized: usize,
}

/// Errors from [`quantize_u8`](crate::quantize_u8) and
/// [`dequantize_u8`](crate::dequantize_u8).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuantizationError {
    #[error(transparent)]
    Asymmetric(#[from] AsymmetricQuantization),

    #[error(transparent)]
    ElementsMismatch(#[from] QuantizationElementsMismatch),
}

/// Errors from loading a caller buffer into the input tensor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadInputError {
    #[error(transparent)]
    NotCreated(#[from] TensorNotCreated),

    #[error(transparent)]
    ElementType(#[from] ElementTypeMismatch),

    #[error(transparent)]
    ElementCount(#[from] ElementCountMismatch),

    #[error(transparent)]
    Copy(#[from] TensorCopyError),

    #[error(transparent)]
    InvalidQuantizedType(#[from] InvalidQuantizedType),

    #[error(transparent)]
    Quantization(#[from] QuantizationError),
}

/// Errors from reading the output tensor into a caller buffer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadOutputError {
    #[error(transparent)]
    NotCreated(#[from] TensorNotCreated),

    #[error(transparent)]
    ElementType(#[from] ElementTypeMismatch),

    #[error(transparent)]
    ElementCount(#[from] ElementCountMismatch),

    #[error(transparent)]
    Copy(#[from] TensorCopyError),

    #[error(transparent)]
    InvalidQuantizedType(#[from] InvalidQuantizedType),

    #[error(transparent)]
    Quantization(#[from] QuantizationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_messages() {
        let leaf = ElementCountMismatch {
            role: TensorRole::Input,
            provided: 3,
            expected: 4,
        };
        let combined = LoadInputError::from(leaf.clone());
        assert_eq!(combined.to_string(), leaf.to_string());
        assert_eq!(
            combined.to_string(),
            "input buffer (3 elements) does not match expected 4 elements from tensor"
        );
    }

    #[test]
    fn test_nested_quantization_message() {
        let err = ReadOutputError::from(QuantizationError::from(AsymmetricQuantization {
            scales: 3,
            zero_points: 3,
        }));
        assert!(err.to_string().starts_with("only single scale"));
    }

    #[test]
    fn test_role_display() {
        let err = TensorNotCreated {
            role: TensorRole::Output,
        };
        assert_eq!(err.to_string(), "output tensor not yet created");
    }
}
