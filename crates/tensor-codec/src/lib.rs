// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-codec
//!
//! Moves caller-owned numeric buffers into engine input tensors and out of
//! engine output tensors.
//!
//! - Unquantized tensors are copied byte for byte and must have exactly the
//!   caller's element type and element count.
//! - Affine-quantized `uint8` tensors are converted from and to `f32` with a
//!   single scale / zero-point pair.
//!
//! Every check runs before any byte is written, so a failed transfer leaves
//! both the caller buffer and the tensor untouched. The codec never
//! allocates.

pub mod codec;
pub mod error;
pub mod quantize;

pub use codec::{load_input_tensor, load_raw, read_output_tensor, read_raw, Element};
pub use error::{
    AsymmetricQuantization, ElementCountMismatch, ElementTypeMismatch, InvalidQuantizedType,
    LoadInputError, QuantizationElementsMismatch, QuantizationError, ReadOutputError,
    TensorCopyError, TensorNotCreated, TensorRole,
};
pub use quantize::{dequantize_u8, dequantize_value, quantize_u8, quantize_value};
