// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! The vocabulary shared between engine backends and the tensor codec.
//!
//! This crate provides:
//! - [`ElementType`]: every element type an engine tensor can declare.
//! - [`Shape`]: fixed tensor dimensions.
//! - [`Quantization`] / [`AffineQuantization`]: per-tensor quantization parameters.
//! - [`Status`]: native status codes returned by engine calls.
//! - [`Tensor`]: engine-owned storage, plus the borrowed views
//!   [`TensorRef`] and [`TensorMut`] that interpreters hand out.
//!
//! Nothing here performs conversions; see the `tensor-codec` crate for that.

mod element_type;
mod error;
mod quantization;
mod shape;
mod status;
mod tensor;

pub use element_type::ElementType;
pub use error::TensorError;
pub use quantization::{AffineQuantization, Quantization};
pub use shape::Shape;
pub use status::Status;
pub use tensor::{Tensor, TensorInfo, TensorMut, TensorRef};
