// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # operators
//!
//! In-place transforms applied to `f32` buffers before a model runs
//! (input stage) and after it finishes (output stage).
//!
//! Operators are trait objects so callers can mix the built-in ones with
//! their own. An [`OperatorPipeline`] runs a list of them first to last and
//! stops at the first failure.

pub mod error;
pub mod minmax;
pub mod normalize;
pub mod pipeline;

pub use error::OperatorError;
pub use minmax::MinMaxOperator;
pub use normalize::RgbNormalizeOperator;
pub use pipeline::{FnOperator, OperatorPipeline, PipelineConfig, PipelineError};

/// An in-place transform over an `f32` buffer.
pub trait Operator: Send {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Transforms `values` in place.
    fn execute(&self, values: &mut [f32]) -> Result<(), OperatorError>;
}
