// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The engine backend traits.

use tensor_core::{Status, TensorMut, TensorRef};

use crate::{DelegateOptions, InterpreterOptions, ModelBytes, ModelError};

/// An on-device inference engine.
///
/// Construction is split into the same three steps native engines use.
/// Delegate and interpreter creation return `None` on failure; the engine is
/// expected to have described the failure through
/// [`InterpreterOptions::report`] (interpreters) or `tracing` (delegates).
pub trait Backend {
    /// A loaded model. Owns the model bytes it was built from.
    type Model;
    /// An accelerator delegate.
    type Delegate;
    /// An interpreter bound to a model and, optionally, a delegate.
    type Interpreter: Interpreter;

    /// Short engine name used in logs.
    fn name(&self) -> &str;

    /// Builds a model from a serialized buffer.
    fn load_model(&self, bytes: ModelBytes) -> Result<Self::Model, ModelError>;

    /// Creates an accelerator delegate, or `None` if no accelerator is
    /// available on this device.
    fn create_delegate(&self, options: &DelegateOptions) -> Option<Self::Delegate>;

    /// Creates an interpreter for `model`.
    ///
    /// When `delegate` is given the interpreter must attach it; if the
    /// delegate cannot take the graph, creation fails.
    fn create_interpreter(
        &self,
        model: &Self::Model,
        options: &InterpreterOptions,
        delegate: Option<&Self::Delegate>,
    ) -> Option<Self::Interpreter>;
}

/// An interpreter: owns the graph's tensors and executes it.
pub trait Interpreter {
    /// Number of graph inputs.
    fn input_tensor_count(&self) -> usize;

    /// Number of graph outputs.
    fn output_tensor_count(&self) -> usize;

    /// Allocates storage for every tensor.
    fn allocate_tensors(&mut self) -> Status;

    /// Runs the graph once.
    fn invoke(&mut self) -> Status;

    /// Borrows input tensor `index` for writing.
    fn input_tensor(&mut self, index: usize) -> Option<TensorMut<'_>>;

    /// Borrows output tensor `index` for reading.
    fn output_tensor(&self, index: usize) -> Option<TensorRef<'_>>;

    /// Returns `true` if execution is offloaded to an accelerator delegate.
    fn is_delegated(&self) -> bool;
}
