// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the inference runtime.

use engine::ModelError;
use operators::PipelineError;
use tensor_codec::{LoadInputError, ReadOutputError};
use tensor_core::Status;

/// No interpreter could be created, with or without the accelerator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to create interpreter")]
pub struct CreateInterpreterError;

/// The engine failed to allocate tensor storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to allocate tensors: {status}")]
pub struct AllocateTensorsError {
    pub status: Status,
}

/// The engine failed to run the graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to invoke interpreter: {status}")]
pub struct InvokeError {
    pub status: Status,
}

/// Errors that can occur while creating an
/// [`InferenceRuntime`](crate::InferenceRuntime).
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    /// The engine could not build a model from the bytes.
    #[error(transparent)]
    LoadModel(#[from] ModelError),

    /// The model does not have exactly one input and one output tensor.
    #[error("model must have exactly one input and one output tensor, found {inputs} inputs and {outputs} outputs")]
    TensorArity { inputs: usize, outputs: usize },

    #[error(transparent)]
    CreateInterpreter(#[from] CreateInterpreterError),

    #[error(transparent)]
    AllocateTensors(#[from] AllocateTensorsError),
}

/// Errors returned by
/// [`InferenceRuntime::run_inference`](crate::InferenceRuntime::run_inference).
///
/// The variant tells which stage failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    /// An input operator failed.
    #[error(transparent)]
    Preprocess(PipelineError),

    #[error(transparent)]
    LoadInput(#[from] LoadInputError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    ReadOutput(#[from] ReadOutputError),

    /// An output operator failed.
    #[error(transparent)]
    Postprocess(PipelineError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use operators::OperatorError;
    use tensor_codec::{ElementCountMismatch, TensorRole};

    #[test]
    fn test_messages_are_uniform_across_nesting() {
        let leaf = ElementCountMismatch {
            role: TensorRole::Output,
            provided: 10,
            expected: 12,
        };
        let run = RunError::ReadOutput(ReadOutputError::from(leaf.clone()));
        assert_eq!(run.to_string(), leaf.to_string());
    }

    #[test]
    fn test_stage_is_matchable() {
        let err = RunError::Postprocess(PipelineError {
            index: 0,
            operator: "min_max".into(),
            source: OperatorError::msg("boom"),
        });
        assert!(matches!(err, RunError::Postprocess(PipelineError { index: 0, .. })));
        assert_eq!(err.to_string(), "operator #0 (min_max) failed: boom");
    }

    #[test]
    fn test_status_in_messages() {
        assert_eq!(
            InvokeError { status: Status::Error }.to_string(),
            "failed to invoke interpreter: general error"
        );
        let create = CreateError::from(AllocateTensorsError {
            status: Status::DelegateError,
        });
        assert_eq!(create.to_string(), "failed to allocate tensors: delegate error");
    }
}
