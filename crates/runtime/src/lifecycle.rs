// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Engine handle creation with accelerator fallback, and teardown.

use engine::{Backend, DelegateOptions, Interpreter, InterpreterOptions, ModelBytes};
use tensor_core::TensorInfo;

use crate::{AllocateTensorsError, CreateError, CreateInterpreterError, LogCallbacks};

/// Warning emitted once when the accelerator cannot be used.
pub const DELEGATE_FALLBACK_WARNING: &str =
    "accelerator delegate is not supported, falling back to CPU only mode";

/// How to build the engine handles.
#[derive(Debug, Clone)]
pub(crate) struct EngineSettings {
    pub num_threads: usize,
    pub use_accelerator: bool,
    pub delegate: DelegateOptions,
}

/// Everything the runtime holds from the engine.
///
/// Fields drop in declaration order: interpreter, delegate, options, model.
pub(crate) struct EngineHandles<B: Backend> {
    pub interpreter: B::Interpreter,
    pub delegate: Option<B::Delegate>,
    pub options: InterpreterOptions,
    pub model: B::Model,
    pub input_info: TensorInfo,
    pub output_info: TensorInfo,
}

impl<B: Backend> Drop for EngineHandles<B> {
    fn drop(&mut self) {
        tracing::debug!(
            delegated = self.delegate.is_some(),
            "releasing interpreter, delegate, options and model"
        );
    }
}

/// Builds the model, delegate and interpreter, then allocates tensors.
///
/// The interpreter is first created with the accelerator delegate attached.
/// If the delegate is missing or refuses the graph, [`DELEGATE_FALLBACK_WARNING`]
/// is sent to the warn callback once, the delegate is released, and creation
/// is retried on the CPU.
pub(crate) fn create_engine<B: Backend>(
    backend: &B,
    model_bytes: ModelBytes,
    settings: &EngineSettings,
    callbacks: &LogCallbacks,
) -> Result<EngineHandles<B>, CreateError> {
    let model = backend.load_model(model_bytes)?;

    let mut options = InterpreterOptions::new();
    options
        .set_num_threads(settings.num_threads)
        .set_error_reporter(callbacks.engine_reporter());

    let mut delegate = None;
    let mut interpreter = None;
    if settings.use_accelerator {
        delegate = backend.create_delegate(&settings.delegate);
        interpreter = delegate
            .as_ref()
            .and_then(|d| backend.create_interpreter(&model, &options, Some(d)));

        if interpreter.is_none() {
            callbacks.warn(DELEGATE_FALLBACK_WARNING);
            delegate = None;
        }
    }

    let mut interpreter = match interpreter {
        Some(interpreter) => interpreter,
        None => backend
            .create_interpreter(&model, &options, None)
            .ok_or(CreateInterpreterError)?,
    };

    let inputs = interpreter.input_tensor_count();
    let outputs = interpreter.output_tensor_count();
    if inputs != 1 || outputs != 1 {
        return Err(CreateError::TensorArity { inputs, outputs });
    }

    let status = interpreter.allocate_tensors();
    if !status.is_ok() {
        return Err(AllocateTensorsError { status }.into());
    }

    let arity = || CreateError::TensorArity { inputs, outputs };
    let input_info = interpreter.input_tensor(0).ok_or_else(arity)?.info().clone();
    let output_info = interpreter.output_tensor(0).ok_or_else(arity)?.info().clone();

    tracing::debug!(
        backend = backend.name(),
        delegated = delegate.is_some(),
        threads = settings.num_threads,
        input = %input_info.summary(),
        output = %output_info.summary(),
        "engine ready"
    );

    Ok(EngineHandles {
        interpreter,
        delegate,
        options,
        model,
        input_info,
        output_info,
    })
}
