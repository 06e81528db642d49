// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The inference runtime and its builder.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use engine::{Backend, DelegateOptions, InferencePreference, Interpreter, ModelBytes};
use operators::{Operator, OperatorPipeline, PipelineConfig};
use tensor_codec::{LoadInputError, ReadOutputError, TensorNotCreated, TensorRole};
use tensor_core::TensorInfo;

use crate::lifecycle::{create_engine, EngineHandles, EngineSettings};
use crate::{
    CreateError, InferenceMetrics, InvokeError, LogCallbacks, ModelPreset, ProfilingFrame,
    RunError, RuntimeConfig, StageTimings, DEFAULT_NUM_THREADS,
};

/// Configures and creates an [`InferenceRuntime`].
///
/// # Example
/// ```no_run
/// use engine::reference::ReferenceBackend;
/// use engine::ModelBytes;
/// use runtime::{ModelPreset, RuntimeBuilder};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = ReferenceBackend::new();
/// let mut rt = RuntimeBuilder::new()
///     .delegate_cache("/tmp/delegates", "depth.json_1718000000")
///     .preset(ModelPreset::DepthEstimation)
///     .build(&backend, ModelBytes::read("depth.json")?)?;
///
/// let mut input = vec![0.0; rt.input_len()];
/// let mut output = vec![0.0; rt.output_len()];
/// rt.run_inference(&mut input, &mut output)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RuntimeBuilder {
    num_threads: usize,
    use_accelerator: bool,
    delegate: DelegateOptions,
    callbacks: LogCallbacks,
    pipelines: PipelineConfig,
    profiling: Option<Arc<ProfilingFrame>>,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            use_accelerator: true,
            delegate: DelegateOptions::default(),
            callbacks: LogCallbacks::default(),
            pipelines: PipelineConfig::default(),
            profiling: None,
        }
    }
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a [`RuntimeConfig`]: threads, delegate settings, preset
    /// operators and, if enabled, a fresh profiling frame.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let profiling = config
            .enable_profiling
            .then(|| Arc::new(ProfilingFrame::new("inference")));
        Self {
            num_threads: config.resolve_threads(),
            use_accelerator: config.use_accelerator,
            delegate: config.delegate_options(),
            callbacks: LogCallbacks::default(),
            pipelines: config.preset.pipelines(),
            profiling,
        }
    }

    /// Enables serialized delegate data under `dir`, keyed by `model_token`.
    pub fn delegate_cache(mut self, dir: impl Into<PathBuf>, model_token: impl Into<String>) -> Self {
        self.delegate.serialization_dir = Some(dir.into());
        self.delegate.model_token = Some(model_token.into());
        self
    }

    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads.max(1);
        self
    }

    /// Skips the accelerator entirely when `false`. No fallback warning is
    /// emitted in that case.
    pub fn use_accelerator(mut self, use_accelerator: bool) -> Self {
        self.use_accelerator = use_accelerator;
        self
    }

    pub fn inference_preference(mut self, preference: InferencePreference) -> Self {
        self.delegate.inference_preference = preference;
        self
    }

    pub fn allow_precision_loss(mut self, allow: bool) -> Self {
        self.delegate.allow_precision_loss = allow;
        self
    }

    pub fn callbacks(mut self, callbacks: LogCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Appends an input operator.
    pub fn input_operator(mut self, operator: impl Operator + 'static) -> Self {
        self.pipelines.input.push(operator);
        self
    }

    /// Appends an output operator.
    pub fn output_operator(mut self, operator: impl Operator + 'static) -> Self {
        self.pipelines.output.push(operator);
        self
    }

    /// Replaces both operator stages.
    pub fn pipelines(mut self, pipelines: PipelineConfig) -> Self {
        self.pipelines = pipelines;
        self
    }

    /// Replaces both operator stages with a preset.
    pub fn preset(self, preset: ModelPreset) -> Self {
        self.pipelines(preset.pipelines())
    }

    /// Records stage scopes into `frame`.
    pub fn profiling(mut self, frame: Arc<ProfilingFrame>) -> Self {
        self.profiling = Some(frame);
        self
    }

    /// Creates the runtime.
    pub fn build<B: Backend>(
        self,
        backend: &B,
        model_bytes: impl Into<ModelBytes>,
    ) -> Result<InferenceRuntime<B>, CreateError> {
        let settings = EngineSettings {
            num_threads: self.num_threads,
            use_accelerator: self.use_accelerator,
            delegate: self.delegate,
        };
        let engine = create_engine(backend, model_bytes.into(), &settings, &self.callbacks)?;

        tracing::info!(
            backend = backend.name(),
            accelerated = engine.delegate.is_some(),
            input_operators = ?self.pipelines.input.names(),
            output_operators = ?self.pipelines.output.names(),
            "inference runtime ready"
        );

        Ok(InferenceRuntime {
            engine,
            pipelines: self.pipelines,
            callbacks: self.callbacks,
            profiling: self.profiling,
            metrics: InferenceMetrics::new(),
        })
    }
}

/// A ready single-input, single-output inference runtime.
///
/// Owns the engine handles; dropping the runtime releases them.
pub struct InferenceRuntime<B: Backend> {
    engine: EngineHandles<B>,
    pipelines: PipelineConfig,
    callbacks: LogCallbacks,
    profiling: Option<Arc<ProfilingFrame>>,
    metrics: InferenceMetrics,
}

impl<B: Backend> InferenceRuntime<B> {
    /// Creates a runtime with the given delegate cache, callbacks and
    /// operator stages, using defaults for everything else.
    pub fn create(
        backend: &B,
        model_bytes: impl Into<ModelBytes>,
        delegate_cache_dir: impl AsRef<Path>,
        model_token: &str,
        callbacks: LogCallbacks,
        input_operators: OperatorPipeline,
        output_operators: OperatorPipeline,
    ) -> Result<Self, CreateError> {
        RuntimeBuilder::new()
            .delegate_cache(delegate_cache_dir.as_ref(), model_token)
            .callbacks(callbacks)
            .pipelines(PipelineConfig::new(input_operators, output_operators))
            .build(backend, model_bytes)
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Runs one inference.
    ///
    /// `input` is transformed in place by the input operators, then loaded
    /// into the input tensor. The output tensor is read into `output`, which
    /// the output operators then transform in place. Both buffers must have
    /// exactly the tensors' element counts.
    ///
    /// The first failing stage ends the call. Buffers keep whatever the
    /// stages before it (and the failing operator) wrote.
    pub fn run_inference(&mut self, input: &mut [f32], output: &mut [f32]) -> Result<(), RunError> {
        let started = Instant::now();
        let result = self.run_stages(input, output);
        match &result {
            Ok(timings) => {
                self.metrics.record_success(*timings);
                tracing::debug!(elapsed = ?started.elapsed(), "inference finished");
            }
            Err(e) => {
                self.metrics.record_failure();
                tracing::debug!(error = %e, "inference failed");
            }
        }
        result.map(|_| ())
    }

    fn run_stages(&mut self, input: &mut [f32], output: &mut [f32]) -> Result<StageTimings, RunError> {
        let frame = self.profiling.clone();
        let frame = frame.as_deref();
        let _call = frame.map(|f| f.scope("run_inference"));
        let mut timings = StageTimings::default();

        let (result, elapsed) = timed(frame, "preprocess", || self.pipelines.input.run(input));
        result.map_err(RunError::Preprocess)?;
        timings.preprocess = elapsed;

        let (result, elapsed) = timed(frame, "load_input", || -> Result<(), LoadInputError> {
            let mut tensor = self.engine.interpreter.input_tensor(0).ok_or_else(|| {
                LoadInputError::from(TensorNotCreated {
                    role: TensorRole::Input,
                })
            })?;
            tensor_codec::load_input_tensor(&mut tensor, input)
        });
        result?;
        timings.load_input = elapsed;

        let (status, elapsed) = timed(frame, "invoke", || self.engine.interpreter.invoke());
        if !status.is_ok() {
            return Err(InvokeError { status }.into());
        }
        timings.invoke = elapsed;

        let (result, elapsed) = timed(frame, "read_output", || -> Result<(), ReadOutputError> {
            let tensor = self.engine.interpreter.output_tensor(0).ok_or_else(|| {
                ReadOutputError::from(TensorNotCreated {
                    role: TensorRole::Output,
                })
            })?;
            tensor_codec::read_output_tensor(&tensor, output)
        });
        result?;
        timings.read_output = elapsed;

        let (result, elapsed) = timed(frame, "postprocess", || self.pipelines.output.run(output));
        result.map_err(RunError::Postprocess)?;
        timings.postprocess = elapsed;

        Ok(timings)
    }

    /// Input tensor description.
    pub fn input_info(&self) -> &TensorInfo {
        &self.engine.input_info
    }

    /// Output tensor description.
    pub fn output_info(&self) -> &TensorInfo {
        &self.engine.output_info
    }

    /// Required input buffer length.
    pub fn input_len(&self) -> usize {
        self.engine.input_info.num_elements()
    }

    /// Required output buffer length.
    pub fn output_len(&self) -> usize {
        self.engine.output_info.num_elements()
    }

    /// Returns `true` if the accelerator delegate is attached.
    pub fn is_accelerated(&self) -> bool {
        self.engine.delegate.is_some() && self.engine.interpreter.is_delegated()
    }

    /// CPU threads requested from the engine.
    pub fn num_threads(&self) -> Option<usize> {
        self.engine.options.num_threads()
    }

    /// The engine model.
    pub fn model(&self) -> &B::Model {
        &self.engine.model
    }

    pub fn metrics(&self) -> &InferenceMetrics {
        &self.metrics
    }

    /// Operator stages, fixed at creation.
    pub fn pipelines(&self) -> &PipelineConfig {
        &self.pipelines
    }

    pub fn callbacks(&self) -> &LogCallbacks {
        &self.callbacks
    }

    /// The profiling frame, if profiling is enabled.
    pub fn profiling_frame(&self) -> Option<&Arc<ProfilingFrame>> {
        self.profiling.as_ref()
    }
}

fn timed<T>(frame: Option<&ProfilingFrame>, name: &'static str, f: impl FnOnce() -> T) -> (T, Duration) {
    let _scope = frame.map(|frame| frame.scope(name));
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}
