// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Shared helpers: callback recorders, reference model builders and a
//! scripted engine backend whose every step can be forced to fail.

use std::sync::{Arc, Mutex};

use engine::reference::{ModelManifest, OpSpec};
use engine::{Backend, DelegateOptions, Interpreter, InterpreterOptions, ModelBytes, ModelError};
use runtime::LogCallbacks;
use tensor_core::{ElementType, Quantization, Shape, Status, Tensor, TensorInfo, TensorMut, TensorRef};

// ── Callback recording ─────────────────────────────────────────

/// Captures every warning and error message.
#[derive(Clone, Default)]
pub struct Recorder {
    warnings: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callbacks(&self) -> LogCallbacks {
        let warnings = Arc::clone(&self.warnings);
        let errors = Arc::clone(&self.errors);
        LogCallbacks::new(
            move |m| warnings.lock().unwrap().push(m.to_string()),
            move |m| errors.lock().unwrap().push(m.to_string()),
        )
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

// ── Reference models ───────────────────────────────────────────

pub fn reference_model(
    inputs: Vec<TensorInfo>,
    outputs: Vec<TensorInfo>,
    ops: Vec<OpSpec>,
) -> ModelBytes {
    ModelManifest {
        name: "test-model".into(),
        inputs,
        outputs,
        ops,
    }
    .to_bytes()
    .unwrap()
    .into()
}

/// Float32 RGB image in, one float32 depth value per pixel out.
pub fn depth_model(height: usize, width: usize) -> ModelBytes {
    reference_model(
        vec![TensorInfo::new(
            "image",
            ElementType::Float32,
            Shape::new(vec![1, height, width, 3]),
        )],
        vec![TensorInfo::new(
            "depth",
            ElementType::Float32,
            Shape::new(vec![1, height, width, 1]),
        )],
        vec![OpSpec::ChannelMean { channels: 3 }, OpSpec::Sigmoid],
    )
}

/// A float32 vector model applying `ops`.
pub fn vector_model(len: usize, ops: Vec<OpSpec>) -> ModelBytes {
    reference_model(
        vec![TensorInfo::new("x", ElementType::Float32, Shape::vector(len))],
        vec![TensorInfo::new("y", ElementType::Float32, Shape::vector(len))],
        ops,
    )
}

/// uint8 affine-quantized RGB in, uint8 affine-quantized mean out.
pub fn quantized_model(pixels: usize) -> ModelBytes {
    let q = Quantization::affine(1.0 / 255.0, 0);
    reference_model(
        vec![TensorInfo::new("image", ElementType::UInt8, Shape::new(vec![1, pixels, 3]))
            .with_quantization(q.clone())],
        vec![TensorInfo::new("mean", ElementType::UInt8, Shape::new(vec![1, pixels, 1]))
            .with_quantization(q)],
        vec![OpSpec::ChannelMean { channels: 3 }],
    )
}

// ── Scripted backend ───────────────────────────────────────────

/// What the scripted engine does at each step.
#[derive(Debug, Clone)]
pub struct Script {
    pub delegate_available: bool,
    pub delegated_interpreter_fails: bool,
    pub cpu_interpreter_fails: bool,
    pub allocate_status: Status,
    pub invoke_status: Status,
    pub inputs: usize,
    pub outputs: usize,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            delegate_available: true,
            delegated_interpreter_fails: false,
            cpu_interpreter_fails: false,
            allocate_status: Status::Ok,
            invoke_status: Status::Ok,
            inputs: 1,
            outputs: 1,
        }
    }
}

/// Shared log of engine handles being released.
pub type Releases = Arc<Mutex<Vec<&'static str>>>;

pub struct ScriptedBackend {
    script: Script,
    releases: Releases,
}

impl ScriptedBackend {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            releases: Releases::default(),
        }
    }

    pub fn releases(&self) -> Vec<&'static str> {
        self.releases.lock().unwrap().clone()
    }
}

pub struct ScriptedModel(Releases);

impl Drop for ScriptedModel {
    fn drop(&mut self) {
        self.0.lock().unwrap().push("model");
    }
}

pub struct ScriptedDelegate(Releases);

impl Drop for ScriptedDelegate {
    fn drop(&mut self) {
        self.0.lock().unwrap().push("delegate");
    }
}

/// Copies its 4-element float32 input to its output on invoke.
pub struct ScriptedInterpreter {
    script: Script,
    options: InterpreterOptions,
    input: Tensor,
    output: Tensor,
    delegated: bool,
    releases: Releases,
}

impl Drop for ScriptedInterpreter {
    fn drop(&mut self) {
        self.releases.lock().unwrap().push("interpreter");
    }
}

impl Backend for ScriptedBackend {
    type Model = ScriptedModel;
    type Delegate = ScriptedDelegate;
    type Interpreter = ScriptedInterpreter;

    fn name(&self) -> &str {
        "scripted"
    }

    fn load_model(&self, bytes: ModelBytes) -> Result<ScriptedModel, ModelError> {
        if bytes.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(ScriptedModel(Arc::clone(&self.releases)))
    }

    fn create_delegate(&self, _options: &DelegateOptions) -> Option<ScriptedDelegate> {
        self.script
            .delegate_available
            .then(|| ScriptedDelegate(Arc::clone(&self.releases)))
    }

    fn create_interpreter(
        &self,
        _model: &ScriptedModel,
        options: &InterpreterOptions,
        delegate: Option<&ScriptedDelegate>,
    ) -> Option<ScriptedInterpreter> {
        let fails = match delegate {
            Some(_) => self.script.delegated_interpreter_fails,
            None => self.script.cpu_interpreter_fails,
        };
        if fails {
            return None;
        }
        let info = |name: &str| TensorInfo::new(name, ElementType::Float32, Shape::vector(4));
        Some(ScriptedInterpreter {
            script: self.script.clone(),
            options: options.clone(),
            input: Tensor::new(info("in")),
            output: Tensor::new(info("out")),
            delegated: delegate.is_some(),
            releases: Arc::clone(&self.releases),
        })
    }
}

impl Interpreter for ScriptedInterpreter {
    fn input_tensor_count(&self) -> usize {
        self.script.inputs
    }

    fn output_tensor_count(&self) -> usize {
        self.script.outputs
    }

    fn allocate_tensors(&mut self) -> Status {
        if !self.script.allocate_status.is_ok() {
            return self.script.allocate_status;
        }
        self.input.allocate().unwrap();
        self.output.allocate().unwrap();
        Status::Ok
    }

    fn invoke(&mut self) -> Status {
        if !self.script.invoke_status.is_ok() {
            self.options.report("scripted invoke failure");
            return self.script.invoke_status;
        }
        let data = self.input.data().unwrap().to_vec();
        self.output.set_data(data).unwrap();
        Status::Ok
    }

    fn input_tensor(&mut self, index: usize) -> Option<TensorMut<'_>> {
        if index == 0 {
            Some(self.input.view_mut())
        } else {
            None
        }
    }

    fn output_tensor(&self, index: usize) -> Option<TensorRef<'_>> {
        if index == 0 {
            Some(self.output.view())
        } else {
            None
        }
    }

    fn is_delegated(&self) -> bool {
        self.delegated
    }
}
