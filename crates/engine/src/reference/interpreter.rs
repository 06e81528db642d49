// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reference interpreter: tensor storage and graph execution.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tensor_core::{ElementType, Status, Tensor, TensorInfo, TensorMut, TensorRef};

use super::delegate::AcceleratorDelegate;
use super::manifest::ModelManifest;
use super::ops::{evaluate, planned_len};
use super::{BackendStats, ReferenceModel};
use crate::{Interpreter, InterpreterOptions};

/// Executes a [`ModelManifest`] on the CPU, optionally "offloaded" to an
/// [`AcceleratorDelegate`].
///
/// A delegated interpreter that allows precision loss rounds results to
/// half-precision mantissas, the way fp16 accelerators do.
#[derive(Debug)]
pub struct ReferenceInterpreter {
    manifest: Arc<ModelManifest>,
    inputs: Vec<Tensor>,
    outputs: Vec<Tensor>,
    options: InterpreterOptions,
    delegated: bool,
    reduced_precision: bool,
    allocated: bool,
}

impl ReferenceInterpreter {
    pub(crate) fn new(
        model: &ReferenceModel,
        options: &InterpreterOptions,
        delegate: Option<&AcceleratorDelegate>,
        stats: &BackendStats,
    ) -> Option<Self> {
        let manifest = model.manifest();
        if let Err(detail) = check_graph(manifest) {
            options.report(&format!(
                "cannot build interpreter for '{}': {detail}",
                manifest.name
            ));
            return None;
        }

        if let Some(delegate) = delegate {
            if let Err(detail) = delegate.prepare(manifest) {
                tracing::debug!(model = %manifest.name, %detail, "delegate refused graph");
                return None;
            }
        }

        stats.interpreters_created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            model = %manifest.name,
            delegated = delegate.is_some(),
            threads = ?options.num_threads(),
            "created reference interpreter"
        );

        Some(Self {
            manifest: Arc::clone(model.shared_manifest()),
            inputs: manifest.inputs.iter().cloned().map(Tensor::new).collect(),
            outputs: manifest.outputs.iter().cloned().map(Tensor::new).collect(),
            options: options.clone(),
            delegated: delegate.is_some(),
            reduced_precision: delegate.is_some_and(|d| d.options().allow_precision_loss),
            allocated: false,
        })
    }

    /// Name of the model being executed.
    pub fn model_name(&self) -> &str {
        &self.manifest.name
    }

    /// CPU threads the interpreter was configured with (1 when unset).
    pub fn num_threads(&self) -> usize {
        self.options.num_threads().unwrap_or(1)
    }

    fn run(&mut self) -> Result<(), String> {
        if !self.allocated {
            return Err("tensors must be allocated before invoke".into());
        }
        let input = &self.inputs[0];
        let bytes = input
            .data()
            .ok_or_else(|| format!("input '{}' has no storage", input.info().name))?;
        let values = decode(input.info(), bytes)?;

        let mut values = evaluate(&self.manifest.ops, values)?;
        if self.reduced_precision {
            values.iter_mut().for_each(|v| *v = round_to_half_mantissa(*v));
        }

        let output = &mut self.outputs[0];
        let encoded = encode(output.info(), &values)?;
        output.set_data(encoded).map_err(|e| e.to_string())
    }
}

impl Interpreter for ReferenceInterpreter {
    fn input_tensor_count(&self) -> usize {
        self.inputs.len()
    }

    fn output_tensor_count(&self) -> usize {
        self.outputs.len()
    }

    fn allocate_tensors(&mut self) -> Status {
        for tensor in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            if let Err(e) = tensor.allocate() {
                self.options
                    .report(&format!("failed to allocate '{}': {e}", tensor.info().name));
                return Status::Error;
            }
        }
        self.allocated = true;
        Status::Ok
    }

    fn invoke(&mut self) -> Status {
        match self.run() {
            Ok(()) => Status::Ok,
            Err(detail) => {
                self.options.report(&detail);
                Status::Error
            }
        }
    }

    fn input_tensor(&mut self, index: usize) -> Option<TensorMut<'_>> {
        self.inputs.get_mut(index).map(Tensor::view_mut)
    }

    fn output_tensor(&self, index: usize) -> Option<TensorRef<'_>> {
        self.outputs.get(index).map(Tensor::view)
    }

    fn is_delegated(&self) -> bool {
        self.delegated
    }
}

/// Checks that the reference kernels can execute the graph.
fn check_graph(manifest: &ModelManifest) -> Result<(), String> {
    let input = &manifest.inputs[0];
    let output = &manifest.outputs[0];
    for info in [input, output] {
        kernel_params(info)?;
    }

    let produced = planned_len(&manifest.ops, input.num_elements())?;
    if produced != output.num_elements() {
        return Err(format!(
            "ops produce {produced} values but output '{}' holds {}",
            output.name,
            output.num_elements()
        ));
    }
    Ok(())
}

/// Returns the `(scale, zero_point)` used to convert `info`'s storage.
fn kernel_params(info: &TensorInfo) -> Result<(f32, i32), String> {
    let params = match info.quantization.as_affine() {
        None => (1.0, 0),
        Some(affine) => affine.single_pair().ok_or_else(|| {
            format!("per-channel quantization on '{}' is not supported", info.name)
        })?,
    };
    match info.element_type {
        ElementType::Float32 | ElementType::UInt8 | ElementType::Int8 => Ok(params),
        other => Err(format!(
            "tensor '{}' has element type {other}, which the reference kernels cannot execute",
            info.name
        )),
    }
}

fn decode(info: &TensorInfo, bytes: &[u8]) -> Result<Vec<f32>, String> {
    let (scale, zero_point) = kernel_params(info)?;
    let values = match info.element_type {
        ElementType::Float32 => bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        ElementType::UInt8 => bytes
            .iter()
            .map(|&q| scale * (i32::from(q) - zero_point) as f32)
            .collect(),
        _ => bytes
            .iter()
            .map(|&q| scale * (i32::from(q as i8) - zero_point) as f32)
            .collect(),
    };
    Ok(values)
}

fn encode(info: &TensorInfo, values: &[f32]) -> Result<Vec<u8>, String> {
    let (scale, zero_point) = kernel_params(info)?;
    let quantize = |v: f32, lo: i32, hi: i32| ((v / scale).round() as i32 + zero_point).clamp(lo, hi);
    let bytes = match info.element_type {
        ElementType::Float32 => values.iter().flat_map(|v| v.to_ne_bytes()).collect(),
        ElementType::UInt8 => values.iter().map(|&v| quantize(v, 0, 255) as u8).collect(),
        _ => values
            .iter()
            .map(|&v| quantize(v, -128, 127) as i8 as u8)
            .collect(),
    };
    Ok(bytes)
}

/// Drops the mantissa bits an fp16 value cannot hold.
fn round_to_half_mantissa(v: f32) -> f32 {
    f32::from_bits(v.to_bits() & 0xFFFF_E000)
}
