// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for a full `run_inference` call on the reference engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::reference::{ModelManifest, OpSpec, ReferenceBackend};
use engine::ModelBytes;
use runtime::{InferenceRuntime, ModelPreset, RuntimeBuilder};
use tensor_core::{ElementType, Quantization, Shape, TensorInfo};

fn depth_model(element_type: ElementType, quantization: Quantization) -> ModelBytes {
    let manifest = ModelManifest {
        name: "bench-depth".into(),
        inputs: vec![TensorInfo::new("image", element_type, Shape::new(vec![1, 256, 256, 3]))
            .with_quantization(quantization.clone())],
        outputs: vec![TensorInfo::new("depth", element_type, Shape::new(vec![1, 256, 256, 1]))
            .with_quantization(quantization)],
        ops: vec![OpSpec::ChannelMean { channels: 3 }, OpSpec::Sigmoid],
    };
    manifest.to_bytes().expect("manifest serializes").into()
}

fn runtime(model: ModelBytes, preset: ModelPreset) -> InferenceRuntime<ReferenceBackend> {
    RuntimeBuilder::new()
        .use_accelerator(false)
        .preset(preset)
        .build(&ReferenceBackend::new(), model)
        .expect("bench model builds")
}

fn bench(c: &mut Criterion, name: &str, mut rt: InferenceRuntime<ReferenceBackend>) {
    let frame: Vec<f32> = (0..rt.input_len()).map(|i| (i % 256) as f32).collect();
    let mut input = frame.clone();
    let mut output = vec![0f32; rt.output_len()];

    c.bench_function(name, |b| {
        b.iter(|| {
            input.copy_from_slice(&frame);
            rt.run_inference(black_box(&mut input), black_box(&mut output))
        })
    });
}

fn bench_float_passthrough(c: &mut Criterion) {
    let rt = runtime(depth_model(ElementType::Float32, Quantization::None), ModelPreset::Passthrough);
    bench(c, "run_float32_passthrough_256x256", rt);
}

fn bench_float_depth_preset(c: &mut Criterion) {
    let rt = runtime(
        depth_model(ElementType::Float32, Quantization::None),
        ModelPreset::DepthEstimation,
    );
    bench(c, "run_float32_depth_preset_256x256", rt);
}

fn bench_quantized(c: &mut Criterion) {
    let rt = runtime(
        depth_model(ElementType::UInt8, Quantization::affine(1.0 / 255.0, 0)),
        ModelPreset::Passthrough,
    );
    bench(c, "run_uint8_passthrough_256x256", rt);
}

criterion_group!(benches, bench_float_passthrough, bench_float_depth_preset, bench_quantized);
criterion_main!(benches);
