// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: a depth-estimation style pipeline with accelerator fallback.
//!
//! Builds the same model three times against reference engines with the
//! accelerator available, missing, and refusing the graph, then runs one
//! frame through each and prints the profiling frame.
//!
//! ```bash
//! cargo run -p runtime --example depth_pipeline
//! ```

use std::sync::Arc;

use engine::reference::{Accelerator, ModelManifest, OpSpec, ReferenceBackend};
use operators::{MinMaxOperator, RgbNormalizeOperator};
use runtime::{LogCallbacks, ProfilingFrame, RuntimeBuilder};
use tensor_core::{ElementType, Shape, TensorInfo};

const HEIGHT: usize = 128;
const WIDTH: usize = 128;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let manifest = ModelManifest {
        name: "toy-depth".into(),
        inputs: vec![TensorInfo::new(
            "image",
            ElementType::Float32,
            Shape::new(vec![1, HEIGHT, WIDTH, 3]),
        )],
        outputs: vec![TensorInfo::new(
            "depth",
            ElementType::Float32,
            Shape::new(vec![1, HEIGHT, WIDTH, 1]),
        )],
        ops: vec![OpSpec::ChannelMean { channels: 3 }, OpSpec::Sigmoid],
    };
    let model = manifest.to_bytes()?;
    let cache = std::env::temp_dir().join("edge-infer-example");

    let callbacks = LogCallbacks::new(
        |m| println!("  [warn]  {m}"),
        |m| println!("  [error] {m}"),
    );

    for accelerator in [Accelerator::Available, Accelerator::Unavailable, Accelerator::Incompatible] {
        println!("Accelerator {accelerator:?}:");
        let frame = Arc::new(ProfilingFrame::new("depth"));
        let mut rt = RuntimeBuilder::new()
            .delegate_cache(&cache, "toy-depth_0")
            .callbacks(callbacks.clone())
            .input_operator(RgbNormalizeOperator::default())
            .output_operator(MinMaxOperator)
            .profiling(Arc::clone(&frame))
            .build(&ReferenceBackend::new().with_accelerator(accelerator), model.clone())?;

        // Horizontal gradient, identical in every channel.
        let mut input: Vec<f32> = (0..rt.input_len())
            .map(|i| ((i / 3) % WIDTH) as f32 * 255.0 / (WIDTH - 1) as f32)
            .collect();
        let mut output = vec![0.0; rt.output_len()];
        rt.run_inference(&mut input, &mut output)?;

        println!(
            "  accelerated={} first={:.3} last={:.3}",
            rt.is_accelerated(),
            output[0],
            output[WIDTH - 1]
        );
        println!("{}", frame.finish());
    }
    Ok(())
}
