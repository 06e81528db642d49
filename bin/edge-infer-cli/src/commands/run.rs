// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-infer run` command: one inference from a raw f32 file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use engine::reference::ReferenceBackend;
use engine::ModelBytes;
use runtime::{prune_delegate_cache, RuntimeBuilder, RuntimeConfig};

pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub prune_cache: bool,
}

pub fn execute(
    backend: &ReferenceBackend,
    model: &Path,
    mut config: RuntimeConfig,
    options: RunOptions,
) -> anyhow::Result<()> {
    super::resolve_model_token(&mut config, model)?;

    if options.prune_cache {
        if let (Some(dir), Some(token)) = (&config.delegate_cache_dir, &config.model_token) {
            let removed = prune_delegate_cache(dir, token)
                .with_context(|| format!("pruning delegate cache '{}'", dir.display()))?;
            println!("  Pruned {removed} stale delegate cache file(s).");
        }
    }

    let bytes = ModelBytes::read(model)
        .with_context(|| format!("reading model '{}'", model.display()))?;
    let mut rt = RuntimeBuilder::from_config(&config).build(backend, bytes)?;

    println!("  Model:       {}", model.display());
    println!("  Input:       {}", rt.input_info().summary());
    println!("  Output:      {}", rt.output_info().summary());
    println!("  Preset:      {}", config.preset);
    println!("  Accelerated: {}", rt.is_accelerated());
    println!();

    let mut input = match &options.input {
        Some(path) => read_f32_file(path, rt.input_len())?,
        None => super::synthetic_input(rt.input_len()),
    };
    let mut output = vec![0.0f32; rt.output_len()];

    rt.run_inference(&mut input, &mut output)?;

    let (min, max, mean) = super::stats(&output);
    println!("  Output: {} values, min {min:.4}, max {max:.4}, mean {mean:.4}", output.len());
    if let Some(path) = &options.output {
        write_f32_file(path, &output)?;
        println!("  Wrote {}", path.display());
    }
    println!();
    println!("  {}", rt.metrics().summary());

    if let Some(frame) = rt.profiling_frame() {
        println!();
        print!("{}", frame.finish());
    }
    Ok(())
}

/// Tensor files are raw little-endian `f32` on every host.
fn read_f32_file(path: &Path, expected: usize) -> anyhow::Result<Vec<f32>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading input '{}'", path.display()))?;
    if bytes.len() != expected * 4 {
        bail!(
            "input '{}' holds {} bytes, the model expects {expected} f32 values ({} bytes)",
            path.display(),
            bytes.len(),
            expected * 4
        );
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_bits(u32::from_le(bytemuck::pod_read_unaligned(c))))
        .collect())
}

fn write_f32_file(path: &Path, values: &[f32]) -> anyhow::Result<()> {
    let words: Vec<u32> = values.iter().map(|v| v.to_bits().to_le()).collect();
    std::fs::write(path, bytemuck::cast_slice::<u32, u8>(&words))
        .with_context(|| format!("writing output '{}'", path.display()))
}
