// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-infer inspect` command: tensor layout and acceleration status.

use std::path::Path;

use anyhow::Context;
use engine::reference::ReferenceBackend;
use engine::ModelBytes;
use runtime::{RuntimeBuilder, RuntimeConfig};

pub fn execute(backend: &ReferenceBackend, model: &Path, mut config: RuntimeConfig) -> anyhow::Result<()> {
    super::resolve_model_token(&mut config, model)?;

    let bytes = ModelBytes::read(model)
        .with_context(|| format!("reading model '{}'", model.display()))?;
    let size = bytes.len();
    let rt = RuntimeBuilder::from_config(&config).build(backend, bytes)?;
    let manifest = rt.model().manifest();

    println!("  Model:   {} ({size} bytes)", manifest.name);
    println!("  Backend: reference ({:?} accelerator)", backend.accelerator());
    println!();

    println!("  {:<8} {}", "Input", rt.input_info().summary());
    println!("  {:<8} {}", "Output", rt.output_info().summary());
    println!();

    let ops: Vec<&str> = manifest.ops.iter().map(|op| op.name()).collect();
    println!("  Graph:       {}", if ops.is_empty() { "identity".to_string() } else { ops.join(" -> ") });
    println!("  Threads:     {}", rt.num_threads().unwrap_or(0));
    println!("  Accelerated: {}", rt.is_accelerated());
    if let Some(dir) = &config.delegate_cache_dir {
        println!("  Cache dir:   {}", dir.display());
    }
    println!(
        "  Operators:   in {:?}, out {:?}",
        rt.pipelines().input.names(),
        rt.pipelines().output.names()
    );
    println!();
    Ok(())
}
