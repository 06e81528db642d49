// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-infer benchmark` command: repeated inference on worker threads.
//!
//! Each worker builds its own runtime. Runtimes are never shared between
//! threads.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use engine::reference::ReferenceBackend;
use engine::ModelBytes;
use runtime::{InferenceMetrics, RuntimeBuilder, RuntimeConfig};

pub fn execute(
    backend: &ReferenceBackend,
    model: &Path,
    mut config: RuntimeConfig,
    threads: usize,
    iterations: usize,
) -> anyhow::Result<()> {
    super::resolve_model_token(&mut config, model)?;
    let bytes = ModelBytes::read(model)
        .with_context(|| format!("reading model '{}'", model.display()))?;
    let threads = threads.max(1);

    println!("  Model:      {}", model.display());
    println!("  Threads:    {threads}");
    println!("  Iterations: {iterations} per thread");
    println!();

    let started = Instant::now();
    let results: Vec<anyhow::Result<InferenceMetrics>> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|_| {
                let bytes = bytes.clone();
                let config = &config;
                s.spawn(move || worker(backend, bytes, config, iterations))
            })
            .collect();
        workers
            .into_iter()
            .map(|w| {
                w.join()
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("worker thread panicked")))
            })
            .collect()
    });
    let wall = started.elapsed();

    println!(
        "  {:<8} {:>8} {:>8} {:>12} {:>10}",
        "Thread", "Runs", "Failed", "Mean", "Runs/s",
    );
    println!("  {}", "-".repeat(50));

    let mut total_runs = 0u64;
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(m) => {
                total_runs += m.runs;
                println!(
                    "  {:<8} {:>8} {:>8} {:>10.3}ms {:>10.1}",
                    i,
                    m.runs,
                    m.failures,
                    m.mean_duration().as_secs_f64() * 1000.0,
                    m.runs_per_second(),
                );
            }
            Err(e) => println!("  {i:<8}     FAILED: {e:#}"),
        }
    }
    println!();

    let wall_secs = wall.as_secs_f64();
    let throughput = if wall_secs > 0.0 { total_runs as f64 / wall_secs } else { 0.0 };
    println!("  Total: {total_runs} runs in {:.2}ms ({throughput:.1} runs/s)", wall_secs * 1000.0);
    println!(
        "  Delegates: {} created, {} compiled, {} cache hits",
        backend.stats().delegates_created(),
        backend.stats().delegate_compilations(),
        backend.stats().delegate_cache_hits(),
    );
    println!();
    Ok(())
}

fn worker(
    backend: &ReferenceBackend,
    bytes: ModelBytes,
    config: &RuntimeConfig,
    iterations: usize,
) -> anyhow::Result<InferenceMetrics> {
    let mut rt = RuntimeBuilder::from_config(config).build(backend, bytes)?;
    let input = super::synthetic_input(rt.input_len());
    let mut scratch = input.clone();
    let mut output = vec![0.0f32; rt.output_len()];

    for _ in 0..iterations {
        // Input operators rewrite the buffer in place.
        scratch.copy_from_slice(&input);
        if let Err(e) = rt.run_inference(&mut scratch, &mut output) {
            tracing::warn!(error = %e, "benchmark inference failed");
        }
    }
    Ok(rt.metrics().clone())
}
