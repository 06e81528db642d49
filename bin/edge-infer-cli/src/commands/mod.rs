// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommands and the helpers they share.

pub mod benchmark;
pub mod inspect;
pub mod run;

use std::path::Path;

use anyhow::Context;
use engine::reference::{Accelerator, ReferenceBackend};
use runtime::{model_token_for_path, RuntimeConfig};
use tracing_subscriber::EnvFilter;

/// Accelerator behaviour of the reference engine, as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AcceleratorMode {
    /// The delegate exists and accepts every graph.
    Available,
    /// No delegate can be created.
    Unavailable,
    /// The delegate exists but refuses every graph.
    Incompatible,
}

impl From<AcceleratorMode> for Accelerator {
    fn from(mode: AcceleratorMode) -> Self {
        match mode {
            AcceleratorMode::Available => Accelerator::Available,
            AcceleratorMode::Unavailable => Accelerator::Unavailable,
            AcceleratorMode::Incompatible => Accelerator::Incompatible,
        }
    }
}

/// Installs a `fmt` subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("loading configuration from '{}'", path.display())),
        None => Ok(RuntimeConfig::default()),
    }
}

pub fn backend(mode: AcceleratorMode) -> ReferenceBackend {
    ReferenceBackend::new().with_accelerator(mode.into())
}

/// Fills in the delegate cache token from the model file when a cache
/// directory is configured without one.
pub fn resolve_model_token(config: &mut RuntimeConfig, model: &Path) -> anyhow::Result<()> {
    if config.delegate_cache_dir.is_some() && config.model_token.is_none() {
        config.model_token = Some(model_token_for_path(model)?);
    }
    Ok(())
}

/// A deterministic ramp in `[0, 255]`, shaped like 8-bit pixel data.
pub fn synthetic_input(len: usize) -> Vec<f32> {
    (0..len).map(|i| (i % 256) as f32).collect()
}

/// `(min, max, mean)` of a buffer; zeros when empty.
pub fn stats(values: &[f32]) -> (f32, f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let (min, max, sum) = values.iter().fold(
        (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
        |(lo, hi, sum), &v| (lo.min(v), hi.max(v), sum + f64::from(v)),
    );
    (min, max, (sum / values.len() as f64) as f32)
}
