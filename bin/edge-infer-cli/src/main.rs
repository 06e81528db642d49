// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # edge-infer
//!
//! Command-line interface for the edge-infer runtime.
//!
//! ## Usage
//! ```bash
//! # Run one inference on a raw little-endian f32 input file
//! edge-infer run --model ./models/depth.json --input frame.f32 --output depth.f32 --preset depth-estimation
//!
//! # Several threads, one runtime each
//! edge-infer benchmark --model ./models/depth.json --threads 4 --iterations 100
//!
//! # Print tensor layout and acceleration status
//! edge-infer inspect --model ./models/depth.json
//! ```

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runtime::ModelPreset;

use crate::commands::AcceleratorMode;

#[derive(Parser)]
#[command(
    name = "edge-infer",
    about = "Single-input, single-output on-device inference with accelerator fallback",
    version,
    author
)]
struct Cli {
    /// Path to a TOML runtime configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Accelerator behaviour of the reference engine.
    #[arg(long, value_enum, default_value_t = AcceleratorMode::Available, global = true)]
    accelerator: AcceleratorMode,

    /// Never attach the accelerator delegate.
    #[arg(long, global = true)]
    cpu_only: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one inference.
    Run {
        /// Path to the model file.
        #[arg(short, long)]
        model: PathBuf,

        /// Raw little-endian f32 input. A synthetic gradient is used if omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write the raw little-endian f32 output.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Operator preset: depth-estimation, depth-estimation-raw, passthrough.
        #[arg(short, long)]
        preset: Option<ModelPreset>,

        /// Print the profiling frame after the run.
        #[arg(long)]
        profile: bool,

        /// Remove delegate cache entries belonging to other model versions.
        #[arg(long)]
        prune_cache: bool,
    },

    /// Print tensor layout and whether the accelerator is attached.
    Inspect {
        /// Path to the model file.
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Run inference repeatedly on several threads.
    Benchmark {
        /// Path to the model file.
        #[arg(short, long)]
        model: PathBuf,

        /// Worker threads, each with its own runtime.
        #[arg(short, long, default_value_t = 2)]
        threads: usize,

        /// Inferences per thread.
        #[arg(short = 'n', long, default_value_t = 50)]
        iterations: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    let mut config = commands::load_config(cli.config.as_deref())?;
    if cli.cpu_only {
        config.use_accelerator = false;
    }
    let backend = commands::backend(cli.accelerator);

    match cli.command {
        Commands::Run {
            model,
            input,
            output,
            preset,
            profile,
            prune_cache,
        } => {
            if let Some(preset) = preset {
                config.preset = preset;
            }
            config.enable_profiling |= profile;
            let options = commands::run::RunOptions {
                input,
                output,
                prune_cache,
            };
            commands::run::execute(&backend, &model, config, options)
        }
        Commands::Inspect { model } => commands::inspect::execute(&backend, &model, config),
        Commands::Benchmark {
            model,
            threads,
            iterations,
        } => commands::benchmark::execute(&backend, &model, config, threads, iterations),
    }
}
