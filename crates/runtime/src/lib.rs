// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! Wraps an on-device inference engine behind a single-input,
//! single-output call:
//!
//! ```text
//! input buffer ─▶ input operators ─▶ load input tensor ─▶ invoke
//!                                                           │
//! output buffer ◀─ output operators ◀─ read output tensor ◀─┘
//! ```
//!
//! Creation tries the engine's accelerator delegate first and falls back to
//! CPU-only execution with a single warning. Every failure afterwards is a
//! typed [`RunError`]; the runtime stays usable whatever a call returned.
//!
//! # States
//! A [`RuntimeBuilder`] is the unconfigured runtime. [`RuntimeBuilder::build`]
//! (or [`InferenceRuntime::create`]) produces a ready [`InferenceRuntime`].
//! [`InferenceRuntime::run_inference`] borrows it mutably, so one instance
//! can never run two calls at once. Use one runtime per worker thread for
//! parallel work.

mod cache;
mod callbacks;
mod config;
mod error;
mod lifecycle;
mod metrics;
mod presets;
mod profiling;
mod runtime;

pub use cache::prune_delegate_cache;
pub use callbacks::{LogCallbacks, MessageCallback};
pub use config::{model_token_for_path, ConfigError, RuntimeConfig, DEFAULT_NUM_THREADS};
pub use error::{AllocateTensorsError, CreateError, CreateInterpreterError, InvokeError, RunError};
pub use lifecycle::DELEGATE_FALLBACK_WARNING;
pub use metrics::{InferenceMetrics, StageTimings};
pub use presets::ModelPreset;
pub use profiling::{FrameReport, ProfileScope, ProfilingFrame, ScopeRecord};
pub use runtime::{InferenceRuntime, RuntimeBuilder};
