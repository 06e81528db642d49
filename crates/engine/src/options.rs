// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Options passed to engine backends when building delegates and
//! interpreters.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Sink for diagnostic messages emitted by the engine.
pub type ErrorReporter = Arc<dyn Fn(&str) + Send + Sync>;

/// Interpreter construction options.
#[derive(Clone, Default)]
pub struct InterpreterOptions {
    num_threads: Option<usize>,
    error_reporter: Option<ErrorReporter>,
}

impl InterpreterOptions {
    /// Creates options with engine defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of CPU threads the interpreter may use.
    pub fn set_num_threads(&mut self, num_threads: usize) -> &mut Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Number of CPU threads requested, if set.
    pub fn num_threads(&self) -> Option<usize> {
        self.num_threads
    }

    /// Installs the sink engine diagnostics are reported to.
    pub fn set_error_reporter(&mut self, reporter: ErrorReporter) -> &mut Self {
        self.error_reporter = Some(reporter);
        self
    }

    /// Reports an engine diagnostic.
    ///
    /// Without an installed reporter the message goes to `tracing` at
    /// debug level.
    pub fn report(&self, message: &str) {
        match &self.error_reporter {
            Some(reporter) => reporter(message),
            None => tracing::debug!(diagnostic = message, "engine diagnostic"),
        }
    }
}

impl fmt::Debug for InterpreterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpreterOptions")
            .field("num_threads", &self.num_threads)
            .field("error_reporter", &self.error_reporter.is_some())
            .finish()
    }
}

/// What the accelerator should optimise for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InferencePreference {
    /// Minimise latency for a single inference.
    #[default]
    FastSingleAnswer,
    /// Maximise throughput over many inferences.
    SustainedSpeed,
    /// Balance latency and power.
    Balanced,
}

/// Accelerator delegate construction options.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DelegateOptions {
    /// Optimisation target.
    pub inference_preference: InferencePreference,
    /// Allow reduced precision (e.g. fp16) on the accelerator.
    pub allow_precision_loss: bool,
    /// Directory for serialized delegate data.
    pub serialization_dir: Option<PathBuf>,
    /// Token identifying the model in the serialization directory.
    pub model_token: Option<String>,
}

impl Default for DelegateOptions {
    fn default() -> Self {
        Self {
            inference_preference: InferencePreference::FastSingleAnswer,
            allow_precision_loss: true,
            serialization_dir: None,
            model_token: None,
        }
    }
}

impl DelegateOptions {
    /// Enables serialization under `dir` for the model identified by `token`.
    pub fn with_serialization(mut self, dir: impl Into<PathBuf>, token: impl Into<String>) -> Self {
        self.serialization_dir = Some(dir.into());
        self.model_token = Some(token.into());
        self
    }

    /// Returns the directory and token when serialization is fully
    /// configured (both present and non-empty).
    pub fn serialization(&self) -> Option<(&PathBuf, &str)> {
        match (&self.serialization_dir, self.model_token.as_deref()) {
            (Some(dir), Some(token)) if !dir.as_os_str().is_empty() && !token.is_empty() => {
                Some((dir, token))
            }
            _ => None,
        }
    }
}
