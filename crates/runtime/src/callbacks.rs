// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Caller-supplied warning and error sinks.

use std::fmt;
use std::sync::Arc;

use engine::ErrorReporter;

/// A message sink.
pub type MessageCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Prefix added to diagnostics forwarded from the engine.
const ENGINE_ERROR_PREFIX: &str = "[engine error]";

/// Warning and error callbacks.
///
/// Callbacks run synchronously on the thread calling
/// [`create`](crate::InferenceRuntime::create) or
/// [`run_inference`](crate::InferenceRuntime::run_inference), never from a
/// background thread.
#[derive(Clone)]
pub struct LogCallbacks {
    warn: MessageCallback,
    error: MessageCallback,
}

impl LogCallbacks {
    pub fn new(
        warn: impl Fn(&str) + Send + Sync + 'static,
        error: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            warn: Arc::new(warn),
            error: Arc::new(error),
        }
    }

    /// Callbacks that forward to `tracing::warn!` and `tracing::error!`.
    pub fn tracing() -> Self {
        Self::new(
            |message| tracing::warn!("{message}"),
            |message| tracing::error!("{message}"),
        )
    }

    /// Callbacks that drop every message.
    pub fn silent() -> Self {
        Self::new(|_| {}, |_| {})
    }

    pub fn warn(&self, message: &str) {
        (self.warn)(message);
    }

    pub fn error(&self, message: &str) {
        (self.error)(message);
    }

    /// Builds the engine error reporter, which prefixes every message.
    pub(crate) fn engine_reporter(&self) -> ErrorReporter {
        let error = Arc::clone(&self.error);
        Arc::new(move |message: &str| error(&format!("{ENGINE_ERROR_PREFIX} {message}")))
    }
}

impl Default for LogCallbacks {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for LogCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCallbacks").finish_non_exhaustive()
    }
}
