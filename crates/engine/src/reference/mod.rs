// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A pure-Rust reference engine.
//!
//! Models are JSON [`ModelManifest`]s; see the [`manifest`] module for the
//! format. The backend can simulate three accelerator situations
//! (see [`Accelerator`]) so callers can exercise delegate fallback paths
//! without hardware.

pub mod delegate;
pub mod interpreter;
pub mod manifest;
mod ops;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use delegate::AcceleratorDelegate;
pub use interpreter::ReferenceInterpreter;
pub use manifest::{ModelManifest, OpSpec};

use crate::{Backend, DelegateOptions, InterpreterOptions, ModelBytes, ModelError};

/// Simulated accelerator availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accelerator {
    /// Delegates can be created and accept every graph.
    #[default]
    Available,
    /// No accelerator: delegate creation fails.
    Unavailable,
    /// Delegates can be created but refuse every graph.
    Incompatible,
}

/// Counters shared by a backend and everything it creates.
#[derive(Debug, Default)]
pub struct BackendStats {
    delegates_created: AtomicUsize,
    delegates_released: AtomicUsize,
    delegate_compilations: AtomicUsize,
    delegate_cache_hits: AtomicUsize,
    interpreters_created: AtomicUsize,
}

impl BackendStats {
    /// Delegates created so far.
    pub fn delegates_created(&self) -> usize {
        self.delegates_created.load(Ordering::Relaxed)
    }

    /// Delegates dropped so far.
    pub fn delegates_released(&self) -> usize {
        self.delegates_released.load(Ordering::Relaxed)
    }

    /// Delegates currently alive.
    pub fn live_delegates(&self) -> usize {
        self.delegates_created()
            .saturating_sub(self.delegates_released())
    }

    /// Graph compilations performed by delegates.
    pub fn delegate_compilations(&self) -> usize {
        self.delegate_compilations.load(Ordering::Relaxed)
    }

    /// Compilations skipped thanks to serialized delegate data.
    pub fn delegate_cache_hits(&self) -> usize {
        self.delegate_cache_hits.load(Ordering::Relaxed)
    }

    /// Interpreters successfully created.
    pub fn interpreters_created(&self) -> usize {
        self.interpreters_created.load(Ordering::Relaxed)
    }
}

/// A model loaded by the [`ReferenceBackend`].
///
/// Keeps the original bytes alongside the parsed manifest.
#[derive(Debug)]
pub struct ReferenceModel {
    manifest: Arc<ModelManifest>,
    bytes: ModelBytes,
}

impl ReferenceModel {
    /// The parsed manifest.
    pub fn manifest(&self) -> &ModelManifest {
        &self.manifest
    }

    /// The bytes the model was built from.
    pub fn bytes(&self) -> &ModelBytes {
        &self.bytes
    }

    pub(crate) fn shared_manifest(&self) -> &Arc<ModelManifest> {
        &self.manifest
    }
}

/// The reference engine. Cloning shares the [`BackendStats`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceBackend {
    accelerator: Accelerator,
    stats: Arc<BackendStats>,
}

impl ReferenceBackend {
    /// Creates a backend with an available accelerator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated accelerator availability.
    pub fn with_accelerator(mut self, accelerator: Accelerator) -> Self {
        self.accelerator = accelerator;
        self
    }

    /// Simulated accelerator availability.
    pub fn accelerator(&self) -> Accelerator {
        self.accelerator
    }

    /// Shared counters.
    pub fn stats(&self) -> &BackendStats {
        &self.stats
    }
}

impl Backend for ReferenceBackend {
    type Model = ReferenceModel;
    type Delegate = AcceleratorDelegate;
    type Interpreter = ReferenceInterpreter;

    fn name(&self) -> &str {
        "reference"
    }

    fn load_model(&self, bytes: ModelBytes) -> Result<ReferenceModel, ModelError> {
        if bytes.is_empty() {
            return Err(ModelError::Empty);
        }
        let manifest = ModelManifest::from_slice(bytes.as_slice())?;
        manifest.validate()?;
        tracing::debug!(
            model = %manifest.name,
            inputs = manifest.inputs.len(),
            outputs = manifest.outputs.len(),
            ops = manifest.ops.len(),
            "loaded reference model"
        );
        Ok(ReferenceModel {
            manifest: Arc::new(manifest),
            bytes,
        })
    }

    fn create_delegate(&self, options: &DelegateOptions) -> Option<AcceleratorDelegate> {
        match self.accelerator {
            Accelerator::Unavailable => {
                tracing::debug!("no accelerator available on this device");
                None
            }
            Accelerator::Available => Some(AcceleratorDelegate::new(
                options.clone(),
                true,
                Arc::clone(&self.stats),
            )),
            Accelerator::Incompatible => Some(AcceleratorDelegate::new(
                options.clone(),
                false,
                Arc::clone(&self.stats),
            )),
        }
    }

    fn create_interpreter(
        &self,
        model: &ReferenceModel,
        options: &InterpreterOptions,
        delegate: Option<&AcceleratorDelegate>,
    ) -> Option<ReferenceInterpreter> {
        ReferenceInterpreter::new(model, options, delegate, &self.stats)
    }
}
