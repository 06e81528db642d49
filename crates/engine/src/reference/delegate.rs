// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulated accelerator delegate with serialized compilation caches.
//!
//! Preparing a graph for the accelerator is treated as a compilation step.
//! When serialization is configured, the result is recorded in
//! `<serialization_dir>/<model_token>.delegate.json` and later delegates
//! created with the same token skip the compilation.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tensor_core::Status;

use super::manifest::ModelManifest;
use super::BackendStats;
use crate::DelegateOptions;

/// Serialized delegate data.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    model: String,
    fingerprint: u64,
    precision_loss: bool,
    ops: usize,
}

/// Accelerator delegate of the reference backend.
#[derive(Debug)]
pub struct AcceleratorDelegate {
    options: DelegateOptions,
    accepts_graphs: bool,
    stats: Arc<BackendStats>,
}

impl AcceleratorDelegate {
    pub(crate) fn new(options: DelegateOptions, accepts_graphs: bool, stats: Arc<BackendStats>) -> Self {
        stats.delegates_created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            preference = ?options.inference_preference,
            precision_loss = options.allow_precision_loss,
            serialization = options.serialization().is_some(),
            "created accelerator delegate"
        );
        Self {
            options,
            accepts_graphs,
            stats,
        }
    }

    /// Options the delegate was created with.
    pub fn options(&self) -> &DelegateOptions {
        &self.options
    }

    /// Location of the serialized data, when serialization is configured.
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.options
            .serialization()
            .map(|(dir, token)| dir.join(format!("{token}.delegate.json")))
    }

    /// Prepares `manifest` for execution on the accelerator.
    ///
    /// Errors describe why the accelerator refused the graph. Problems with
    /// the serialization cache are logged and never fail preparation.
    pub(crate) fn prepare(&self, manifest: &ModelManifest) -> Result<(), String> {
        if !self.accepts_graphs {
            return Err(format!(
                "accelerator cannot execute graph '{}'",
                manifest.name
            ));
        }

        let entry = CacheEntry {
            model: manifest.name.clone(),
            fingerprint: manifest.fingerprint(),
            precision_loss: self.options.allow_precision_loss,
            ops: manifest.ops.len(),
        };

        let Some(path) = self.cache_path() else {
            self.compile(&entry);
            return Ok(());
        };

        match read_entry(&path) {
            Ok(Some(cached)) if cached == entry => {
                self.stats.delegate_cache_hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(path = %path.display(), "reusing serialized delegate data");
                return Ok(());
            }
            Ok(Some(_)) => {
                tracing::debug!(path = %path.display(), "serialized delegate data is stale");
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "{}", Status::DelegateDataNotFound);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "{}", Status::DelegateDataReadError);
            }
        }

        self.compile(&entry);
        if let Err(e) = write_entry(&path, &entry) {
            tracing::warn!(path = %path.display(), error = %e, "{}", Status::DelegateDataWriteError);
        }
        Ok(())
    }

    fn compile(&self, entry: &CacheEntry) {
        self.stats.delegate_compilations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(model = %entry.model, ops = entry.ops, "compiled graph for accelerator");
    }
}

impl Drop for AcceleratorDelegate {
    fn drop(&mut self) {
        self.stats.delegates_released.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("released accelerator delegate");
    }
}

fn read_entry(path: &Path) -> Result<Option<CacheEntry>, String> {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| e.to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

fn write_entry(path: &Path, entry: &CacheEntry) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let bytes = serde_json::to_vec_pretty(entry).map_err(|e| e.to_string())?;
    std::fs::write(path, bytes).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{ElementType, Shape, TensorInfo};

    fn manifest() -> ModelManifest {
        ModelManifest {
            name: "tiny".into(),
            inputs: vec![TensorInfo::new("in", ElementType::Float32, Shape::vector(4))],
            outputs: vec![TensorInfo::new("out", ElementType::Float32, Shape::vector(4))],
            ops: vec![],
        }
    }

    #[test]
    fn test_cache_path() {
        let stats = Arc::new(BackendStats::default());
        let d = AcceleratorDelegate::new(DelegateOptions::default(), true, Arc::clone(&stats));
        assert!(d.cache_path().is_none());

        let opts = DelegateOptions::default().with_serialization("/data/cache", "model-a");
        let d = AcceleratorDelegate::new(opts, true, stats);
        assert_eq!(d.cache_path(), Some(PathBuf::from("/data/cache/model-a.delegate.json")));
    }

    #[test]
    fn test_second_delegate_reuses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let stats = Arc::new(BackendStats::default());
        let opts = DelegateOptions::default().with_serialization(dir.path(), "tiny");

        let first = AcceleratorDelegate::new(opts.clone(), true, Arc::clone(&stats));
        first.prepare(&manifest()).unwrap();
        assert!(dir.path().join("tiny.delegate.json").exists());

        let second = AcceleratorDelegate::new(opts, true, Arc::clone(&stats));
        second.prepare(&manifest()).unwrap();

        assert_eq!(stats.delegate_compilations(), 1);
        assert_eq!(stats.delegate_cache_hits(), 1);
    }

    #[test]
    fn test_stale_cache_recompiles() {
        let dir = tempfile::tempdir().unwrap();
        let stats = Arc::new(BackendStats::default());
        let opts = DelegateOptions::default().with_serialization(dir.path(), "tiny");
        let delegate = AcceleratorDelegate::new(opts, true, Arc::clone(&stats));

        delegate.prepare(&manifest()).unwrap();
        let mut changed = manifest();
        changed.ops.push(crate::reference::OpSpec::Relu);
        delegate.prepare(&changed).unwrap();

        assert_eq!(stats.delegate_compilations(), 2);
        assert_eq!(stats.delegate_cache_hits(), 0);
    }

    #[test]
    fn test_corrupt_cache_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiny.delegate.json"), b"{ broken").unwrap();
        let stats = Arc::new(BackendStats::default());
        let opts = DelegateOptions::default().with_serialization(dir.path(), "tiny");

        AcceleratorDelegate::new(opts, true, Arc::clone(&stats))
            .prepare(&manifest())
            .unwrap();
        assert_eq!(stats.delegate_compilations(), 1);
    }

    #[test]
    fn test_incompatible_delegate_refuses() {
        let stats = Arc::new(BackendStats::default());
        let d = AcceleratorDelegate::new(DelegateOptions::default(), false, Arc::clone(&stats));
        assert!(d.prepare(&manifest()).unwrap_err().contains("tiny"));
        drop(d);
        assert_eq!(stats.live_delegates(), 0);
    }
}
