// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! delegate_cache_dir = "/var/cache/edge-infer"
//! model_token = "depth-lite.json_1718000000"
//! num_threads = 4
//! use_accelerator = true
//! inference_preference = "fast-single-answer"
//! allow_precision_loss = true
//! enable_profiling = false
//! preset = "depth-estimation"
//! ```

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use engine::{DelegateOptions, InferencePreference};

use crate::ModelPreset;

/// CPU threads requested from the engine when none are configured.
pub const DEFAULT_NUM_THREADS: usize = 4;

/// Errors that can occur while reading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialise error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("'{0}' has no file name")]
    NoFileName(PathBuf),
}

/// Configuration for the inference runtime.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Directory for serialized delegate data.
    pub delegate_cache_dir: Option<PathBuf>,
    /// Token keying the model's entry in the delegate cache.
    pub model_token: Option<String>,
    /// CPU threads for the engine (defaults to [`DEFAULT_NUM_THREADS`]).
    pub num_threads: Option<usize>,
    /// Whether to try the accelerator delegate at all.
    pub use_accelerator: bool,
    /// What the accelerator optimises for.
    pub inference_preference: InferencePreference,
    /// Allow reduced precision on the accelerator.
    pub allow_precision_loss: bool,
    /// Record per-stage profiling scopes.
    pub enable_profiling: bool,
    /// Operator stages to install.
    pub preset: ModelPreset,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            delegate_cache_dir: None,
            model_token: None,
            num_threads: None,
            use_accelerator: true,
            inference_preference: InferencePreference::FastSingleAnswer,
            allow_precision_loss: true,
            enable_profiling: false,
            preset: ModelPreset::Passthrough,
        }
    }
}

impl RuntimeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolves the number of engine threads (at least one).
    pub fn resolve_threads(&self) -> usize {
        self.num_threads.unwrap_or(DEFAULT_NUM_THREADS).max(1)
    }

    /// Delegate options described by this configuration.
    pub fn delegate_options(&self) -> DelegateOptions {
        DelegateOptions {
            inference_preference: self.inference_preference,
            allow_precision_loss: self.allow_precision_loss,
            serialization_dir: self.delegate_cache_dir.clone(),
            model_token: self.model_token.clone(),
        }
    }
}

/// Builds a delegate cache token for a model file: `<file name>_<mtime>`,
/// with the modification time in whole seconds since the Unix epoch.
///
/// Replacing the model file changes the token, so stale delegate data is
/// never reused.
pub fn model_token_for_path(path: &Path) -> Result<String, ConfigError> {
    let name = path
        .file_name()
        .ok_or_else(|| ConfigError::NoFileName(path.to_path_buf()))?
        .to_string_lossy();
    let read_err = |source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    };
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(read_err)?;
    let secs = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Ok(format!("{name}_{secs}"))
}
