// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON model format understood by the reference backend.
//!
//! A reference model declares its graph inputs and outputs and a chain of
//! elementwise ops applied to input 0, whose result is written to output 0.
//!
//! # Format
//! ```json
//! {
//!   "name": "depth-lite",
//!   "inputs": [
//!     { "name": "image", "dtype": "float32", "shape": [1, 256, 256, 3] }
//!   ],
//!   "outputs": [
//!     { "name": "depth", "dtype": "float32", "shape": [1, 256, 256, 1] }
//!   ],
//!   "ops": [
//!     { "op": "channel_mean", "channels": 3 },
//!     { "op": "sigmoid" }
//!   ]
//! }
//! ```

use tensor_core::TensorInfo;

use crate::ModelError;

/// Top-level reference model description.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelManifest {
    /// Human-readable model name.
    pub name: String,
    /// Graph inputs.
    pub inputs: Vec<TensorInfo>,
    /// Graph outputs.
    pub outputs: Vec<TensorInfo>,
    /// Ops applied in order to input 0.
    #[serde(default)]
    pub ops: Vec<OpSpec>,
}

/// One elementwise (or channel-reducing) op.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpSpec {
    /// Passes values through.
    Identity,
    /// Multiplies every value by `factor`.
    Scale { factor: f32 },
    /// Adds `value` to every value.
    Offset { value: f32 },
    /// `max(x, 0)`.
    Relu,
    /// Logistic sigmoid.
    Sigmoid,
    /// Averages each group of `channels` interleaved values into one.
    ChannelMean { channels: usize },
}

impl ModelManifest {
    /// Parses a manifest from raw model bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let manifest: Self = serde_json::from_slice(bytes)?;
        Ok(manifest)
    }

    /// Serializes the manifest into model bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Validates the structure of the manifest.
    ///
    /// Checks:
    /// - At least one input and one output are declared.
    /// - Every tensor has a fixed-size element type.
    /// - Every tensor's byte size fits in `usize`.
    /// - No tensor name is used twice.
    /// - `channel_mean` ops declare a non-zero channel count.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.inputs.is_empty() {
            return Err(self.invalid("model declares no inputs"));
        }
        if self.outputs.is_empty() {
            return Err(self.invalid("model declares no outputs"));
        }

        let mut seen = std::collections::HashSet::new();
        for info in self.inputs.iter().chain(&self.outputs) {
            if !seen.insert(info.name.as_str()) {
                return Err(self.invalid(format!("duplicate tensor name '{}'", info.name)));
            }
            if info.element_type.size_bytes().is_none() {
                return Err(self.invalid(format!(
                    "tensor '{}' has unsized element type {}",
                    info.name, info.element_type
                )));
            }
            if info.size_bytes().is_none() {
                return Err(self.invalid(format!(
                    "tensor '{}' of shape {} is too large",
                    info.name, info.shape
                )));
            }
        }

        if self
            .ops
            .iter()
            .any(|op| matches!(op, OpSpec::ChannelMean { channels: 0 }))
        {
            return Err(self.invalid("channel_mean requires at least one channel"));
        }

        Ok(())
    }

    /// Stable 64-bit fingerprint of the manifest contents (FNV-1a over the
    /// compact JSON encoding).
    pub fn fingerprint(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        let encoded = serde_json::to_vec(self).unwrap_or_default();
        encoded.iter().fold(OFFSET, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
        })
    }

    fn invalid(&self, detail: impl Into<String>) -> ModelError {
        ModelError::Invalid {
            model: self.name.clone(),
            detail: detail.into(),
        }
    }
}
