// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor quantization parameters.

/// How a tensor's stored integers map back to real values.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Quantization {
    /// Values are stored as-is in the tensor's element type.
    #[default]
    None,
    /// Affine quantization: `real = scale * (stored - zero_point)`.
    Affine(AffineQuantization),
}

impl Quantization {
    /// Shorthand for a single global scale / zero-point pair.
    pub fn affine(scale: f32, zero_point: i32) -> Self {
        Quantization::Affine(AffineQuantization::single(scale, zero_point))
    }

    /// Returns the affine parameters, if the tensor is quantized.
    pub fn as_affine(&self) -> Option<&AffineQuantization> {
        match self {
            Quantization::None => None,
            Quantization::Affine(params) => Some(params),
        }
    }

    /// Returns `true` if the tensor carries quantization parameters.
    pub fn is_quantized(&self) -> bool {
        matches!(self, Quantization::Affine(_))
    }
}

/// Affine quantization parameters as declared by a model.
///
/// A model may declare one scale per channel along `quantized_dimension`.
/// Only the single-entry form (one scale and one zero-point for the whole
/// tensor) can be converted by this workspace; see [`single`](Self::single).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AffineQuantization {
    /// Scale factors.
    pub scale: Vec<f32>,
    /// Zero points.
    pub zero_point: Vec<i32>,
    /// Axis the per-channel parameters apply to.
    #[serde(default)]
    pub quantized_dimension: usize,
}

impl AffineQuantization {
    /// Creates parameters with one global scale and zero-point.
    pub fn single(scale: f32, zero_point: i32) -> Self {
        Self {
            scale: vec![scale],
            zero_point: vec![zero_point],
            quantized_dimension: 0,
        }
    }

    /// Returns the `(scale, zero_point)` pair when both vectors hold exactly
    /// one entry, `None` otherwise.
    pub fn single_pair(&self) -> Option<(f32, i32)> {
        match (self.scale.as_slice(), self.zero_point.as_slice()) {
            ([scale], [zero_point]) => Some((*scale, *zero_point)),
            _ => None,
        }
    }
}
