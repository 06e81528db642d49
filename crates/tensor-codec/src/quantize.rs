// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Affine `f32` ⇄ `u8` conversion.
//!
//! `stored = trunc(value / scale) + zero_point` and
//! `value = scale * (stored - zero_point)`.
//!
//! Quantization truncates toward zero rather than rounding. Results outside
//! `0..=255` saturate at the nearest bound, and NaN maps to `zero_point`.

use tensor_core::AffineQuantization;

use crate::{AsymmetricQuantization, QuantizationElementsMismatch, QuantizationError};

/// Quantizes one value.
#[inline]
pub fn quantize_value(value: f32, scale: f32, zero_point: i32) -> u8 {
    ((value / scale) as i32)
        .saturating_add(zero_point)
        .clamp(0, 255) as u8
}

/// Dequantizes one value.
#[inline]
pub fn dequantize_value(stored: u8, scale: f32, zero_point: i32) -> f32 {
    scale * (i32::from(stored) - zero_point) as f32
}

/// Quantizes `values` into `out`.
///
/// Nothing is written unless both buffers have the same length and `params`
/// hold a single scale / zero-point pair.
pub fn quantize_u8(
    values: &[f32],
    params: &AffineQuantization,
    out: &mut [u8],
) -> Result<(), QuantizationError> {
    let (scale, zero_point) = checked_params(values.len(), out.len(), params)?;
    for (stored, &value) in out.iter_mut().zip(values) {
        *stored = quantize_value(value, scale, zero_point);
    }
    Ok(())
}

/// Dequantizes `stored` into `out`.
///
/// Nothing is written unless both buffers have the same length and `params`
/// hold a single scale / zero-point pair.
pub fn dequantize_u8(
    stored: &[u8],
    params: &AffineQuantization,
    out: &mut [f32],
) -> Result<(), QuantizationError> {
    let (scale, zero_point) = checked_params(out.len(), stored.len(), params)?;
    for (value, &q) in out.iter_mut().zip(stored) {
        *value = dequantize_value(q, scale, zero_point);
    }
    Ok(())
}

fn checked_params(
    values: usize,
    quantized: usize,
    params: &AffineQuantization,
) -> Result<(f32, i32), QuantizationError> {
    if values != quantized {
        return Err(QuantizationElementsMismatch { values, quantized }.into());
    }
    params.single_pair().ok_or_else(|| {
        AsymmetricQuantization {
            scales: params.scale.len(),
            zero_points: params.zero_point.len(),
        }
        .into()
    })
}
