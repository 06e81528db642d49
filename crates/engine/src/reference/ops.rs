// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reference kernels for [`OpSpec`].

use super::manifest::OpSpec;

impl OpSpec {
    /// Op name as written in the manifest.
    pub fn name(&self) -> &'static str {
        match self {
            OpSpec::Identity => "identity",
            OpSpec::Scale { .. } => "scale",
            OpSpec::Offset { .. } => "offset",
            OpSpec::Relu => "relu",
            OpSpec::Sigmoid => "sigmoid",
            OpSpec::ChannelMean { .. } => "channel_mean",
        }
    }

    /// Number of values produced from `input_len` values, or `None` if the
    /// op cannot consume that many.
    pub fn output_len(&self, input_len: usize) -> Option<usize> {
        match self {
            OpSpec::ChannelMean { channels } => {
                if *channels > 0 && input_len % channels == 0 {
                    Some(input_len / channels)
                } else {
                    None
                }
            }
            _ => Some(input_len),
        }
    }

    /// Applies the op.
    pub fn apply(&self, mut values: Vec<f32>) -> Vec<f32> {
        match self {
            OpSpec::Identity => values,
            OpSpec::Scale { factor } => {
                values.iter_mut().for_each(|v| *v *= factor);
                values
            }
            OpSpec::Offset { value } => {
                values.iter_mut().for_each(|v| *v += value);
                values
            }
            OpSpec::Relu => {
                values.iter_mut().for_each(|v| *v = v.max(0.0));
                values
            }
            OpSpec::Sigmoid => {
                values.iter_mut().for_each(|v| *v = 1.0 / (1.0 + (-*v).exp()));
                values
            }
            OpSpec::ChannelMean { channels } => {
                let n = *channels as f32;
                values
                    .chunks_exact(*channels)
                    .map(|group| group.iter().sum::<f32>() / n)
                    .collect()
            }
        }
    }
}

/// Length of the values left after running `ops` on `input_len` values.
pub(crate) fn planned_len(ops: &[OpSpec], input_len: usize) -> Result<usize, String> {
    ops.iter().try_fold(input_len, |len, op| {
        op.output_len(len)
            .ok_or_else(|| format!("op '{}' cannot consume {len} values", op.name()))
    })
}

/// Runs `ops` in order. Fails with a diagnostic as soon as an op produces
/// a non-finite value.
pub(crate) fn evaluate(ops: &[OpSpec], mut values: Vec<f32>) -> Result<Vec<f32>, String> {
    for op in ops {
        values = op.apply(values);
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(format!(
                "op '{}' produced a non-finite value at index {pos}",
                op.name()
            ));
        }
    }
    Ok(values)
}
