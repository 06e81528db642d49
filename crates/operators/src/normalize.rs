// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-channel normalization of interleaved RGB buffers.

use crate::{Operator, OperatorError};

/// ImageNet channel means on the 0..=255 scale.
pub const IMAGENET_MEAN: [f32; 3] = [123.675, 116.28, 103.53];

/// ImageNet channel standard deviations on the 0..=255 scale.
pub const IMAGENET_STDDEV: [f32; 3] = [58.395, 57.12, 57.375];

/// Applies `(value - mean[c]) / stddev[c]` to an `RGBRGB...` buffer, where
/// `c` is the element index modulo 3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbNormalizeOperator {
    mean: [f32; 3],
    stddev: [f32; 3],
}

impl RgbNormalizeOperator {
    /// Creates an operator with custom channel statistics.
    pub fn new(mean: [f32; 3], stddev: [f32; 3]) -> Self {
        Self { mean, stddev }
    }

    pub fn mean(&self) -> [f32; 3] {
        self.mean
    }

    pub fn stddev(&self) -> [f32; 3] {
        self.stddev
    }
}

impl Default for RgbNormalizeOperator {
    fn default() -> Self {
        Self::new(IMAGENET_MEAN, IMAGENET_STDDEV)
    }
}

impl Operator for RgbNormalizeOperator {
    fn name(&self) -> &str {
        "rgb_normalize"
    }

    fn execute(&self, values: &mut [f32]) -> Result<(), OperatorError> {
        if values.len() % 3 != 0 {
            return Err(OperatorError::ChannelMismatch {
                len: values.len(),
                channels: 3,
            });
        }
        for pixel in values.chunks_exact_mut(3) {
            for (c, v) in pixel.iter_mut().enumerate() {
                *v = (*v - self.mean[c]) / self.stddev[c];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_channels() {
        let op = RgbNormalizeOperator::new([1.0, 2.0, 3.0], [1.0, 2.0, 4.0]);
        let mut values = [1.0, 2.0, 3.0, 2.0, 6.0, 11.0];
        op.execute(&mut values).unwrap();
        assert_eq!(values, [0.0, 0.0, 0.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_imagenet_defaults() {
        let op = RgbNormalizeOperator::default();
        let mut values = IMAGENET_MEAN;
        op.execute(&mut values).unwrap();
        assert_eq!(values, [0.0; 3]);
    }

    #[test]
    fn test_partial_pixel_rejected_untouched() {
        let mut values = [10.0; 4];
        let err = RgbNormalizeOperator::default()
            .execute(&mut values)
            .unwrap_err();
        assert_eq!(err, OperatorError::ChannelMismatch { len: 4, channels: 3 });
        assert_eq!(values, [10.0; 4]);
    }

    #[test]
    fn test_empty_buffer() {
        let mut values: [f32; 0] = [];
        RgbNormalizeOperator::default().execute(&mut values).unwrap();
    }
}
