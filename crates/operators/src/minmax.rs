// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Min-max rescaling.

use crate::{Operator, OperatorError};

/// Rescales a buffer to `[0, 1]` using its own minimum and maximum.
///
/// An empty buffer is left alone. A constant buffer becomes all `0.5`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxOperator;

impl MinMaxOperator {
    pub fn new() -> Self {
        Self
    }
}

impl Operator for MinMaxOperator {
    fn name(&self) -> &str {
        "min_max"
    }

    fn execute(&self, values: &mut [f32]) -> Result<(), OperatorError> {
        if values.is_empty() {
            return Ok(());
        }

        let (min, max) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if max > min {
            let range = max - min;
            values.iter_mut().for_each(|v| *v = (*v - min) / range);
        } else {
            values.fill(0.5);
        }
        Ok(())
    }
}
