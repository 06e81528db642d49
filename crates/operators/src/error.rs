// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operator error type.

/// Errors raised by an [`Operator`](crate::Operator).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperatorError {
    /// The buffer cannot be split into whole pixels.
    #[error("buffer of {len} values is not a multiple of {channels} channels")]
    ChannelMismatch { len: usize, channels: usize },

    /// A user-defined operator failed.
    #[error("{0}")]
    Custom(String),
}

impl OperatorError {
    /// Creates a [`OperatorError::Custom`] from any message.
    pub fn msg(message: impl Into<String>) -> Self {
        OperatorError::Custom(message.into())
    }
}
