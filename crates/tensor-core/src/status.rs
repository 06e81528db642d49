// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Native engine status codes.

use std::fmt;

/// Status returned by engine calls (allocation, invoke, tensor copies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Success.
    Ok,
    /// Unspecified failure inside the engine.
    Error,
    /// The accelerator delegate failed.
    DelegateError,
    /// The application passed an invalid configuration.
    ApplicationError,
    /// Serialized delegate data was requested but not found.
    DelegateDataNotFound,
    /// Serialized delegate data could not be written.
    DelegateDataWriteError,
    /// Serialized delegate data could not be read.
    DelegateDataReadError,
    /// The model uses operations the engine cannot resolve.
    UnresolvedOps,
    /// The call was cancelled.
    Cancelled,
    /// An output shape depends on data that is not yet known.
    OutputShapeNotKnown,
}

impl Status {
    /// Returns `true` for [`Status::Ok`].
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Human-readable description of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Error => "general error",
            Status::DelegateError => "delegate error",
            Status::ApplicationError => "application error",
            Status::DelegateDataNotFound => "delegate data not found",
            Status::DelegateDataWriteError => "delegate data write error",
            Status::DelegateDataReadError => "delegate data read error",
            Status::UnresolvedOps => "unresolved ops",
            Status::Cancelled => "cancelled",
            Status::OutputShapeNotKnown => "output shape not known",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ok() {
        assert!(Status::Ok.is_ok());
        assert!(!Status::DelegateError.is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::Error.to_string(), "general error");
        assert_eq!(Status::UnresolvedOps.to_string(), "unresolved ops");
    }
}
