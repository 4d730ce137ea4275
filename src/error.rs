// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use thiserror::Error;

/// Result type for IRImager operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the IRImager bindings.
///
/// `BadArguments` is always raised before the SDK is touched. `Operation` and
/// `Fatal` carry the fixed message for the `-1` and `-2` statuses of the call
/// that failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bad argument(s): {0}")]
    BadArguments(String),

    /// The SDK returned `-1`.
    #[error("{op}: {message}")]
    Operation {
        op: &'static str,
        message: &'static str,
    },

    /// The SDK returned `-2` (TCP connections only).
    #[error("{op}: {message}")]
    Fatal {
        op: &'static str,
        message: &'static str,
    },

    /// The SDK returned a status outside its documented contract.
    #[error("{op}: unreachable status {status} returned by the SDK")]
    UnreachableStatus { op: &'static str, status: i32 },

    #[error("{op}: out of memory allocating {bytes} bytes")]
    OutOfMemory { op: &'static str, bytes: usize },

    #[error("{op}: invalid image size {width}x{height}")]
    InvalidSize {
        op: &'static str,
        width: i32,
        height: i32,
    },

    #[error("failed to load the IRImager library: {0}")]
    Library(#[from] irimager_sys::LoadError),

    #[error("an IRImager session is already open in this process")]
    SessionInUse,
}

impl Error {
    /// Stable snake-case name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::BadArguments(_) => "bad_arguments",
            Error::Operation { .. } => "operation_error",
            Error::Fatal { .. } => "fatal_error",
            Error::UnreachableStatus { .. } => "unreachable_status",
            Error::OutOfMemory { .. } => "out_of_memory",
            Error::InvalidSize { .. } => "invalid_size",
            Error::Library(_) => "library",
            Error::SessionInUse => "session_in_use",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Fatal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_operation() {
        let err = Error::Operation {
            op: "tcp_init",
            message: "Host not found",
        };
        assert_eq!(err.to_string(), "tcp_init: Host not found");
        assert_eq!(err.kind(), "operation_error");

        let err = Error::UnreachableStatus {
            op: "set_palette",
            status: 7,
        };
        assert_eq!(
            err.to_string(),
            "set_palette: unreachable status 7 returned by the SDK"
        );
    }
}
