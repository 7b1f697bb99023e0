// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for store operations.
//!
//! Provides structured error handling with enough context to decide whether
//! a failure is a caller mistake (conflict, not-found, invalid key) or an
//! I/O-level failure that leaves the on-disk log possibly truncated.

use std::fmt;

/// Standard Result type for all store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for store operations.
#[derive(Debug)]
pub enum Error {
    /// `insert` found the key already present.
    Conflict { key: Vec<u8> },

    /// `update` found the key absent.
    NotFound { key: Vec<u8> },

    /// An empty key was passed where a non-empty key is required.
    InvalidKey,

    /// The log writer returned an I/O error during a mutation, or the log
    /// was found truncated mid-record during replay on open.
    OperationFailed { operation: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { key } => {
                write!(f, "key already present: {}", format_key(key))
            }
            Self::NotFound { key } => {
                write!(f, "key not found: {}", format_key(key))
            }
            Self::InvalidKey => {
                write!(f, "key must not be empty")
            }
            Self::OperationFailed { operation, reason } => {
                write!(f, "operation '{}' failed: {}", operation, reason)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::OperationFailed {
            operation: "io".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Renders a key for error messages: as UTF-8 if valid, as hex otherwise.
fn format_key(key: &[u8]) -> String {
    match std::str::from_utf8(key) {
        Ok(s) => format!("{:?}", s),
        Err(_) => {
            let mut out = String::with_capacity(2 + key.len() * 2);
            out.push_str("0x");
            for b in key {
                out.push_str(&format!("{:02x}", b));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_display_shows_key() {
        let err = Error::Conflict {
            key: b"hello".to_vec(),
        };
        assert!(err.to_string().contains("hello"));
    }

    #[test]
    fn not_found_display_shows_key() {
        let err = Error::NotFound {
            key: b"missing".to_vec(),
        };
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn invalid_key_display() {
        assert_eq!(Error::InvalidKey.to_string(), "key must not be empty");
    }

    #[test]
    fn non_utf8_key_renders_as_hex() {
        let err = Error::Conflict {
            key: vec![0xff, 0x00, 0x10],
        };
        assert_eq!(err.to_string(), "key already present: 0xff0010");
    }

    #[test]
    fn io_error_converts_to_operation_failed() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: Error = io_err.into();
        match err {
            Error::OperationFailed { operation, .. } => assert_eq!(operation, "io"),
            _ => panic!("expected OperationFailed"),
        }
    }
}
