// src/error.rs
//! Crate-wide error taxonomy for the SDK binding
//!
//! The native library reports failure exclusively through return codes and
//! the no-device sentinel; nothing it exports is documented as throwing.
//! Every variant here exists to turn one of those conventions into explicit
//! Rust control flow instead of an unchecked integer.

use std::path::PathBuf;

use thiserror::Error;

use crate::sdk::codes::STATUS_WRONG_SEQUENCE;

/// Errors raised by the binding and the safe wrapper.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The native module or one of its required exports could not be
    /// resolved at load time. Unrecoverable without fixing the deployment.
    #[error("native SDK library unavailable ({detail}): {source}")]
    LibraryNotFound {
        detail: &'static str,
        #[source]
        source: libloading::Error,
    },

    /// The device query returned the no-device sentinel channel count.
    /// Recoverable by reattaching hardware and retrying.
    #[error("no device detected (reported channel count {channel_count})")]
    NoDeviceDetected { channel_count: i32 },

    /// A session or acquisition command returned a non-success status.
    /// `code` is the raw native value, surfaced unmodified so callers can
    /// distinguish explicit failure from a sequence violation.
    #[error("{command} rejected by SDK (status {code})")]
    CommandRejected { command: &'static str, code: i32 },

    /// A destination path could not be marshalled into a C string.
    /// Raised before the native call is attempted.
    #[error("invalid destination path {path:?}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// The native library handed back a null pointer where data was due.
    #[error("SDK returned a null {what} pointer")]
    NullPointer { what: &'static str },

    /// Data retrieval was attempted before the channel count is known.
    /// Buffer shape depends on the device's channel count, so the device
    /// must be queried first.
    #[error("channel count unknown; query device info before retrieving data")]
    ChannelCountUnknown,
}

impl SdkError {
    /// True when the native side ignored the command because it was issued
    /// out of sequence (as opposed to an explicit failure).
    pub fn is_sequence_violation(&self) -> bool {
        matches!(
            self,
            SdkError::CommandRejected {
                code: STATUS_WRONG_SEQUENCE,
                ..
            }
        )
    }

    /// The raw native status code, for rejected commands.
    pub fn rejection_code(&self) -> Option<i32> {
        match self {
            SdkError::CommandRejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result alias used throughout the wrapper.
pub type SdkResult<T> = Result<T, SdkError>;
