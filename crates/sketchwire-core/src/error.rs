//! Error types for the synchronization core.
//!
//! Nothing here is fatal: every variant describes an action that was
//! abandoned while the local canvas keeps working.

use thiserror::Error;

/// Failures at the sync boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    /// The channel is not open; the outbound event was dropped.
    #[error("Connection unavailable")]
    ConnectionUnavailable,
    /// An inbound payload could not be decoded into a draw event.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),
    /// Resize dimensions were missing or not numeric.
    #[error("Invalid resize: {0}")]
    InvalidResize(String),
}

/// Failures while encoding or decoding canvas images.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encode error: {0}")]
    Encode(String),
    #[error("PNG decode error: {0}")]
    Decode(String),
    #[error("Invalid data URL: {0}")]
    DataUrl(String),
}
