//! Errors reported by output sinks.

use std::io;

use thiserror::Error;

/// Failure to hand data to a destination.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing to the destination failed.
    #[error("sink i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The record could not be serialized for the destination.
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    /// Transport-specific failure.
    #[error("transport failed: {0}")]
    Transport(String),
}
