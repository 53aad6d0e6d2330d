//! Error types for hook configuration and execution.

use std::{io, process::ExitStatus};

use thiserror::Error;

/// A hook definition that does not name exactly one backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("hook {name:?} must set exactly one of `command` or `shell`, found {found}")]
pub struct HookConfigError {
    /// Name of the offending hook.
    pub name: String,
    /// Number of backends that were set.
    pub found: usize,
}

/// Failure of a single backend invocation.
#[derive(Debug, Error)]
pub enum HookError {
    /// The backend process could not be started.
    #[error("failed to spawn {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// Writing the record to, or reading the result from, the backend failed.
    #[error("hook i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The backend exited unsuccessfully.
    #[error("hook exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },
    /// The backend did not print a JSON object.
    #[error("hook output is not a json object: {0}")]
    Decode(#[from] serde_json::Error),
    /// The record could not be encoded for the backend.
    #[error("failed to encode record: {0}")]
    Encode(serde_json::Error),
    /// Backend-specific failure.
    #[error("{0}")]
    Backend(String),
}

/// Failure of a hook chain. The record is dropped for the output.
#[derive(Debug, Error)]
pub enum HookChainError {
    /// Hook `hook`, at `position` in the chain, failed.
    #[error("hook {hook:?} (#{position}) failed: {source}")]
    ExecutionFailed {
        hook: String,
        position: usize,
        #[source]
        source: HookError,
    },
}

impl HookChainError {
    /// Name of the hook that failed.
    #[must_use]
    pub fn hook(&self) -> &str {
        match self {
            Self::ExecutionFailed { hook, .. } => hook,
        }
    }
}
