//! Record-rewriting hooks for log outputs.
//!
//! A [`Hook`] names exactly one [`HookBackend`]. Backends are run through a
//! [`HookExecutor`], an injected capability so chain semantics can be
//! exercised without spawning processes. [`HookChain`] threads a record
//! through its hooks in order and stops at the first failure; the caller
//! then drops the record for that output.

pub mod backend;
pub mod chain;
pub mod error;
pub mod executor;

pub use backend::{Hook, HookBackend};
pub use chain::HookChain;
pub use error::{HookChainError, HookConfigError, HookError};
pub use executor::{HookExecutor, ProcessExecutor};
