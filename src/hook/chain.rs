//! Ordered, all-or-nothing hook execution.

use std::{fmt, sync::Arc};

use super::{Hook, HookChainError, HookExecutor};
use crate::{Record, metrics};

/// Hooks applied in configuration order, each receiving the previous
/// hook's output.
///
/// The first failing hook aborts the chain. Later hooks never see the
/// record and the error names the hook that failed.
#[derive(Clone)]
pub struct HookChain {
    hooks: Vec<Hook>,
    executor: Arc<dyn HookExecutor>,
}

impl HookChain {
    /// Create a chain running `hooks` through `executor`.
    #[must_use]
    pub fn new(hooks: Vec<Hook>, executor: Arc<dyn HookExecutor>) -> Self {
        Self { hooks, executor }
    }

    /// Number of hooks in the chain.
    #[must_use]
    pub fn len(&self) -> usize { self.hooks.len() }

    /// Whether the chain passes records through untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.hooks.is_empty() }

    /// Hook names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> { self.hooks.iter().map(Hook::name) }

    /// Thread `record` through every hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookChainError::ExecutionFailed`] for the first hook that
    /// fails; the partially rewritten record is discarded.
    pub fn execute(&self, record: Record) -> Result<Record, HookChainError> {
        let mut current = record;
        for (position, hook) in self.hooks.iter().enumerate() {
            current = hook
                .execute(self.executor.as_ref(), current)
                .map_err(|source| {
                    metrics::inc_hook_failures(hook.name());
                    HookChainError::ExecutionFailed {
                        hook: hook.name().to_owned(),
                        position,
                        source,
                    }
                })?;
            tracing::trace!(hook = hook.name(), position, "hook applied");
        }
        Ok(current)
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
