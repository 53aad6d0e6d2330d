//! Hook definitions.

use serde::Deserialize;

use super::{HookConfigError, HookError, HookExecutor};
use crate::Record;

/// The external mechanism a hook runs.
///
/// New backends are added as variants here and handled by every
/// [`HookExecutor`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookBackend {
    /// An external program, given as a command line. It reads the record as
    /// JSON on stdin and prints the replacement record on stdout.
    Command(String),
    /// A shell script embedded in the configuration, run with `sh -c`. Same
    /// data exchange as [`HookBackend::Command`].
    Shell(String),
}

impl HookBackend {
    /// Configuration key naming this backend.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Shell(_) => "shell",
        }
    }
}

/// A named record-rewriting step.
///
/// ```yaml
/// hooks:
/// - name: add hostname
///   shell: |
///     #!/bin/sh
///     echo `cat` | jq --arg hostname $(hostname) '. + {hostname: $hostname}'
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawHook")]
pub struct Hook {
    name: String,
    backend: HookBackend,
}

impl Hook {
    /// Create a hook from a name and its backend.
    #[must_use]
    pub fn new(name: impl Into<String>, backend: HookBackend) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    /// Build a hook from the optional backend slots of a configuration entry.
    ///
    /// An empty `name` is replaced by one derived from the backend, so logs
    /// and errors can still tell unnamed hooks apart.
    ///
    /// # Errors
    ///
    /// Returns [`HookConfigError`] unless exactly one slot is set.
    pub fn from_slots(
        name: impl Into<String>,
        command: Option<String>,
        shell: Option<String>,
    ) -> Result<Self, HookConfigError> {
        let mut name = name.into();
        if name.trim().is_empty() {
            name = fallback_name(command.as_deref(), shell.as_deref());
        }
        match (command, shell) {
            (Some(command), None) => Ok(Self::new(name, HookBackend::Command(command))),
            (None, Some(script)) => Ok(Self::new(name, HookBackend::Shell(script))),
            (command, shell) => Err(HookConfigError {
                name,
                found: usize::from(command.is_some()) + usize::from(shell.is_some()),
            }),
        }
    }

    /// Operator-facing name.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// The backend this hook runs.
    #[must_use]
    pub fn backend(&self) -> &HookBackend { &self.backend }

    /// Run this hook on `record` through `executor`.
    ///
    /// # Errors
    ///
    /// Propagates the executor's [`HookError`].
    pub fn execute(
        &self,
        executor: &dyn HookExecutor,
        record: Record,
    ) -> Result<Record, HookError> {
        executor.execute(&self.backend, record)
    }
}

/// Name for a hook configured without one: the backend kind followed by the
/// program, or by the first line of the script that is not a shebang.
fn fallback_name(command: Option<&str>, shell: Option<&str>) -> String {
    let summary = |kind: &str, text: Option<&str>| match text {
        Some(text) if !text.is_empty() => format!("{kind} {text}"),
        _ => kind.to_owned(),
    };
    match (command, shell) {
        (Some(command), _) => summary("command", command.split_whitespace().next()),
        (None, Some(script)) => summary(
            "shell",
            script
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty() && !line.starts_with("#!")),
        ),
        (None, None) => "unnamed hook".to_owned(),
    }
}

/// Configuration shape of a hook before the one-backend check.
#[derive(Deserialize)]
struct RawHook {
    #[serde(default)]
    name: String,
    command: Option<String>,
    shell: Option<String>,
}

impl TryFrom<RawHook> for Hook {
    type Error = HookConfigError;

    fn try_from(raw: RawHook) -> Result<Self, Self::Error> {
        Self::from_slots(raw.name, raw.command, raw.shell)
    }
}
