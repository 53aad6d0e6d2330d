//! Capability that runs hook backends.

use std::{
    io::{self, Write},
    process::{Command, Stdio},
    sync::Arc,
    thread,
};

use super::{HookBackend, HookError};
use crate::Record;

/// Runs a hook backend on one record, returning its replacement.
///
/// Implementations may block. Timeouts are the implementation's concern;
/// the chain waits for every call to finish.
pub trait HookExecutor: Send + Sync {
    /// Execute `backend` with `record` as input.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] when the backend fails or produces no usable
    /// record.
    fn execute(&self, backend: &HookBackend, record: Record) -> Result<Record, HookError>;
}

impl<T: HookExecutor + ?Sized> HookExecutor for Arc<T> {
    fn execute(&self, backend: &HookBackend, record: Record) -> Result<Record, HookError> {
        (**self).execute(backend, record)
    }
}

/// Executes backends as child processes exchanging JSON over stdio.
///
/// The record is written to stdin as a single JSON object and stdin is
/// closed; stdout must hold the replacement object. A non-zero exit status
/// fails the hook and carries stderr for diagnostics.
#[derive(Clone, Debug)]
pub struct ProcessExecutor {
    shell: String,
}

impl Default for ProcessExecutor {
    fn default() -> Self { Self::new("/bin/sh") }
}

impl ProcessExecutor {
    /// Create an executor running shell hooks with `shell`.
    #[must_use]
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    fn command_for(&self, backend: &HookBackend) -> Result<(String, Command), HookError> {
        match backend {
            HookBackend::Command(line) => {
                let mut parts = line.split_whitespace();
                let program = parts
                    .next()
                    .ok_or_else(|| HookError::Backend("command hook is empty".into()))?;
                let mut command = Command::new(program);
                command.args(parts);
                Ok((program.to_owned(), command))
            }
            HookBackend::Shell(script) => {
                let mut command = Command::new(&self.shell);
                command.arg("-c").arg(script);
                Ok((self.shell.clone(), command))
            }
        }
    }
}

impl HookExecutor for ProcessExecutor {
    fn execute(&self, backend: &HookBackend, record: Record) -> Result<Record, HookError> {
        let input = serde_json::to_vec(&record).map_err(HookError::Encode)?;
        let (program, mut command) = self.command_for(backend)?;
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| HookError::Spawn { program, source })?;

        // stdin is fed from its own thread while stdout and stderr drain, so a
        // filter that writes before it finishes reading cannot block on a
        // full pipe. Dropping stdin after the write signals end of input. A
        // backend that exits without reading is judged by its exit status.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(&input),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (written, output)
        });
        let output = output?;
        if let Err(err) = written
            && err.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(err.into());
        }
        if !output.status.success() {
            return Err(HookError::Exit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}
