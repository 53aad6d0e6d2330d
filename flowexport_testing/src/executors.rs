//! In-process [`HookExecutor`] implementations.
//!
//! Backends are identified by their command line or script text. The
//! executors compose: wrap a [`StaticExecutor`] in a [`FailingExecutor`] to
//! make selected hooks fail, and wrap either in a [`RecordingExecutor`] to
//! observe the order hooks ran in.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use flowexport::{
    Record,
    hook::{HookBackend, HookError, HookExecutor},
};
use serde_json::Value;

fn backend_text(backend: &HookBackend) -> &str {
    match backend {
        HookBackend::Command(text) | HookBackend::Shell(text) => text,
        _ => "",
    }
}

/// Merges fixed fields into records, keyed by backend text.
///
/// Backends with no registered fields return the record unchanged.
#[derive(Debug, Default)]
pub struct StaticExecutor {
    fields: HashMap<String, Record>,
}

impl StaticExecutor {
    /// Merge `key: value` into records passed to the backend `text`.
    #[must_use]
    pub fn with_field(mut self, text: &str, key: &str, value: impl Into<Value>) -> Self {
        self.fields
            .entry(text.to_owned())
            .or_default()
            .insert(key.to_owned(), value.into());
        self
    }
}

impl HookExecutor for StaticExecutor {
    fn execute(&self, backend: &HookBackend, mut record: Record) -> Result<Record, HookError> {
        if let Some(fields) = self.fields.get(backend_text(backend)) {
            record.extend(fields.clone());
        }
        Ok(record)
    }
}

/// Fails selected backends and delegates the rest to `inner`.
#[derive(Debug, Default)]
pub struct FailingExecutor<E = StaticExecutor> {
    failing: HashSet<String>,
    inner: E,
}

impl<E> FailingExecutor<E> {
    /// Delegate to `inner` until a backend is marked failing.
    pub fn new(inner: E) -> Self {
        Self {
            failing: HashSet::new(),
            inner,
        }
    }

    /// Make the backend `text` fail with [`HookError::Backend`].
    #[must_use]
    pub fn fail(mut self, text: &str) -> Self {
        self.failing.insert(text.to_owned());
        self
    }
}

impl<E: HookExecutor> HookExecutor for FailingExecutor<E> {
    fn execute(&self, backend: &HookBackend, record: Record) -> Result<Record, HookError> {
        let text = backend_text(backend);
        if self.failing.contains(text) {
            return Err(HookError::Backend(format!("{text} refused the record")));
        }
        self.inner.execute(backend, record)
    }
}

/// One observed hook invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    pub backend: HookBackend,
    pub input: Record,
}

/// Records every invocation before delegating to `inner`.
#[derive(Debug, Default)]
pub struct RecordingExecutor<E = StaticExecutor> {
    inner: E,
    calls: Mutex<Vec<Invocation>>,
}

impl<E> RecordingExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Invocations observed so far, oldest first.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Backend texts invoked so far, oldest first.
    pub fn backends(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| backend_text(&call.backend).to_owned())
            .collect()
    }
}

impl<E: HookExecutor> HookExecutor for RecordingExecutor<E> {
    fn execute(&self, backend: &HookBackend, record: Record) -> Result<Record, HookError> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Invocation {
                backend: backend.clone(),
                input: record.clone(),
            });
        self.inner.execute(backend, record)
    }
}
