//! Sink that keeps everything in memory.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use flowexport::{
    FlowDataMessage,
    Record,
    SinkError,
    TemplateMessage,
    config::CollectorOutput,
    output::{CollectorSink, LogSink},
};

/// A message handed to a collector.
#[derive(Clone, Debug, PartialEq)]
pub enum Delivery<F = Record> {
    Templates {
        remote: String,
        message: TemplateMessage,
    },
    Data {
        remote: String,
        message: FlowDataMessage<F>,
    },
}

impl<F> Delivery<F> {
    /// Remote address the message was sent to.
    pub fn remote(&self) -> &str {
        match self {
            Self::Templates { remote, .. } | Self::Data { remote, .. } => remote,
        }
    }
}

/// Captures log writes and collector deliveries.
///
/// Collectors registered with [`MemorySink::refuse`] reject every message
/// with [`SinkError::Transport`].
#[derive(Debug)]
pub struct MemorySink<F = Record> {
    records: Mutex<Vec<(PathBuf, Record)>>,
    deliveries: Mutex<Vec<Delivery<F>>>,
    refused: HashSet<String>,
}

impl<F> Default for MemorySink<F> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            deliveries: Mutex::new(Vec::new()),
            refused: HashSet::new(),
        }
    }
}

impl<F: Clone> MemorySink<F> {
    /// Reject messages sent to `remote`.
    #[must_use]
    pub fn refuse(mut self, remote: &str) -> Self {
        self.refused.insert(remote.to_owned());
        self
    }

    /// Every `(file, record)` written so far, in write order.
    pub fn records(&self) -> Vec<(PathBuf, Record)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records written to `file`, in write order.
    pub fn records_for(&self, file: impl AsRef<Path>) -> Vec<Record> {
        let file = file.as_ref();
        self.records()
            .into_iter()
            .filter(|(path, _)| path == file)
            .map(|(_, record)| record)
            .collect()
    }

    /// Every collector delivery so far, in send order.
    pub fn deliveries(&self) -> Vec<Delivery<F>> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn deliver(&self, delivery: Delivery<F>) -> Result<(), SinkError> {
        if self.refused.contains(delivery.remote()) {
            return Err(SinkError::Transport(format!(
                "{} refused the connection",
                delivery.remote()
            )));
        }
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(delivery);
        Ok(())
    }
}

impl<F: Send> LogSink for MemorySink<F> {
    fn write(&self, path: &Path, record: &Record) -> Result<(), SinkError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path.to_path_buf(), record.clone()));
        Ok(())
    }
}

impl<F: Clone + Send> CollectorSink<F> for MemorySink<F> {
    fn send_templates(
        &self,
        collector: &CollectorOutput,
        message: &TemplateMessage,
    ) -> Result<(), SinkError> {
        self.deliver(Delivery::Templates {
            remote: collector.remote_address.clone(),
            message: message.clone(),
        })
    }

    fn send_data(
        &self,
        collector: &CollectorOutput,
        message: &FlowDataMessage<F>,
    ) -> Result<(), SinkError> {
        self.deliver(Delivery::Data {
            remote: collector.remote_address.clone(),
            message: message.clone(),
        })
    }
}
