//! Destination capabilities used by the router.

use std::{
    fs::OpenOptions,
    io::Write,
    path::Path,
};

use super::SinkError;
use crate::{
    Record,
    config::CollectorOutput,
    message::{FlowDataMessage, TemplateMessage},
};

/// Writes rewritten records to a log output's file.
pub trait LogSink: Send + Sync {
    /// Append `record` to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the record cannot be written.
    fn write(&self, path: &Path, record: &Record) -> Result<(), SinkError>;
}

/// Delivers protocol messages to a collector. Serialization and socket
/// handling belong to the implementation.
pub trait CollectorSink<F = Record>: Send + Sync {
    /// Deliver the template announcement.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if delivery fails.
    fn send_templates(
        &self,
        collector: &CollectorOutput,
        message: &TemplateMessage,
    ) -> Result<(), SinkError>;

    /// Deliver one data message.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if delivery fails.
    fn send_data(
        &self,
        collector: &CollectorOutput,
        message: &FlowDataMessage<F>,
    ) -> Result<(), SinkError>;
}

/// Appends one JSON object per line, creating the file if needed.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonLinesSink;

impl LogSink for JsonLinesSink {
    fn write(&self, path: &Path, record: &Record) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(&line)?;
        Ok(())
    }
}
