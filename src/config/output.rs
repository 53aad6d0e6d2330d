//! Output destinations.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::hook::Hook;

/// An output that does not name exactly one destination kind.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("output must set exactly one of `collector` or `log`, found {found}")]
pub struct OutputConfigError {
    /// Number of destination kinds that were set.
    pub found: usize,
}

/// Address pair of an IPFIX collector, consumed by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorOutput {
    pub remote_address: String,
    #[serde(default)]
    pub local_address: String,
}

/// A file destination for hook-rewritten records.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LogOutput {
    pub file: PathBuf,
    /// Applied in order before each write. A failing hook drops the record.
    #[serde(default)]
    pub hooks: Vec<Hook>,
}

/// Where exported flows go.
///
/// ```yaml
/// outputs:
/// - collector:
///     remoteAddress: 10.146.0.6:2100
///     localAddress: 0.0.0.0:50102
/// - log:
///     file: /tmp/flowlog.json
///     hooks:
///     - name: hostname
///       command: /usr/local/bin/add-hostname
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawOutput")]
pub enum Output {
    Collector(CollectorOutput),
    Log(LogOutput),
}

impl Output {
    /// Build an output from the optional slots of a configuration entry.
    ///
    /// # Errors
    ///
    /// Returns [`OutputConfigError`] unless exactly one slot is set.
    pub fn from_slots(
        collector: Option<CollectorOutput>,
        log: Option<LogOutput>,
    ) -> Result<Self, OutputConfigError> {
        match (collector, log) {
            (Some(collector), None) => Ok(Self::Collector(collector)),
            (None, Some(log)) => Ok(Self::Log(log)),
            (collector, log) => Err(OutputConfigError {
                found: usize::from(collector.is_some()) + usize::from(log.is_some()),
            }),
        }
    }

    /// Configuration key naming this output kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Collector(_) => "collector",
            Self::Log(_) => "log",
        }
    }
}

#[derive(Deserialize)]
struct RawOutput {
    collector: Option<CollectorOutput>,
    log: Option<LogOutput>,
}

impl TryFrom<RawOutput> for Output {
    type Error = OutputConfigError;

    fn try_from(raw: RawOutput) -> Result<Self, Self::Error> {
        Self::from_slots(raw.collector, raw.log)
    }
}
