//! Exporter configuration.
//!
//! [`Config`] is deserialized once at startup and read-only afterwards. The
//! YAML keys match the exporter's documented configuration format:
//!
//! ```yaml
//! maxIpfixMessageLen: 100
//! timerTemplateFlushSeconds: 10
//! timerFinishedDrainSeconds: 1
//! timerForceDrainSeconds: 30
//! templates:
//! - id: 1024
//!   template:
//!   - name: FlowEndMilliseconds
//!   - name: SourceIPv4Address
//! outputs:
//! - collector:
//!     remoteAddress: 10.146.0.6:2100
//! ```

pub mod error;
pub mod output;

use std::{collections::HashSet, path::Path, time::Duration};

use serde::Deserialize;

pub use error::ConfigError;
pub use output::{CollectorOutput, LogOutput, Output, OutputConfigError};

use crate::{
    fragment::Fragmenter,
    message::{FIXED_OVERHEAD, MAX_MESSAGE_LEN, TemplateMessage},
    template::{self, Template, TemplateError, TemplateId},
};

const DEFAULT_MAX_MESSAGE_LEN: usize = 1400;
const DEFAULT_TEMPLATE_FLUSH_SECS: u64 = 60;
const DEFAULT_FINISHED_DRAIN_SECS: u64 = 1;
const DEFAULT_FORCE_DRAIN_SECS: u64 = 30;

/// Global limits, timers, outputs, and templates.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Largest IPFIX message, in bytes. Shared by all collector outputs.
    #[serde(rename = "maxIpfixMessageLen", default = "default_max_message_len")]
    pub max_message_len: usize,
    /// Interval between template re-broadcasts.
    #[serde(default = "default_template_flush")]
    pub timer_template_flush_seconds: u64,
    /// Interval between drains of finished flows.
    #[serde(default = "default_finished_drain")]
    pub timer_finished_drain_seconds: u64,
    /// Interval between forced drains of full caches.
    #[serde(default = "default_force_drain")]
    pub timer_force_drain_seconds: u64,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub templates: Vec<Template>,
}

fn default_max_message_len() -> usize { DEFAULT_MAX_MESSAGE_LEN }
fn default_template_flush() -> u64 { DEFAULT_TEMPLATE_FLUSH_SECS }
fn default_finished_drain() -> u64 { DEFAULT_FINISHED_DRAIN_SECS }
fn default_force_drain() -> u64 { DEFAULT_FORCE_DRAIN_SECS }

impl Default for Config {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            timer_template_flush_seconds: DEFAULT_TEMPLATE_FLUSH_SECS,
            timer_finished_drain_seconds: DEFAULT_FINISHED_DRAIN_SECS,
            timer_force_drain_seconds: DEFAULT_FORCE_DRAIN_SECS,
            outputs: Vec::new(),
            templates: Vec::new(),
        }
    }
}

impl Config {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML, schema mismatches,
    /// and outputs or hooks that do not name exactly one backend; otherwise
    /// any error reported by [`validate`](Self::validate).
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`from_yaml_str`](Self::from_yaml_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&input)
    }

    /// Check the configuration before any data flows.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a message length outside
    /// `(20, 65535]`, a duplicate or reserved template id, an empty
    /// template, an unregistered field, or a template whose records do not
    /// fit in one message.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_message_len <= FIXED_OVERHEAD || self.max_message_len > MAX_MESSAGE_LEN {
            return Err(ConfigError::MessageLength {
                value: self.max_message_len,
            });
        }

        let mut seen = HashSet::new();
        for template in &self.templates {
            let id = template.id;
            if id < TemplateId::MIN_DATA {
                return Err(ConfigError::ReservedTemplateId { template: id });
            }
            if !seen.insert(id) {
                return Err(ConfigError::DuplicateTemplate { template: id });
            }
            if template.fields.is_empty() {
                return Err(ConfigError::EmptyTemplate { template: id });
            }
            let record_len = template.record_length()?;
            if record_len > self.max_message_len - FIXED_OVERHEAD {
                return Err(ConfigError::TemplateTooLarge {
                    template: id,
                    record_len,
                    max_message_len: self.max_message_len,
                });
            }
        }
        Ok(())
    }

    /// Interval between template re-broadcasts.
    #[must_use]
    pub const fn template_flush_interval(&self) -> Duration {
        Duration::from_secs(self.timer_template_flush_seconds)
    }

    /// Interval between drains of finished flows.
    #[must_use]
    pub const fn finished_drain_interval(&self) -> Duration {
        Duration::from_secs(self.timer_finished_drain_seconds)
    }

    /// Interval between forced drains of full caches.
    #[must_use]
    pub const fn force_drain_interval(&self) -> Duration {
        Duration::from_secs(self.timer_force_drain_seconds)
    }

    /// Field type codes of template `id`, in wire order.
    ///
    /// # Errors
    ///
    /// See [`template::field_types`].
    pub fn field_types(&self, id: TemplateId) -> Result<Vec<u16>, TemplateError> {
        template::field_types(&self.templates, id)
    }

    /// Encoded record length of template `id`.
    ///
    /// # Errors
    ///
    /// See [`template::record_length`].
    pub fn record_length(&self, id: TemplateId) -> Result<usize, TemplateError> {
        template::record_length(&self.templates, id)
    }

    /// Template message announcing every configured template.
    ///
    /// # Errors
    ///
    /// See [`template::template_message`].
    pub fn template_message(&self) -> Result<TemplateMessage, TemplateError> {
        template::template_message(&self.templates)
    }

    /// A fragmenter bound to this configuration.
    #[must_use]
    pub fn fragmenter(&self) -> Fragmenter<'_> { Fragmenter::new(self) }
}
