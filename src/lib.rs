#![doc(html_root_url = "https://docs.rs/flowexport/latest")]
//! Public API for the `flowexport` library.
//!
//! This crate prepares captured network flows for export: it resolves IPFIX
//! templates against a field registry, splits flow batches into
//! size-bounded data messages, and routes records to collectors or to log
//! files through chains of record-rewriting hooks.

pub mod config;
pub mod fragment;
pub mod hook;
pub mod message;
pub mod metrics;
pub mod output;
pub mod registry;
pub mod template;

pub use config::{Config, ConfigError, Output};
pub use fragment::{FlowFile, FlowGroup, FragmentBatch, FragmentationError, Fragmenter};
pub use hook::{Hook, HookBackend, HookChain, HookChainError, HookError, HookExecutor};
pub use message::{FlowDataMessage, SequenceNumber, TemplateMessage};
pub use metrics::{HOOK_FAILURES, MESSAGES_ASSEMBLED, RECORDS_PACKED, RECORDS_WRITTEN};
pub use output::{JsonLinesSink, OutputRouter, SinkError};
pub use registry::{FieldSpec, RegistryError};
pub use template::{Template, TemplateError, TemplateId};

/// A flow or log record: a JSON object keyed by field name.
pub type Record = serde_json::Map<String, serde_json::Value>;
