//! Errors raised while loading or validating configuration.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{
    message::{FIXED_OVERHEAD, MAX_MESSAGE_LEN},
    template::{TemplateError, TemplateId},
};

/// Configuration problems, reported with enough context to fix the file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The document is not valid YAML or does not match the schema. Outputs
    /// and hooks naming the wrong number of backends are reported here.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// `maxIpfixMessageLen` cannot hold headers plus a record, or exceeds the
    /// 16-bit length field.
    #[error(
        "maxIpfixMessageLen {value} must be greater than {min} and at most {max}",
        min = FIXED_OVERHEAD,
        max = MAX_MESSAGE_LEN
    )]
    MessageLength { value: usize },
    /// Two templates share an id.
    #[error("template {template} is defined more than once")]
    DuplicateTemplate { template: TemplateId },
    /// Ids below 256 are reserved for set ids.
    #[error("template id {template} is reserved; data templates start at 256")]
    ReservedTemplateId { template: TemplateId },
    /// A template has no fields.
    #[error("template {template} has no fields")]
    EmptyTemplate { template: TemplateId },
    /// A single record of the template does not fit in one message.
    #[error(
        "template {template} records are {record_len} bytes; maxIpfixMessageLen {max_message_len} \
         fits none"
    )]
    TemplateTooLarge {
        template: TemplateId,
        record_len: usize,
        max_message_len: usize,
    },
    /// A template does not resolve against the field registry.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
