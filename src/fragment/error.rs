//! Errors produced while fragmenting flow batches.

use thiserror::Error;

use crate::{
    message::FIXED_OVERHEAD,
    template::{TemplateError, TemplateId},
};

/// Errors produced by [`Fragmenter`](super::Fragmenter).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FragmentationError {
    /// The group's template could not be resolved.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// The template resolves to zero-length records.
    #[error("template {template} has no fields")]
    EmptyRecord { template: TemplateId },
    /// Not even one record fits in a message after the fixed headers.
    #[error(
        "template {template} records are {record_len} bytes but a {max_message_len}-byte message \
         has only {available} bytes after its {overhead}-byte headers",
        available = .max_message_len.saturating_sub(FIXED_OVERHEAD),
        overhead = FIXED_OVERHEAD
    )]
    CapacityTooSmall {
        template: TemplateId,
        record_len: usize,
        max_message_len: usize,
    },
}
