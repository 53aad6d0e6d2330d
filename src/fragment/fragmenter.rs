//! Packs flow groups into messages that respect the configured length.
//!
//! Capacity per message is `floor((max_message_len - FIXED_OVERHEAD) /
//! record_len)`, computed once per group. Every template referenced by the
//! batch is resolved before any record is moved, so a misconfigured batch
//! fails without emitting anything.

use std::num::NonZeroUsize;

use serde::Serialize;

use super::{FlowFile, FragmentationError};
use crate::{
    config::Config,
    message::{FIXED_OVERHEAD, FlowDataMessage, FlowSet, Header, SequenceNumber},
    metrics,
    template::{self, Template, TemplateId},
};

/// Number of `record_len`-byte records that fit in one message of
/// `max_message_len` bytes, or `None` if not even one does.
///
/// # Examples
///
/// ```
/// use flowexport::fragment::records_per_message;
/// assert_eq!(records_per_message(60, 8).map(|n| n.get()), Some(5));
/// assert_eq!(records_per_message(27, 8), None);
/// ```
#[must_use]
pub fn records_per_message(max_message_len: usize, record_len: usize) -> Option<NonZeroUsize> {
    let available = max_message_len.checked_sub(FIXED_OVERHEAD)?;
    NonZeroUsize::new(available.checked_div(record_len)?)
}

/// Splits flow batches into IPFIX data messages.
#[derive(Clone, Copy, Debug)]
pub struct Fragmenter<'a> {
    templates: &'a [Template],
    max_message_len: usize,
}

impl<'a> Fragmenter<'a> {
    /// Create a fragmenter bound to `config`'s templates and message limit.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self::with_limit(&config.templates, config.max_message_len)
    }

    /// Create a fragmenter from explicit templates and message limit.
    #[must_use]
    pub const fn with_limit(templates: &'a [Template], max_message_len: usize) -> Self {
        Self {
            templates,
            max_message_len,
        }
    }

    /// Return the message length limit in bytes.
    #[must_use]
    pub const fn max_message_len(&self) -> usize { self.max_message_len }

    /// Records of template `id` that fit in one message.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::Template`] if the template does not
    /// resolve, [`FragmentationError::EmptyRecord`] if it has no fields, or
    /// [`FragmentationError::CapacityTooSmall`] if no record fits.
    pub fn capacity(&self, id: TemplateId) -> Result<NonZeroUsize, FragmentationError> {
        let record_len = template::record_length(self.templates, id)?;
        if record_len == 0 {
            return Err(FragmentationError::EmptyRecord { template: id });
        }
        records_per_message(self.max_message_len, record_len).ok_or(
            FragmentationError::CapacityTooSmall {
                template: id,
                record_len,
                max_message_len: self.max_message_len,
            },
        )
    }

    /// Split `file` into messages, numbering from `start`.
    ///
    /// Groups are processed in input order and record order is preserved.
    /// Each message carries a single set for one template. Sequence numbers
    /// count records, so each message's number is `start` plus the records
    /// packed before it. Empty groups produce no messages.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by [`capacity`](Self::capacity) for
    /// any group; in that case no messages are produced.
    pub fn fragment<F>(
        &self,
        file: FlowFile<F>,
        start: SequenceNumber,
    ) -> Result<FragmentBatch<F>, FragmentationError> {
        let capacities = file
            .groups
            .iter()
            .map(|group| self.capacity(group.template_id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut messages = Vec::new();
        let mut sequence = start;
        for (group, capacity) in file.groups.into_iter().zip(capacities) {
            let template = group.template_id;
            let records = group.flows.len();
            let before = messages.len();
            let mut flows = group.flows.into_iter();
            loop {
                let chunk: Vec<F> = flows.by_ref().take(capacity.get()).collect();
                if chunk.is_empty() {
                    break;
                }
                let packed = chunk.len();
                messages.push(FlowDataMessage {
                    header: Header::new(sequence),
                    flow_sets: vec![FlowSet {
                        flow_set_id: template,
                        flows: chunk,
                    }],
                });
                sequence = sequence.advance(packed);
            }
            let emitted = messages.len() - before;
            tracing::debug!(
                %template,
                records,
                capacity = capacity.get(),
                messages = emitted,
                "fragmented flow group"
            );
            metrics::record_fragmented(emitted, records);
        }

        Ok(FragmentBatch {
            messages,
            next_sequence: sequence,
        })
    }
}

/// Ordered data messages produced by one fragmentation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentBatch<F> {
    messages: Vec<FlowDataMessage<F>>,
    next_sequence: SequenceNumber,
}

impl<F> FragmentBatch<F> {
    /// Return the messages as a slice.
    #[must_use]
    pub fn messages(&self) -> &[FlowDataMessage<F>] { &self.messages }

    /// Sequence number the next run should start from.
    #[must_use]
    pub const fn next_sequence(&self) -> SequenceNumber { self.next_sequence }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize { self.messages.len() }

    /// Whether the batch produced no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.messages.is_empty() }

    /// Consume the batch, returning the messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<FlowDataMessage<F>> { self.messages }
}

impl<F> IntoIterator for FragmentBatch<F> {
    type Item = FlowDataMessage<F>;
    type IntoIter = std::vec::IntoIter<FlowDataMessage<F>>;

    fn into_iter(self) -> Self::IntoIter { self.messages.into_iter() }
}
