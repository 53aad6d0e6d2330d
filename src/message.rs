//! Structured IPFIX messages produced by the assembly layer.
//!
//! These types describe message content and ordering only. Turning them into
//! octets is left to the transport encoder, so nothing here depends on a
//! particular serializer beyond `serde` for diagnostics output.

use derive_more::{Display, From, Into};
use serde::Serialize;

use crate::template::TemplateId;

/// Version number carried by every IPFIX message header.
pub const IPFIX_VERSION: u16 = 10;
/// Encoded size of the IPFIX message header.
pub const MESSAGE_HEADER_LEN: usize = 16;
/// Encoded size of a set header.
pub const SET_HEADER_LEN: usize = 4;
/// Bytes consumed by one message header plus one set header.
pub const FIXED_OVERHEAD: usize = MESSAGE_HEADER_LEN + SET_HEADER_LEN;
/// Largest message length representable in the 16-bit length field.
pub const MAX_MESSAGE_LEN: usize = u16::MAX as usize;

/// Running count of data records exported, stamped into each header.
///
/// Arithmetic wraps modulo 2^32 as IPFIX collectors expect.
///
/// # Examples
///
/// ```
/// use flowexport::message::SequenceNumber;
/// let seq = SequenceNumber::new(5);
/// assert_eq!(seq.advance(3).get(), 8);
/// assert_eq!(SequenceNumber::new(u32::MAX).advance(1).get(), 0);
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    From,
    Into,
    Serialize,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct SequenceNumber(u32);

impl SequenceNumber {
    /// Construct a sequence number.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the raw value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    /// Advance by `records`, wrapping at 2^32.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "sequence numbers are defined modulo 2^32"
    )]
    pub const fn advance(self, records: usize) -> Self {
        Self(self.0.wrapping_add(records as u32))
    }
}

/// IPFIX message header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub version_number: u16,
    /// Export time; populated by the encoder, zero here.
    pub sysup_time: u32,
    pub sequence_number: SequenceNumber,
    /// Observation domain; unused by this exporter.
    pub source_id: u32,
}

impl Header {
    /// Header stamped with `sequence_number` and zeroed time and domain.
    #[must_use]
    pub const fn new(sequence_number: SequenceNumber) -> Self {
        Self {
            version_number: IPFIX_VERSION,
            sysup_time: 0,
            sequence_number,
            source_id: 0,
        }
    }
}

/// One data set: records laid out according to a single template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSet<F> {
    /// Set identifier, equal to the template id describing the records.
    pub flow_set_id: TemplateId,
    pub flows: Vec<F>,
}

/// A data message carrying flow records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDataMessage<F> {
    pub header: Header,
    pub flow_sets: Vec<FlowSet<F>>,
}

impl<F> FlowDataMessage<F> {
    /// Total number of records across all sets.
    #[must_use]
    pub fn record_count(&self) -> usize { self.flow_sets.iter().map(|set| set.flows.len()).sum() }

    /// Iterate over every record in wire order.
    pub fn records(&self) -> impl Iterator<Item = &F> {
        self.flow_sets.iter().flat_map(|set| set.flows.iter())
    }
}

/// A `(type, length)` pair describing one template field on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTemplateField {
    pub field_type: u16,
    pub field_length: u16,
}

/// The wire layout announced for one template id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTemplate {
    pub template_id: TemplateId,
    pub fields: Vec<FlowTemplateField>,
}

/// A template message announcing every configured template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMessage {
    pub header: Header,
    pub templates: Vec<FlowTemplate>,
}
