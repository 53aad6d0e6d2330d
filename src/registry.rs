//! Well-known IPFIX information elements.
//!
//! [`FIELD_REGISTRY`] is the single table mapping a field name used in
//! template configuration to its IANA element identifier and fixed wire
//! length. Both [`field_type`] and [`field_length`] go through [`lookup`], so
//! the two accessors can never disagree about an entry.

use std::{collections::HashMap, sync::LazyLock};

use thiserror::Error;

/// A single registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name referenced by templates.
    pub name: &'static str,
    /// IANA information element identifier.
    pub type_code: u16,
    /// Encoded length in bytes.
    pub length: u16,
}

impl FieldSpec {
    const fn new(name: &'static str, type_code: u16, length: u16) -> Self {
        Self {
            name,
            type_code,
            length,
        }
    }
}

/// Errors produced when consulting the registry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No entry is registered under the requested name.
    #[error("unknown ipfix field {name:?}")]
    UnknownField { name: String },
}

/// Fields accepted in template definitions.
pub const FIELD_REGISTRY: &[FieldSpec] = &[
    FieldSpec::new("OctetDeltaCount", 1, 8),
    FieldSpec::new("PacketDeltaCount", 2, 8),
    FieldSpec::new("ProtocolIdentifier", 4, 1),
    FieldSpec::new("IpClassOfService", 5, 1),
    FieldSpec::new("TcpControlBits", 6, 2),
    FieldSpec::new("SourceTransportPort", 7, 2),
    FieldSpec::new("SourceIPv4Address", 8, 4),
    FieldSpec::new("SourceIPv4PrefixLength", 9, 1),
    FieldSpec::new("IngressInterface", 10, 4),
    FieldSpec::new("DestinationTransportPort", 11, 2),
    FieldSpec::new("DestinationIPv4Address", 12, 4),
    FieldSpec::new("DestinationIPv4PrefixLength", 13, 1),
    FieldSpec::new("EgressInterface", 14, 4),
    FieldSpec::new("IpNextHopIPv4Address", 15, 4),
    FieldSpec::new("BgpSourceAsNumber", 16, 4),
    FieldSpec::new("BgpDestinationAsNumber", 17, 4),
    FieldSpec::new("SourceIPv6Address", 27, 16),
    FieldSpec::new("DestinationIPv6Address", 28, 16),
    FieldSpec::new("FlowLabelIPv6", 31, 4),
    FieldSpec::new("IcmpTypeCodeIPv4", 32, 2),
    FieldSpec::new("MinimumTTL", 52, 1),
    FieldSpec::new("MaximumTTL", 53, 1),
    FieldSpec::new("SourceMacAddress", 56, 6),
    FieldSpec::new("VlanId", 58, 2),
    FieldSpec::new("IpVersion", 60, 1),
    FieldSpec::new("FlowDirection", 61, 1),
    FieldSpec::new("DestinationMacAddress", 80, 6),
    FieldSpec::new("FlowEndReason", 136, 1),
    FieldSpec::new("IcmpTypeCodeIPv6", 139, 2),
    FieldSpec::new("FlowStartSeconds", 150, 4),
    FieldSpec::new("FlowEndSeconds", 151, 4),
    FieldSpec::new("FlowStartMilliseconds", 152, 8),
    FieldSpec::new("FlowEndMilliseconds", 153, 8),
    FieldSpec::new("FlowStartNanoseconds", 156, 8),
    FieldSpec::new("FlowEndNanoseconds", 157, 8),
];

static INDEX: LazyLock<HashMap<&'static str, &'static FieldSpec>> =
    LazyLock::new(|| FIELD_REGISTRY.iter().map(|spec| (spec.name, spec)).collect());

/// Find the registry entry for `name`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownField`] when `name` is not registered.
pub fn lookup(name: &str) -> Result<&'static FieldSpec, RegistryError> {
    INDEX
        .get(name)
        .copied()
        .ok_or_else(|| RegistryError::UnknownField {
            name: name.to_owned(),
        })
}

/// Return the element identifier registered for `name`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownField`] when `name` is not registered.
pub fn field_type(name: &str) -> Result<u16, RegistryError> {
    lookup(name).map(|spec| spec.type_code)
}

/// Return the wire length registered for `name`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownField`] when `name` is not registered.
pub fn field_length(name: &str) -> Result<u16, RegistryError> {
    lookup(name).map(|spec| spec.length)
}
