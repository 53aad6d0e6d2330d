//! Batch input to fragmentation.

use serde::{Deserialize, de::DeserializeOwned};

use super::{FragmentBatch, FragmentationError, Fragmenter};
use crate::{Record, config::Config, message::SequenceNumber, template::TemplateId};

/// Records sharing one template.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGroup<F = Record> {
    pub template_id: TemplateId,
    #[serde(default = "Vec::new")]
    pub flows: Vec<F>,
}

impl<F> FlowGroup<F> {
    #[must_use]
    pub fn new(template_id: u16, flows: Vec<F>) -> Self {
        Self {
            template_id: TemplateId::new(template_id),
            flows,
        }
    }
}

/// Ordered `(template, flows)` groups produced by one export cycle.
///
/// The record type is opaque: the assembly layer counts and moves records
/// but never looks inside them.
///
/// ```yaml
/// flowsets:
/// - templateId: 1024
///   flows:
///   - {SourceIPv4Address: 10.0.0.1, DestinationIPv4Address: 10.0.0.2}
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FlowFile<F = Record> {
    #[serde(rename = "flowsets", default = "Vec::new")]
    pub groups: Vec<FlowGroup<F>>,
}

impl<F> Default for FlowFile<F> {
    fn default() -> Self { Self { groups: Vec::new() } }
}

impl<F> FlowFile<F> {
    #[must_use]
    pub fn new(groups: Vec<FlowGroup<F>>) -> Self { Self { groups } }

    /// Total number of records across all groups.
    #[must_use]
    pub fn record_count(&self) -> usize { self.groups.iter().map(|g| g.flows.len()).sum() }

    /// Fragment this batch under `config`, numbering from `start`.
    ///
    /// # Errors
    ///
    /// See [`Fragmenter::fragment`].
    pub fn into_data_messages(
        self,
        config: &Config,
        start: SequenceNumber,
    ) -> Result<FragmentBatch<F>, FragmentationError> {
        Fragmenter::new(config).fragment(self, start)
    }
}

impl<F: DeserializeOwned> FlowFile<F> {
    /// Parse a flow file from YAML.
    ///
    /// # Errors
    ///
    /// Returns the `serde_yaml` error when the document is malformed.
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }
}
