//! Template definitions and their resolution against the field registry.
//!
//! Templates name their fields; resolution turns those names into the
//! `(type, length)` pairs that define the record layout on the wire. Field
//! order is preserved end to end because it *is* the layout.

pub mod error;
pub mod resolver;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

pub use error::TemplateError;
pub use resolver::{field_types, find, record_length, template_message};

/// Identifier shared by a template and the data sets it describes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct TemplateId(u16);

impl TemplateId {
    /// Lowest identifier available to data templates; smaller values are
    /// reserved for set ids.
    pub const MIN_DATA: Self = Self(256);

    /// Construct an identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self { Self(value) }

    /// Return the raw value.
    #[must_use]
    pub const fn get(self) -> u16 { self.0 }
}

/// Reference to a registry field by name.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TemplateField {
    pub name: String,
}

impl TemplateField {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }
}

/// An ordered record layout.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    #[serde(rename = "template", default)]
    pub fields: Vec<TemplateField>,
}

impl Template {
    /// Build a template from field names, keeping their order.
    #[must_use]
    pub fn new<I, S>(id: u16, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: TemplateId::new(id),
            fields: names.into_iter().map(TemplateField::new).collect(),
        }
    }
}
