//! Errors raised while resolving templates.

use thiserror::Error;

use super::TemplateId;
use crate::registry::RegistryError;

/// Resolution failures. Both indicate operator misconfiguration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// No template with this id is configured.
    #[error("template {template} is not configured")]
    UnknownTemplate { template: TemplateId },
    /// A template references a field the registry does not know.
    #[error("template {template} references unknown field {name:?}")]
    UnknownField { template: TemplateId, name: String },
}

impl TemplateError {
    pub(crate) fn unknown_field(template: TemplateId, err: RegistryError) -> Self {
        let RegistryError::UnknownField { name } = err;
        Self::UnknownField { template, name }
    }
}
