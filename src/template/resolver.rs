//! Name-based resolution of templates into wire layouts.

use super::{Template, TemplateError, TemplateId};
use crate::{
    message::{FlowTemplate, FlowTemplateField, Header, SequenceNumber, TemplateMessage},
    registry::{self, FieldSpec},
};

impl Template {
    /// Resolve every field against the registry, in declared order.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownField`] for the first field name the
    /// registry does not contain.
    pub fn resolve(&self) -> Result<Vec<&'static FieldSpec>, TemplateError> {
        self.fields
            .iter()
            .map(|field| {
                registry::lookup(&field.name).map_err(|e| TemplateError::unknown_field(self.id, e))
            })
            .collect()
    }

    /// Encoded size of one record laid out by this template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownField`] if any field fails to resolve.
    pub fn record_length(&self) -> Result<usize, TemplateError> {
        Ok(self
            .resolve()?
            .iter()
            .map(|spec| usize::from(spec.length))
            .sum())
    }

    /// The template set entry announcing this layout.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownField`] if any field fails to resolve.
    pub fn to_flow_template(&self) -> Result<FlowTemplate, TemplateError> {
        let fields = self
            .resolve()?
            .into_iter()
            .map(|spec| FlowTemplateField {
                field_type: spec.type_code,
                field_length: spec.length,
            })
            .collect();
        Ok(FlowTemplate {
            template_id: self.id,
            fields,
        })
    }
}

/// Find the template configured under `id`.
///
/// # Errors
///
/// Returns [`TemplateError::UnknownTemplate`] when no template matches.
pub fn find(templates: &[Template], id: TemplateId) -> Result<&Template, TemplateError> {
    templates
        .iter()
        .find(|template| template.id == id)
        .ok_or(TemplateError::UnknownTemplate { template: id })
}

/// Field type codes of template `id`, in wire order.
///
/// # Errors
///
/// Returns [`TemplateError::UnknownTemplate`] if `id` is not configured, or
/// [`TemplateError::UnknownField`] if one of its fields is not registered.
pub fn field_types(templates: &[Template], id: TemplateId) -> Result<Vec<u16>, TemplateError> {
    Ok(find(templates, id)?
        .resolve()?
        .iter()
        .map(|spec| spec.type_code)
        .collect())
}

/// Encoded record length of template `id`.
///
/// # Errors
///
/// Same as [`field_types`].
pub fn record_length(templates: &[Template], id: TemplateId) -> Result<usize, TemplateError> {
    find(templates, id)?.record_length()
}

/// Build a template message covering every template in configuration order.
///
/// Fails on the first unresolved field; no partial message is returned.
///
/// # Errors
///
/// Returns [`TemplateError::UnknownField`] if any template references an
/// unregistered field.
pub fn template_message(templates: &[Template]) -> Result<TemplateMessage, TemplateError> {
    let templates = templates
        .iter()
        .map(Template::to_flow_template)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TemplateMessage {
        header: Header::new(SequenceNumber::default()),
        templates,
    })
}
