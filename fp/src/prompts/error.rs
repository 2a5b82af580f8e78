//! Template engine error types

use std::path::PathBuf;
use thiserror::Error;

use super::TemplateId;

/// Errors that can occur while rendering a prompt template
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Missing required field '{field}' for template '{template}'")]
    MissingField { template: TemplateId, field: String },

    #[error("Failed to read prompt template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template '{template}': {message}")]
    Render { template: TemplateId, message: String },
}

impl TemplateError {
    /// Name of the missing field, if this is a missing field error
    pub fn missing_field(&self) -> Option<&str> {
        match self {
            TemplateError::MissingField { field, .. } => Some(field),
            _ => None,
        }
    }
}
