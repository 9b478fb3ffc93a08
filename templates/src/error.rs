use thiserror::Error;

use crate::Category;

/// Errors returned by template storage and matching.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("no {0} templates enrolled")]
    NoTemplatesEnrolled(Category),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("store error: {0}")]
    Store(String),
}

impl From<std::io::Error> for TemplateError {
    fn from(e: std::io::Error) -> Self {
        TemplateError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(e: serde_json::Error) -> Self {
        TemplateError::Store(e.to_string())
    }
}
