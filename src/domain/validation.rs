//! Entity validation errors.

use thiserror::Error;

/// Why a document was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("'{value}' is not a valid value for {field}")]
    InvalidMethod { field: &'static str, value: String },

    #[error("requests[{index}]: {source}")]
    InvalidRequest {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Value of a required text field; blank counts as missing.
pub(crate) fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::Required(field)),
    }
}
