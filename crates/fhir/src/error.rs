use thiserror::Error;

/// Result type for FHIR resource operations
pub type Result<T> = std::result::Result<T, FhirError>;

/// Errors that can occur while reading or converting FHIR resources
#[derive(Error, Debug)]
pub enum FhirError {
    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource has a different `resourceType` than required
    #[error("Unexpected resource type: expected {expected}, found {found}")]
    UnexpectedResourceType { expected: String, found: String },

    /// Library carries no content block
    #[error("Lens {lens} has no content")]
    MissingContent { lens: String },

    /// Content block is not valid base64
    #[error("Invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Decoded content is not UTF-8 text
    #[error("Decoded content is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl FhirError {
    /// Create an unexpected resource type error
    pub fn unexpected_type(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedResourceType {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
