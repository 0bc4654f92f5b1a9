use crate::error::{FhirError, Result};
use crate::resource::{Resource, LIBRARY};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MIME type of lens script content
pub const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript";

/// A single `content` block of a Library: base64 payload plus its MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub data: String,
}

impl Attachment {
    /// Encode lens script source as a base64 attachment
    #[must_use]
    pub fn javascript(source: &str) -> Self {
        Self {
            content_type: JAVASCRIPT_CONTENT_TYPE.to_string(),
            data: STANDARD.encode(source.as_bytes()),
        }
    }

    /// Decode the payload back to source text
    pub fn decode(&self) -> Result<String> {
        let bytes = STANDARD.decode(self.data.trim())?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// A lens manifest: a FHIR `Library` whose first content block carries the
/// lens's script source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LensLibrary {
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Attachment>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LensLibrary {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            resource_type: LIBRARY.to_string(),
            id: None,
            name: Some(name.into()),
            content: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Name used in logs and error reports: `name`, then `id`, then "unknown"
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("unknown")
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.iter().any(|block| !block.data.is_empty())
    }

    /// Replace all content with a single base64-encoded script block
    pub fn set_source(&mut self, source: &str) {
        self.content = vec![Attachment::javascript(source)];
    }

    /// Decode the first content block
    pub fn decoded_source(&self) -> Result<String> {
        self.content
            .first()
            .ok_or_else(|| FhirError::MissingContent {
                lens: self.display_name().to_string(),
            })?
            .decode()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let library: Self = serde_json::from_value(value)?;
        if library.resource_type != LIBRARY {
            return Err(FhirError::unexpected_type(LIBRARY, library.resource_type));
        }
        Ok(library)
    }
}

impl TryFrom<Resource> for LensLibrary {
    type Error = FhirError;

    fn try_from(resource: Resource) -> Result<Self> {
        resource.expect_type(LIBRARY)?;
        Self::from_value(resource.to_value()?)
    }
}
