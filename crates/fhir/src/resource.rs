use crate::error::{FhirError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const BUNDLE: &str = "Bundle";
pub const COMPOSITION: &str = "Composition";
pub const LIBRARY: &str = "Library";

/// A FHIR resource kept as an open key/value document.
///
/// `resourceType` and `id` are lifted out; every other key lives in `fields`
/// and is written back in place on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Resource {
    /// Create an empty resource of the given type
    #[must_use]
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            fields: Map::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Parse a resource from a JSON string
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Convert an arbitrary JSON value into a resource
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the `resourceType` discriminator
    #[must_use]
    pub fn is(&self, resource_type: &str) -> bool {
        self.resource_type == resource_type
    }

    /// Fail unless the resource has the expected type
    pub fn expect_type(&self, resource_type: &str) -> Result<()> {
        if self.is(resource_type) {
            Ok(())
        } else {
            Err(FhirError::unexpected_type(
                resource_type,
                self.resource_type.clone(),
            ))
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Bundle entries; empty when `entry` is absent or not an array
    #[must_use]
    pub fn entries(&self) -> &[Value] {
        self.get("entry")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
