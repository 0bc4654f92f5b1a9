use lens_fhir::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// What a host hands back after applying lenses.
///
/// `focusing_errors` keeps the host's loose shape: one slot per lens, each
/// slot either an error value, `null`, or an array of errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LensResult {
    pub epi: Resource,
    pub ips: Resource,
    #[serde(default)]
    pub focusing_errors: Vec<Value>,
}

impl LensResult {
    /// Error entries flattened one level, with nulls dropped
    #[must_use]
    pub fn error_entries(&self) -> Vec<&Value> {
        self.focusing_errors
            .iter()
            .flat_map(|slot| match slot {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            })
            .filter(|entry| !entry.is_null())
            .collect()
    }

    #[must_use]
    pub fn has_focusing_errors(&self) -> bool {
        !self.error_entries().is_empty()
    }

    #[must_use]
    pub fn focusing_errors(&self) -> Vec<FocusingError> {
        self.error_entries()
            .into_iter()
            .map(FocusingError::from_value)
            .collect()
    }
}

/// Check if the result carries any non-null focusing error
#[must_use]
pub fn has_focusing_errors(result: &LensResult) -> bool {
    result.has_focusing_errors()
}

/// One message per focusing error: `.message` when present, otherwise the
/// error value itself as text
#[must_use]
pub fn focusing_error_messages(result: &LensResult) -> Vec<String> {
    result
        .focusing_errors()
        .into_iter()
        .map(|error| error.message)
        .collect()
}

/// A single focusing error in readable form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusingError {
    pub message: String,
    pub lens_name: Option<String>,
}

impl FocusingError {
    pub fn new(message: impl Into<String>, lens_name: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            lens_name: Some(lens_name.into()),
        }
    }

    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let lens_name = value
            .get("lensName")
            .and_then(Value::as_str)
            .map(str::to_string);

        let message = match value.get("message") {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            Some(message) if !message.is_null() && !matches!(message, Value::String(_)) => {
                message.to_string()
            }
            _ => match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        };

        Self { message, lens_name }
    }

    /// Host wire shape: `{ "message": ..., "lensName": ... }`
    #[must_use]
    pub fn to_value(&self) -> Value {
        match &self.lens_name {
            Some(lens_name) => json!({ "message": self.message, "lensName": lens_name }),
            None => json!({ "message": self.message }),
        }
    }
}

impl fmt::Display for FocusingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (lens: {})",
            self.message,
            self.lens_name.as_deref().unwrap_or("unknown")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(errors: Value) -> LensResult {
        serde_json::from_value(json!({
            "epi": { "resourceType": "Bundle" },
            "ips": { "resourceType": "Bundle" },
            "focusingErrors": errors
        }))
        .unwrap()
    }

    #[test]
    fn test_no_errors() {
        assert!(!result(json!([])).has_focusing_errors());
        assert!(!result(json!([[], null, [null]])).has_focusing_errors());
        assert!(focusing_error_messages(&result(json!([[null], []]))).is_empty());
    }

    #[test]
    fn test_missing_focusing_errors_field() {
        let result: LensResult = serde_json::from_value(json!({
            "epi": { "resourceType": "Bundle" },
            "ips": { "resourceType": "Bundle" }
        }))
        .unwrap();
        assert!(!has_focusing_errors(&result));
    }

    #[test]
    fn test_flattens_one_level() {
        let result = result(json!([
            [{ "message": "lens failed", "lensName": "my-lens" }, null],
            null,
            "plain failure",
            [[{ "message": "nested" }]]
        ]));

        assert!(has_focusing_errors(&result));
        assert_eq!(
            focusing_error_messages(&result),
            vec![
                "lens failed".to_string(),
                "plain failure".to_string(),
                r#"[{"message":"nested"}]"#.to_string(),
            ]
        );
        assert_eq!(
            result.focusing_errors()[0].to_string(),
            "lens failed (lens: my-lens)"
        );
    }

    #[test]
    fn test_message_fallbacks() {
        let from = |v: Value| FocusingError::from_value(&v).message;
        assert_eq!(from(json!({ "code": 7 })), r#"{"code":7}"#);
        assert_eq!(from(json!({ "message": "" , "code": 1 })), r#"{"code":1,"message":""}"#);
        assert_eq!(from(json!({ "message": 42 })), "42");
        assert_eq!(from(json!(false)), "false");
    }

    #[test]
    fn test_wire_shape_round_trip() {
        let error = FocusingError::new("boom", "my-lens");
        assert_eq!(FocusingError::from_value(&error.to_value()), error);
    }
}
