//! Document validation before protection

use serde_json::Value;

use crate::error::ProtectorError;

/// Error raised when an uploaded document fails structural validation
#[derive(Debug, Clone)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        ValidationError {
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ProtectorError {
    fn from(err: ValidationError) -> Self {
        ProtectorError::Validation(err.message)
    }
}

/// Validate a parsed JSON document before protection
///
/// The root must be an object (null, scalars, and arrays as root are all
/// rejected), and the document must round-trip through serialization.
/// Forbidden property kinds (functions, symbols, dates) can only occur in
/// raw JS payloads and are checked at the WASM boundary instead
/// (`wasm::payload::validate_payload`).
pub fn validate_document(value: &Value) -> Result<(), ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::new("Data must be a JSON object"));
    }

    let text = serde_json::to_string(value)
        .map_err(|_| ValidationError::new("Data contains non-serializable values"))?;
    let reparsed: Value = serde_json::from_str(&text)
        .map_err(|_| ValidationError::new("Data contains non-serializable values"))?;
    if &reparsed != value {
        return Err(ValidationError::new("Data contains non-serializable values"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null))]
    #[case(json!(42))]
    #[case(json!("a string"))]
    #[case(json!(true))]
    #[case(json!([1, 2, 3]))]
    fn test_rejects_non_object_root(#[case] value: Value) {
        assert!(validate_document(&value).is_err());
    }

    #[test]
    fn test_accepts_empty_object() {
        assert!(validate_document(&json!({})).is_ok());
    }

    #[test]
    fn test_accepts_nested_arrays() {
        // Arrays below the root are fine here; the normalizer rewrites them
        assert!(validate_document(&json!({"rows": [[1], [2]]})).is_ok());
    }

    #[test]
    fn test_error_converts_to_protector_error() {
        let err = validate_document(&json!(null)).unwrap_err();
        let err: ProtectorError = err.into();
        assert_eq!(err.to_string(), "Data must be a JSON object");
    }
}
