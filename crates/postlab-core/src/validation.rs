//! Checks that run before any storage mutation or network call.

use crate::types::{BodyType, HttpMethod};
use serde_json::Value as JsonValue;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Unsupported body type: {0} (expected 'raw' or 'form')")]
    UnsupportedBodyType(String),

    #[error("Body is required for {0} requests")]
    MissingBody(HttpMethod),

    #[error("Form body must be a JSON object")]
    FormBodyNotObject,

    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("No values provided for update")]
    EmptyUpdate,
}

/// Parse a method name, accepting exactly GET, POST, PUT, PATCH and DELETE.
pub fn validate_method(method: &str) -> Result<HttpMethod, ValidationError> {
    method.parse()
}

/// Body methods need a present, non-empty body; GET and DELETE ignore it.
pub fn validate_body(method: HttpMethod, body: Option<&JsonValue>) -> Result<(), ValidationError> {
    if method.carries_body() && body.map_or(true, is_empty_body) {
        return Err(ValidationError::MissingBody(method));
    }
    Ok(())
}

/// Form bodies are encoded field by field, so they must be objects.
pub fn validate_body_shape(
    bodytype: BodyType,
    body: Option<&JsonValue>,
) -> Result<(), ValidationError> {
    match (bodytype, body) {
        (BodyType::Form, Some(value)) if !value.is_object() => {
            Err(ValidationError::FormBodyNotObject)
        }
        _ => Ok(()),
    }
}

/// Only absolute http(s) URLs can be dispatched.
pub fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    let url =
        Url::parse(raw).map_err(|e| ValidationError::InvalidUrl(raw.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ValidationError::InvalidUrl(
            raw.to_string(),
            format!("unsupported scheme '{}'", scheme),
        )),
    }
}

/// `null`, `{}`, `[]` and `""` all count as an absent body.
pub fn is_empty_body(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_unknown_and_lowercase_methods() {
        assert_eq!(validate_method("PUT"), Ok(HttpMethod::Put));
        for bad in ["post", "HEAD", "OPTIONS", ""] {
            assert_eq!(
                validate_method(bad),
                Err(ValidationError::UnsupportedMethod(bad.to_string()))
            );
        }
    }

    #[test]
    fn body_methods_require_non_empty_body() {
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch] {
            for empty in [None, Some(json!(null)), Some(json!({})), Some(json!([])), Some(json!(""))] {
                assert_eq!(
                    validate_body(method, empty.as_ref()),
                    Err(ValidationError::MissingBody(method))
                );
            }
            assert!(validate_body(method, Some(&json!({"a": 1}))).is_ok());
            assert!(validate_body(method, Some(&json!(0))).is_ok());
        }
    }

    #[test]
    fn get_and_delete_never_need_a_body() {
        for method in [HttpMethod::Get, HttpMethod::Delete] {
            assert!(validate_body(method, None).is_ok());
            assert!(validate_body(method, Some(&json!({}))).is_ok());
            assert!(validate_body(method, Some(&json!({"ignored": true}))).is_ok());
        }
    }

    #[test]
    fn form_body_must_be_an_object() {
        assert!(validate_body_shape(BodyType::Form, Some(&json!({"a": "b"}))).is_ok());
        assert_eq!(
            validate_body_shape(BodyType::Form, Some(&json!([1, 2]))),
            Err(ValidationError::FormBodyNotObject)
        );
        assert!(validate_body_shape(BodyType::Raw, Some(&json!([1, 2]))).is_ok());
    }

    #[test]
    fn urls_must_be_absolute_http() {
        assert!(validate_url("https://api.example.com/users?x=1").is_ok());
        assert!(matches!(validate_url("/relative"), Err(ValidationError::InvalidUrl(..))));
        assert!(matches!(validate_url("ftp://host/file"), Err(ValidationError::InvalidUrl(..))));
    }
}
