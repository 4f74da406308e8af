//! Request body encoding for the two supported body types

use crate::error::{DispatchError, DispatchResult};
use postlab_core::BodyType;
use serde_json::Value as JsonValue;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encoded body ready for reqwest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestBody {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

pub struct BodyBuilder;

impl BodyBuilder {
    /// `raw` sends the value as a JSON document, `form` as URL-encoded fields.
    pub fn build(body_type: BodyType, body: &JsonValue) -> DispatchResult<HttpRequestBody> {
        match body_type {
            BodyType::Raw => Self::build_json(body),
            BodyType::Form => Self::build_form(body),
        }
    }

    fn build_json(data: &JsonValue) -> DispatchResult<HttpRequestBody> {
        let bytes = serde_json::to_vec(data)
            .map_err(|e| DispatchError::Body(format!("JSON serialization failed: {}", e)))?;
        Ok(HttpRequestBody { bytes, content_type: JSON_CONTENT_TYPE })
    }

    fn build_form(data: &JsonValue) -> DispatchResult<HttpRequestBody> {
        let fields = data
            .as_object()
            .ok_or_else(|| DispatchError::Body("form body must be a JSON object".to_string()))?;

        // Fields are emitted in key order
        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let encoded: Vec<String> = sorted
            .into_iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&form_value(value))
                )
            })
            .collect();

        Ok(HttpRequestBody { bytes: encoded.join("&").into_bytes(), content_type: FORM_CONTENT_TYPE })
    }
}

/// Strings go as-is, other scalars as their JSON text, nested values as compact JSON.
fn form_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
