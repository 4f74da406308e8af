use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// HTTP methods a stored request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "PATCH")]
    Patch,
    #[serde(rename = "DELETE")]
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// POST, PUT and PATCH send a payload; GET and DELETE send query parameters instead.
    pub fn carries_body(&self) -> bool {
        match self {
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => true,
            HttpMethod::Get | HttpMethod::Delete => false,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ValidationError;

    // Case-sensitive: "get" is not a method.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedMethod(s.to_string()))
    }
}

/// Wire encoding of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    /// Sent as a JSON document
    Raw,
    /// Sent as `application/x-www-form-urlencoded` fields
    Form,
}

impl BodyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::Raw => "raw",
            BodyType::Form => "form",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(BodyType::Raw),
            "form" => Ok(BodyType::Form),
            other => Err(ValidationError::UnsupportedBodyType(other.to_string())),
        }
    }
}

/// Entity kinds, used in not-found messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Collection,
    Request,
    Param,
    Response,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Collection => "Collection",
            Entity::Request => "Request",
            Entity::Param => "Param",
            Entity::Response => "Response",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
}

/// A stored request definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: i64,
    pub url: String,
    pub method: HttpMethod,
    pub body: Option<JsonValue>,
    pub bodytype: Option<BodyType>,
    pub collection_id: Option<i64>,
}

/// A validated request definition ready for insertion.
///
/// `body` and `bodytype` are only populated for methods that carry a body.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub url: String,
    pub method: HttpMethod,
    pub body: Option<JsonValue>,
    pub bodytype: Option<BodyType>,
    pub collection_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub request_id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewParam {
    pub key: String,
    pub value: String,
    pub request_id: i64,
}

/// Partial update for a param; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParamUpdate {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl ParamUpdate {
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.value.is_none()
    }
}

/// The persisted outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: i64,
    pub request_id: i64,
    pub body: JsonValue,
    pub status_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewResponse {
    pub request_id: i64,
    pub body: JsonValue,
    #[serde(default)]
    pub status_code: Option<i32>,
}

/// Partial update for a response; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseUpdate {
    #[serde(default)]
    pub body: Option<JsonValue>,
    #[serde(default)]
    pub status_code: Option<i32>,
}

impl ResponseUpdate {
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.status_code.is_none()
    }
}

/// Row counts removed by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub collections: u64,
    pub requests: u64,
    pub params: u64,
    pub responses: u64,
}
