//! The dispatch seam between the orchestrator and the network.

use crate::error::CoreResult;
use crate::types::{BodyType, HttpMethod, NewRequest};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// One outbound call, with body and query placement already normalised for the method.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchCall {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<JsonValue>,
    pub bodytype: BodyType,
    pub query: BTreeMap<String, String>,
}

impl DispatchCall {
    /// GET/DELETE drop the body and keep the query; POST/PUT/PATCH keep the body only.
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        body: Option<JsonValue>,
        bodytype: Option<BodyType>,
        query: BTreeMap<String, String>,
    ) -> Self {
        let (body, query) = if method.carries_body() {
            (body, BTreeMap::new())
        } else {
            (None, query)
        };
        Self {
            method,
            url: url.into(),
            body,
            bodytype: bodytype.unwrap_or(BodyType::Raw),
            query,
        }
    }

    pub fn for_request(request: &NewRequest, query: &BTreeMap<String, String>) -> Self {
        Self::new(
            request.method,
            request.url.clone(),
            request.body.clone(),
            request.bodytype,
            query.clone(),
        )
    }
}

/// What came back from the remote endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Any HTTP status other than 429, including 4xx/5xx from the remote service
    Completed { status: u16, body: JsonValue },
    /// The remote endpoint answered 429 Too Many Requests
    RateLimited,
    /// DNS failure, refused connection, timeout or a broken body stream; no status code
    NetworkError(String),
}

/// Sends a [`DispatchCall`] over the network.
///
/// `Err` is reserved for failures building the call locally; anything that
/// happens on the wire is reported through [`DispatchOutcome`]. No retries.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, call: &DispatchCall) -> CoreResult<DispatchOutcome>;
}
