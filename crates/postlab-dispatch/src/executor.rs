use crate::body_builder::BodyBuilder;
use crate::error::{DispatchError, DispatchResult};
use crate::timeout::TimeoutConfig;
use crate::url_builder::UrlBuilder;
use async_trait::async_trait;
use postlab_core::{CoreResult, DispatchCall, DispatchOutcome, Dispatcher, HttpMethod};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Request, StatusCode};
use serde_json::Value as JsonValue;
use std::error::Error as _;
use std::time::Instant;

pub const DEFAULT_USER_AGENT: &str = concat!("postlab/", env!("CARGO_PKG_VERSION"));

/// Dispatcher that sends calls with a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    timeouts: TimeoutConfig,
}

impl HttpDispatcher {
    pub fn new(timeouts: TimeoutConfig) -> DispatchResult<Self> {
        Self::with_user_agent(timeouts, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(timeouts: TimeoutConfig, user_agent: &str) -> DispatchResult<Self> {
        if timeouts.connect_ms == 0 || timeouts.request_ms == 0 {
            return Err(DispatchError::InvalidConfig(
                "dispatch timeouts must be greater than zero".to_string(),
            ));
        }

        let builder = reqwest::Client::builder().user_agent(user_agent);
        let client = timeouts.apply_to_client_builder(builder).build()?;

        Ok(Self { client, timeouts })
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// Build the outbound request: query on the URL for GET/DELETE, encoded body otherwise.
    fn build_request(&self, call: &DispatchCall) -> DispatchResult<Request> {
        let url = UrlBuilder::with_query(&call.url, &call.query)?;
        let mut builder = self.client.request(to_reqwest_method(call.method), url);

        if let Some(body) = &call.body {
            let encoded = BodyBuilder::build(call.bodytype, body)?;
            builder = builder.header(CONTENT_TYPE, encoded.content_type).body(encoded.bytes);
        }

        Ok(builder.build()?)
    }

    /// Send and classify. Never fails: wire-level problems become `NetworkError`.
    async fn send(&self, request: Request) -> DispatchOutcome {
        let started = Instant::now();
        let method = request.method().clone();
        let url = request.url().clone();

        let exchange = async {
            let response = self.client.execute(request).await?;
            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Ok(None);
            }
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>(Some((status, bytes)))
        };

        let outcome = match tokio::time::timeout(self.timeouts.request_timeout(), exchange).await {
            Err(_) => DispatchOutcome::NetworkError(format!(
                "request timed out after {}ms",
                self.timeouts.request_ms
            )),
            Ok(Err(e)) => DispatchOutcome::NetworkError(describe_error(&e)),
            Ok(Ok(None)) => DispatchOutcome::RateLimited,
            Ok(Ok(Some((status, bytes)))) => DispatchOutcome::Completed {
                status: status.as_u16(),
                body: parse_body(&bytes),
            },
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            DispatchOutcome::Completed { status, .. } => {
                tracing::info!(%method, %url, status, duration_ms, "dispatch completed")
            }
            DispatchOutcome::RateLimited => {
                tracing::warn!(%method, %url, duration_ms, "dispatch rate limited by remote")
            }
            DispatchOutcome::NetworkError(reason) => {
                tracing::warn!(%method, %url, duration_ms, reason = %reason, "dispatch failed")
            }
        }

        outcome
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(&self, call: &DispatchCall) -> CoreResult<DispatchOutcome> {
        let request = self.build_request(call)?;
        Ok(self.send(request).await)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// JSON when it parses, otherwise the text as a JSON string; empty bodies are `null`.
fn parse_body(bytes: &[u8]) -> JsonValue {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return JsonValue::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn describe_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_body() || err.is_decode() {
        "failed reading response body"
    } else {
        "request failed"
    };

    match err.source() {
        Some(source) => format!("{}: {}: {}", kind, err, source),
        None => format!("{}: {}", kind, err),
    }
}
