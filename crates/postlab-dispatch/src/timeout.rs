//! Timeout settings for outbound calls

use reqwest::ClientBuilder;
use std::time::Duration;

/// Connect and whole-call timeouts. Expiry of either is reported as a network error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    pub connect_ms: u64,
    /// Covers sending the request and reading the full response body
    pub request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect_ms: 5_000, request_ms: 30_000 }
    }
}

impl TimeoutConfig {
    pub fn new(connect_ms: u64, request_ms: u64) -> Self {
        Self { connect_ms, request_ms }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    /// Only the connect timeout lives on the shared client; the request
    /// timeout is applied per call around send + body read.
    pub fn apply_to_client_builder(&self, builder: ClientBuilder) -> ClientBuilder {
        builder.connect_timeout(self.connect_timeout())
    }
}
