//! Outbound HTTP dispatch for stored request definitions.

pub mod body_builder;
pub mod error;
pub mod executor;
pub mod timeout;
pub mod url_builder;

pub use body_builder::{BodyBuilder, HttpRequestBody};
pub use error::{DispatchError, DispatchResult};
pub use executor::HttpDispatcher;
pub use timeout::TimeoutConfig;
pub use url_builder::UrlBuilder;
