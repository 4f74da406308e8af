pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, FileFormat};
pub use schema::{DatabaseConfig, DispatchConfig, PostlabConfig, ServerConfig};
