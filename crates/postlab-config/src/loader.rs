use crate::error::{ConfigError, ConfigResult};
use crate::schema::PostlabConfig;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const ENV_ADDR: &str = "POSTLAB_ADDR";
pub const ENV_DATABASE_URL: &str = "POSTLAB_DATABASE_URL";
pub const ENV_DB_MAX_CONNECTIONS: &str = "POSTLAB_DB_MAX_CONNECTIONS";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "POSTLAB_CONNECT_TIMEOUT_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "POSTLAB_REQUEST_TIMEOUT_MS";

/// Supported file formats for configuration
#[derive(Debug, Clone, PartialEq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Detect file format from extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Layers defaults, an optional config file and `POSTLAB_*` environment overrides.
pub struct ConfigLoader {
    env: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading overrides from the process environment
    pub fn new() -> Self {
        Self::with_env(|name| std::env::var(name).ok())
    }

    /// Loader with a custom variable lookup (used by tests)
    pub fn with_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self { env: Box::new(lookup) }
    }

    /// Load and validate the effective configuration.
    pub fn load(&self, path: Option<&Path>) -> ConfigResult<PostlabConfig> {
        let mut config = match path {
            Some(path) => {
                let config = Self::load_from_file(path)?;
                tracing::debug!(path = %path.display(), "loaded config file");
                config
            }
            None => PostlabConfig::default(),
        };

        self.apply_env(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<PostlabConfig> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        Self::parse_content(&content, format)
    }

    pub fn parse_content(content: &str, format: FileFormat) -> ConfigResult<PostlabConfig> {
        if content.trim().is_empty() {
            return Ok(PostlabConfig::default());
        }
        let config = match format {
            FileFormat::Yaml => serde_yaml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    fn apply_env(&self, config: &mut PostlabConfig) -> ConfigResult<()> {
        if let Some(addr) = (self.env)(ENV_ADDR) {
            config.server.addr = addr;
        }
        if let Some(url) = (self.env)(ENV_DATABASE_URL) {
            config.database.url = url;
        }
        if let Some(max) = self.parsed(ENV_DB_MAX_CONNECTIONS)? {
            config.database.max_connections = max;
        }
        if let Some(ms) = self.parsed(ENV_CONNECT_TIMEOUT_MS)? {
            config.dispatch.connect_timeout_ms = ms;
        }
        if let Some(ms) = self.parsed(ENV_REQUEST_TIMEOUT_MS)? {
            config.dispatch.request_timeout_ms = ms;
        }
        Ok(())
    }

    fn parsed<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.env)(name) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| ConfigError::InvalidEnv {
                name: name.to_string(),
                reason: format!("'{}': {}", raw, e),
            }),
        }
    }
}
