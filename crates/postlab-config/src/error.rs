use postlab_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {name}: {reason}")]
    InvalidEnv { name: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => CoreError::Other(e.to_string()),
            ConfigError::Yaml(e) => CoreError::Serde(e.to_string()),
            ConfigError::Json(e) => CoreError::Serde(e.to_string()),
            ConfigError::InvalidEnv { name, reason } => {
                CoreError::Invalid(format!("{}: {}", name, reason))
            }
            ConfigError::Validation(msg) => CoreError::Invalid(msg),
            ConfigError::UnsupportedFormat(msg) => CoreError::Invalid(msg),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
