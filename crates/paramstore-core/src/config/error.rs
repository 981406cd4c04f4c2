//! Settings errors

/// Errors that can occur while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Placeholder marker must not be empty")]
    InvalidMarker,

    #[error("Invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
