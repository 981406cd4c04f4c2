//! Core traits and types for parameter clients

use std::collections::HashMap;

use thiserror::Error;

use crate::config::ConfigError;

/// Parameter name to value, as returned by a single fetch
pub type ParameterMap = HashMap<String, String>;

/// Errors that can occur while looking up parameters
#[derive(Error, Debug)]
pub enum ParameterError {
    /// A requested or referenced name has no value
    #[error("Parameter not found: {0}")]
    MissingParameter(String),

    /// The parameter store rejected names it does not hold
    #[error("Invalid parameters: {}", .0.join(", "))]
    InvalidParameters(Vec<String>),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the parameter store API
    #[error("Parameter store API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Missing credentials: {0}")]
    Credentials(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A resolved value cannot be written to the target environment
    #[error("Cannot set environment variable {0}: name or value is not representable")]
    UnrepresentableVariable(String),

    #[error("Unknown parameter client: {0}")]
    UnknownClient(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ParameterError {
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether the error means "the store has no such name" rather than a
    /// transport or authorization failure
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingParameter(_) | Self::InvalidParameters(_))
    }
}

pub type ParameterResult<T> = Result<T, ParameterError>;

/// Batched lookup against a parameter store
///
/// Implementations:
/// - `MemoryParameterClient`: dictionary-backed, for tests
/// - `SsmParameterClient`: AWS Systems Manager Parameter Store
///
/// # Contract
///
/// - An empty `names` slice returns an empty map without any remote call.
/// - A non-empty slice is served by exactly one request covering every name,
///   with decryption of secure values requested where the backend supports it.
/// - A name with no stored value is an error. It is never dropped from the
///   result silently.
///
/// # Example
///
/// ```
/// use paramstore_core::client::{ParameterClient, MemoryParameterClient};
///
/// let client = MemoryParameterClient::new();
/// client.insert("/app/db/host", "db.internal");
///
/// let values = client.fetch(&["/app/db/host".to_string()]).unwrap();
/// assert_eq!(values["/app/db/host"], "db.internal");
/// ```
pub trait ParameterClient: Send + Sync {
    /// Human-readable name of this client
    fn name(&self) -> &str;

    /// Fetch every name in one round trip
    fn fetch(&self, names: &[String]) -> ParameterResult<ParameterMap>;
}
