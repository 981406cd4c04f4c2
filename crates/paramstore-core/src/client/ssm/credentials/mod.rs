//! AWS credentials and the standard lookup chain
//!
//! Sources are tried in the order the AWS SDKs use:
//! 1. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
//! 2. Shared `~/.aws/credentials` and `~/.aws/config` for `AWS_PROFILE`
//! 3. ECS container credentials (`AWS_CONTAINER_CREDENTIALS_*`)
//! 4. EC2 instance metadata (IMDSv2)

mod chain;
mod container;
mod environment;
mod imds;
mod profile;

use std::sync::Arc;

use serde::Deserialize;

use crate::client::{ParameterError, ParameterResult};

pub use chain::DefaultCredentialsChain;
pub use container::ContainerProvider;
pub use environment::EnvironmentProvider;
pub use imds::ImdsProvider;
pub use profile::ProfileProvider;

/// Variable lookup shared by the providers
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub(crate) fn process_env() -> EnvLookup {
    Arc::new(|key: &str| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

/// Static AWS credentials
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A source of AWS credentials
///
/// `Ok(None)` means the source is not configured on this host, and the chain
/// moves on. An error means it is configured but unusable.
pub trait ProvideCredentials: Send + Sync {
    fn name(&self) -> &str;

    fn provide(&self) -> ParameterResult<Option<AwsCredentials>>;
}

impl ProvideCredentials for AwsCredentials {
    fn name(&self) -> &str {
        "static"
    }

    fn provide(&self) -> ParameterResult<Option<AwsCredentials>> {
        Ok(Some(self.clone()))
    }
}

/// Credential document served by the container and instance metadata endpoints
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteCredentials {
    access_key_id: String,
    secret_access_key: String,
    #[serde(default)]
    token: Option<String>,
}

impl From<RemoteCredentials> for AwsCredentials {
    fn from(remote: RemoteCredentials) -> Self {
        Self {
            access_key_id: remote.access_key_id,
            secret_access_key: remote.secret_access_key,
            session_token: remote.token.filter(|t| !t.is_empty()),
        }
    }
}

fn parse_remote_credentials(source: &str, body: &[u8]) -> ParameterResult<AwsCredentials> {
    serde_json::from_slice::<RemoteCredentials>(body)
        .map(AwsCredentials::from)
        .map_err(|e| ParameterError::Credentials(format!("{}: malformed credentials: {}", source, e)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;

    pub fn lookup(vars: &[(&str, &str)]) -> EnvLookup {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(move |key: &str| vars.get(key).cloned())
    }
}
