use super::{process_env, AwsCredentials, EnvLookup, ProvideCredentials};
use crate::client::{ParameterError, ParameterResult};

/// Credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the
/// optional `AWS_SESSION_TOKEN`
pub struct EnvironmentProvider {
    lookup: EnvLookup,
}

impl EnvironmentProvider {
    pub fn new() -> Self {
        Self::from_lookup(process_env())
    }

    pub fn from_lookup(lookup: EnvLookup) -> Self {
        Self { lookup }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }
}

impl Default for EnvironmentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvideCredentials for EnvironmentProvider {
    fn name(&self) -> &str {
        "environment"
    }

    fn provide(&self) -> ParameterResult<Option<AwsCredentials>> {
        match (self.get("AWS_ACCESS_KEY_ID"), self.get("AWS_SECRET_ACCESS_KEY")) {
            (None, None) => Ok(None),
            (Some(key_id), Some(secret)) => Ok(Some(AwsCredentials {
                access_key_id: key_id,
                secret_access_key: secret,
                session_token: self.get("AWS_SESSION_TOKEN"),
            })),
            (Some(_), None) => Err(ParameterError::Credentials(
                "AWS_SECRET_ACCESS_KEY is not set".to_string(),
            )),
            (None, Some(_)) => Err(ParameterError::Credentials(
                "AWS_ACCESS_KEY_ID is not set".to_string(),
            )),
        }
    }
}
