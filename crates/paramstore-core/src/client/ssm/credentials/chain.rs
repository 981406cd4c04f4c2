use super::{
    process_env, AwsCredentials, ContainerProvider, EnvLookup, EnvironmentProvider, ImdsProvider,
    ProfileProvider, ProvideCredentials,
};
use crate::client::ParameterResult;
use crate::logging;

/// The first source that yields credentials wins
///
/// A source that is configured but broken stops the chain with its error
/// instead of falling through to the next one.
pub struct DefaultCredentialsChain {
    providers: Vec<Box<dyn ProvideCredentials>>,
}

impl DefaultCredentialsChain {
    /// Environment, shared profile files, container, instance metadata
    pub fn new() -> ParameterResult<Self> {
        Self::from_lookup(process_env())
    }

    pub fn from_lookup(lookup: EnvLookup) -> ParameterResult<Self> {
        Ok(Self::with_providers(vec![
            Box::new(EnvironmentProvider::from_lookup(lookup.clone())),
            Box::new(ProfileProvider::from_lookup(&lookup)),
            Box::new(ContainerProvider::from_lookup(lookup.clone())?),
            Box::new(ImdsProvider::from_lookup(&lookup)?),
        ]))
    }

    pub fn with_providers(providers: Vec<Box<dyn ProvideCredentials>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl ProvideCredentials for DefaultCredentialsChain {
    fn name(&self) -> &str {
        "default-chain"
    }

    fn provide(&self) -> ParameterResult<Option<AwsCredentials>> {
        for provider in &self.providers {
            if let Some(credentials) = provider.provide()? {
                logging::info(
                    "ssm::credentials",
                    &format!("Using AWS credentials from {}", provider.name()),
                );
                return Ok(Some(credentials));
            }
        }
        logging::warn("ssm::credentials", "No AWS credentials found");
        Ok(None)
    }
}

impl std::fmt::Debug for DefaultCredentialsChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultCredentialsChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}
