//! AWS Systems Manager Parameter Store client

mod client;
mod credentials;
pub mod sigv4;
mod transport;
mod types;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::SsmParameterClient;
pub use credentials::{
    AwsCredentials, ContainerProvider, DefaultCredentialsChain, EnvLookup, EnvironmentProvider,
    ImdsProvider, ProfileProvider, ProvideCredentials,
};
pub use transport::{HttpSsmTransport, SsmTransport};
pub use types::{GetParametersRequest, GetParametersResponse, Parameter};
