//! Parameter clients
//!
//! - `ParameterClient` trait: one batched `fetch` per call
//! - `MemoryParameterClient`: dictionary-backed test double
//! - `SsmParameterClient`: AWS SSM Parameter Store over HTTPS
//! - A registry for creating clients by name from `StoreSettings`

mod traits;
mod memory_client;
mod registry;
pub mod ssm;

pub use traits::{ParameterClient, ParameterError, ParameterMap, ParameterResult};
pub use memory_client::MemoryParameterClient;
pub use registry::{
    register_parameter_client, create_parameter_client, list_parameter_clients,
    has_parameter_client, unregister_parameter_client, ClientDefinition, ClientFactory,
};
pub use ssm::SsmParameterClient;
