//! Paramstore Core
//!
//! Resolves parameter-store placeholders inside configuration trees.
//! A leaf value such as `ssm:/prod/db/password` names a parameter; the
//! [`Store`] collects every such name in a tree, fetches them all in a single
//! batched request, and substitutes the values back without changing the
//! tree's shape.
//!
//! ```rust,ignore
//! use paramstore_core::{Store, StoreSettings};
//!
//! let store = Store::from_settings(&StoreSettings::load()?)?;
//!
//! // DATABASE_PASSWORD=ssm:/prod/db/password  ->  DATABASE_PASSWORD=<secret>
//! store.apply_to_environment()?;
//! ```

pub mod logging;
pub mod config;
pub mod client;
pub mod tree;
pub mod store;

pub use client::{
    ParameterClient, ParameterError, ParameterResult, ParameterMap,
    MemoryParameterClient, SsmParameterClient,
    register_parameter_client, create_parameter_client, list_parameter_clients,
};

pub use config::{StoreSettings, SettingsFile, ConfigError, ConfigResult};

pub use logging::{Logger, NoOpLogger, ConsoleLogger, SharedLogger};

pub use tree::ConfigTree;

pub use store::{Store, Environment, ProcessEnvironment, MemoryEnvironment};
