//! Parameter client registry for creating clients by name

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use super::memory_client::MemoryParameterClient;
use super::ssm::SsmParameterClient;
use super::traits::{ParameterClient, ParameterError, ParameterResult};
use crate::config::StoreSettings;

/// Factory function type for creating parameter clients
pub type ClientFactory =
    Box<dyn Fn(&StoreSettings) -> ParameterResult<Arc<dyn ParameterClient>> + Send + Sync>;

/// Definition of a registered parameter client
pub struct ClientDefinition {
    pub name: String,
    pub description: String,
    pub factory: ClientFactory,
}

impl std::fmt::Debug for ClientDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

static REGISTRY: Lazy<RwLock<HashMap<String, ClientDefinition>>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        "ssm".to_string(),
        ClientDefinition {
            name: "ssm".to_string(),
            description: "AWS Systems Manager Parameter Store".to_string(),
            factory: Box::new(|settings| {
                let client = SsmParameterClient::from_settings(settings)?;
                Ok(Arc::new(client) as Arc<dyn ParameterClient>)
            }),
        },
    );

    map.insert(
        "memory".to_string(),
        ClientDefinition {
            name: "memory".to_string(),
            description: "In-memory parameters for testing".to_string(),
            factory: Box::new(|_| Ok(Arc::new(MemoryParameterClient::new()) as Arc<dyn ParameterClient>)),
        },
    );

    RwLock::new(map)
});

/// Register a parameter client type
///
/// Registering an existing name replaces it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use paramstore_core::client::{register_parameter_client, MemoryParameterClient, ParameterClient};
///
/// register_parameter_client(
///     "fixture",
///     "Fixed parameters for a demo",
///     Box::new(|_| {
///         let client = MemoryParameterClient::from_iter([("/demo/greeting", "hello")]);
///         Ok(Arc::new(client) as Arc<dyn ParameterClient>)
///     }),
/// );
/// ```
pub fn register_parameter_client(name: &str, description: &str, factory: ClientFactory) {
    let mut registry = REGISTRY.write().unwrap();
    registry.insert(
        name.to_string(),
        ClientDefinition {
            name: name.to_string(),
            description: description.to_string(),
            factory,
        },
    );
}

/// Create a parameter client by name
pub fn create_parameter_client(
    name: &str,
    settings: &StoreSettings,
) -> ParameterResult<Arc<dyn ParameterClient>> {
    let registry = REGISTRY.read().unwrap();
    match registry.get(name) {
        Some(def) => (def.factory)(settings),
        None => Err(ParameterError::UnknownClient(name.to_string())),
    }
}

/// List registered clients as (name, description) pairs
pub fn list_parameter_clients() -> Vec<(String, String)> {
    let registry = REGISTRY.read().unwrap();
    registry
        .values()
        .map(|def| (def.name.clone(), def.description.clone()))
        .collect()
}

pub fn has_parameter_client(name: &str) -> bool {
    let registry = REGISTRY.read().unwrap();
    registry.contains_key(name)
}

/// Unregister a client (mainly for testing)
pub fn unregister_parameter_client(name: &str) -> bool {
    let mut registry = REGISTRY.write().unwrap();
    registry.remove(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_clients_registered() {
        assert!(has_parameter_client("ssm"));
        assert!(has_parameter_client("memory"));
    }

    #[test]
    fn test_create_memory_client() {
        let client = create_parameter_client("memory", &StoreSettings::default()).unwrap();
        assert_eq!(client.name(), "memory");
    }

    #[test]
    fn test_create_unknown_client() {
        let Err(err) = create_parameter_client("nonexistent_xyz", &StoreSettings::default()) else {
            panic!("unknown client name should not resolve");
        };
        assert!(matches!(err, ParameterError::UnknownClient(ref n) if n == "nonexistent_xyz"));
    }

    #[test]
    fn test_create_ssm_client_defers_credentials() {
        let settings = StoreSettings::default().with_endpoint_url("http://localhost:4566");
        let client = create_parameter_client("ssm", &settings).unwrap();
        assert_eq!(client.name(), "ssm");
    }

    #[test]
    fn test_list_clients() {
        let clients = list_parameter_clients();
        let names: Vec<_> = clients.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"ssm"));
        assert!(names.contains(&"memory"));
    }

    #[test]
    fn test_register_custom_client() {
        register_parameter_client(
            "test_fixture_client",
            "A test client",
            Box::new(|_| {
                let client = MemoryParameterClient::from_iter([("/fixture", "value")]);
                Ok(Arc::new(client) as Arc<dyn ParameterClient>)
            }),
        );

        let client = create_parameter_client("test_fixture_client", &StoreSettings::default()).unwrap();
        let values = client.fetch(&["/fixture".to_string()]).unwrap();
        assert_eq!(values["/fixture"], "value");

        assert!(unregister_parameter_client("test_fixture_client"));
        assert!(!has_parameter_client("test_fixture_client"));
    }
}
