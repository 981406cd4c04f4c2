//! In-memory parameter client

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use super::traits::{ParameterClient, ParameterError, ParameterMap, ParameterResult};

/// Dictionary-backed parameter client for tests and local runs
///
/// Every non-empty `fetch` counts as one round trip, so tests can assert how
/// many batched lookups a resolution performed.
///
/// # Example
///
/// ```
/// use paramstore_core::client::{ParameterClient, MemoryParameterClient};
///
/// let client = MemoryParameterClient::new();
/// client.insert("/x", "y");
///
/// assert!(client.fetch(&[]).unwrap().is_empty());
/// assert_eq!(client.fetch_count(), 0);
///
/// client.fetch(&["/x".to_string()]).unwrap();
/// assert_eq!(client.fetch_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryParameterClient {
    parameters: RwLock<HashMap<String, String>>,
    fetches: AtomicUsize,
}

impl MemoryParameterClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with initial parameters
    pub fn with_parameters(initial: HashMap<String, String>) -> Self {
        Self {
            parameters: RwLock::new(initial),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut parameters = self.parameters.write().unwrap();
        parameters.insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        let mut parameters = self.parameters.write().unwrap();
        parameters.remove(name)
    }

    pub fn len(&self) -> usize {
        self.parameters.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of round trips served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ParameterClient for MemoryParameterClient {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, names: &[String]) -> ParameterResult<ParameterMap> {
        if names.is_empty() {
            return Ok(ParameterMap::new());
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let parameters = self.parameters.read().unwrap();
        names
            .iter()
            .map(|name| match parameters.get(name) {
                Some(value) => Ok((name.clone(), value.clone())),
                None => Err(ParameterError::MissingParameter(name.clone())),
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryParameterClient
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::with_parameters(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Clone for MemoryParameterClient {
    /// Clones the parameters; the fetch counter starts over
    fn clone(&self) -> Self {
        let parameters = self.parameters.read().unwrap();
        Self::with_parameters(parameters.clone())
    }
}
