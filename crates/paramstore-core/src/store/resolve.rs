//! Placeholder resolution over configuration trees

use std::collections::BTreeSet;
use std::sync::Arc;

use super::environment::{Environment, ProcessEnvironment};
use crate::client::{create_parameter_client, ParameterClient, ParameterError, ParameterMap, ParameterResult};
use crate::config::{ConfigError, ConfigResult, StoreSettings, DEFAULT_MARKER};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::tree::{placeholder_name, ConfigTree};
use crate::{log_debug, log_error, log_info};

/// Resolves placeholders through one parameter client
///
/// A leaf such as `"ssm:/db/password"` is a placeholder for the parameter
/// `/db/password`. [`Store::resolve`] replaces every placeholder in a tree
/// using exactly one client round trip, however many placeholders there are
/// and however deeply they are nested.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use paramstore_core::{ConfigTree, MemoryParameterClient, Store};
///
/// let client = Arc::new(MemoryParameterClient::from_iter([("/x", "y")]));
/// let store = Store::new(client.clone());
///
/// let tree = ConfigTree::from_iter([("a", "b"), ("c", "ssm:/x")]);
/// let resolved = store.resolve(tree).unwrap();
///
/// assert_eq!(resolved, ConfigTree::from_iter([("a", "b"), ("c", "y")]));
/// assert_eq!(client.fetch_count(), 1);
/// ```
pub struct Store {
    client: Arc<dyn ParameterClient>,
    marker: String,
    logger: SharedLogger,
}

impl Store {
    /// Create a store using the default `ssm:` marker
    pub fn new(client: Arc<dyn ParameterClient>) -> Self {
        Self {
            client,
            marker: DEFAULT_MARKER.to_string(),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Build the client named in `settings` through the client registry
    pub fn from_settings(settings: &StoreSettings) -> ParameterResult<Self> {
        settings.validate()?;
        let client = create_parameter_client(&settings.client, settings)?;
        Ok(Self::new(client).with_marker(settings.marker.clone())?)
    }

    /// Use a different placeholder marker; an empty marker is rejected
    pub fn with_marker(mut self, marker: impl Into<String>) -> ConfigResult<Self> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(ConfigError::InvalidMarker);
        }
        self.marker = marker;
        Ok(self)
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn client(&self) -> &Arc<dyn ParameterClient> {
        &self.client
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Look up a single parameter
    pub fn get(&self, name: &str) -> ParameterResult<String> {
        let mut values = self.get_many([name])?;
        values
            .remove(name)
            .ok_or_else(|| ParameterError::MissingParameter(name.to_string()))
    }

    /// Look up many parameters in one round trip
    ///
    /// An empty list returns an empty map without calling the client.
    pub fn get_many<I, S>(&self, names: I) -> ParameterResult<ParameterMap>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Ok(ParameterMap::new());
        }
        self.client.fetch(&names)
    }

    /// Replace every placeholder in `tree` and return it
    ///
    /// Keys and nesting are preserved; only placeholder leaves change.
    /// Fails with `MissingParameter` if any referenced name has no value, and
    /// passes client errors through unchanged.
    pub fn resolve(&self, mut tree: ConfigTree) -> ParameterResult<ConfigTree> {
        self.resolve_in_place(&mut tree)?;
        Ok(tree)
    }

    /// Same as [`Store::resolve`], mutating `tree`
    ///
    /// The tree is only written once every referenced name has been fetched,
    /// so on error it is left as it was.
    pub fn resolve_in_place(&self, tree: &mut ConfigTree) -> ParameterResult<()> {
        let marker = self.marker.as_str();

        // Collect: distinct names, so a repeated target is fetched once
        let mut pending = BTreeSet::new();
        tree.try_for_each_leaf_mut(&mut |leaf: &mut String| {
            if let Some(name) = placeholder_name(leaf, marker) {
                pending.insert(name.to_string());
            }
            Ok::<(), ParameterError>(())
        })?;

        if pending.is_empty() {
            log_debug!(self.logger, "No placeholders in {} leaves", tree.leaf_count());
            return Ok(());
        }

        // Fetch: the only round trip
        log_debug!(
            self.logger,
            "Fetching {} parameter(s) from {}",
            pending.len(),
            self.client.name()
        );
        let batch = self.get_many(pending.iter().cloned()).map_err(|e| {
            log_error!(self.logger, "Fetch from {} failed: {}", self.client.name(), e);
            e
        })?;

        if let Some(missing) = pending.iter().find(|name| !batch.contains_key(*name)) {
            log_error!(self.logger, "Parameter {} missing from fetch result", missing);
            return Err(ParameterError::MissingParameter(missing.clone()));
        }

        // Substitute: same walk, fanning each fetched value out to every leaf
        let mut replaced = 0usize;
        tree.try_for_each_leaf_mut(&mut |leaf: &mut String| {
            let value = placeholder_name(leaf, marker).and_then(|name| batch.get(name));
            if let Some(value) = value {
                *leaf = value.clone();
                replaced += 1;
            }
            Ok::<(), ParameterError>(())
        })?;

        log_info!(
            self.logger,
            "Replaced {} placeholder(s) using {} parameter(s)",
            replaced,
            batch.len()
        );
        Ok(())
    }

    /// Resolve placeholders in `env` and write the values back
    ///
    /// Only variables that were already set are written; none are added or
    /// removed.
    pub fn apply_to<E>(&self, env: &mut E) -> ParameterResult<()>
    where
        E: Environment + ?Sized,
    {
        let current = env.vars();
        let existing: BTreeSet<String> = current.keys().cloned().collect();

        let resolved = self.resolve(ConfigTree::from_vars(current))?;
        let updates = resolved
            .into_vars()
            .into_iter()
            .filter(|(key, _)| existing.contains(key))
            .collect();

        env.set_vars(updates)
    }

    /// Resolve placeholders in the process environment in place
    ///
    /// Not safe to call from several threads at once: the environment is
    /// process-wide and concurrent overlays interleave arbitrarily.
    pub fn apply_to_environment(&self) -> ParameterResult<()> {
        self.apply_to(&mut ProcessEnvironment)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("client", &self.client.name())
            .field("marker", &self.marker)
            .finish()
    }
}
