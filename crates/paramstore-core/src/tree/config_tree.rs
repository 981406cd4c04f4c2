//! Nested string-keyed configuration tree

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A configuration tree whose leaves are strings
///
/// Sequences, numbers and booleans are not representable; deserializing them
/// fails. Serialized form is plain JSON/YAML (`"text"` or `{ "key": ... }`).
///
/// ```
/// use paramstore_core::tree::ConfigTree;
///
/// let tree: ConfigTree = serde_json::from_str(
///     r#"{ "db": { "host": "db.internal", "password": "ssm:/db/password" } }"#,
/// ).unwrap();
/// assert_eq!(tree.get_path(&["db", "host"]).and_then(|t| t.as_leaf()), Some("db.internal"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigTree {
    Leaf(String),
    Node(BTreeMap<String, ConfigTree>),
}

impl Default for ConfigTree {
    fn default() -> Self {
        ConfigTree::Node(BTreeMap::new())
    }
}

impl ConfigTree {
    pub fn leaf(value: impl Into<String>) -> Self {
        ConfigTree::Leaf(value.into())
    }

    /// Depth-1 tree from `(name, value)` pairs, e.g. environment variables
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ConfigTree::Node(
            vars.into_iter()
                .map(|(k, v)| (k.into(), ConfigTree::Leaf(v.into())))
                .collect(),
        )
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            ConfigTree::Leaf(value) => Some(value),
            ConfigTree::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&BTreeMap<String, ConfigTree>> {
        match self {
            ConfigTree::Leaf(_) => None,
            ConfigTree::Node(children) => Some(children),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigTree> {
        self.as_node().and_then(|children| children.get(key))
    }

    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigTree> {
        path.iter().try_fold(self, |tree, key| tree.get(key))
    }

    /// Number of string leaves at any depth
    pub fn leaf_count(&self) -> usize {
        match self {
            ConfigTree::Leaf(_) => 1,
            ConfigTree::Node(children) => children.values().map(ConfigTree::leaf_count).sum(),
        }
    }

    /// Top-level string leaves; nested nodes are skipped
    pub fn into_vars(self) -> BTreeMap<String, String> {
        match self {
            ConfigTree::Leaf(_) => BTreeMap::new(),
            ConfigTree::Node(children) => children
                .into_iter()
                .filter_map(|(k, v)| match v {
                    ConfigTree::Leaf(value) => Some((k, value)),
                    ConfigTree::Node(_) => None,
                })
                .collect(),
        }
    }

    /// Depth-first walk handing every leaf to `visitor`
    ///
    /// Keys and nesting are never touched, so the tree keeps its shape
    /// whatever the visitor does to leaf values. The first error stops the
    /// walk; leaves visited before it keep any changes.
    pub fn try_for_each_leaf_mut<E, F>(&mut self, visitor: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut String) -> Result<(), E>,
    {
        match self {
            ConfigTree::Leaf(value) => visitor(value),
            ConfigTree::Node(children) => {
                for child in children.values_mut() {
                    child.try_for_each_leaf_mut(visitor)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ConfigTree {
    fn from(value: &str) -> Self {
        ConfigTree::Leaf(value.to_string())
    }
}

impl From<String> for ConfigTree {
    fn from(value: String) -> Self {
        ConfigTree::Leaf(value)
    }
}

impl From<BTreeMap<String, ConfigTree>> for ConfigTree {
    fn from(children: BTreeMap<String, ConfigTree>) -> Self {
        ConfigTree::Node(children)
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigTree
where
    K: Into<String>,
    V: Into<ConfigTree>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ConfigTree::Node(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
