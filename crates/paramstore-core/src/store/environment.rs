//! Environment targets for the overlay

use std::collections::BTreeMap;

use crate::client::{ParameterError, ParameterResult};

/// A flat set of variables the store can read whole and write back
pub trait Environment {
    /// Every variable currently set
    fn vars(&self) -> BTreeMap<String, String>;

    /// Set each variable in `vars`, overwriting existing values
    ///
    /// Either every variable is written or, on error, none is.
    fn set_vars(&mut self, vars: BTreeMap<String, String>) -> ParameterResult<()>;
}

/// The current process environment
///
/// Variables whose name or value is not valid UTF-8 are invisible, as are
/// names `set_var` cannot take back (such as the hidden `=C:` entries on
/// Windows). They are never returned by `vars` and so never written back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn vars(&self) -> BTreeMap<String, String> {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .filter(|(key, _)| is_settable_name(key))
            .collect()
    }

    fn set_vars(&mut self, vars: BTreeMap<String, String>) -> ParameterResult<()> {
        if let Some((key, _)) = vars
            .iter()
            .find(|(key, value)| !is_settable_name(key) || value.contains('\0'))
        {
            return Err(ParameterError::UnrepresentableVariable(key.clone()));
        }

        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        Ok(())
    }
}

fn is_settable_name(key: &str) -> bool {
    !key.is_empty() && !key.contains('=') && !key.contains('\0')
}

/// In-memory environment for tests and non-process targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnvironment {
    vars: BTreeMap<String, String>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Environment for MemoryEnvironment {
    fn vars(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }

    fn set_vars(&mut self, vars: BTreeMap<String, String>) -> ParameterResult<()> {
        self.vars.extend(vars);
        Ok(())
    }
}
