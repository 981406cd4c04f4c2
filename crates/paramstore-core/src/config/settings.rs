//! Store settings and environment overrides

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// Marker used when nothing else is configured: `ssm:/db/password`
/// references the parameter `/db/password`.
pub const DEFAULT_MARKER: &str = "ssm:";

pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Settings for building a `Store`
///
/// ```yaml
/// client: ssm
/// region: eu-west-1
/// endpoint_url: http://localhost:4566
/// marker: "ssm:"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Registered parameter client name
    pub client: String,
    /// AWS region for the SSM client
    pub region: String,
    /// Endpoint override (LocalStack, VPC endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Placeholder marker
    pub marker: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            client: "ssm".to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl StoreSettings {
    /// Load the default settings file, then apply environment overrides
    pub fn load() -> ConfigResult<Self> {
        let mut settings = super::SettingsFile::user().load()?;
        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to read variables
    ///
    /// Empty values are ignored. `AWS_REGION` wins over `AWS_DEFAULT_REGION`.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(client) = get("PARAMSTORE_CLIENT") {
            self.client = client;
        }
        if let Some(region) = get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")) {
            self.region = region;
        }
        if let Some(endpoint_url) = get("PARAMSTORE_ENDPOINT_URL") {
            self.endpoint_url = Some(endpoint_url);
        }
        if let Some(marker) = get("PARAMSTORE_MARKER") {
            self.marker = marker;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.marker.is_empty() {
            return Err(ConfigError::InvalidMarker);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = StoreSettings::default();
        assert_eq!(settings.client, "ssm");
        assert_eq!(settings.region, "ap-northeast-1");
        assert_eq!(settings.marker, "ssm:");
        assert!(settings.endpoint_url.is_none());
    }

    #[test]
    fn test_from_yaml_partial() {
        let settings = StoreSettings::from_yaml("region: us-east-1\nmarker: \"param://\"\n").unwrap();
        assert_eq!(settings.region, "us-east-1");
        assert_eq!(settings.marker, "param://");
        assert_eq!(settings.client, "ssm");
    }

    #[test]
    fn test_from_yaml_rejects_empty_marker() {
        let err = StoreSettings::from_yaml("marker: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMarker));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = StoreSettings::default();
        settings.apply_env_overrides_from(lookup(&[
            ("PARAMSTORE_CLIENT", "memory"),
            ("AWS_DEFAULT_REGION", "eu-central-1"),
            ("PARAMSTORE_ENDPOINT_URL", "http://localhost:4566"),
            ("PARAMSTORE_MARKER", "$ssm:"),
        ]));

        assert_eq!(settings.client, "memory");
        assert_eq!(settings.region, "eu-central-1");
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(settings.marker, "$ssm:");
    }

    #[test]
    fn test_aws_region_wins_over_default_region() {
        let mut settings = StoreSettings::default();
        settings.apply_env_overrides_from(lookup(&[
            ("AWS_REGION", "us-west-2"),
            ("AWS_DEFAULT_REGION", "eu-central-1"),
        ]));
        assert_eq!(settings.region, "us-west-2");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut settings = StoreSettings::default();
        settings.apply_env_overrides_from(lookup(&[("PARAMSTORE_MARKER", ""), ("AWS_REGION", "")]));
        assert_eq!(settings, StoreSettings::default());
    }

    #[test]
    fn test_builders() {
        let settings = StoreSettings::default()
            .with_client("memory")
            .with_region("us-east-1")
            .with_endpoint_url("http://localhost:4566")
            .with_marker("ref:");
        assert_eq!(settings.client, "memory");
        assert_eq!(settings.region, "us-east-1");
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(settings.marker, "ref:");
    }
}
