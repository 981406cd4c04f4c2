use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{process_env, AwsCredentials, EnvLookup, ProvideCredentials};
use crate::client::{ParameterError, ParameterResult};

type Section = HashMap<String, String>;

/// Static keys from the shared credentials and config files
///
/// The profile comes from `AWS_PROFILE` (then `AWS_DEFAULT_PROFILE`, then
/// `default`). The credentials file wins over the config file. Role
/// assumption, SSO and `credential_process` entries are not followed.
#[derive(Debug, Clone)]
pub struct ProfileProvider {
    credentials_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    profile: String,
}

impl ProfileProvider {
    pub fn new() -> Self {
        Self::from_lookup(&process_env())
    }

    /// Resolve file paths and the profile name
    ///
    /// `AWS_SHARED_CREDENTIALS_FILE` and `AWS_CONFIG_FILE` override the
    /// defaults under `~/.aws/`.
    pub fn from_lookup(lookup: &EnvLookup) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let aws_dir = dirs::home_dir().map(|home| home.join(".aws"));

        Self {
            credentials_file: get("AWS_SHARED_CREDENTIALS_FILE")
                .map(PathBuf::from)
                .or_else(|| aws_dir.as_ref().map(|dir| dir.join("credentials"))),
            config_file: get("AWS_CONFIG_FILE")
                .map(PathBuf::from)
                .or_else(|| aws_dir.as_ref().map(|dir| dir.join("config"))),
            profile: get("AWS_PROFILE")
                .or_else(|| get("AWS_DEFAULT_PROFILE"))
                .unwrap_or_else(|| "default".to_string()),
        }
    }

    pub fn with_files(
        credentials_file: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            credentials_file: Some(credentials_file.into()),
            config_file: Some(config_file.into()),
            profile: profile.into(),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn credentials_file(&self) -> Option<&Path> {
        self.credentials_file.as_deref()
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    fn config_section_names(&self) -> Vec<String> {
        let prefixed = format!("profile {}", self.profile);
        if self.profile == "default" {
            vec![self.profile.clone(), prefixed]
        } else {
            vec![prefixed]
        }
    }
}

impl Default for ProfileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvideCredentials for ProfileProvider {
    fn name(&self) -> &str {
        "profile"
    }

    fn provide(&self) -> ParameterResult<Option<AwsCredentials>> {
        if let Some(path) = &self.credentials_file {
            if let Some(mut sections) = read_sections(path)? {
                if let Some(section) = sections.remove(&self.profile) {
                    if let Some(creds) = credentials_from_section(&section, path, &self.profile)? {
                        return Ok(Some(creds));
                    }
                }
            }
        }

        if let Some(path) = &self.config_file {
            if let Some(mut sections) = read_sections(path)? {
                for name in self.config_section_names() {
                    if let Some(section) = sections.remove(&name) {
                        if let Some(creds) = credentials_from_section(&section, path, &self.profile)? {
                            return Ok(Some(creds));
                        }
                    }
                }
            }
        }

        Ok(None)
    }
}

fn read_sections(path: &Path) -> ParameterResult<Option<HashMap<String, Section>>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(parse_ini(&text))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ParameterError::Credentials(format!(
            "failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

fn credentials_from_section(
    section: &Section,
    path: &Path,
    profile: &str,
) -> ParameterResult<Option<AwsCredentials>> {
    let get = |key: &str| section.get(key).filter(|v| !v.is_empty()).cloned();

    match (get("aws_access_key_id"), get("aws_secret_access_key")) {
        (None, None) => Ok(None),
        (Some(key_id), Some(secret)) => Ok(Some(AwsCredentials {
            access_key_id: key_id,
            secret_access_key: secret,
            session_token: get("aws_session_token"),
        })),
        _ => Err(ParameterError::Credentials(format!(
            "profile {} in {} needs both aws_access_key_id and aws_secret_access_key",
            profile,
            path.display()
        ))),
    }
}

/// Parse the AWS flavour of INI
///
/// Indented lines are nested sub-properties (for example `s3 =` blocks) and
/// are skipped. Keys are lowercased; later duplicates win.
fn parse_ini(text: &str) -> HashMap<String, Section> {
    let mut sections: HashMap<String, Section> = HashMap::new();
    let mut current: Option<String> = None;

    for raw in text.lines() {
        if raw.starts_with(|c: char| c == ' ' || c == '\t') {
            continue;
        }
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        if let (Some(section), Some((key, value))) = (&current, line.split_once('=')) {
            if let Some(entries) = sections.get_mut(section) {
                entries.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
    }

    sections
}
