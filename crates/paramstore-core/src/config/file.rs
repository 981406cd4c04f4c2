//! YAML settings file

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigResult;
use super::settings::StoreSettings;

/// Location of a YAML settings file
///
/// # Example
///
/// ```no_run
/// use paramstore_core::config::SettingsFile;
///
/// // ~/.config/paramstore/config.yaml
/// let settings = SettingsFile::user().load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// User-level settings file (`<config dir>/paramstore/config.yaml`)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("paramstore").join("config.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read settings, falling back to defaults when the file is absent
    pub fn load(&self) -> ConfigResult<StoreSettings> {
        if !self.exists() {
            return Ok(StoreSettings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        StoreSettings::from_yaml(&content)
    }

    pub fn save(&self, settings: &StoreSettings) -> ConfigResult<()> {
        settings.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
