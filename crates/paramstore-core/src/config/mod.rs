//! Store settings
//!
//! Settings come from a YAML file (`~/.config/paramstore/config.yaml` by
//! default) with environment variables layered on top:
//! - `PARAMSTORE_CLIENT`: registered client name (`ssm`, `memory`, ...)
//! - `AWS_REGION` / `AWS_DEFAULT_REGION`: SSM region
//! - `PARAMSTORE_ENDPOINT_URL`: SSM endpoint override
//! - `PARAMSTORE_MARKER`: placeholder marker

mod error;
mod settings;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use settings::{StoreSettings, DEFAULT_MARKER, DEFAULT_REGION};
pub use file::SettingsFile;
