//! Optional on-disk defaults, overridden by command-line options.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Resolution;
use crate::error::ConfigError;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Rendition to download when `--res` is not given.
    pub resolution: Option<Resolution>,
    /// Output directory when `--out` is not given.
    pub output_dir: Option<PathBuf>,
    /// Cookie file when `--cookie` is not given.
    pub cookie_file: Option<PathBuf>,
}

/// Location of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cloud-academy-dl").join("config.toml"))
}

impl FileConfig {
    /// Reads a config file. A file that does not exist yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigFile`] if the file exists but cannot be
    /// read or is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::ConfigFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let config = toml::from_str(&text).map_err(|e| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }
}
