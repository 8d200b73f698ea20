//! Configuration types for download operations.

mod file;

pub use file::{FileConfig, default_config_path};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default folder that receives downloaded courses.
pub const DEFAULT_OUTPUT_DIR: &str = "courses";

/// A video rendition offered by the course player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawResolution", into = "String")]
pub enum Resolution {
    /// 640x360.
    R360,
    /// 1280x720.
    R720,
    /// 1920x1080.
    #[default]
    R1080,
}

impl Resolution {
    /// Vertical resolution in pixels.
    #[must_use]
    pub const fn height(self) -> u16 {
        match self {
            Self::R360 => 360,
            Self::R720 => 720,
            Self::R1080 => 1080,
        }
    }

    /// Quality label used by the player sources, e.g. `"1080p"`.
    #[must_use]
    pub fn quality_label(self) -> String {
        format!("{}p", self.height())
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "360" => Ok(Self::R360),
            "720" => Ok(Self::R720),
            "1080" => Ok(Self::R1080),
            other => Err(ConfigError::InvalidResolution(other.to_string())),
        }
    }
}

/// Accepts both `resolution = 720` and `resolution = "720"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawResolution {
    Number(u32),
    Text(String),
}

impl TryFrom<RawResolution> for Resolution {
    type Error = ConfigError;

    fn try_from(value: RawResolution) -> Result<Self, Self::Error> {
        match value {
            RawResolution::Number(n) => n.to_string().parse(),
            RawResolution::Text(s) => s.parse(),
        }
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.height().to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.height())
    }
}

/// How titles are turned into path components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStyle {
    /// Linux and macOS: only the path separator is replaced.
    Posix,
    /// Windows: characters the file system rejects are dropped.
    Windows,
}

impl NamingStyle {
    const WINDOWS_RESERVED: [char; 8] = ['\\', '/', '|', '<', '>', ':', '?', '*'];

    /// Naming style for the platform this binary was built for.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Turns a title into a single path component.
    #[must_use]
    pub fn sanitize(self, title: &str) -> String {
        let title = title.trim();
        match self {
            Self::Posix => title.replace('/', "-"),
            Self::Windows => title
                .chars()
                .filter(|c| !Self::WINDOWS_RESERVED.contains(c))
                .collect(),
        }
    }
}

impl Default for NamingStyle {
    fn default() -> Self {
        Self::detect()
    }
}

/// Configuration for download operations.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Rendition to download.
    pub resolution: Resolution,
    /// Root directory for the course tree.
    pub output_dir: PathBuf,
    /// How titles become directory and file names.
    pub naming: NamingStyle,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            naming: NamingStyle::detect(),
        }
    }
}

impl DownloadConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rendition to download.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the naming style.
    #[must_use]
    pub const fn with_naming(mut self, naming: NamingStyle) -> Self {
        self.naming = naming;
        self
    }
}
