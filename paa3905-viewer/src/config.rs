//! Viewer configuration
//!
//! Optional settings are read from `paa3905-viewer.toml` in the working
//! directory. Every key has a default, so the file may be absent or partial:
//!
//! ```toml
//! baud_rate = 115200
//! scale = 10
//! read_timeout_ms = 100
//! sink = "terminal"   # or "sdl"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use serde::Deserialize;

use paa3905_display::DEFAULT_SCALE;
use paa3905_hal::UartConfig;

/// Configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "paa3905-viewer.toml";

/// Largest accepted upscale factor
const MAX_SCALE: usize = 64;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File exists but could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// TOML syntax or type error
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// Value out of range
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

/// Which frame sink to render to
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// ANSI half-block rendering on stdout
    #[default]
    Terminal,
    /// SDL2 window (needs the `sdl` feature)
    Sdl,
}

/// Viewer settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Serial baud rate
    pub baud_rate: u32,
    /// Nearest-neighbour upscale factor for windowed sinks
    pub scale: usize,
    /// Serial read timeout; an idle link polls the sink this often
    pub read_timeout_ms: u64,
    /// Frame sink
    pub sink: SinkKind,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            baud_rate: UartConfig::SENSOR_BAUDRATE,
            scale: DEFAULT_SCALE,
            read_timeout_ms: 100,
            sink: SinkKind::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(input) => {
                log::info!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&input)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No {} found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::Invalid {
                key: "baud_rate",
                reason: "must be non-zero",
            });
        }
        if self.scale == 0 || self.scale > MAX_SCALE {
            return Err(ConfigError::Invalid {
                key: "scale",
                reason: "must be between 1 and 64",
            });
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "read_timeout_ms",
                reason: "must be non-zero",
            });
        }
        Ok(())
    }

    /// Serial link settings (8N1 at the configured baud rate)
    pub fn uart(&self) -> UartConfig {
        UartConfig {
            baudrate: self.baud_rate,
            ..UartConfig::default()
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
