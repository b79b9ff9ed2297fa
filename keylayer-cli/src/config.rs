//! TOML configuration for the CLI.
//!
//! Every field has a default, so a missing file or an empty one is valid:
//!
//! ```toml
//! [simulator]
//! connections = ["usb", "ble"]
//! default_layer = 0
//!
//! [log]
//! filter = "info"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use keylayer::Connections;
use serde::Deserialize;
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "keylayer.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub simulator: SimulatorConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Transports the simulated keyboard is allowed to send on.
    pub connections: Vec<Transport>,
    /// Layer the keyboard starts on.
    pub default_layer: u8,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            connections: vec![Transport::Usb, Transport::Ble],
            default_layer: 0,
        }
    }
}

impl SimulatorConfig {
    pub fn connection_mask(&self) -> Connections {
        self.connections
            .iter()
            .fold(Connections::empty(), |mask, transport| mask | transport.connection())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Usb,
    Ble,
}

impl Transport {
    pub fn connection(self) -> Connections {
        match self {
            Transport::Usb => Connections::USB,
            Transport::Ble => Connections::BLE,
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read `path`. A missing file is only an error when `required` is set;
    /// otherwise the defaults are used.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
