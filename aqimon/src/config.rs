//! Credentials and settings file
//!
//! Loaded once at startup; a missing or malformed file is fatal regardless
//! of mode. Everything except the Adafruit IO account is defaulted, so a
//! minimal file is just:
//!
//! ```toml
//! [adafruit]
//! username = "ada"
//! key = "aio_XXXX"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Config path used when `-c` is not given
pub const DEFAULT_PATH: &str = "/etc/aqimon/config.toml";

/// Startup configuration failures, always fatal
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub adafruit: AdafruitConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Adafruit IO account and feed keys
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdafruitConfig {
    pub username: String,
    pub key: String,
    #[serde(default = "default_pm2_5_feed")]
    pub pm2_5_feed: String,
    #[serde(default = "default_pm10_feed")]
    pub pm10_feed: String,
    #[serde(default = "default_aqi_feed")]
    pub aqi_feed: String,
}

/// Serial device and duty-cycle settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorConfig {
    #[serde(default = "default_device")]
    pub device: String,
    /// Fan spin-up time before a reading is trustworthy
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: u64,
}

/// Loop pacing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Wait between iterations in daemon mode, after the publish
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_pm2_5_feed() -> String {
    "pm2-5".into()
}

fn default_pm10_feed() -> String {
    "pm10".into()
}

fn default_aqi_feed() -> String {
    "aqi".into()
}

fn default_device() -> String {
    "/dev/ttyUSB0".into()
}

fn default_warmup_secs() -> u64 {
    15
}

fn default_interval_secs() -> u64 {
    45
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            warmup_secs: default_warmup_secs(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

/// Read and parse the config file
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
