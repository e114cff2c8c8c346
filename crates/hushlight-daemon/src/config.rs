//! Daemon configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use hushlight_hid::{ConnectionConfig, ControllerConfig, DeviceId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Daemon settings
    #[serde(default)]
    pub daemon: DaemonConfig,
    /// Device settings
    #[serde(default)]
    pub device: DeviceConfig,
    /// Scheduler settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Command socket settings
    #[serde(default)]
    pub ipc: IpcConfig,
}

/// Daemon-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// USB Vendor ID (hex)
    #[serde(default = "default_vid")]
    pub vendor_id: String,
    /// USB Product ID (hex)
    #[serde(default = "default_pid")]
    pub product_id: String,
    /// Back-off between probes while the device is missing
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
    /// Read timeout of the touch read loop
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: default_vid(),
            product_id: default_pid(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            io_timeout_ms: default_io_timeout_ms(),
        }
    }
}

fn default_vid() -> String {
    "20a0".to_string()
}

fn default_pid() -> String {
    "42da".to_string()
}

fn default_reconnect_interval_ms() -> u64 {
    5000
}

fn default_io_timeout_ms() -> u64 {
    100
}

/// Scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Poll interval while the command queue is empty
    #[serde(default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { idle_poll_ms: default_idle_poll_ms() }
    }
}

fn default_idle_poll_ms() -> u64 {
    250
}

/// Command socket settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IpcConfig {
    /// Socket path (optional, uses the runtime dir if not set)
    pub socket_path: Option<PathBuf>,
}

impl Config {
    /// Build the controller settings.
    ///
    /// # Errors
    /// Returns an error if the vendor or product id is not valid hex.
    pub fn controller_config(&self) -> Result<ControllerConfig> {
        let device = DeviceId {
            vendor_id: parse_hex_id(&self.device.vendor_id).context("Invalid device.vendor_id")?,
            product_id: parse_hex_id(&self.device.product_id).context("Invalid device.product_id")?,
        };

        Ok(ControllerConfig {
            connection: ConnectionConfig {
                device,
                reconnect_interval: Duration::from_millis(self.device.reconnect_interval_ms),
                io_timeout: Duration::from_millis(self.device.io_timeout_ms),
            },
            idle_poll: Duration::from_millis(self.scheduler.idle_poll_ms),
        })
    }
}

fn parse_hex_id(value: &str) -> Result<u16> {
    let digits = value.trim().trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).with_context(|| format!("not a 16-bit hex id: {value:?}"))
}

/// Load configuration from file or defaults.
pub fn load_config() -> Result<Config> {
    let config_path = config_path()?;

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {config_path:?}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {config_path:?}"))?;
        Ok(config)
    } else {
        info!(?config_path, "Config file not found, using defaults");
        Ok(Config::default())
    }
}

/// Get the configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "hushlight", "Hushlight")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}
