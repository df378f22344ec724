//! TOML-based configuration for the daemon.
//!
//! The config file lives at `$XDG_CONFIG_HOME/ctroller/config.toml`
//! (or `~/.config/ctroller/config.toml`) unless `--config` names another
//! file.  Every field is optional:
//!
//! ```toml
//! log_level = "info"
//!
//! [network]
//! port = 15708
//! bind_address = "0.0.0.0"
//! receive_timeout_ms = 1000
//!
//! [devices]
//! enabled = ["gamepad", "touchscreen", "gyroscope", "accelerometer"]
//!
//! [input]
//! keymap = "/etc/ctroller/keymap.txt"
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file, so the daemon
//! runs with no config file at all.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ctroller_core::{DeviceKind, DeviceMask};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::network::{ListenerConfig, DEFAULT_PORT, DEFAULT_RECEIVE_TIMEOUT};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `network.bind_address` is not an IP address.
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    /// `network.receive_timeout_ms` is zero.
    #[error("receive timeout must be at least 1 ms")]
    ZeroReceiveTimeout,
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
    #[serde(default)]
    pub input: InputConfig,
}

/// UDP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// IP address to bind.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Silence after which every device is reset to rest.
    #[serde(default = "default_receive_timeout_ms")]
    pub receive_timeout_ms: u64,
}

/// Which virtual devices to create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DevicesConfig {
    #[serde(default = "default_enabled_devices")]
    pub enabled: Vec<DeviceKind>,
}

/// Gamepad input settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Keymap file; the built-in mapping is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keymap: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_receive_timeout_ms() -> u64 {
    DEFAULT_RECEIVE_TIMEOUT.as_millis() as u64
}
fn default_enabled_devices() -> Vec<DeviceKind> {
    DeviceKind::ALL.to_vec()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            network: NetworkConfig::default(),
            devices: DevicesConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            receive_timeout_ms: default_receive_timeout_ms(),
        }
    }
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_devices(),
        }
    }
}

impl NetworkConfig {
    /// Converts the file representation into a listener configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` does not
    /// parse as an IP address, or [`ConfigError::ZeroReceiveTimeout`] if
    /// `receive_timeout_ms` is zero.
    pub fn listener_config(&self) -> Result<ListenerConfig, ConfigError> {
        if self.receive_timeout_ms == 0 {
            return Err(ConfigError::ZeroReceiveTimeout);
        }
        let bind_address: IpAddr = self
            .bind_address
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone()))?;
        Ok(ListenerConfig {
            bind_address,
            port: self.port,
            receive_timeout: Duration::from_millis(self.receive_timeout_ms),
        })
    }
}

impl DevicesConfig {
    pub fn mask(&self) -> DeviceMask {
        self.enabled.iter().copied().collect()
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(base.join("ctroller").join("config.toml"))
}

/// Loads the config from `explicit`, or from [`config_file_path`] when `None`.
///
/// A missing file at the default location yields `AppConfig::default()`; a
/// missing file that was named explicitly is an error.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => load_config_from(path),
        None => {
            let path = match config_file_path() {
                Ok(path) => path,
                Err(ConfigError::NoPlatformConfigDir) => return Ok(AppConfig::default()),
                Err(e) => return Err(e),
            };
            match load_config_from(&path) {
                Err(ConfigError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    Ok(AppConfig::default())
                }
                other => other,
            }
        }
    }
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (including "not
/// found") and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Renders `config` as TOML, as accepted by [`load_config_from`].
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn render_config(config: &AppConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_has_expected_network_settings() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.network.port, 15708);
        assert_eq!(cfg.network.bind_address, "0.0.0.0");
        assert_eq!(cfg.network.receive_timeout_ms, 1000);
    }

    #[test]
    fn test_app_config_default_enables_every_device() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.devices.mask(), DeviceMask::ALL);
    }

    #[test]
    fn test_app_config_default_log_level_is_info() {
        assert_eq!(AppConfig::default().log_level, "info");
    }

    #[test]
    fn test_app_config_default_has_no_keymap() {
        assert!(AppConfig::default().input.keymap.is_none());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let cfg: AppConfig = toml::from_str("[network]\nport = 9000\n").unwrap();

        assert_eq!(cfg.network.port, 9000);
        assert_eq!(cfg.network.receive_timeout_ms, 1000);
        assert_eq!(cfg.devices, DevicesConfig::default());
    }

    // ── TOML round-trip ───────────────────────────────────────────────────────

    #[test]
    fn test_app_config_serializes_and_deserializes_round_trip() {
        // Arrange
        let mut cfg = AppConfig::default();
        cfg.network.port = 9000;
        cfg.devices.enabled = vec![DeviceKind::Gamepad, DeviceKind::Gyroscope];
        cfg.input.keymap = Some(PathBuf::from("/etc/ctroller/keymap.txt"));

        // Act
        let toml_str = render_config(&cfg).expect("serialize");
        let restored: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    // ── Devices ───────────────────────────────────────────────────────────────

    #[test]
    fn test_device_names_parse_into_mask() {
        let cfg: AppConfig =
            toml::from_str("[devices]\nenabled = [\"touchscreen\", \"accelerometer\"]\n").unwrap();

        let mask = cfg.devices.mask();

        assert!(mask.contains(DeviceKind::Touchscreen));
        assert!(mask.contains(DeviceKind::Accelerometer));
        assert!(!mask.contains(DeviceKind::Gamepad));
        assert!(!mask.contains(DeviceKind::Gyroscope));
    }

    #[test]
    fn test_empty_device_list_gives_empty_mask() {
        let cfg: AppConfig = toml::from_str("[devices]\nenabled = []\n").unwrap();
        assert!(cfg.devices.mask().is_empty());
    }

    #[test]
    fn test_unknown_device_name_is_a_parse_error() {
        let result: Result<AppConfig, _> = toml::from_str("[devices]\nenabled = [\"mouse\"]\n");
        assert!(result.is_err());
    }

    // ── Listener conversion ───────────────────────────────────────────────────

    #[test]
    fn test_listener_config_from_defaults() {
        let listener = NetworkConfig::default().listener_config().unwrap();

        assert_eq!(listener.bind_address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(listener.port, 15708);
        assert_eq!(listener.receive_timeout, Duration::from_millis(1000));
    }

    #[test]
    fn test_listener_config_rejects_hostname() {
        let network = NetworkConfig {
            bind_address: "localhost".to_string(),
            ..NetworkConfig::default()
        };

        let result = network.listener_config();

        assert!(matches!(result, Err(ConfigError::InvalidBindAddress(a)) if a == "localhost"));
    }

    #[test]
    fn test_listener_config_rejects_zero_timeout() {
        let network = NetworkConfig {
            receive_timeout_ms: 0,
            ..NetworkConfig::default()
        };

        let result = network.listener_config();

        assert!(matches!(result, Err(ConfigError::ZeroReceiveTimeout)));
    }

    #[test]
    fn test_listener_config_accepts_one_millisecond_timeout() {
        let network = NetworkConfig {
            receive_timeout_ms: 1,
            ..NetworkConfig::default()
        };

        let listener = network.listener_config().unwrap();

        assert_eq!(listener.receive_timeout, Duration::from_millis(1));
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    #[test]
    fn test_load_config_from_missing_explicit_path_is_io_error() {
        let path = std::env::temp_dir().join("ctroller-test-definitely-missing.toml");

        let result = load_config(Some(&path));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_config_from_reads_written_file() {
        // Arrange
        let path = std::env::temp_dir().join(format!("ctroller-config-{}.toml", std::process::id()));
        std::fs::write(&path, "log_level = \"debug\"\n[network]\nport = 4000\n").unwrap();

        // Act
        let cfg = load_config_from(&path);
        std::fs::remove_file(&path).ok();

        // Assert
        let cfg = cfg.unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.network.port, 4000);
    }

    #[test]
    fn test_load_config_from_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!("ctroller-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[network\nport = ").unwrap();

        let result = load_config_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
