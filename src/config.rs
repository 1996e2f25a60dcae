use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    /// Path to the adb executable; empty means resolve `adb` through PATH.
    #[serde(default)]
    pub adb_path: String,
    /// Default device serial passed as `adb -s <serial>`; `None` lets adb
    /// pick its default transport.
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default = "default_shell_timeout_secs")]
    pub shell_timeout_secs: u64,
    #[serde(default = "default_poll_step_ms")]
    pub poll_step_ms: u64,
}

fn default_shell_timeout_secs() -> u64 {
    10
}

fn default_poll_step_ms() -> u64 {
    200
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            adb_path: String::new(),
            serial: None,
            shell_timeout_secs: default_shell_timeout_secs(),
            poll_step_ms: default_poll_step_ms(),
        }
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("OOLONG_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".oolong_config.json")
}

pub fn load_config() -> Result<BridgeConfig> {
    load_config_from_path(&config_path())
}

pub fn save_config(config: &BridgeConfig) -> Result<()> {
    save_config_to_path(config, &config_path())
}

pub fn load_config_from_path(path: &Path) -> Result<BridgeConfig> {
    if !path.exists() {
        return Ok(BridgeConfig::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| Error::Config(format!("failed to read config: {err}")))?;
    let config: BridgeConfig = serde_json::from_str(&raw)
        .map_err(|err| Error::Config(format!("failed to parse config: {err}")))?;
    Ok(validate_config(config))
}

pub fn save_config_to_path(config: &BridgeConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let payload = serde_json::to_string_pretty(config)
        .map_err(|err| Error::Config(format!("failed to serialize config: {err}")))?;
    fs::write(path, payload)
        .map_err(|err| Error::Config(format!("failed to write config: {err}")))?;
    Ok(())
}

fn validate_config(mut config: BridgeConfig) -> BridgeConfig {
    if config.shell_timeout_secs == 0 {
        config.shell_timeout_secs = default_shell_timeout_secs();
    }
    if config.poll_step_ms < 50 {
        config.poll_step_ms = default_poll_step_ms();
    }
    if let Some(serial) = &config.serial {
        if serial.trim().is_empty() {
            config.serial = None;
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_from_path(&dir.path().join("absent.json")).expect("load");
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let config = BridgeConfig {
            adb_path: "/opt/platform-tools/adb".to_string(),
            serial: Some("emulator-5554".to_string()),
            shell_timeout_secs: 30,
            poll_step_ms: 250,
        };
        save_config_to_path(&config, &path).expect("save");
        let loaded = load_config_from_path(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn clamps_invalid_values() {
        let config = validate_config(BridgeConfig {
            adb_path: String::new(),
            serial: Some("   ".to_string()),
            shell_timeout_secs: 0,
            poll_step_ms: 1,
        });
        assert_eq!(config.shell_timeout_secs, 10);
        assert_eq!(config.poll_step_ms, 200);
        assert_eq!(config.serial, None);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"serial": "R58M123"}"#).expect("write");
        let config = load_config_from_path(&path).expect("load");
        assert_eq!(config.serial.as_deref(), Some("R58M123"));
        assert_eq!(config.shell_timeout_secs, 10);
        assert_eq!(config.poll_step_ms, 200);
    }
}
