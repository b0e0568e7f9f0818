//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! The device section mirrors the recognised option surface: motion flags,
//! quality levels, null radius, data rates, and the rotation/translation
//! multipliers applied to decoded samples. Validation enforces the same
//! ranges the command encoder does, so a bad value is caught before any
//! bytes head for the device.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{MagellanError, Result};
use crate::magellan::protocol::{BEEP_DURATION_MAX, DATA_RATE_MAX, NULL_RADIUS_MAX, QUALITY_MAX};
use crate::serial::DEFAULT_DEVICE_PATHS;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub device: DeviceConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Explicit device path; when empty, `port_index` selects a default path
    #[serde(default)]
    pub port: String,

    /// Index into the default candidate paths, used when `port` is empty
    #[serde(default)]
    pub port_index: usize,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// Device configuration pushed on connect
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    #[serde(default = "default_true")]
    pub translation_enabled: bool,

    #[serde(default = "default_true")]
    pub rotation_enabled: bool,

    #[serde(default)]
    pub dominant_mode: bool,

    #[serde(default = "default_quality")]
    pub rot_quality: u8,

    #[serde(default = "default_quality")]
    pub trans_quality: u8,

    #[serde(default = "default_null_radius")]
    pub null_radius: u8,

    #[serde(default = "default_data_rate_min")]
    pub data_rate_min: u8,

    #[serde(default = "default_data_rate_max")]
    pub data_rate_max: u8,

    /// Beep played once the device is configured, in device units
    #[serde(default = "default_beep_duration")]
    pub beep_duration: u8,

    #[serde(default = "default_multiplier")]
    pub rot_multiplier: f32,

    #[serde(default = "default_multiplier")]
    pub trans_multiplier: f32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            port_index: 0,
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            translation_enabled: true,
            rotation_enabled: true,
            dominant_mode: false,
            rot_quality: default_quality(),
            trans_quality: default_quality(),
            null_radius: default_null_radius(),
            data_rate_min: default_data_rate_min(),
            data_rate_max: default_data_rate_max(),
            beep_duration: default_beep_duration(),
            rot_multiplier: default_multiplier(),
            trans_multiplier: default_multiplier(),
        }
    }
}

// Default value functions
fn default_reconnect_interval_ms() -> u64 { 1000 }
fn default_true() -> bool { true }
fn default_quality() -> u8 { 8 }
fn default_null_radius() -> u8 { 4 }
fn default_data_rate_min() -> u8 { 2 }
fn default_data_rate_max() -> u8 { 8 }
fn default_beep_duration() -> u8 { 4 }
fn default_multiplier() -> f32 { 1.0 }

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// The serial device path, resolving `port_index` when no explicit
    /// path is configured.
    pub fn resolved_port(&self) -> &str {
        if self.serial.port.is_empty() {
            DEFAULT_DEVICE_PATHS[self.serial.port_index]
        } else {
            &self.serial.port
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`MagellanError::Configuration`] if any value is out of the
    /// device-valid range.
    pub fn validate(&self) -> Result<()> {
        fn bad(msg: String) -> Result<()> {
            Err(MagellanError::Configuration(msg))
        }

        if self.serial.port.is_empty() && self.serial.port_index >= DEFAULT_DEVICE_PATHS.len() {
            return bad(format!(
                "port_index {} out of range (0-{})",
                self.serial.port_index,
                DEFAULT_DEVICE_PATHS.len() - 1
            ));
        }

        if self.serial.reconnect_interval_ms == 0 || self.serial.reconnect_interval_ms > 60000 {
            return bad("reconnect_interval_ms must be between 1 and 60000".to_string());
        }

        for (name, value) in [
            ("rot_quality", self.device.rot_quality),
            ("trans_quality", self.device.trans_quality),
        ] {
            if value > QUALITY_MAX {
                return bad(format!("{} must be between 0 and {}", name, QUALITY_MAX));
            }
        }

        if self.device.null_radius > NULL_RADIUS_MAX {
            return bad(format!(
                "null_radius must be between 0 and {}",
                NULL_RADIUS_MAX
            ));
        }

        if self.device.data_rate_min > DATA_RATE_MAX || self.device.data_rate_max > DATA_RATE_MAX {
            return bad(format!(
                "data rates must be between 0 and {}",
                DATA_RATE_MAX
            ));
        }

        if self.device.data_rate_min > self.device.data_rate_max {
            return bad("data_rate_min must not exceed data_rate_max".to_string());
        }

        if self.device.beep_duration > BEEP_DURATION_MAX {
            return bad(format!(
                "beep_duration must be between 0 and {}",
                BEEP_DURATION_MAX
            ));
        }

        for (name, value) in [
            ("rot_multiplier", self.device.rot_multiplier),
            ("trans_multiplier", self.device.trans_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return bad(format!("{} must be a positive finite number", name));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}
