//! Settings loaded from an optional TOML file
//!
//! Every field has a default matching the Waveshare 2.13" HAT plus the
//! Waveshare UPS HAT on a Raspberry Pi, so an empty file (or none) works.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::orientation::Orientation;
use crate::sensors::{SOC_REGISTER, THERMAL_ZONE, UPS_ADDRESS};
use crate::ssd1680::flag::Flag;
use crate::ssd1680::pins::Pins;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seconds between sensor polls
    pub update_interval_secs: u64,
    /// CPU usage is measured over this many milliseconds
    pub cpu_window_ms: u64,
    pub orientation: Orientation,
    /// Name of an embedded-graphics mono font, see [`crate::status::font_by_name`]
    pub font: String,
    /// Byte written to the whole panel on shutdown
    pub clear_fill: u8,
    pub thermal_path: PathBuf,
    pub panel: PanelConfig,
    pub ups: UpsConfig,
}

/// Wiring of the e-paper HAT
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    pub spi_device: PathBuf,
    pub spi_hz: u32,
    pub gpio_chip: PathBuf,
    pub dc: u32,
    pub rst: u32,
    pub busy: u32,
}

/// UPS fuel gauge on I2C
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpsConfig {
    pub enabled: bool,
    pub i2c_bus: PathBuf,
    pub address: u8,
    pub register: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            update_interval_secs: 3,
            cpu_window_ms: 500,
            orientation: Orientation::Portrait,
            font: "7x13-bold".to_string(),
            clear_fill: Flag::FILL_WHITE,
            thermal_path: PathBuf::from(THERMAL_ZONE),
            panel: PanelConfig::default(),
            ups: UpsConfig::default(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            spi_device: PathBuf::from(Pins::SPI_DEVICE),
            spi_hz: Pins::SPI_HZ,
            gpio_chip: PathBuf::from(Pins::GPIO_CHIP),
            dc: Pins::DC,
            rst: Pins::RST,
            busy: Pins::BSY,
        }
    }
}

impl Default for UpsConfig {
    fn default() -> Self {
        UpsConfig {
            enabled: true,
            i2c_bus: PathBuf::from("/dev/i2c-1"),
            address: UPS_ADDRESS,
            register: SOC_REGISTER,
        }
    }
}

impl Config {
    /// Parse TOML text, missing fields take their defaults
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::info!("Loading config from {}", path.display());
                Self::from_toml(&text)
            }
            None => Ok(Config::default()),
        }
    }

    /// Apply command line overrides on top of the loaded file, then re-check
    pub fn with_overrides(
        mut self,
        orientation: Option<Orientation>,
        interval_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(orientation) = orientation {
            self.orientation = orientation;
        }
        if let Some(interval) = interval_secs {
            self.update_interval_secs = interval;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "update_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.ups.address > 0x7F {
            return Err(ConfigError::Invalid(format!(
                "ups.address 0x{:02X} is not a 7-bit address",
                self.ups.address
            )));
        }
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.cpu_window_ms)
    }
}
