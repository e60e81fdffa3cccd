//! Data sources for the status panel
//!
//! Every source may fail on its own. Battery and temperature failures turn
//! into `None`, load failures into `0.0`; none of them abort a cycle.

mod battery;
mod error;
mod load;
mod thermal;
mod types;

use std::path::PathBuf;
use std::time::Duration;

use embedded_hal::i2c::I2c;

pub use battery::{battery_percent, read_battery, SOC_REGISTER, UPS_ADDRESS};
pub use error::SensorError;
pub use load::{cpu_percent, memory_percent, swap_percent, CpuTimes, MemInfo};
pub use thermal::{cpu_temperature, read_temperature, THERMAL_ZONE};
pub use types::Readings;

#[cfg(test)]
pub(crate) use types::sample;

use crate::config::Config;

/// Timestamp format shown on the first line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Local time formatted for the panel
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn round1(value: f64) -> f32 {
    ((value * 10.0).round() / 10.0) as f32
}

/// Something that produces a fresh [`Readings`] each cycle
pub trait ReadingSource {
    fn read(&mut self) -> Readings;
}

/// The Raspberry Pi sources: procfs, sysfs thermal zone and the UPS gauge
pub struct SystemSensors<I2C> {
    ups: Option<I2C>,
    ups_address: u8,
    ups_register: u8,
    thermal_path: PathBuf,
    cpu_window: Duration,
}

impl<I2C: I2c> SystemSensors<I2C> {
    /// `ups` is `None` when there is no gauge, the battery then always reads absent
    pub fn new(ups: Option<I2C>, config: &Config) -> Self {
        SystemSensors {
            ups,
            ups_address: config.ups.address,
            ups_register: config.ups.register,
            thermal_path: config.thermal_path.clone(),
            cpu_window: config.cpu_window(),
        }
    }
}

impl<I2C: I2c> ReadingSource for SystemSensors<I2C> {
    fn read(&mut self) -> Readings {
        let timestamp = timestamp();
        let cpu = cpu_percent(self.cpu_window);
        let ram = memory_percent();
        let swap = swap_percent();
        let battery = self
            .ups
            .as_mut()
            .and_then(|i2c| battery_percent(i2c, self.ups_address, self.ups_register));
        let temperature = cpu_temperature(&self.thermal_path);

        let readings = Readings {
            timestamp,
            cpu,
            ram,
            swap,
            battery,
            temperature,
        };
        log::debug!("Readings: {}", readings);
        readings
    }
}
