//! Snapshot of everything the status panel shows

use std::fmt;

/// One round of sensor readings
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    /// Local time, `YYYY-MM-DD HH:MM`
    pub timestamp: String,
    /// CPU usage in percent
    pub cpu: f32,
    /// RAM usage in percent
    pub ram: f32,
    /// Swap usage in percent
    pub swap: f32,
    /// Battery charge in percent, `None` when the gauge could not be read
    pub battery: Option<u8>,
    /// SoC temperature in °C, `None` when the thermal zone could not be read
    pub temperature: Option<f32>,
}

impl Readings {
    /// Whether anything but the time differs from `previous`
    pub fn changed_since(&self, previous: &Readings) -> bool {
        self.cpu != previous.cpu
            || self.ram != previous.ram
            || self.swap != previous.swap
            || self.battery != previous.battery
            || self.temperature != previous.temperature
    }

    /// The six lines drawn on the panel, top to bottom
    pub fn lines(&self) -> [String; 6] {
        [
            self.timestamp.clone(),
            format!("CPU: {:.1}%", self.cpu),
            format!("RAM: {:.1}%", self.ram),
            format!("SWAP:{:.1}%", self.swap),
            format!("BAT: {}%", OrNa(self.battery)),
            format!("T: {} C", OrNa(self.temperature)),
        ]
    }
}

struct OrNa<T>(Option<T>);

impl fmt::Display for OrNa<u8> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "N/A"),
        }
    }
}

impl fmt::Display for OrNa<f32> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.1}", v),
            None => write!(f, "N/A"),
        }
    }
}

impl fmt::Display for Readings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cpu={:.1}% ram={:.1}% swap={:.1}% bat={}% temp={}C",
            self.timestamp,
            self.cpu,
            self.ram,
            self.swap,
            OrNa(self.battery),
            OrNa(self.temperature)
        )
    }
}

#[cfg(test)]
pub(crate) fn sample() -> Readings {
    Readings {
        timestamp: "2026-10-17 09:41".to_string(),
        cpu: 12.5,
        ram: 40.0,
        swap: 0.0,
        battery: Some(87),
        temperature: Some(48.3),
    }
}
