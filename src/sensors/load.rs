//! CPU, memory and swap usage from procfs

use std::fs;
use std::thread;
use std::time::Duration;

use super::{round1, SensorError};

const PROC_STAT: &str = "/proc/stat";
const PROC_MEMINFO: &str = "/proc/meminfo";

/// Aggregate jiffies of the `cpu` line in `/proc/stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTimes {
    pub busy: u64,
    pub total: u64,
}

impl CpuTimes {
    pub fn parse(stat: &str) -> Result<Self, SensorError> {
        let line = stat
            .lines()
            .find(|l| l.starts_with("cpu "))
            .ok_or_else(|| SensorError::parse(PROC_STAT, "no aggregate cpu line"))?;

        let fields = line
            .split_whitespace()
            .skip(1)
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SensorError::parse(PROC_STAT, e.to_string()))?;
        if fields.len() < 4 {
            return Err(SensorError::parse(PROC_STAT, "short cpu line"));
        }

        // user nice system idle iowait irq softirq steal; guest time is already in user
        let total: u64 = fields.iter().take(8).sum();
        let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
        Ok(CpuTimes {
            busy: total - idle,
            total,
        })
    }

    pub fn read() -> Result<Self, SensorError> {
        let stat = fs::read_to_string(PROC_STAT).map_err(|e| SensorError::io(PROC_STAT, e))?;
        Self::parse(&stat)
    }

    /// Busy share of the jiffies between `earlier` and `self`
    pub fn percent_since(&self, earlier: &CpuTimes) -> f32 {
        let total = self.total.saturating_sub(earlier.total);
        if total == 0 {
            return 0.0;
        }
        let busy = self.busy.saturating_sub(earlier.busy);
        round1(busy as f64 * 100.0 / total as f64)
    }
}

/// The `/proc/meminfo` fields we need, in kB
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_available: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

impl MemInfo {
    pub fn parse(meminfo: &str) -> Result<Self, SensorError> {
        let mut info = MemInfo::default();
        let mut seen_total = false;
        let mut seen_available = false;

        for line in meminfo.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            let slot = match key {
                "MemTotal" => {
                    seen_total = true;
                    &mut info.mem_total
                }
                "MemAvailable" => {
                    seen_available = true;
                    &mut info.mem_available
                }
                "SwapTotal" => &mut info.swap_total,
                "SwapFree" => &mut info.swap_free,
                _ => continue,
            };
            let value = rest.split_whitespace().next().unwrap_or("");
            *slot = value
                .parse()
                .map_err(|_| SensorError::parse(PROC_MEMINFO, format!("{}: {:?}", key, value)))?;
        }

        if !seen_total || !seen_available || info.mem_total == 0 {
            return Err(SensorError::parse(
                PROC_MEMINFO,
                "missing MemTotal or MemAvailable",
            ));
        }
        Ok(info)
    }

    pub fn read() -> Result<Self, SensorError> {
        let content =
            fs::read_to_string(PROC_MEMINFO).map_err(|e| SensorError::io(PROC_MEMINFO, e))?;
        Self::parse(&content)
    }

    pub fn memory_percent(&self) -> f32 {
        let used = self.mem_total.saturating_sub(self.mem_available);
        round1(used as f64 * 100.0 / self.mem_total as f64)
    }

    /// 0 when there is no swap
    pub fn swap_percent(&self) -> f32 {
        if self.swap_total == 0 {
            return 0.0;
        }
        let used = self.swap_total.saturating_sub(self.swap_free);
        round1(used as f64 * 100.0 / self.swap_total as f64)
    }
}

/// CPU usage over `window`, blocking for that long. 0.0 if procfs is unreadable.
pub fn cpu_percent(window: Duration) -> f32 {
    let sample = || -> Result<f32, SensorError> {
        let before = CpuTimes::read()?;
        thread::sleep(window);
        let after = CpuTimes::read()?;
        Ok(after.percent_since(&before))
    };
    sample().unwrap_or_else(|e| {
        log::warn!("CPU load read failed: {}", e);
        0.0
    })
}

/// RAM usage in percent. 0.0 if procfs is unreadable.
pub fn memory_percent() -> f32 {
    match MemInfo::read() {
        Ok(info) => info.memory_percent(),
        Err(e) => {
            log::warn!("Memory load read failed: {}", e);
            0.0
        }
    }
}

/// Swap usage in percent. 0.0 without swap or if procfs is unreadable.
pub fn swap_percent() -> f32 {
    match MemInfo::read() {
        Ok(info) => info.swap_percent(),
        Err(e) => {
            log::warn!("Swap load read failed: {}", e);
            0.0
        }
    }
}
