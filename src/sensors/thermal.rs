//! SoC temperature from the thermal zone in sysfs

use std::fs;
use std::path::Path;

use super::{round1, SensorError};

/// Default thermal zone of the Raspberry Pi SoC
pub const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Read a thermal zone file, degrees Celsius with one decimal
pub fn read_temperature(path: &Path) -> Result<f32, SensorError> {
    let content = fs::read_to_string(path).map_err(|e| SensorError::io(path, e))?;
    parse_millidegrees(&content)
}

/// Like [`read_temperature`], but a failure is logged and reported as `None`
pub fn cpu_temperature(path: &Path) -> Option<f32> {
    match read_temperature(path) {
        Ok(celsius) => Some(celsius),
        Err(e) => {
            log::warn!("CPU temperature read failed: {}", e);
            None
        }
    }
}

fn parse_millidegrees(content: &str) -> Result<f32, SensorError> {
    let line = content.lines().next().unwrap_or("").trim();
    let milli: f64 = line
        .parse()
        .map_err(|_| SensorError::parse("thermal zone", format!("{:?}", line)))?;
    Ok(round1(milli / 1000.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn millidegrees_to_one_decimal() {
        assert_eq!(parse_millidegrees("48312\n").unwrap(), 48.3);
        assert_eq!(parse_millidegrees("51860").unwrap(), 51.9);
        assert_eq!(parse_millidegrees("-2000\n").unwrap(), -2.0);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            parse_millidegrees("hot\n"),
            Err(SensorError::Parse { .. })
        ));
        assert!(parse_millidegrees("").is_err());
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "45123").unwrap();

        assert_eq!(cpu_temperature(file.path()), Some(45.1));
    }

    #[test]
    fn missing_file_is_absent() {
        assert_eq!(cpu_temperature(Path::new("/nonexistent/thermal/temp")), None);
    }
}
