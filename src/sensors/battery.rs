//! UPS HAT fuel gauge over I2C

use embedded_hal::i2c::{Error as _, I2c};

use super::SensorError;

/// Default 7-bit address of the fuel gauge
pub const UPS_ADDRESS: u8 = 0x43;

/// State of charge register
pub const SOC_REGISTER: u8 = 0x02;

/// Read the state of charge register and convert it to percent
pub fn read_battery<I: I2c>(i2c: &mut I, address: u8, register: u8) -> Result<u8, SensorError> {
    let mut word = [0u8; 2];
    i2c.write_read(address, &[register], &mut word)
        .map_err(|e| SensorError::I2c(e.kind()))?;
    Ok(percent_from_word(word))
}

/// Like [`read_battery`], but a failure is logged and reported as `None`
pub fn battery_percent<I: I2c>(i2c: &mut I, address: u8, register: u8) -> Option<u8> {
    match read_battery(i2c, address, register) {
        Ok(percent) => Some(percent),
        Err(e) => {
            log::warn!("UPS battery read failed: {}", e);
            None
        }
    }
}

/// The gauge sends the high byte first, an SMBus word read would see it swapped.
/// The high byte is whole percent, the low byte 1/256ths.
fn percent_from_word(word: [u8; 2]) -> u8 {
    let raw = u16::from_be_bytes(word);
    (raw / 256).min(100) as u8
}
