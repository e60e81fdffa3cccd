//! Pin definitions for the 2.13" e-Paper HAT on a Raspberry Pi
//!
//! BCM line offsets on `/dev/gpiochip0`. Chip select is driven by the
//! spidev device (`/dev/spidev0.0` uses CE0).

/// Default GPIO assignments of the HAT
pub struct Pins;

impl Pins {
    /// Reset pin for display
    pub const RST: u32 = 17;
    /// Data/Command control pin (High for data, Low for command)
    pub const DC: u32 = 25;
    /// Busy status pin (High when display is busy)
    pub const BSY: u32 = 24;

    /// GPIO character device holding the lines above
    pub const GPIO_CHIP: &'static str = "/dev/gpiochip0";
    /// SPI device, CE0 on bus 0
    pub const SPI_DEVICE: &'static str = "/dev/spidev0.0";
    /// SPI clock used by the vendor examples
    pub const SPI_HZ: u32 = 4_000_000;
}
