//! Display interface using SPI
use crate::ssd1680::error::{DisplayError, Error};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Default time to wait for BUSY to drop before giving up
pub const BUSY_WAIT_TIMEOUT_MS: u32 = 10_000;

/// Poll interval while BUSY is high
const BUSY_POLL_MS: u32 = 1;

/// SPI bus plus the three control lines of a Waveshare style e-paper HAT
pub struct DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// SPI device, chip select handled by the bus
    spi: SPI,
    /// High while the controller is busy
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Delay provider for reset pulses and busy polling
    pub(crate) delay: DELAY,
    busy_timeout_ms: u32,
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// Wrap the bus and pins
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
            busy_timeout_ms: BUSY_WAIT_TIMEOUT_MS,
        }
    }

    /// Change how long [`Self::wait_busy_low`] waits
    pub fn with_busy_timeout(mut self, timeout_ms: u32) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Basic function for sending commands
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(&[command]) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Send the same byte `repetitions` times, used to fill the whole RAM
    pub(crate) fn data_x_times(&mut self, val: u8, repetitions: u32) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        const CHUNK_SIZE: usize = 32;
        let buffer = [val; CHUNK_SIZE];

        let full_chunks = (repetitions as usize) / CHUNK_SIZE;
        let remainder = (repetitions as usize) % CHUNK_SIZE;

        for _ in 0..full_chunks {
            self.spi
                .write(&buffer)
                .map_err(|_| DisplayError::BusWriteError)?;
        }

        if remainder > 0 {
            self.spi
                .write(&buffer[0..remainder])
                .map_err(|_| DisplayError::BusWriteError)?;
        }

        log::debug!("Completed sending {} bytes of data", repetitions);
        Ok(())
    }

    /// Wait for the busy pin to go LOW, polling every millisecond
    pub(crate) fn wait_busy_low(&mut self) -> Result<(), Error> {
        let mut waited_ms = 0u32;

        loop {
            match self.busy.is_high() {
                Ok(false) => return Ok(()),
                Ok(true) => {}
                Err(_) => {
                    log::error!("Error reading BUSY pin state");
                    return Err(DisplayError::BusWriteError.into());
                }
            }

            if waited_ms >= self.busy_timeout_ms {
                log::error!(
                    "Timeout waiting for BUSY pin to go LOW after {} ms",
                    waited_ms
                );
                return Err(Error::BusyTimeout {
                    timeout_ms: self.busy_timeout_ms,
                });
            }

            self.delay.delay_ms(BUSY_POLL_MS);
            waited_ms += BUSY_POLL_MS;
        }
    }

    /// Hardware reset: high, low, high with settle times
    pub(crate) fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(20);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(2);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(20);
        Ok(())
    }

    /// Short reset pulse used before loading the partial waveform
    pub(crate) fn reset_pulse(&mut self) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(1);
        self.rst.set_high().map_err(|_| DisplayError::RSError)
    }
}
