//! SSD1680 Display Driver Implementation
//!
//! Driver for the Waveshare 2.13" V3 black/white panel (122x250, SSD1680
//! controller). It implements [`PanelController`] so the refresh pipeline
//! can drive it without knowing about commands or waveforms.
//!
//! ## Function categories
//!
//! ### Initialization
//! - `new()` - Wrap bus and pins, no bus traffic
//! - `init()` - Hardware + software reset, RAM window, full waveform LUT
//!
//! ### Display Updates
//! - `display_full()` - Write BW RAM, full refresh
//! - `display_partial_base()` - Write BW and RED RAM, full refresh (latches the base)
//! - `display_partial()` - Partial waveform, write BW RAM, partial refresh
//! - `clear()` - Fill BW RAM with one byte, full refresh
//!
//! ### Power Management
//! - `sleep()` - Enter deep sleep. The next RAM write re-runs `init()`,
//!   since only a hardware reset wakes the controller.
//!
//! ## Critical Implementation Details
//!
//! ### Polarity
//!
//! In the BW RAM a `0` bit is black and a `1` bit is white, so `0xFF` clears
//! to white.
//!
//! ### Waveform tables
//!
//! The panel has no usable OTP waveform for partial refresh, both tables are
//! loaded into the LUT register. The last six bytes of each table carry the
//! gate, source and VCOM voltages that go with it.
//!
//! ### BUSY Pin Wait
//!
//! After `MASTER_ACTIVATE` the driver **must** wait for BUSY to go LOW.
//! A full refresh takes around 2 seconds, a partial one around 0.3 seconds.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::packer;
use crate::panel::PanelController;
use crate::ssd1680::error::{DisplayError, Error};
use crate::ssd1680::interface::DisplayInterface;
use crate::ssd1680::{cmd::Cmd, flag::Flag, HEIGHT, WIDTH};

/// Bytes of a waveform table that go to `WRITE_LUT_REGISTER`
const LUT_REGISTER_LEN: usize = 153;

/// Full refresh waveform, no ghosting, flashes the whole panel
const LUT_FULL_UPDATE: [u8; 159] = [
    0x80, 0x4A, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L0
    0x40, 0x4A, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L1
    0x80, 0x4A, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L2
    0x40, 0x4A, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L3
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L4
    0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group0
    0x0F, 0x00, 0x00, 0x0F, 0x00, 0x00, 0x02, // TP, SR, RP of Group1
    0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group2
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group3
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group4
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group5
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group6
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group7
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group8
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group9
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group10
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group11
    0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00, 0x00, // FR, XON
    0x22, 0x17, 0x41, 0x00, 0x32, 0x36, // EOPT, VGH, VSH1, VSH2, VSL, VCOM
];

/// Partial refresh waveform, only drives pixels that differ from the base
const LUT_PARTIAL_UPDATE: [u8; 159] = [
    0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L0
    0x80, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L1
    0x40, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L2
    0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L3
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VS L4
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group0
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group1
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group2
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group3
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group4
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group5
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group6
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group7
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group8
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group9
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group10
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // TP, SR, RP of Group11
    0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00, 0x00, // FR, XON
    0x22, 0x17, 0x41, 0x00, 0x32, 0x36, // EOPT, VGH, VSH1, VSH2, VSL, VCOM
];

/// Which waveform currently sits in the LUT register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Waveform {
    Full,
    Partial,
}

/// SSD1680 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (HIGH when display is busy)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Ssd1680<SPI, BSY, DC, RST, DELAY> {
    interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
    width: u16,
    height: u16,
    asleep: bool,
    waveform: Option<Waveform>,
}

impl<SPI, BSY, DC, RST, DELAY> Ssd1680<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Wrap bus and pins for the 122x250 panel. Nothing is sent until [`Self::init`].
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self::from_interface(DisplayInterface::new(spi, busy, dc, rst, delay))
    }

    /// Create a driver from an already configured interface
    pub fn from_interface(interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>) -> Self {
        Ssd1680 {
            interface,
            width: WIDTH,
            height: HEIGHT,
            asleep: false,
            waveform: None,
        }
    }

    /// Bytes of one full frame
    pub fn buffer_len(&self) -> usize {
        packer::packed_len(u32::from(self.width), u32::from(self.height))
    }

    /// Hardware and software reset followed by the full refresh configuration
    pub fn init(&mut self) -> Result<(), Error> {
        log::info!("Initializing SSD1680 for full refresh");

        self.interface.reset()?;
        self.interface.wait_busy_low()?;

        self.interface.cmd(Cmd::SW_RESET)?;
        self.interface.wait_busy_low()?;

        // MUX = 0xF9 + 1 = 250 gate lines
        self.interface.cmd_with_data(
            Cmd::DRIVER_CONTROL,
            &[
                Flag::DRIVER_OUTPUT_MUX_LOW,
                Flag::DRIVER_OUTPUT_MUX_HIGH,
                Flag::DRIVER_OUTPUT_GATE_SCAN_FROM_G0,
            ],
        )?;

        self.interface
            .cmd_with_data(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX])?;

        self.use_full_frame()?;

        self.interface
            .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_FULL])?;
        self.interface
            .cmd_with_data(Cmd::DISPLAY_UPDATE_CTRL1, &Flag::DISPLAY_UPDATE_CTRL1_NORMAL)?;
        self.interface
            .cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR])?;
        self.interface.wait_busy_low()?;

        self.set_lut(Waveform::Full)?;
        self.asleep = false;

        log::info!("SSD1680 init complete");
        Ok(())
    }

    /// Fill the BW RAM with `fill` and run a full refresh
    pub fn clear(&mut self, fill: u8) -> Result<(), Error> {
        log::info!("Clearing display with 0x{:02X}", fill);
        self.prepare_full()?;

        self.set_ram_counter(0, 0)?;
        self.interface.cmd(Cmd::WRITE_BW_DATA)?;
        self.interface.data_x_times(fill, self.buffer_len() as u32)?;

        self.turn_on_display()
    }

    /// Write `buffer` to the BW RAM and run a full refresh
    pub fn display_full(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.check_len(buffer)?;
        log::info!("Full refresh");
        self.prepare_full()?;

        self.set_ram_counter(0, 0)?;
        self.interface.cmd_with_data(Cmd::WRITE_BW_DATA, buffer)?;

        self.turn_on_display()
    }

    /// Write `buffer` to both RAMs so it becomes the reference for partial refresh
    pub fn display_partial_base(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.check_len(buffer)?;
        log::info!("Full refresh of partial base frame");
        self.prepare_full()?;

        self.set_ram_counter(0, 0)?;
        self.interface.cmd_with_data(Cmd::WRITE_BW_DATA, buffer)?;
        self.set_ram_counter(0, 0)?;
        self.interface.cmd_with_data(Cmd::WRITE_RED_DATA, buffer)?;

        self.turn_on_display()
    }

    /// Partial refresh of the whole frame against the RED RAM base
    pub fn display_partial(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.check_len(buffer)?;
        log::info!("Partial refresh");
        self.wake_if_asleep()?;

        self.interface.reset_pulse()?;
        self.set_lut(Waveform::Partial)?;

        self.interface
            .cmd_with_data(Cmd::WRITE_OTP_SELECTION, &Flag::OTP_SELECTION_PARTIAL)?;
        self.interface.cmd_with_data(
            Cmd::BORDER_WAVEFORM_CONTROL,
            &[Flag::BORDER_WAVEFORM_PARTIAL],
        )?;

        self.trigger_display_update(Flag::DISPLAY_UPDATE_POWER_ON)?;

        self.use_full_frame()?;
        self.interface.cmd_with_data(Cmd::WRITE_BW_DATA, buffer)?;

        self.trigger_display_update(Flag::DISPLAY_UPDATE_PARTIAL)
    }

    /// Put device into deep sleep mode to save power
    pub fn sleep(&mut self) -> Result<(), Error> {
        log::info!("Putting display into deep sleep mode");
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])?;
        self.interface.delay.delay_ms(2);
        self.asleep = true;
        Ok(())
    }

    /// Whether the controller is in deep sleep
    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    fn wake_if_asleep(&mut self) -> Result<(), Error> {
        if self.asleep {
            log::info!("Waking display from deep sleep");
            self.init()?;
        }
        Ok(())
    }

    /// Make sure the controller is awake and holds the full waveform
    fn prepare_full(&mut self) -> Result<(), Error> {
        self.wake_if_asleep()?;
        if self.waveform != Some(Waveform::Full) {
            self.interface
                .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_FULL])?;
            self.set_lut(Waveform::Full)?;
        }
        Ok(())
    }

    fn check_len(&self, buffer: &[u8]) -> Result<(), Error> {
        let expected = self.buffer_len();
        if buffer.len() != expected {
            log::error!(
                "Frame buffer has {} bytes, panel needs {}",
                buffer.len(),
                expected
            );
            return Err(DisplayError::InvalidFormatError.into());
        }
        Ok(())
    }

    /// Load a waveform table and the voltages stored in its tail
    fn set_lut(&mut self, waveform: Waveform) -> Result<(), Error> {
        let lut = match waveform {
            Waveform::Full => &LUT_FULL_UPDATE,
            Waveform::Partial => &LUT_PARTIAL_UPDATE,
        };
        log::debug!("Setting {:?} LUT", waveform);

        self.interface
            .cmd_with_data(Cmd::WRITE_LUT_REGISTER, &lut[..LUT_REGISTER_LEN])?;
        self.interface.wait_busy_low()?;

        self.interface
            .cmd_with_data(Cmd::END_OPTION, &[lut[LUT_REGISTER_LEN]])?;
        self.interface
            .cmd_with_data(Cmd::GATE_VOLTAGE_CONTROL, &[lut[LUT_REGISTER_LEN + 1]])?;
        self.interface.cmd_with_data(
            Cmd::SOURCE_VOLTAGE_CONTROL,
            &lut[LUT_REGISTER_LEN + 2..LUT_REGISTER_LEN + 5],
        )?;
        self.interface
            .cmd_with_data(Cmd::WRITE_VCOM_REGISTER, &[lut[LUT_REGISTER_LEN + 5]])?;

        self.waveform = Some(waveform);
        Ok(())
    }

    fn turn_on_display(&mut self) -> Result<(), Error> {
        self.trigger_display_update(Flag::DISPLAY_UPDATE_FULL)
    }

    /// Trigger display update with specified control value and wait for completion
    fn trigger_display_update(&mut self, ctrl2_value: u8) -> Result<(), Error> {
        self.interface
            .cmd_with_data(Cmd::DISPLAY_UPDATE_CTRL2, &[ctrl2_value])?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
        self.interface.wait_busy_low()
    }

    fn use_full_frame(&mut self) -> Result<(), DisplayError> {
        // choose full frame/ram
        self.set_ram_area(
            0,
            0,
            u32::from(self.width) - 1,
            u32::from(self.height) - 1,
        )?;

        // start from the beginning
        self.set_ram_counter(0, 0)
    }

    fn set_ram_area(
        &mut self,
        start_x: u32,
        start_y: u32,
        end_x: u32,
        end_y: u32,
    ) -> Result<(), DisplayError> {
        debug_assert!(start_x < end_x);
        debug_assert!(start_y < end_y);

        // x is addressed in bytes
        self.interface.cmd_with_data(
            Cmd::SET_RAMX_START_END,
            &[(start_x >> 3) as u8, (end_x >> 3) as u8],
        )?;

        self.interface.cmd_with_data(
            Cmd::SET_RAMY_START_END,
            &[
                start_y as u8,
                (start_y >> 8) as u8,
                end_y as u8,
                (end_y >> 8) as u8,
            ],
        )
    }

    fn set_ram_counter(&mut self, x: u32, y: u32) -> Result<(), DisplayError> {
        // x is positioned in bytes, so the last 3 bits which show the
        // position inside a byte in the ram aren't relevant
        self.interface
            .cmd_with_data(Cmd::SET_RAMX_COUNTER, &[(x >> 3) as u8])?;

        // 2 Databytes: A[7:0] & 0..A[8]
        self.interface
            .cmd_with_data(Cmd::SET_RAMY_COUNTER, &[y as u8, (y >> 8) as u8])
    }
}

impl<SPI, BSY, DC, RST, DELAY> PanelController for Ssd1680<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    type Error = Error;

    fn init(&mut self) -> Result<(), Error> {
        Ssd1680::init(self)
    }

    fn clear(&mut self, fill: u8) -> Result<(), Error> {
        Ssd1680::clear(self, fill)
    }

    fn display_full(&mut self, buffer: &[u8]) -> Result<(), Error> {
        Ssd1680::display_full(self, buffer)
    }

    fn display_partial_base(&mut self, buffer: &[u8]) -> Result<(), Error> {
        Ssd1680::display_partial_base(self, buffer)
    }

    fn display_partial(&mut self, buffer: &[u8]) -> Result<(), Error> {
        Ssd1680::display_partial(self, buffer)
    }

    fn sleep(&mut self) -> Result<(), Error> {
        Ssd1680::sleep(self)
    }

    fn native_width(&self) -> u32 {
        u32::from(self.width)
    }

    fn native_height(&self) -> u32 {
        u32::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use std::rc::Rc;

    use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
    use embedded_hal::spi::{ErrorType as SpiErrorType, Operation, SpiDevice};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Command(u8),
        Data(Vec<u8>),
        Reset(bool),
    }

    #[derive(Default)]
    struct Bus {
        events: RefCell<Vec<Event>>,
        dc_high: Cell<bool>,
        busy_polls_left: Cell<u32>,
    }

    impl Bus {
        fn commands(&self) -> Vec<u8> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Event::Command(c) => Some(*c),
                    _ => None,
                })
                .collect()
        }

        /// Bytes sent after the last occurrence of `command`, until the next command
        fn data_after(&self, command: u8) -> Vec<u8> {
            let events = self.events.borrow();
            let start = events
                .iter()
                .rposition(|e| *e == Event::Command(command))
                .expect("command not sent");
            events[start + 1..]
                .iter()
                .take_while(|e| !matches!(e, Event::Command(_)))
                .filter_map(|e| match e {
                    Event::Data(d) => Some(d.clone()),
                    _ => None,
                })
                .flatten()
                .collect()
        }

        fn clear(&self) {
            self.events.borrow_mut().clear();
        }
    }

    struct FakeSpi(Rc<Bus>);
    struct FakeDc(Rc<Bus>);
    struct FakeRst(Rc<Bus>);
    struct FakeBusy(Rc<Bus>);
    struct NoDelay;

    impl SpiErrorType for FakeSpi {
        type Error = Infallible;
    }

    impl SpiDevice for FakeSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    let event = if self.0.dc_high.get() {
                        Event::Data(bytes.to_vec())
                    } else {
                        assert_eq!(bytes.len(), 1, "commands are single bytes");
                        Event::Command(bytes[0])
                    };
                    self.0.events.borrow_mut().push(event);
                }
            }
            Ok(())
        }
    }

    impl PinErrorType for FakeDc {
        type Error = Infallible;
    }

    impl OutputPin for FakeDc {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.dc_high.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.dc_high.set(true);
            Ok(())
        }
    }

    impl PinErrorType for FakeRst {
        type Error = Infallible;
    }

    impl OutputPin for FakeRst {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.events.borrow_mut().push(Event::Reset(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.events.borrow_mut().push(Event::Reset(true));
            Ok(())
        }
    }

    impl PinErrorType for FakeBusy {
        type Error = Infallible;
    }

    impl InputPin for FakeBusy {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let left = self.0.busy_polls_left.get();
            if left > 0 {
                self.0.busy_polls_left.set(left - 1);
            }
            Ok(left > 0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|high| !high)
        }
    }

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    type TestDriver = Ssd1680<FakeSpi, FakeBusy, FakeDc, FakeRst, NoDelay>;

    fn driver() -> (TestDriver, Rc<Bus>) {
        let bus = Rc::new(Bus::default());
        let driver = Ssd1680::new(
            FakeSpi(bus.clone()),
            FakeBusy(bus.clone()),
            FakeDc(bus.clone()),
            FakeRst(bus.clone()),
            NoDelay,
        );
        (driver, bus)
    }

    fn frame(fill: u8) -> Vec<u8> {
        vec![fill; 4000]
    }

    #[test]
    fn init_sequence() {
        let (mut epd, bus) = driver();
        epd.init().unwrap();

        let commands = bus.commands();
        assert_eq!(commands[0], Cmd::SW_RESET);
        assert_eq!(
            bus.data_after(Cmd::DRIVER_CONTROL),
            vec![0xF9, 0x00, 0x00]
        );
        assert_eq!(bus.data_after(Cmd::DATA_ENTRY_MODE), vec![0x03]);
        assert_eq!(bus.data_after(Cmd::SET_RAMX_START_END), vec![0x00, 0x0F]);
        assert_eq!(
            bus.data_after(Cmd::SET_RAMY_START_END),
            vec![0x00, 0x00, 0xF9, 0x00]
        );
        assert_eq!(bus.data_after(Cmd::DISPLAY_UPDATE_CTRL1), vec![0x00, 0x80]);
        assert_eq!(bus.data_after(Cmd::WRITE_LUT_REGISTER).len(), 153);
        assert_eq!(bus.data_after(Cmd::WRITE_VCOM_REGISTER), vec![0x36]);
        assert!(bus.events.borrow().contains(&Event::Reset(false)));
    }

    #[test]
    fn base_frame_goes_to_both_rams() {
        let (mut epd, bus) = driver();
        epd.init().unwrap();
        bus.clear();

        epd.display_partial_base(&frame(0xA5)).unwrap();

        assert_eq!(bus.data_after(Cmd::WRITE_BW_DATA), frame(0xA5));
        assert_eq!(bus.data_after(Cmd::WRITE_RED_DATA), frame(0xA5));
        assert_eq!(
            bus.data_after(Cmd::DISPLAY_UPDATE_CTRL2),
            vec![Flag::DISPLAY_UPDATE_FULL]
        );
        assert_eq!(bus.commands().last(), Some(&Cmd::MASTER_ACTIVATE));
    }

    #[test]
    fn partial_loads_partial_waveform() {
        let (mut epd, bus) = driver();
        epd.init().unwrap();
        epd.display_partial_base(&frame(0xFF)).unwrap();
        bus.clear();

        epd.display_partial(&frame(0x0F)).unwrap();

        assert_eq!(
            bus.data_after(Cmd::WRITE_LUT_REGISTER),
            LUT_PARTIAL_UPDATE[..153].to_vec()
        );
        assert_eq!(
            bus.data_after(Cmd::WRITE_OTP_SELECTION),
            Flag::OTP_SELECTION_PARTIAL.to_vec()
        );
        assert_eq!(bus.data_after(Cmd::WRITE_BW_DATA), frame(0x0F));
        assert_eq!(
            bus.data_after(Cmd::DISPLAY_UPDATE_CTRL2),
            vec![Flag::DISPLAY_UPDATE_PARTIAL]
        );
        assert!(!bus.commands().contains(&Cmd::WRITE_RED_DATA));
    }

    #[test]
    fn full_refresh_after_partial_reloads_full_waveform() {
        let (mut epd, bus) = driver();
        epd.init().unwrap();
        epd.display_partial(&frame(0xFF)).unwrap();
        bus.clear();

        epd.display_full(&frame(0x00)).unwrap();

        assert_eq!(
            bus.data_after(Cmd::WRITE_LUT_REGISTER),
            LUT_FULL_UPDATE[..153].to_vec()
        );
    }

    #[test]
    fn clear_fills_whole_ram() {
        let (mut epd, bus) = driver();
        epd.init().unwrap();
        bus.clear();

        epd.clear(Flag::FILL_WHITE).unwrap();

        let data = bus.data_after(Cmd::WRITE_BW_DATA);
        assert_eq!(data.len(), 4000);
        assert!(data.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn wrong_buffer_length_is_rejected() {
        let (mut epd, bus) = driver();
        epd.init().unwrap();
        bus.clear();

        assert!(matches!(
            epd.display_partial(&[0xFF; 10]),
            Err(Error::Interface(DisplayError::InvalidFormatError))
        ));
        assert!(bus.commands().is_empty());
    }

    #[test]
    fn sleep_then_write_reinitializes() {
        let (mut epd, bus) = driver();
        epd.init().unwrap();
        epd.sleep().unwrap();
        assert_eq!(bus.data_after(Cmd::DEEP_SLEEP_MODE), vec![0x01]);
        assert!(epd.is_asleep());
        bus.clear();

        epd.display_partial_base(&frame(0xFF)).unwrap();

        assert!(!epd.is_asleep());
        assert_eq!(bus.commands()[0], Cmd::SW_RESET);
    }

    #[test]
    fn busy_timeout_is_an_error() {
        let bus = Rc::new(Bus::default());
        bus.busy_polls_left.set(u32::MAX);
        let interface = DisplayInterface::new(
            FakeSpi(bus.clone()),
            FakeBusy(bus.clone()),
            FakeDc(bus.clone()),
            FakeRst(bus.clone()),
            NoDelay,
        )
        .with_busy_timeout(5);
        let mut epd = Ssd1680::from_interface(interface);

        assert!(matches!(
            epd.init(),
            Err(Error::BusyTimeout { timeout_ms: 5 })
        ));
    }

    #[test]
    fn busy_wait_returns_once_pin_drops() {
        let (mut epd, bus) = driver();
        bus.busy_polls_left.set(3);
        epd.init().unwrap();
        assert_eq!(bus.busy_polls_left.get(), 0);
    }
}
