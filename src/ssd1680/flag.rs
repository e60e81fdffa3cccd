/// Various flags and constants used in the SSD1680 e-paper display driver.
///
/// Values follow the Waveshare 2.13" V3 reference sequence.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Driver Output Control (0x01): MUX = 0xF9 + 1 = 250 gate lines
    pub const DRIVER_OUTPUT_MUX_LOW: u8 = 0xF9;
    pub const DRIVER_OUTPUT_MUX_HIGH: u8 = 0x00;
    pub const DRIVER_OUTPUT_GATE_SCAN_FROM_G0: u8 = 0x00;

    // Data Entry Mode (0x11) flags
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Deep Sleep Mode (0x10) flags
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01; // Enter deep sleep mode

    // Temperature Sensor Control (0x18) flags
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Display Update Control 1 (0x21): normal RAM use, source S8..S167
    pub const DISPLAY_UPDATE_CTRL1_NORMAL: [u8; 2] = [0x00, 0x80];

    // Display Update Control 2 (0x22) sequences
    pub const DISPLAY_UPDATE_FULL: u8 = 0xC7; // Clock, analog, mode 1 display, off
    pub const DISPLAY_UPDATE_PARTIAL: u8 = 0x0F; // Mode 2 display from loaded LUT
    pub const DISPLAY_UPDATE_POWER_ON: u8 = 0xC0; // Clock + analog on only

    // Border Waveform Control (0x3C) flags
    pub const BORDER_WAVEFORM_FULL: u8 = 0x05;
    pub const BORDER_WAVEFORM_PARTIAL: u8 = 0x80;

    // OTP selection (0x37) for partial refresh: ping-pong enabled
    pub const OTP_SELECTION_PARTIAL: [u8; 10] =
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00];

    // Fill patterns for the BW RAM
    pub const FILL_WHITE: u8 = 0xFF;
}
