/// SSD1680 command bytes used by the 2.13" V3 panel
pub struct Cmd;
impl Cmd {
    // Init
    pub const SW_RESET: u8 = 0x12;
    pub const DRIVER_CONTROL: u8 = 0x01;
    pub const GATE_VOLTAGE_CONTROL: u8 = 0x03;
    pub const SOURCE_VOLTAGE_CONTROL: u8 = 0x04;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const TEMP_CONTROL: u8 = 0x18;
    pub const BORDER_WAVEFORM_CONTROL: u8 = 0x3C;
    pub const DISPLAY_UPDATE_CTRL1: u8 = 0x21;
    pub const SET_RAMX_START_END: u8 = 0x44;
    pub const SET_RAMY_START_END: u8 = 0x45;
    pub const DEEP_SLEEP_MODE: u8 = 0x10;

    // Waveform
    pub const WRITE_VCOM_REGISTER: u8 = 0x2C;
    pub const WRITE_LUT_REGISTER: u8 = 0x32;
    pub const WRITE_OTP_SELECTION: u8 = 0x37;
    pub const END_OPTION: u8 = 0x3F;

    // Update
    pub const SET_RAMX_COUNTER: u8 = 0x4E;
    pub const SET_RAMY_COUNTER: u8 = 0x4F;
    pub const WRITE_BW_DATA: u8 = 0x24;
    pub const WRITE_RED_DATA: u8 = 0x26;
    pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;
    pub const MASTER_ACTIVATE: u8 = 0x20;
}

/*
Waveshare epd2in13_V3 reference sequence uses:
0x12 - Software Reset
0x01 - Driver Output Control
0x11 - Data Entry Mode
0x44 / 0x45 - RAM X / Y window
0x4E / 0x4F - RAM X / Y counter
0x3C - Border Waveform Control
0x21 - Display Update Control 1
0x18 - Temperature Sensor Control
0x32 - LUT, then 0x3F, 0x03, 0x04, 0x2C from the LUT tail
0x37 - OTP selection (ping-pong for partial)
0x24 / 0x26 - Write RAM (new / base)
0x22 + 0x20 - Update sequence + Master Activation
0x10 - Deep Sleep
*/
