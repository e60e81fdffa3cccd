//! SSD1680 ePaper Display Driver
//!
//! Used in the Waveshare 2.13" V3 e-Paper HAT (122x250, black/white), see
//! <https://www.waveshare.com/wiki/2.13inch_e-Paper_HAT_Manual>.
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but built for a
//! status panel that mostly does partial refreshes.
//!
//! ### Usage
//! The driver takes fully packed frames (see [`crate::packer`]). To keep a
//! panel updating without flashing you:
//!
//! 1. run [`driver::Ssd1680::init`]
//! 1. send a base frame with [`driver::Ssd1680::display_partial_base`]
//! 1. send every following frame with [`driver::Ssd1680::display_partial`]
//!
//! Most callers go through [`crate::refresh::RefreshController`] which
//! enforces that order.
#![allow(clippy::cast_possible_truncation)]

pub mod cmd;
pub mod driver;
pub mod error;
pub mod flag;
pub mod interface;
pub mod pins;

pub use driver::Ssd1680;
pub use error::Error;

/// Display height, pixels vertically (gate lines)
pub const HEIGHT: u16 = 250;

/// Display width, pixels horizontally (source lines)
pub const WIDTH: u16 = 122;
