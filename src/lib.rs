//! E-paper status panel for a Raspberry Pi
//!
//! The display pipeline turns a bi-level raster drawn in either orientation
//! into the panel's packed 1bpp RAM layout and keeps track of whether a
//! partial refresh base has been latched:
//!
//! [`PixelBuffer`] -> [`PanelGeometry::normalize`] -> [`packer::pack`] ->
//! [`RefreshController`] -> [`PanelController`] ([`ssd1680::Ssd1680`] on hardware).
//!
//! Around it, [`sensors`] collects the readings, [`status`] draws them and
//! [`app`] runs the polling loop.

pub mod app;
pub mod config;
pub mod orientation;
pub mod packer;
pub mod panel;
pub mod pixel_buffer;
pub mod refresh;
pub mod sensors;
pub mod ssd1680;
pub mod status;

pub use app::{App, PanelSession};
pub use config::Config;
pub use orientation::{Orientation, PanelGeometry};
pub use panel::PanelController;
pub use pixel_buffer::PixelBuffer;
pub use refresh::{RefreshController, RefreshError, RefreshState};
pub use sensors::{ReadingSource, Readings};
pub use status::StatusRenderer;
