//! Capability the refresh pipeline needs from a panel controller
//!
//! Buffers handed to the display operations are in the packed wire format
//! produced by [`crate::packer::pack`] for `native_width x native_height`.

/// A bi-level e-paper controller with full and partial refresh
pub trait PanelController {
    /// Error reported by the hardware
    type Error: core::fmt::Debug;

    /// Hardware init with the full refresh waveform
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Fill the whole panel with `fill` and refresh (0xFF = white)
    fn clear(&mut self, fill: u8) -> Result<(), Self::Error>;

    /// Show `buffer` with a full refresh
    fn display_full(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;

    /// Show `buffer` with a full refresh and latch it as the partial base
    fn display_partial_base(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;

    /// Show `buffer` with a partial refresh against the latched base
    fn display_partial(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;

    /// Enter deep sleep
    fn sleep(&mut self) -> Result<(), Self::Error>;

    /// Source lines
    fn native_width(&self) -> u32;

    /// Gate lines
    fn native_height(&self) -> u32;
}

impl<P: PanelController + ?Sized> PanelController for &mut P {
    type Error = P::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        P::init(self)
    }

    fn clear(&mut self, fill: u8) -> Result<(), Self::Error> {
        P::clear(self, fill)
    }

    fn display_full(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        P::display_full(self, buffer)
    }

    fn display_partial_base(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        P::display_partial_base(self, buffer)
    }

    fn display_partial(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        P::display_partial(self, buffer)
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        P::sleep(self)
    }

    fn native_width(&self) -> u32 {
        P::native_width(self)
    }

    fn native_height(&self) -> u32 {
        P::native_height(self)
    }
}
