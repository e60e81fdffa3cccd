//! Error type for the SSD1680 driver

pub use display_interface::DisplayError;

/// Errors that can occur when talking to the panel
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// SPI or GPIO failure, or a buffer of the wrong size
    #[error("display interface error: {0:?}")]
    Interface(DisplayError),
    /// BUSY stayed high longer than the configured timeout
    #[error("panel stayed busy for more than {timeout_ms} ms")]
    BusyTimeout {
        /// How long we waited
        timeout_ms: u32,
    },
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Interface(e)
    }
}
