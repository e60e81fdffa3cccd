//! Full / partial refresh state machine
//!
//! Partial refresh only works against a reference frame the controller has
//! latched in its own RAM. [`RefreshController`] is the single owner of the
//! panel handle and refuses a partial update until a base frame has been
//! committed since the last init or sleep.
//!
//! ```text
//! Uninitialized --init_full--> FullyInitialized --commit_base--> BaseEstablished
//!                                   ^      ^                          |  ^
//!                                   |      +--------- sleep ----------+  |
//!                                   +------------ init_full -------------+ commit_base
//! ```

use core::fmt;

use crate::orientation::{Orientation, PanelGeometry};
use crate::packer;
use crate::panel::PanelController;
use crate::pixel_buffer::PixelBuffer;

/// Where the controller is in its init / base-frame lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// Panel not initialized yet
    Uninitialized,
    /// Initialized (or woken after sleep), no base frame latched
    FullyInitialized,
    /// A base frame is latched, partial updates are allowed
    BaseEstablished,
}

impl RefreshState {
    pub fn base_established(self) -> bool {
        self == RefreshState::BaseEstablished
    }
}

impl fmt::Display for RefreshState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshState::Uninitialized => write!(f, "uninitialized"),
            RefreshState::FullyInitialized => write!(f, "fully initialized"),
            RefreshState::BaseEstablished => write!(f, "base established"),
        }
    }
}

/// Errors of the refresh pipeline
#[derive(Debug, thiserror::Error)]
pub enum RefreshError<E: fmt::Debug> {
    /// Operation issued out of order, e.g. partial update without a base
    #[error("{operation} is not allowed while the panel is {state}")]
    IllegalState {
        operation: &'static str,
        state: RefreshState,
    },
    /// The panel controller failed
    #[error("panel controller error: {0:?}")]
    Panel(E),
}

/// Drives a [`PanelController`] through normalize, pack and refresh
pub struct RefreshController<P> {
    panel: P,
    geometry: PanelGeometry,
    state: RefreshState,
}

impl<P> RefreshController<P>
where
    P: PanelController,
{
    /// Take ownership of `panel`; `orientation` decides the logical drawing size
    pub fn new(panel: P, orientation: Orientation) -> Self {
        let geometry = PanelGeometry::new(panel.native_width(), panel.native_height(), orientation);
        Self {
            panel,
            geometry,
            state: RefreshState::Uninitialized,
        }
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// The owned panel handle
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Blank raster in the logical size callers should draw at
    pub fn new_image(&self) -> PixelBuffer {
        self.geometry.new_image()
    }

    /// Init the hardware with the full waveform. Any latched base is dropped.
    pub fn init_full(&mut self) -> Result<(), RefreshError<P::Error>> {
        log::info!("Initializing panel for full refresh");
        self.panel.init().map_err(RefreshError::Panel)?;
        self.state = RefreshState::FullyInitialized;
        Ok(())
    }

    /// Full refresh without touching the partial base
    pub fn display_full(&mut self, image: PixelBuffer) -> Result<(), RefreshError<P::Error>> {
        self.require_initialized("display_full")?;
        let buffer = self.prepare(image);
        self.panel.display_full(&buffer).map_err(RefreshError::Panel)
    }

    /// Full refresh that latches `image` as the reference for partial updates
    pub fn commit_base(&mut self, image: PixelBuffer) -> Result<(), RefreshError<P::Error>> {
        self.require_initialized("commit_base")?;
        let buffer = self.prepare(image);
        self.panel
            .display_partial_base(&buffer)
            .map_err(RefreshError::Panel)?;
        self.state = RefreshState::BaseEstablished;
        log::debug!("Base frame committed");
        Ok(())
    }

    /// Partial refresh against the committed base
    pub fn display_partial(&mut self, image: PixelBuffer) -> Result<(), RefreshError<P::Error>> {
        if !self.state.base_established() {
            log::error!("Partial update requested while panel is {}", self.state);
            return Err(RefreshError::IllegalState {
                operation: "display_partial",
                state: self.state,
            });
        }
        let buffer = self.prepare(image);
        self.panel
            .display_partial(&buffer)
            .map_err(RefreshError::Panel)
    }

    /// Fill the panel with `fill`; the refresh state is left as it is
    pub fn clear(&mut self, fill: u8) -> Result<(), RefreshError<P::Error>> {
        self.panel.clear(fill).map_err(RefreshError::Panel)
    }

    /// Deep sleep. The next partial update needs a fresh [`Self::commit_base`].
    pub fn sleep(&mut self) -> Result<(), RefreshError<P::Error>> {
        self.panel.sleep().map_err(RefreshError::Panel)?;
        if self.state == RefreshState::BaseEstablished {
            self.state = RefreshState::FullyInitialized;
        }
        Ok(())
    }

    fn require_initialized(&self, operation: &'static str) -> Result<(), RefreshError<P::Error>> {
        if self.state == RefreshState::Uninitialized {
            log::error!("{} requested before panel init", operation);
            return Err(RefreshError::IllegalState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn prepare(&self, image: PixelBuffer) -> Vec<u8> {
        let native = self.geometry.normalize(image);
        packer::pack(
            &native,
            (self.geometry.native_width(), self.geometry.native_height()),
        )
    }
}
