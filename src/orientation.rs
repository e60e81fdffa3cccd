//! Mapping caller rasters onto the panel's native layout
//!
//! The panel is wired portrait: `native_width` source lines by
//! `native_height` gate lines. Callers may compose either in that layout or
//! in the perpendicular one; the latter is rotated 90° clockwise so that the
//! logical pixel `(x, y)` lands on native `(native_width - 1 - y, x)`.
//!
//! A raster matching neither layout is a rendering bug. It is logged and
//! replaced by a blank native frame so the panel shows nothing rather than
//! the control loop dying.

use serde::Deserialize;

use crate::pixel_buffer::PixelBuffer;

/// How the application composes its content relative to the panel wiring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Same layout as the panel RAM
    #[default]
    Portrait,
    /// Rotated a quarter turn against the panel RAM
    Landscape,
}

/// Fixed panel size plus the logical orientation chosen for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    native_width: u32,
    native_height: u32,
    orientation: Orientation,
}

impl PanelGeometry {
    /// Geometry for a panel of `native_width x native_height` pixels
    pub const fn new(native_width: u32, native_height: u32, orientation: Orientation) -> Self {
        Self {
            native_width,
            native_height,
            orientation,
        }
    }

    /// Source lines (pixels per RAM row)
    pub fn native_width(&self) -> u32 {
        self.native_width
    }

    /// Gate lines (RAM rows)
    pub fn native_height(&self) -> u32 {
        self.native_height
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Size callers should draw at
    pub fn logical_size(&self) -> (u32, u32) {
        match self.orientation {
            Orientation::Portrait => (self.native_width, self.native_height),
            Orientation::Landscape => (self.native_height, self.native_width),
        }
    }

    /// Blank raster in logical dimensions, ready for drawing
    pub fn new_image(&self) -> PixelBuffer {
        let (width, height) = self.logical_size();
        PixelBuffer::new(width, height)
    }

    /// Bring `image` into native layout, see the module docs for the rules
    pub fn normalize(&self, image: PixelBuffer) -> PixelBuffer {
        let native = (self.native_width, self.native_height);
        let transposed = (self.native_height, self.native_width);

        match image.dimensions() {
            dims if dims == native => image,
            dims if dims == transposed => rotate_clockwise(&image),
            (width, height) => {
                let (logical_width, logical_height) = self.logical_size();
                log::warn!(
                    "Image has wrong dimensions: expected {}x{} or {}x{}, got {}x{}",
                    logical_width,
                    logical_height,
                    logical_height,
                    logical_width,
                    width,
                    height
                );
                PixelBuffer::new(self.native_width, self.native_height)
            }
        }
    }
}

/// Quarter turn clockwise, output is `height x width`
fn rotate_clockwise(image: &PixelBuffer) -> PixelBuffer {
    let (width, height) = image.dimensions();
    let mut rotated = PixelBuffer::new(height, width);
    for y in 0..height {
        for x in 0..width {
            if image.get(x, y) {
                rotated.set(height - 1 - y, x, true);
            }
        }
    }
    rotated
}
