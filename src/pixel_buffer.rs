//! Bi-level raster the status panel is drawn into
//!
//! A [`PixelBuffer`] is created blank (all background) for every render
//! cycle, drawn on with `embedded-graphics`, then moved into the refresh
//! pipeline which normalizes and packs it. `BinaryColor::On` is ink (black),
//! `BinaryColor::Off` is background (white).

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

/// Logical row-major raster of `width * height` pixels, `true` = ink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl PixelBuffer {
    /// Create an all-background buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; (width as usize) * (height as usize)],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the pixel at `(x, y)` is ink. Out of range reads as background.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.index(x, y).map_or(false, |i| self.pixels[i])
    }

    /// Set the pixel at `(x, y)`; out of range writes are ignored
    pub fn set(&mut self, x: u32, y: u32, ink: bool) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = ink;
        }
    }

    /// True when no pixel carries ink
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| !p)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set(point.x as u32, point.y as u32, color.is_on());
        }
        Ok(())
    }
}
