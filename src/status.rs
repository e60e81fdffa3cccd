//! Draws the six status lines onto a logical-size raster

use embedded_graphics::mono_font::{
    iso_8859_15 as fonts, MonoFont, MonoTextStyle, MonoTextStyleBuilder,
};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::orientation::PanelGeometry;
use crate::pixel_buffer::PixelBuffer;
use crate::sensors::Readings;

/// Left margin of every line
const MARGIN_X: i32 = 4;
/// Top of the first line
const MARGIN_Y: i32 = 2;
/// Gap between lines
const LINE_GAP: i32 = 4;

/// Font names accepted in the config
pub const FONT_NAMES: &[&str] = &[
    "5x8", "6x10", "6x13", "6x13-bold", "7x13", "7x13-bold", "8x13", "8x13-bold", "9x15",
    "9x15-bold", "9x18-bold", "10x20",
];

/// Look up one of [`FONT_NAMES`]
pub fn font_by_name(name: &str) -> Option<&'static MonoFont<'static>> {
    let font = match name {
        "5x8" => &fonts::FONT_5X8,
        "6x10" => &fonts::FONT_6X10,
        "6x13" => &fonts::FONT_6X13,
        "6x13-bold" => &fonts::FONT_6X13_BOLD,
        "7x13" => &fonts::FONT_7X13,
        "7x13-bold" => &fonts::FONT_7X13_BOLD,
        "8x13" => &fonts::FONT_8X13,
        "8x13-bold" => &fonts::FONT_8X13_BOLD,
        "9x15" => &fonts::FONT_9X15,
        "9x15-bold" => &fonts::FONT_9X15_BOLD,
        "9x18-bold" => &fonts::FONT_9X18_BOLD,
        "10x20" => &fonts::FONT_10X20,
        _ => return None,
    };
    Some(font)
}

pub struct StatusRenderer {
    style: MonoTextStyle<'static, BinaryColor>,
    line_height: i32,
}

impl StatusRenderer {
    pub fn new(font: &'static MonoFont<'static>) -> Self {
        let style = MonoTextStyleBuilder::new()
            .font(font)
            .text_color(BinaryColor::On)
            .build();
        StatusRenderer {
            style,
            line_height: font.character_size.height as i32 + LINE_GAP,
        }
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    /// A fresh logical-size image with `readings` drawn on it
    pub fn render(&self, readings: &Readings, geometry: &PanelGeometry) -> PixelBuffer {
        let mut image = geometry.new_image();
        let mut y = MARGIN_Y;

        for line in readings.lines() {
            let origin = Point::new(MARGIN_X, y);
            let drawn =
                Text::with_baseline(&line, origin, self.style, Baseline::Top).draw(&mut image);
            if let Err(never) = drawn {
                match never {}
            }
            y += self.line_height;
        }

        image
    }
}
