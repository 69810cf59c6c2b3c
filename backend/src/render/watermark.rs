use image::{RgbImage, Rgba};

use super::font::{FontResolver, FontWeight, ResolvedFont};
use super::text::{measure, TextMask};

pub const WATERMARK_PAINT: Rgba<u8> = Rgba([255, 255, 255, 180]);

/// Branding label anchored to the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark<'a> {
    pub text: &'a str,
    /// distance from the right edge to the end of the ink
    pub margin_right: i32,
    /// distance from the bottom edge to the pen origin
    pub margin_bottom: i32,
}

impl<'a> Watermark<'a> {
    pub const SQUARE_FONT_SIZE: u32 = 24;

    pub fn square(text: &'a str) -> Self {
        Self {
            text,
            margin_right: 20,
            margin_bottom: 40,
        }
    }

    pub fn card(text: &'a str) -> Self {
        Self {
            text,
            margin_right: 30,
            margin_bottom: 50,
        }
    }

    /// Pen origin for the label on a canvas of the given size.
    pub fn position(&self, font: &ResolvedFont, width: u32, height: u32) -> (i32, i32) {
        let text_width = measure(self.text, font).width();
        (
            width as i32 - text_width - self.margin_right,
            height as i32 - self.margin_bottom,
        )
    }

    pub fn draw(&self, canvas: &mut RgbImage, font: &ResolvedFont) {
        if self.text.trim().is_empty() {
            return;
        }
        let (x, y) = self.position(font, canvas.width(), canvas.height());
        TextMask::rasterize(self.text, font).stamp(canvas, x, y, WATERMARK_PAINT);
    }

    /// Resolve the small regular face and draw with it.
    pub fn draw_resolved(&self, canvas: &mut RgbImage, fonts: &FontResolver) {
        let font = fonts.resolve(FontWeight::Regular, Self::SQUARE_FONT_SIZE);
        self.draw(canvas, &font);
    }
}
