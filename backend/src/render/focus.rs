use image::{RgbImage, Rgba};

use super::color::{BLACK, DEEP_PINK, GOLD, LIME};
use super::font::{FontWeight, ResolvedFont};
use super::gradient::fill_vertical_gradient;
use super::text::{GlyphLine, TextMask};
use super::watermark::Watermark;
use super::RenderContext;
use crate::models::ThumbnailRequest;

pub const CANVAS_SIZE: u32 = 1080;
pub const MAX_LINES: usize = 4;
pub const LINE_SPACING: i32 = 30;

const LINE_COLORS: [Rgba<u8>; MAX_LINES] = [GOLD, LIME, DEEP_PINK, DEEP_PINK];

/// Font size for a given number of lines; the block stays near 85% of the
/// canvas height.
pub fn font_size_for_lines(lines: usize) -> u32 {
    match lines {
        1 => 320,
        2 => 260,
        3 => 210,
        _ => 170,
    }
}

#[derive(Debug, Clone)]
pub struct FocusLayout {
    pub font_size: u32,
    pub lines: Vec<GlyphLine>,
    /// y of the first line's pen origin
    pub top: i32,
    pub block_height: i32,
}

/// Square thumbnail with each keyword word on its own colored, outlined line.
pub struct FocusKeywordRenderer<'a> {
    ctx: &'a RenderContext,
}

impl<'a> FocusKeywordRenderer<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self { ctx }
    }

    pub fn layout(&self, request: &ThumbnailRequest) -> (FocusLayout, ResolvedFont) {
        let words: Vec<&str> = request
            .text_primary
            .split_whitespace()
            .take(MAX_LINES)
            .collect();
        let font_size = font_size_for_lines(words.len());
        let font = self.ctx.fonts.resolve(FontWeight::Bold, font_size);

        let lines: Vec<GlyphLine> = words
            .iter()
            .map(|word| GlyphLine::measure(word, &font))
            .collect();
        let gaps = lines.len().saturating_sub(1) as i32;
        let block_height = lines.iter().map(|l| l.height).sum::<i32>() + LINE_SPACING * gaps;
        let top = (CANVAS_SIZE as i32 - block_height).div_euclid(2);

        (
            FocusLayout {
                font_size,
                lines,
                top,
                block_height,
            },
            font,
        )
    }

    pub fn render(&self, request: &ThumbnailRequest) -> RgbImage {
        let mut canvas = RgbImage::new(CANVAS_SIZE, CANVAS_SIZE);
        fill_vertical_gradient(&mut canvas, request.color_start, request.color_end);

        let (layout, font) = self.layout(request);
        let mut y = layout.top;
        for (i, line) in layout.lines.iter().enumerate() {
            let x = (CANVAS_SIZE as i32 - line.width).div_euclid(2);
            let fill = LINE_COLORS.get(i).copied().unwrap_or(DEEP_PINK);
            TextMask::rasterize(&line.text, &font).stamp_outlined(&mut canvas, x, y, fill, BLACK);
            y += line.height + LINE_SPACING;
        }

        Watermark::square(&self.ctx.watermark).draw_resolved(&mut canvas, &self.ctx.fonts);
        canvas
    }
}
