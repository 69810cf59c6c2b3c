use image::{RgbImage, Rgba};

use super::color::{opaque, WHITE};
use super::font::{FontWeight, ResolvedFont};
use super::gradient::fill_vertical_gradient;
use super::shapes::{fill_rounded_rect, stroke_rounded_rect, RoundedRect};
use super::text::{draw_text, measure, wrap, GlyphLine, TextMask};
use super::watermark::Watermark;
use super::RenderContext;
use crate::models::ThumbnailRequest;

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 630;

pub const TITLE_FONT_SIZE: u32 = 70;
pub const KEYWORD_FONT_SIZE: u32 = 36;
pub const TITLE_MAX_WIDTH: i32 = 1000;
pub const MAX_TITLE_LINES: usize = 3;
pub const TITLE_TOP: i32 = 180;
pub const LINE_SPACING: i32 = 20;

const SHADOW_OFFSET: i32 = 4;
const SHADOW_PAINT: Rgba<u8> = Rgba([0, 0, 0, 128]);

const BADGE_PAD_X: i32 = 20;
const BADGE_PAD_Y: i32 = 12;
const BADGE_STROKE: i32 = 2;
/// Badge top edge, measured up from the bottom of the canvas.
const BADGE_BOTTOM_OFFSET: i32 = 100;

/// Geometry of the keyword badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeLayout {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub radius: i32,
}

impl BadgeLayout {
    pub fn measure(text: &str, font: &ResolvedFont, canvas_width: u32, canvas_height: u32) -> Self {
        let bounds = measure(text, font);
        let width = bounds.width() + 2 * BADGE_PAD_X;
        let height = bounds.height() + 2 * BADGE_PAD_Y;
        Self {
            text: text.to_string(),
            x: (canvas_width as i32 - width).div_euclid(2),
            y: canvas_height as i32 - BADGE_BOTTOM_OFFSET,
            width,
            height,
            radius: height / 2,
        }
    }

    pub fn rect(&self) -> RoundedRect {
        RoundedRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            radius: self.radius,
        }
    }

    pub fn draw(&self, canvas: &mut RgbImage, font: &ResolvedFont, fill: Rgba<u8>) {
        let rect = self.rect();
        fill_rounded_rect(canvas, &rect, fill);
        stroke_rounded_rect(canvas, &rect, BADGE_STROKE, WHITE);
        draw_text(
            canvas,
            self.x + BADGE_PAD_X,
            self.y + BADGE_PAD_Y,
            &self.text,
            font,
            WHITE,
        );
    }
}

#[derive(Debug, Clone)]
pub struct CardLayout {
    pub lines: Vec<GlyphLine>,
    pub badge: Option<BadgeLayout>,
}

/// 1200x630 social card: wrapped, drop-shadowed title and an optional
/// keyword badge.
pub struct TitleCardRenderer<'a> {
    ctx: &'a RenderContext,
}

impl<'a> TitleCardRenderer<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self { ctx }
    }

    fn fonts(&self) -> (ResolvedFont, ResolvedFont) {
        (
            self.ctx.fonts.resolve(FontWeight::Bold, TITLE_FONT_SIZE),
            self.ctx.fonts.resolve(FontWeight::Regular, KEYWORD_FONT_SIZE),
        )
    }

    pub fn layout_with(
        request: &ThumbnailRequest,
        title_font: &ResolvedFont,
        keyword_font: &ResolvedFont,
    ) -> CardLayout {
        let lines = wrap(&request.text_primary, title_font, TITLE_MAX_WIDTH)
            .into_iter()
            .take(MAX_TITLE_LINES)
            .map(|line| GlyphLine::measure(&line, title_font))
            .collect();

        let badge = request
            .text_secondary
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| BadgeLayout::measure(k, keyword_font, CANVAS_WIDTH, CANVAS_HEIGHT));

        CardLayout { lines, badge }
    }

    pub fn layout(&self, request: &ThumbnailRequest) -> CardLayout {
        let (title_font, keyword_font) = self.fonts();
        Self::layout_with(request, &title_font, &keyword_font)
    }

    pub fn render(&self, request: &ThumbnailRequest) -> RgbImage {
        let mut canvas = RgbImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        fill_vertical_gradient(&mut canvas, request.color_start, request.color_end);

        let (title_font, keyword_font) = self.fonts();
        let layout = Self::layout_with(request, &title_font, &keyword_font);

        let mut y = TITLE_TOP;
        for line in &layout.lines {
            let x = (CANVAS_WIDTH as i32 - line.width).div_euclid(2);
            let mask = TextMask::rasterize(&line.text, &title_font);
            mask.stamp(&mut canvas, x + SHADOW_OFFSET, y + SHADOW_OFFSET, SHADOW_PAINT);
            mask.stamp(&mut canvas, x, y, WHITE);
            y += line.height + LINE_SPACING;
        }

        if let Some(badge) = &layout.badge {
            badge.draw(&mut canvas, &keyword_font, opaque(request.color_end));
        }

        Watermark::card(&self.ctx.watermark).draw(&mut canvas, &keyword_font);
        canvas
    }
}
