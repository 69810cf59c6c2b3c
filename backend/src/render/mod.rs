//! Thumbnail rendering: gradient background, laid-out text, decorations, PNG.

pub mod builtin;
pub mod card;
pub mod color;
pub mod focus;
pub mod font;
pub mod gradient;
pub mod shapes;
pub mod text;
pub mod watermark;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage, Rgba};
use tracing::debug;

use crate::error::RenderError;
use crate::models::ThumbnailRequest;

pub use card::TitleCardRenderer;
pub use focus::FocusKeywordRenderer;
pub use font::{FontResolver, FontWeight, ResolvedFont};

pub const DEFAULT_WATERMARK: &str = "ekunblog.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// 1:1 square, one keyword word per line
    FocusKeyword,
    /// 1200x630 social card with wrapped title and keyword badge
    TitleCard,
}

impl Variant {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Variant::FocusKeyword => (focus::CANVAS_SIZE, focus::CANVAS_SIZE),
            Variant::TitleCard => (card::CANVAS_WIDTH, card::CANVAS_HEIGHT),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::FocusKeyword => "focus",
            Variant::TitleCard => "card",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "focus" | "keyword" | "square" => Some(Variant::FocusKeyword),
            "card" | "title" => Some(Variant::TitleCard),
            _ => None,
        }
    }
}

/// Everything a render needs besides the request itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub fonts: FontResolver,
    pub watermark: String,
}

impl RenderContext {
    pub fn new(fonts: FontResolver, watermark: impl Into<String>) -> Self {
        Self {
            fonts,
            watermark: watermark.into(),
        }
    }
}

/// Encoded PNG output of one render.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RenderedImage {
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

pub fn render(
    variant: Variant,
    request: &ThumbnailRequest,
    ctx: &RenderContext,
) -> Result<RenderedImage, RenderError> {
    let canvas = match variant {
        Variant::FocusKeyword => FocusKeywordRenderer::new(ctx).render(request),
        Variant::TitleCard => TitleCardRenderer::new(ctx).render(request),
    };

    let image = encode_png(canvas)?;
    debug!(
        variant = variant.name(),
        width = image.width,
        height = image.height,
        bytes = image.bytes.len(),
        "thumbnail encoded"
    );
    Ok(image)
}

pub fn encode_png(canvas: RgbImage) -> Result<RenderedImage, RenderError> {
    let (width, height) = canvas.dimensions();
    let mut bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageRgb8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(RenderedImage {
        bytes,
        width,
        height,
    })
}

/// Source-over blend of `paint` scaled by `coverage` onto one pixel.
/// Writes outside the canvas are ignored.
pub fn blend_pixel(canvas: &mut RgbImage, x: i32, y: i32, paint: Rgba<u8>, coverage: u8) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let alpha = coverage as u32 * paint[3] as u32 / 255;
    if alpha == 0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let inv = 255 - alpha;
    for i in 0..3 {
        dst.0[i] = ((paint[i] as u32 * alpha + dst.0[i] as u32 * inv + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb};

    fn ctx() -> RenderContext {
        RenderContext::new(FontResolver::builtin_only(), DEFAULT_WATERMARK)
    }

    fn request(primary: &str, secondary: Option<&str>) -> ThumbnailRequest {
        ThumbnailRequest {
            text_primary: primary.to_string(),
            text_secondary: secondary.map(str::to_string),
            color_start: Rgb([0x66, 0x7e, 0xea]),
            color_end: Rgb([0x76, 0x4b, 0xa2]),
        }
    }

    #[test]
    fn focus_png_decodes_to_square() {
        let out = render(Variant::FocusKeyword, &request("rust image", None), &ctx()).unwrap();
        assert_eq!((out.width, out.height), (1080, 1080));
        let decoded = image::load_from_memory(&out.into_bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (1080, 1080));
    }

    #[test]
    fn card_png_decodes_to_social_card() {
        let out = render(
            Variant::TitleCard,
            &request("A title that is long enough to wrap", Some("seo")),
            &ctx(),
        )
        .unwrap();
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1200, 630));
        assert_eq!(Variant::TitleCard.dimensions(), (1200, 630));
    }

    #[test]
    fn left_column_is_untouched_gradient() {
        let req = request("alpha beta", None);
        let canvas = FocusKeywordRenderer::new(&ctx()).render(&req);
        for y in [0, 300, 540, 1079] {
            assert_eq!(
                *canvas.get_pixel(0, y),
                gradient::scanline_color(req.color_start, req.color_end, y, 1080)
            );
        }
    }

    #[test]
    fn blend_respects_alpha_and_bounds() {
        let mut canvas = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        blend_pixel(&mut canvas, 0, 0, Rgba([255, 255, 255, 255]), 255);
        blend_pixel(&mut canvas, 1, 0, Rgba([255, 255, 255, 180]), 255);
        blend_pixel(&mut canvas, 5, -1, Rgba([255, 255, 255, 255]), 255);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgb([180, 180, 180]));
        assert_eq!(*canvas.get_pixel(0, 1), Rgb([0, 0, 0]));
    }

    #[test]
    fn variant_names_round_trip() {
        for v in [Variant::FocusKeyword, Variant::TitleCard] {
            assert_eq!(Variant::from_name(v.name()), Some(v));
        }
        assert_eq!(Variant::from_name("banner"), None);
    }
}
