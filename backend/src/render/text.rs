//! Text measurement, greedy word-wrap and glyph rasterization.
//!
//! All boxes are relative to the pen origin: the top-left corner of the line's
//! ascender, which is where a string is "drawn at".

use ab_glyph::{point, Font as _, FontArc, Glyph, GlyphId, PxScale, ScaleFont as _};
use image::{GrayImage, Luma, RgbImage, Rgba};

use super::blend_pixel;
use super::font::ResolvedFont;

/// Stroke width of outlined text, in pixels.
pub const OUTLINE_WIDTH: i32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn union(&self, other: &TextBox) -> TextBox {
        TextBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A measured line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphLine {
    pub text: String,
    pub width: i32,
    pub height: i32,
    pub bounds: TextBox,
}

impl GlyphLine {
    pub fn measure(text: &str, font: &ResolvedFont) -> Self {
        let bounds = measure(text, font);
        Self {
            text: text.to_string(),
            width: bounds.width(),
            height: bounds.height(),
            bounds,
        }
    }
}

fn positioned_glyphs(face: &FontArc, scale: PxScale, text: &str) -> Vec<Glyph> {
    let scaled = face.as_scaled(scale);
    let baseline = scaled.ascent();
    let mut caret = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    let mut glyphs = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, baseline)));
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
    glyphs
}

/// Ink-extent box of `text`, not its advance width.
pub fn measure(text: &str, font: &ResolvedFont) -> TextBox {
    match font {
        ResolvedFont::Builtin(face) => face.measure(text),
        ResolvedFont::Outline { face, scale } => {
            let mut bounds: Option<TextBox> = None;
            for glyph in positioned_glyphs(face, *scale, text) {
                let Some(outlined) = face.outline_glyph(glyph) else {
                    continue;
                };
                let px = outlined.px_bounds();
                let glyph_box = TextBox {
                    left: px.min.x.floor() as i32,
                    top: px.min.y.floor() as i32,
                    right: px.max.x.ceil() as i32,
                    bottom: px.max.y.ceil() as i32,
                };
                bounds = Some(match bounds {
                    Some(b) => b.union(&glyph_box),
                    None => glyph_box,
                });
            }
            bounds.unwrap_or_default()
        }
    }
}

/// Greedy word-wrap. A word wider than `max_width` is never split; it gets a
/// line of its own.
pub fn wrap(text: &str, font: &ResolvedFont, max_width: i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate, font).width() > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Coverage mask of one rasterized line.
///
/// Rasterized once, stamped as many times as needed (outline, shadow, fill).
pub struct TextMask {
    bounds: TextBox,
    coverage: GrayImage,
}

impl TextMask {
    pub fn rasterize(text: &str, font: &ResolvedFont) -> Self {
        let bounds = measure(text, font);
        if bounds.is_empty() {
            return Self {
                bounds,
                coverage: GrayImage::new(0, 0),
            };
        }

        let mut coverage = GrayImage::new(bounds.width() as u32, bounds.height() as u32);
        let origin = (bounds.left, bounds.top);
        match font {
            ResolvedFont::Builtin(face) => face.rasterize(text, &mut coverage, origin),
            ResolvedFont::Outline { face, scale } => {
                for glyph in positioned_glyphs(face, *scale, text) {
                    let Some(outlined) = face.outline_glyph(glyph) else {
                        continue;
                    };
                    let px = outlined.px_bounds();
                    let gx0 = px.min.x.floor() as i32 - origin.0;
                    let gy0 = px.min.y.floor() as i32 - origin.1;
                    outlined.draw(|x, y, c| {
                        let mx = gx0 + x as i32;
                        let my = gy0 + y as i32;
                        if mx < 0
                            || my < 0
                            || mx >= coverage.width() as i32
                            || my >= coverage.height() as i32
                        {
                            return;
                        }
                        let value = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                        let cell = coverage.get_pixel_mut(mx as u32, my as u32);
                        // overlapping glyphs keep the stronger coverage
                        if value > cell[0] {
                            *cell = Luma([value]);
                        }
                    });
                }
            }
        }

        Self { bounds, coverage }
    }

    pub fn bounds(&self) -> TextBox {
        self.bounds
    }

    /// Composite the mask onto `canvas` with the pen origin at `(x, y)`.
    pub fn stamp(&self, canvas: &mut RgbImage, x: i32, y: i32, paint: Rgba<u8>) {
        let left = x + self.bounds.left;
        let top = y + self.bounds.top;
        for (mx, my, c) in self.coverage.enumerate_pixels() {
            if c[0] == 0 {
                continue;
            }
            blend_pixel(canvas, left + mx as i32, top + my as i32, paint, c[0]);
        }
    }

    /// Stamp `outline` at every offset within `OUTLINE_WIDTH`, then `fill` on top.
    pub fn stamp_outlined(
        &self,
        canvas: &mut RgbImage,
        x: i32,
        y: i32,
        fill: Rgba<u8>,
        outline: Rgba<u8>,
    ) {
        for (dx, dy) in outline_offsets() {
            self.stamp(canvas, x + dx, y + dy, outline);
        }
        self.stamp(canvas, x, y, fill);
    }
}

pub fn outline_offsets() -> impl Iterator<Item = (i32, i32)> {
    (-OUTLINE_WIDTH..=OUTLINE_WIDTH)
        .flat_map(|dx| (-OUTLINE_WIDTH..=OUTLINE_WIDTH).map(move |dy| (dx, dy)))
        .filter(|&(dx, dy)| dx != 0 || dy != 0)
}

pub fn draw_text(canvas: &mut RgbImage, x: i32, y: i32, text: &str, font: &ResolvedFont, paint: Rgba<u8>) {
    TextMask::rasterize(text, font).stamp(canvas, x, y, paint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn font(size: u32) -> ResolvedFont {
        ResolvedFont::builtin(size)
    }

    #[test]
    fn wrapped_lines_rejoin_to_normalized_input() {
        let f = font(20);
        let text = "  the quick   brown fox\tjumps over\nthe lazy dog  ";
        let lines = wrap(text, &f, 100);
        assert!(lines.len() > 1);
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(lines.join(" "), normalized);
    }

    #[test]
    fn multi_word_lines_fit_max_width() {
        let f = font(20);
        let text = "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhh iiiiiiiii";
        for max in [30, 60, 120, 250] {
            for line in wrap(text, &f, max) {
                if line.contains(' ') {
                    assert!(measure(&line, &f).width() <= max, "{line:?} exceeds {max}");
                }
            }
        }
    }

    #[test]
    fn overwide_word_sits_alone() {
        let f = font(10);
        let lines = wrap("hi supercalifragilistic yo", &f, 40);
        assert_eq!(lines, vec!["hi", "supercalifragilistic", "yo"]);
        assert!(measure("supercalifragilistic", &f).width() > 40);
    }

    #[test]
    fn empty_text_wraps_to_nothing() {
        assert!(wrap("", &font(10), 100).is_empty());
        assert!(wrap("   \n ", &font(10), 100).is_empty());
    }

    #[test]
    fn outline_offsets_cover_square_minus_center() {
        let offsets: Vec<_> = outline_offsets().collect();
        assert_eq!(offsets.len(), 24);
        assert!(!offsets.contains(&(0, 0)));
        assert!(offsets.contains(&(-2, -2)));
        assert!(offsets.contains(&(2, 1)));
    }

    #[test]
    fn outlined_stamp_rings_fill_with_black() {
        let f = font(10);
        let mask = TextMask::rasterize("I", &f);
        let mut canvas = RgbImage::from_pixel(20, 20, Rgb([100, 100, 100]));
        mask.stamp_outlined(&mut canvas, 5, 5, Rgba([255, 0, 0, 255]), Rgba([0, 0, 0, 255]));

        // stem of 'I' at column 2 of the glyph, row 3
        assert_eq!(*canvas.get_pixel(7, 8), Rgb([255, 0, 0]));
        // one and two pixels left of the stem are outline
        assert_eq!(*canvas.get_pixel(6, 8), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(5, 8), Rgb([0, 0, 0]));
        // three pixels away is untouched background
        assert_eq!(*canvas.get_pixel(4, 8), Rgb([100, 100, 100]));
    }

    #[test]
    fn empty_mask_stamps_nothing() {
        let mask = TextMask::rasterize("", &font(10));
        assert!(mask.bounds().is_empty());
        let mut canvas = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        mask.stamp(&mut canvas, 0, 0, Rgba([255, 255, 255, 255]));
        assert!(canvas.pixels().all(|p| *p == Rgb([1, 2, 3])));
    }

    fn outline(size: u32) -> ResolvedFont {
        ResolvedFont::outline(crate::render::font::fixture::face(), size)
    }

    #[test]
    fn outline_ink_box_sits_below_pen_origin() {
        let f = outline(100);
        let h = measure("H", &f);
        assert!(!h.is_empty());
        // cap height of the fixture is about 0.73 em, ascender gap about 0.2 em
        assert!((70..=76).contains(&h.height()), "{h:?}");
        assert!(h.top > 10 && h.top < 30, "{h:?}");
        assert!(h.left >= 0);

        // monospaced advance of about 0.6 em between the two stems
        let hh = measure("HH", &f);
        assert!((58..=63).contains(&(hh.width() - h.width())), "{hh:?} vs {h:?}");
        assert_eq!(hh.top, h.top);
    }

    #[test]
    fn outline_mask_matches_ink_box() {
        let f = outline(48);
        let mask = TextMask::rasterize("Hg", &f);
        let bounds = mask.bounds();
        assert_eq!(bounds, measure("Hg", &f));
        assert_eq!(
            (mask.coverage.width() as i32, mask.coverage.height() as i32),
            (bounds.width(), bounds.height())
        );
        assert!(mask.coverage.pixels().any(|c| c[0] == 255));

        let mut canvas = RgbImage::new(200, 200);
        mask.stamp(&mut canvas, 10, 10, Rgba([255, 255, 255, 255]));
        let mut inked = 0;
        for (x, y, p) in canvas.enumerate_pixels() {
            if p[0] == 0 {
                continue;
            }
            inked += 1;
            let (x, y) = (x as i32 - 10, y as i32 - 10);
            assert!(x >= bounds.left && x < bounds.right, "x {x} outside {bounds:?}");
            assert!(y >= bounds.top && y < bounds.bottom, "y {y} outside {bounds:?}");
        }
        assert!(inked > 0);
    }

    #[test]
    fn outline_wrap_respects_max_width() {
        let f = outline(40);
        let text = "the quick brown fox jumps over the lazy dog while rust renders";
        let lines = wrap(text, &f, 300);
        assert!(lines.len() > 2);
        assert_eq!(lines.join(" "), text);
        for line in &lines {
            if line.contains(' ') {
                assert!(measure(line, &f).width() <= 300, "{line:?}");
            }
        }
    }
}
