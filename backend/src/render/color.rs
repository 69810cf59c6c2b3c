use image::{Rgb, Rgba};

use crate::error::RenderError;

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const GOLD: Rgba<u8> = Rgba([0xFF, 0xD7, 0x00, 255]);
pub const LIME: Rgba<u8> = Rgba([0x00, 0xFF, 0x00, 255]);
pub const DEEP_PINK: Rgba<u8> = Rgba([0xFF, 0x14, 0x93, 255]);

/// Parse `#rrggbb` (the `#` is optional) into an RGB color.
pub fn parse_hex_color(s: &str) -> Result<Rgb<u8>, RenderError> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RenderError::InvalidColor(s.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| RenderError::InvalidColor(s.to_string()))
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

pub fn opaque(color: Rgb<u8>) -> Rgba<u8> {
    let [r, g, b] = color.0;
    Rgba([r, g, b, 255])
}
