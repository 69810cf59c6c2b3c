use image::{Rgb, RgbImage};

/// Fill the canvas with a top-to-bottom linear gradient.
///
/// Scanline `y` gets `start + (end - start) * y / height` per channel,
/// truncated toward zero.
pub fn fill_vertical_gradient(canvas: &mut RgbImage, start: Rgb<u8>, end: Rgb<u8>) {
    let height = canvas.height();
    for y in 0..height {
        let color = scanline_color(start, end, y, height);
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, color);
        }
    }
}

pub fn scanline_color(start: Rgb<u8>, end: Rgb<u8>, y: u32, height: u32) -> Rgb<u8> {
    let ratio = y as f64 / height.max(1) as f64;
    let lerp = |a: u8, b: u8| {
        let a = a as f64;
        let v = a + (b as f64 - a) * ratio;
        v.clamp(0.0, 255.0) as u8
    };
    Rgb([
        lerp(start[0], end[0]),
        lerp(start[1], end[1]),
        lerp(start[2], end[2]),
    ])
}
