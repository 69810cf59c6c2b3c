use image::{RgbImage, Rgba};

use super::blend_pixel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundedRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub radius: i32,
}

impl RoundedRect {
    /// Whether the pixel at `(px, py)` has its center inside the shape.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        if self.width <= 0 || self.height <= 0 {
            return false;
        }
        if px < self.x || py < self.y || px >= self.x + self.width || py >= self.y + self.height {
            return false;
        }

        let r = self.radius.clamp(0, self.width.min(self.height) / 2) as f64;
        if r == 0.0 {
            return true;
        }

        let cx = px as f64 + 0.5;
        let cy = py as f64 + 0.5;
        let left = self.x as f64 + r;
        let right = (self.x + self.width) as f64 - r;
        let top = self.y as f64 + r;
        let bottom = (self.y + self.height) as f64 - r;

        let nearest_x = cx.clamp(left, right);
        let nearest_y = cy.clamp(top, bottom);
        let (dx, dy) = (cx - nearest_x, cy - nearest_y);
        dx * dx + dy * dy <= r * r
    }

    pub fn inset(&self, by: i32) -> RoundedRect {
        RoundedRect {
            x: self.x + by,
            y: self.y + by,
            width: self.width - 2 * by,
            height: self.height - 2 * by,
            radius: (self.radius - by).max(0),
        }
    }
}

pub fn fill_rounded_rect(canvas: &mut RgbImage, rect: &RoundedRect, paint: Rgba<u8>) {
    for py in rect.y..rect.y + rect.height {
        for px in rect.x..rect.x + rect.width {
            if rect.contains(px, py) {
                blend_pixel(canvas, px, py, paint, 255);
            }
        }
    }
}

/// Stroke drawn inside the rectangle bounds.
pub fn stroke_rounded_rect(canvas: &mut RgbImage, rect: &RoundedRect, width: i32, paint: Rgba<u8>) {
    let inner = rect.inset(width);
    for py in rect.y..rect.y + rect.height {
        for px in rect.x..rect.x + rect.width {
            if rect.contains(px, py) && !inner.contains(px, py) {
                blend_pixel(canvas, px, py, paint, 255);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn pill_excludes_corners_but_keeps_middle() {
        let pill = RoundedRect {
            x: 0,
            y: 0,
            width: 40,
            height: 20,
            radius: 10,
        };
        assert!(!pill.contains(0, 0));
        assert!(!pill.contains(39, 19));
        assert!(pill.contains(0, 10));
        assert!(pill.contains(20, 0));
        assert!(!pill.contains(40, 10));
    }

    #[test]
    fn stroke_leaves_interior_alone() {
        let rect = RoundedRect {
            x: 2,
            y: 2,
            width: 30,
            height: 16,
            radius: 8,
        };
        let mut canvas = RgbImage::from_pixel(40, 24, Rgb([0, 0, 0]));
        fill_rounded_rect(&mut canvas, &rect, Rgba([0, 0, 200, 255]));
        stroke_rounded_rect(&mut canvas, &rect, 2, Rgba([255, 255, 255, 255]));

        assert_eq!(*canvas.get_pixel(17, 2), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(17, 3), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(17, 4), Rgb([0, 0, 200]));
        assert_eq!(*canvas.get_pixel(17, 10), Rgb([0, 0, 200]));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([0, 0, 0]));
    }
}
