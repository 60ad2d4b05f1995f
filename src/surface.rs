use crate::color::{Rgb, Rgba};
use std::path::Path;

/// The drawing primitives the particle field needs
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Blend a rectangle of `color` over the surface
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    /// Paint a solid disc, no outline
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb);
}

/// Off-screen RGB framebuffer in logical pixels
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    /// Resize and clear to black
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Rgb::BLACK);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Clip a float span to pixel indices [start, end)
    fn clip_span(start: f32, end: f32, limit: usize) -> (usize, usize) {
        let lo = start.max(0.0).min(limit as f32) as usize;
        let hi = end.max(0.0).min(limit as f32) as usize;
        (lo, hi.max(lo))
    }

    /// Write the buffer to a PNG file
    pub fn save_png(&self, path: &Path) -> Result<(), String> {
        let mut img = image::RgbImage::new(self.width as u32, self.height as u32);
        for (i, pixel) in img.pixels_mut().enumerate() {
            *pixel = image::Rgb(self.pixels[i].to_bytes());
        }
        img.save(path).map_err(|e| format!("Failed to write snapshot: {}", e))
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let alpha = color.alpha.clamp(0.0, 1.0);
        let keep = 1.0 - alpha;
        let src = color.rgb;
        let (x0, x1) = Self::clip_span(x.round(), (x + w).round(), self.width);
        let (y0, y1) = Self::clip_span(y.round(), (y + h).round(), self.height);

        for py in y0..y1 {
            let row = &mut self.pixels[py * self.width + x0..py * self.width + x1];
            for p in row {
                p.r = p.r * keep + src.r * alpha;
                p.g = p.g * keep + src.g * alpha;
                p.b = p.b * keep + src.b * alpha;
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        if !(cx.is_finite() && cy.is_finite()) || radius <= 0.0 {
            return;
        }
        let r_sq = radius * radius;
        let (x0, x1) =
            Self::clip_span((cx - radius).floor(), (cx + radius).ceil() + 1.0, self.width);
        let (y0, y1) =
            Self::clip_span((cy - radius).floor(), (cy + radius).ceil() + 1.0, self.height);

        for py in y0..y1 {
            let dy = py as f32 + 0.5 - cy;
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                // Pixel is covered when its center lies inside the disc
                if dx * dx + dy * dy <= r_sq {
                    self.pixels[py * self.width + px] = color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    #[test]
    fn test_fade_blends_toward_black() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(0.0, 0.0, 4.0, 4.0, Rgba::new(WHITE, 1.0));
        buf.fill_rect(0.0, 0.0, 4.0, 4.0, Rgba::new(Rgb::BLACK, 0.2));
        let p = buf.get(3, 3).unwrap();
        assert!((p.r - 0.8).abs() < 1e-6);
        buf.fill_rect(0.0, 0.0, 4.0, 4.0, Rgba::new(Rgb::BLACK, 0.2));
        let p = buf.get(0, 0).unwrap();
        assert!((p.g - 0.64).abs() < 1e-6);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.fill_rect(-5.0, 1.0, 100.0, 1.0, Rgba::new(WHITE, 1.0));
        assert_eq!(buf.get(0, 1), Some(WHITE));
        assert_eq!(buf.get(2, 1), Some(WHITE));
        assert_eq!(buf.get(1, 0), Some(Rgb::BLACK));
        assert_eq!(buf.get(1, 2), Some(Rgb::BLACK));
    }

    #[test]
    fn test_circle_covers_center_pixels() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.fill_circle(5.0, 5.0, 1.0, WHITE);
        // The four pixels touching (5, 5) have centers ~0.71 away
        for (x, y) in [(4, 4), (5, 4), (4, 5), (5, 5)] {
            assert_eq!(buf.get(x, y), Some(WHITE));
        }
        assert_eq!(buf.get(7, 5), Some(Rgb::BLACK));
        assert_eq!(buf.get(5, 7), Some(Rgb::BLACK));
    }

    #[test]
    fn test_circle_off_surface_is_clipped() {
        let mut buf = PixelBuffer::new(5, 5);
        buf.fill_circle(-100.0, -100.0, 3.0, WHITE);
        buf.fill_circle(0.0, 0.0, 2.0, WHITE);
        assert_eq!(buf.get(0, 0), Some(WHITE));
        assert_eq!(buf.get(4, 4), Some(Rgb::BLACK));
    }

    #[test]
    fn test_resize_clears() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.fill_rect(0.0, 0.0, 2.0, 2.0, Rgba::new(WHITE, 1.0));
        buf.resize(3, 1);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 1);
        assert_eq!(buf.get(2, 0), Some(Rgb::BLACK));
        assert_eq!(buf.get(0, 1), None);
    }

    #[test]
    fn test_save_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut buf = PixelBuffer::new(6, 4);
        buf.fill_circle(3.0, 2.0, 1.5, Rgb::new(1.0, 0.0, 1.0));
        buf.save_png(&path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (6, 4));
        assert_eq!(img.get_pixel(2, 1).0, [255, 0, 255]);
    }
}
