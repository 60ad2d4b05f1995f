use crate::color::Rgb;
use crate::surface::{PixelBuffer, Surface};
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Downsample the pixel buffer to Braille characters.
///
/// Each dot covers a block of pixels and is lit when the brightest pixel in
/// the block exceeds `threshold`. The cell takes the average color of the
/// brightest pixel of each lit dot, so fading trails render dimmer.
pub fn render_to_braille(
    buffer: &PixelBuffer,
    canvas_width: u16,
    canvas_height: u16,
    threshold: f32,
) -> Vec<BrailleCell> {
    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;
    if braille_width == 0 || braille_height == 0 {
        return Vec::new();
    }

    // Pixels per dot (pre-calculated once)
    let scale_x = buffer.width() as f32 / braille_width as f32;
    let scale_y = buffer.height() as f32 / braille_height as f32;

    let mut cells = Vec::new();

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut total = [0.0f32; 3];
            let mut dot_count: usize = 0;

            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let bx = base_bx + dx;
                    let by = base_by + dy;

                    let x0 = (bx as f32 * scale_x) as usize;
                    let x1 = (((bx + 1) as f32 * scale_x) as usize).max(x0 + 1);
                    let y0 = (by as f32 * scale_y) as usize;
                    let y1 = (((by + 1) as f32 * scale_y) as usize).max(y0 + 1);

                    let mut brightest = None;
                    let mut peak = threshold;
                    for py in y0..y1 {
                        for px in x0..x1 {
                            if let Some(c) = buffer.get(px, py) {
                                let level = c.max_channel();
                                if level > peak {
                                    peak = level;
                                    brightest = Some(c);
                                }
                            }
                        }
                    }

                    if let Some(c) = brightest {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        total[0] += c.r;
                        total[1] += c.g;
                        total[2] += c.b;
                        dot_count += 1;
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                let n = dot_count as f32;
                let [r, g, b] = Rgb::new(total[0] / n, total[1] / n, total[2] / n).to_bytes();

                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: Color::Rgb(r, g, b),
                });
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_black_buffer_renders_nothing() {
        let buffer = PixelBuffer::new(80, 64);
        assert!(render_to_braille(&buffer, 10, 4, 0.1).is_empty());
    }

    #[test]
    fn test_single_bright_pixel_lights_one_dot() {
        // 2 cells x 1 row at 8x16 pixels per cell: each dot is a 4x4 block
        let mut buffer = PixelBuffer::new(16, 16);
        buffer.fill_rect(13.0, 1.0, 1.0, 1.0, Rgba::new(Rgb::new(1.0, 0.0, 0.5), 1.0));

        let cells = render_to_braille(&buffer, 2, 1, 0.1);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].x, 1);
        assert_eq!(cells[0].y, 0);
        // Right column, top row
        assert_eq!(cells[0].char, '\u{2808}');
        assert_eq!(cells[0].color, Color::Rgb(255, 0, 128));
    }

    #[test]
    fn test_dim_pixels_below_threshold_are_dropped() {
        let mut buffer = PixelBuffer::new(8, 16);
        buffer.fill_rect(0.0, 0.0, 8.0, 16.0, Rgba::new(Rgb::new(0.05, 0.05, 0.05), 1.0));
        assert!(render_to_braille(&buffer, 1, 1, 0.1).is_empty());

        let cells = render_to_braille(&buffer, 1, 1, 0.01);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].char, '\u{28FF}');
    }
}
