use crate::math::Point;

/// rgb(25,25,25)
pub const BACKGROUND: u32 = 0x191919;
pub const STAR_COLOR: u32 = 0xFFFFFF;
pub const TRAIL_ALPHA: f32 = 0.2;

/// 0RGB framebuffer, the layout minifb expects.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
    let a = alpha.clamp(0.0, 1.0);
    let channel = |shift: u32| {
        let d = ((dst >> shift) & 0xFF) as f32;
        let s = ((src >> shift) & 0xFF) as f32;
        ((d + (s - d) * a).round() as u32).min(255)
    };
    (channel(16) << 16) | (channel(8) << 8) | channel(0)
}

// Simple 3x5 pixel font
fn glyph(ch: char) -> &'static [u8] {
    match ch.to_ascii_lowercase() {
        '0' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => &[0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => &[0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => &[0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => &[0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => &[0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => &[0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => &[0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => &[0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => &[0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => &[0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => &[0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => &[0b000, 0b010, 0b000, 0b010, 0b000],
        'a' => &[0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => &[0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => &[0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => &[0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => &[0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => &[0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => &[0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => &[0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => &[0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => &[0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => &[0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => &[0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => &[0b101, 0b111, 0b111, 0b101, 0b101],
        'n' => &[0b101, 0b111, 0b111, 0b111, 0b101],
        'o' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => &[0b111, 0b101, 0b111, 0b100, 0b100],
        'r' => &[0b110, 0b101, 0b110, 0b101, 0b101],
        's' => &[0b111, 0b100, 0b111, 0b001, 0b111],
        't' => &[0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => &[0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => &[0b101, 0b101, 0b101, 0b101, 0b010],
        'w' => &[0b101, 0b101, 0b111, 0b111, 0b101],
        'y' => &[0b101, 0b101, 0b111, 0b010, 0b010],
        _ => &[0b000, 0b000, 0b000, 0b000, 0b000],
    }
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: u32) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![background; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Low-alpha overwrite of the whole surface. Repeated every frame this
    /// leaves fading trails behind moving strokes.
    pub fn fade(&mut self, color: u32, alpha: f32) {
        for px in &mut self.pixels {
            *px = blend(*px, color, alpha);
        }
    }

    pub fn blend_pixel(&mut self, x: i64, y: i64, color: u32, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = blend(self.pixels[idx], color, alpha);
    }

    /// One pixel wide line, clipped to the surface.
    pub fn stroke_line(&mut self, from: Point, to: Point, color: u32, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let (w, h) = (self.width as f64, self.height as f64);
        if (from.x < 0.0 && to.x < 0.0)
            || (from.y < 0.0 && to.y < 0.0)
            || (from.x >= w && to.x >= w)
            || (from.y >= h && to.y >= h)
        {
            return;
        }

        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let mut last = None;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (from.x + dx * t).round() as i64;
            let y = (from.y + dy * t).round() as i64;
            if last == Some((x, y)) {
                continue;
            }
            last = Some((x, y));
            self.blend_pixel(x, y, color, alpha);
        }
    }

    pub fn draw_char(&mut self, x: usize, y: usize, ch: char, color: u32, scale: usize) {
        for (dy, &row) in glyph(ch).iter().enumerate() {
            for dx in 0..3 {
                if row & (1 << (2 - dx)) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = x + dx * scale + sx;
                        let py = y + dy * scale + sy;
                        if px < self.width && py < self.height {
                            self.pixels[py * self.width + px] = color;
                        }
                    }
                }
            }
        }
    }

    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, color: u32, scale: usize) {
        let advance = 4 * scale;
        let mut offset_x = x;
        for ch in text.chars() {
            if offset_x + advance >= self.width {
                break;
            }
            self.draw_char(offset_x, y, ch, color, scale);
            offset_x += advance;
        }
    }

    /// Width in pixels of `text` as laid out by `draw_text`.
    pub fn text_width(text: &str, scale: usize) -> usize {
        text.chars().count() * 4 * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_moves_toward_color() {
        let mut canvas = Canvas::new(2, 1, STAR_COLOR);
        canvas.fade(BACKGROUND, TRAIL_ALPHA);
        let faded = canvas.pixel(0, 0).unwrap();
        let r = (faded >> 16) & 0xFF;
        assert!(r < 255 && r > 25, "r {r}");
        for _ in 0..100 {
            canvas.fade(BACKGROUND, TRAIL_ALPHA);
        }
        let r = (canvas.pixel(1, 0).unwrap() >> 16) & 0xFF;
        assert!(r <= 28, "r {r}");
    }

    #[test]
    fn full_alpha_stroke_paints_endpoints() {
        let mut canvas = Canvas::new(10, 10, 0);
        canvas.stroke_line(Point::new(1.0, 1.0), Point::new(8.0, 5.0), 0xFFFFFF, 1.0);
        assert_eq!(canvas.pixel(1, 1), Some(0xFFFFFF));
        assert_eq!(canvas.pixel(8, 5), Some(0xFFFFFF));
        assert_eq!(canvas.pixel(9, 9), Some(0));
    }

    #[test]
    fn offscreen_and_transparent_strokes_are_ignored() {
        let mut canvas = Canvas::new(10, 10, 0);
        canvas.stroke_line(Point::new(-50.0, -5.0), Point::new(-1.0, 30.0), 0xFFFFFF, 1.0);
        canvas.stroke_line(Point::new(1.0, 1.0), Point::new(8.0, 8.0), 0xFFFFFF, -0.01);
        assert!(canvas.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn partially_visible_stroke_is_clipped() {
        let mut canvas = Canvas::new(10, 10, 0);
        canvas.stroke_line(Point::new(-5.0, 5.0), Point::new(15.0, 5.0), 0xFFFFFF, 1.0);
        for x in 0..10 {
            assert_eq!(canvas.pixel(x, 5), Some(0xFFFFFF));
        }
    }

    #[test]
    fn text_uses_bitmap_font() {
        let mut canvas = Canvas::new(40, 10, 0);
        canvas.draw_text(0, 0, "ENTER", 0xFFFFFF, 1);
        // 'e' top row is solid.
        assert_eq!(canvas.pixel(0, 0), Some(0xFFFFFF));
        assert_eq!(canvas.pixel(2, 0), Some(0xFFFFFF));
        assert_eq!(Canvas::text_width("ENTER", 2), 40);
    }
}
