use super::color::{Pixel, channels, rgba};

/// CPU frame buffer of packed RGBA pixels, row-major.
pub struct Framebuffer {
    pub color_buffer: Vec<Pixel>,
    pub width: u32,
    pub height: u32,
    pub background_color: Pixel,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        let bg = rgba(0, 0, 0, 255);
        Self {
            color_buffer: vec![bg; size],
            width,
            height,
            background_color: bg,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Pixel) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    #[inline] pub fn set_background_color(&mut self, c: Pixel) { self.background_color = c; }

    /// Fills a `w`x`h` block at (x, y), clipped to the buffer.
    pub fn fill_block(&mut self, x: u32, y: u32, w: u32, h: u32, color: Pixel) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for yy in y..y_end {
            let row = (yy * self.width) as usize;
            for xx in x..x_end {
                self.color_buffer[row + xx as usize] = color;
            }
        }
    }

    /// Reallocates for a new size; contents are reset to the background.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.color_buffer = vec![self.background_color; (width * height) as usize];
    }

    /// Writes the frame as R, G, B, A bytes (the layout GPU textures expect).
    pub fn write_rgba_bytes(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.color_buffer.len() * 4);
        for &p in &self.color_buffer {
            out.extend_from_slice(&channels(p));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(4, 0, 0xFFFF_FFFF);
        fb.set_pixel(0, 3, 0xFFFF_FFFF);
        assert!(fb.color_buffer.iter().all(|&p| p == fb.background_color));
        assert_eq!(fb.get_pixel(9, 9), fb.background_color);
    }

    #[test]
    fn fill_block_clips() {
        let mut fb = Framebuffer::new(4, 3);
        fb.fill_block(3, 2, 2, 2, 7);
        assert_eq!(fb.get_pixel(3, 2), 7);
        assert_eq!(fb.color_buffer.iter().filter(|&&p| p == 7).count(), 1);
    }

    #[test]
    fn rgba_bytes_layout() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set_pixel(1, 0, rgba(1, 2, 3, 4));
        let mut bytes = Vec::new();
        fb.write_rgba_bytes(&mut bytes);
        assert_eq!(bytes, vec![0, 0, 0, 255, 1, 2, 3, 4]);
    }

    #[test]
    fn resize_resets_contents() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel(0, 0, 5);
        fb.resize(3, 1);
        assert_eq!(fb.color_buffer.len(), 3);
        assert!(fb.color_buffer.iter().all(|&p| p == fb.background_color));
    }
}
