//! Software rasterizer
//!
//! Draws a `Scene` into a CPU-side RGBA8 framebuffer. The result is
//! presented as one stretched image, so the GPU only ever sees a single
//! textured quad in this mode.

use glam::Vec2;

use super::checkerboard::Texture;
use super::scene::Scene;
use super::vertex::pack_rgba;
use crate::math::Rect;

/// CPU framebuffer, row-major with the top row first
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn put(&mut self, x: i32, y: i32, texel: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = texel;
        }
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(pack_rgba(color));
    }

    /// Fill a (centre, size) rectangle, snapping its corner and size to whole pixels
    pub fn fill_rect(&mut self, rect: &Rect, color: [f32; 4]) {
        let texel = pack_rgba(color);
        let min = rect.min();
        let x0 = min.x.round() as i32;
        let y0 = min.y.round() as i32;
        let x1 = x0 + rect.size.x.round() as i32;
        let y1 = y0 + rect.size.y.round() as i32;

        let x0 = x0.clamp(0, self.width as i32);
        let x1 = x1.clamp(0, self.width as i32);
        let y0 = y0.clamp(0, self.height as i32);
        let y1 = y1.clamp(0, self.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        let width = self.width as usize;
        for y in y0..y1 {
            let row = y as usize * width;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(texel);
        }
    }

    /// One-pixel line between two points (Bresenham), clipped to the buffer
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: [f32; 4]) {
        let texel = pack_rgba(color);
        let (mut x, mut y) = (from.x.round() as i32, from.y.round() as i32);
        let (x_end, y_end) = (to.x.round() as i32, to.y.round() as i32);

        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let sy = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x, y, texel);
            if x == x_end && y == y_end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Copy a texture with its top-left corner at (x, y), clipped
    pub fn blit(&mut self, texture: &Texture, x: i32, y: i32) {
        for ty in 0..texture.height as i32 {
            let dst_y = y + ty;
            if dst_y < 0 || dst_y >= self.height as i32 {
                continue;
            }
            for tx in 0..texture.width as i32 {
                if let Some(texel) = texture.texel(tx as u32, ty as u32) {
                    self.put(x + tx, dst_y, texel);
                }
            }
        }
    }

    /// Rasterize a whole scene
    pub fn draw_scene(&mut self, scene: &Scene) {
        self.clear(scene.clear);
        for line in &scene.lines {
            self.draw_line(line.from, line.to, line.color);
        }
        for (rect, color) in &scene.rects {
            self.fill_rect(rect, *color);
        }
    }

    /// Match the buffer to a new size, discarding contents when it changes
    pub fn resize(&mut self, width: u32, height: u32) {
        if width != self.width || height != self.height {
            *self = Self::new(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::renderer::checkerboard::{CHECK_DARK, CHECK_LIGHT, checkerboard};
    use crate::sim::GameState;

    const WHITE: u32 = 0xFFFF_FFFF;
    const BLACK: u32 = 0xFF00_0000;

    #[test]
    fn test_fill_rect_rounds_and_clips() {
        let mut fb = Framebuffer::new(20, 10);
        fb.clear([0.0, 0.0, 0.0, 1.0]);
        // Spans x 2.6..5.6 -> pixels 3..6, y -1..3 -> clipped to 0..3
        fb.fill_rect(
            &Rect::from_center(Vec2::new(4.1, 1.0), Vec2::new(3.0, 4.0)),
            [1.0; 4],
        );
        assert_eq!(fb.pixel(2, 0), Some(BLACK));
        assert_eq!(fb.pixel(3, 0), Some(WHITE));
        assert_eq!(fb.pixel(5, 2), Some(WHITE));
        assert_eq!(fb.pixel(6, 2), Some(BLACK));
        assert_eq!(fb.pixel(3, 3), Some(BLACK));
    }

    #[test]
    fn test_fill_rect_fully_outside() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear([0.0, 0.0, 0.0, 1.0]);
        fb.fill_rect(&Rect::from_center(Vec2::new(-20.0, 4.0), Vec2::splat(4.0)), [1.0; 4]);
        assert!(fb.pixels().iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_vertical_line() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear([0.0, 0.0, 0.0, 1.0]);
        fb.draw_line(Vec2::new(4.0, 0.0), Vec2::new(4.0, 8.0), [1.0; 4]);
        for y in 0..8 {
            assert_eq!(fb.pixel(4, y), Some(WHITE));
            assert_eq!(fb.pixel(3, y), Some(BLACK));
        }
    }

    #[test]
    fn test_diagonal_line_hits_both_ends() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear([0.0, 0.0, 0.0, 1.0]);
        fb.draw_line(Vec2::new(7.0, 0.0), Vec2::new(0.0, 7.0), [1.0; 4]);
        assert_eq!(fb.pixel(7, 0), Some(WHITE));
        assert_eq!(fb.pixel(0, 7), Some(WHITE));
        assert_eq!(fb.pixel(3, 4), Some(WHITE));
    }

    #[test]
    fn test_blit_clips() {
        let tex = checkerboard(32);
        let mut fb = Framebuffer::new(40, 40);
        fb.clear([0.0, 0.0, 0.0, 1.0]);
        fb.blit(&tex, 20, -8);
        assert_eq!(fb.pixel(19, 0), Some(BLACK));
        // Texture row 8, column 0 is a dark cell
        assert_eq!(fb.pixel(20, 0), Some(CHECK_DARK));
        // Texture row 8, column 16 is a light cell
        assert_eq!(fb.pixel(36, 0), Some(CHECK_LIGHT));
        assert_eq!(fb.pixel(20, 24), Some(BLACK));
    }

    #[test]
    fn test_draw_board() {
        let state = GameState::new(&RulesConfig::default(), 0);
        let scene = Scene::from_snapshot(&state.snapshot(), 1280, 720);
        let mut fb = Framebuffer::new(1280, 720);
        fb.draw_scene(&scene);

        assert_eq!(fb.as_bytes().len(), 1280 * 720 * 4);
        // Centre line
        assert_eq!(fb.pixel(640, 10), Some(WHITE));
        // Left paddle spans x 40..60, y 335..385
        assert_eq!(fb.pixel(40, 335), Some(WHITE));
        assert_eq!(fb.pixel(59, 384), Some(WHITE));
        assert_eq!(fb.pixel(60, 360), Some(BLACK));
        assert_eq!(fb.pixel(39, 360), Some(BLACK));
        // Ball spans x 635..645
        assert_eq!(fb.pixel(636, 360), Some(WHITE));
        assert_eq!(fb.pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn test_resize() {
        let mut fb = Framebuffer::new(4, 4);
        fb.resize(8, 2);
        assert_eq!(fb.pixels().len(), 16);
        assert_eq!(fb.as_bytes().len(), 64);
    }
}
