//! Checkerboard test texture

/// CPU-side RGBA8 image (`0xAABBGGRR` texels, row-major, top row first)
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Texture {
    /// Raw bytes in RGBA order for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn texel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            self.pixels.get((y * self.width + x) as usize).copied()
        } else {
            None
        }
    }

    /// Top-left position that centres this texture on a screen
    pub fn centered_in(&self, screen_width: u32, screen_height: u32) -> (f32, f32) {
        (
            (screen_width as f32 - self.width as f32) / 2.0,
            (screen_height as f32 - self.height as f32) / 2.0,
        )
    }
}

/// Opaque white
pub const CHECK_LIGHT: u32 = 0xFFFF_FFFF;
/// Opaque red
pub const CHECK_DARK: u32 = 0xFF00_00FF;

/// Square checkerboard with 16-texel cells
pub fn checkerboard(size: u32) -> Texture {
    let count = (size * size) as usize;
    let mut pixels = Vec::with_capacity(count);

    for i in 0..size * size {
        let check = ((i / size) & 16) ^ ((i % size) & 16);
        pixels.push(if check != 0 { CHECK_LIGHT } else { CHECK_DARK });
    }

    Texture {
        width: size,
        height: size,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CHECKERBOARD_SIZE;

    #[test]
    fn test_cells_alternate_every_16_texels() {
        let tex = checkerboard(CHECKERBOARD_SIZE);
        assert_eq!(tex.pixels.len(), 128 * 128);
        assert_eq!(tex.texel(0, 0), Some(CHECK_DARK));
        assert_eq!(tex.texel(15, 15), Some(CHECK_DARK));
        assert_eq!(tex.texel(16, 0), Some(CHECK_LIGHT));
        assert_eq!(tex.texel(0, 16), Some(CHECK_LIGHT));
        assert_eq!(tex.texel(16, 16), Some(CHECK_DARK));
        assert_eq!(tex.texel(127, 127), Some(CHECK_DARK));
        assert_eq!(tex.texel(128, 0), None);
    }

    #[test]
    fn test_bytes_are_rgba() {
        let tex = checkerboard(32);
        let bytes = tex.as_bytes();
        assert_eq!(bytes.len(), 32 * 32 * 4);
        assert_eq!(&bytes[0..4], &[0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(CHECK_DARK, crate::renderer::vertex::pack_rgba([1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_centered_in() {
        let tex = checkerboard(CHECKERBOARD_SIZE);
        assert_eq!(tex.centered_in(800, 600), (336.0, 236.0));
    }
}
