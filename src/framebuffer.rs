/// Destination surface for the ray caster.
///
/// The renderer only ever clears the whole surface and writes single pixels
/// it has already proven in-bounds, so implementations may index without
/// checking.
pub trait PixelSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self, color: u32);
    fn set_pixel(&mut self, col: u32, row: u32, color: u32);
}

/// Owned CPU framebuffer of packed `0xAABBGGRR` pixels, row-major.
pub struct Framebuffer {
    width: u32,
    height: u32,
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

    /// Raw byte view for texture upload (RGBA order on little-endian).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl PixelSink for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[inline]
    fn set_pixel(&mut self, col: u32, row: u32, color: u32) {
        debug_assert!(col < self.width && row < self.height);
        self.pixels[(row * self.width + col) as usize] = color;
    }
}
