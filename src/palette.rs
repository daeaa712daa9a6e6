/// 256-entry color table resolving a map color index to a packed pixel.
///
/// Pixels are packed `0xAABBGGRR` with opaque alpha, which is RGBA byte
/// order in memory on little-endian targets and matches the Rgba8 texture
/// upload in the renderer.
pub struct Palette {
    colors: [u32; 256],
}

impl Palette {
    /// Build from up to 256 VGA-style triples with 6 significant bits per
    /// channel. Each channel's low 6 bits are expanded to 8-bit range via
    /// `(c & 63) << 2`. Entries past the end of `source` stay opaque black.
    pub fn from_vga(source: &[[u8; 3]]) -> Self {
        let mut colors = [0xFF00_0000u32; 256];
        for (slot, [r, g, b]) in colors.iter_mut().zip(source) {
            let r = ((r & 63) << 2) as u32;
            let g = ((g & 63) << 2) as u32;
            let b = ((b & 63) << 2) as u32;
            *slot = 0xFF00_0000 | (b << 16) | (g << 8) | r;
        }
        Self { colors }
    }

    #[inline]
    pub fn color(&self, index: u8) -> u32 {
        self.colors[index as usize]
    }
}
