use crate::palette::Palette;
use anyhow::{Context, Result, bail, ensure};
use image::RgbImage;
use std::collections::HashMap;
use std::path::Path;

/// Height and color fields over a toroidal N×N grid, N a power of two.
///
/// Both planes are populated once at construction and read-only afterwards;
/// `sample` is the only access path the renderer uses.
pub struct TerrainMap {
    size: u32,
    mask: i32,
    height: Vec<u8>,
    color: Vec<u8>,
}

impl TerrainMap {
    pub fn from_buffers(size: u32, height: Vec<u8>, color: Vec<u8>) -> Result<Self> {
        ensure!(
            size > 0 && size.is_power_of_two(),
            "invalid terrain map: side {size} is not a power of two"
        );
        let cells = size as usize * size as usize;
        ensure!(
            height.len() == cells,
            "invalid terrain map: height plane is {} bytes, expected {cells}",
            height.len()
        );
        ensure!(
            color.len() == cells,
            "invalid terrain map: color plane is {} bytes, expected {cells}",
            color.len()
        );
        Ok(Self {
            size,
            mask: (size - 1) as i32,
            height,
            color,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Fetch `(height, color_index)` for a real-valued map position.
    ///
    /// Coordinates wrap toroidally: the cell is `(⌊x⌋ mod N, ⌊y⌋ mod N)`,
    /// floor-then-mask so negative positions alias correctly. Total and
    /// non-allocating.
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> (u8, u8) {
        let cx = (x.floor() as i32 & self.mask) as u32;
        let cy = (y.floor() as i32 & self.mask) as u32;
        let offset = (cy * self.size + cx) as usize;
        (self.height[offset], self.color[offset])
    }
}

/// Load a terrain from a height image (luma plane) and a color image.
///
/// The color image is interned into at most 256 distinct colors, yielding
/// the index plane and a 6-bit source palette. Any shape mismatch is a
/// load-time error; the renderer never sees a partially valid map.
pub fn load(height_path: &Path, color_path: &Path) -> Result<(TerrainMap, Palette)> {
    let height_img = image::open(height_path)
        .with_context(|| format!("opening height map {}", height_path.display()))?
        .to_luma8();
    let color_img = image::open(color_path)
        .with_context(|| format!("opening color map {}", color_path.display()))?
        .to_rgb8();

    let (w, h) = height_img.dimensions();
    ensure!(
        (w, h) == color_img.dimensions(),
        "invalid terrain map: height is {w}x{h} but color is {}x{}",
        color_img.dimensions().0,
        color_img.dimensions().1
    );
    ensure!(w == h, "invalid terrain map: {w}x{h} is not square");

    let (indices, source) = index_colors(&color_img)?;
    let map = TerrainMap::from_buffers(w, height_img.into_raw(), indices)?;
    log::info!(
        "loaded {0}x{0} terrain, {1} palette entries",
        map.size(),
        source.len()
    );
    Ok((map, Palette::from_vga(&source)))
}

/// Intern an RGB plane into palette indices plus 6-bit source triples.
///
/// First-seen order assigns indices, so re-interning the same image yields
/// identical buffers.
fn index_colors(img: &RgbImage) -> Result<(Vec<u8>, Vec<[u8; 3]>)> {
    let mut indices = Vec::with_capacity(img.len() / 3);
    let mut source: Vec<[u8; 3]> = Vec::new();
    let mut seen: HashMap<[u8; 3], u8> = HashMap::new();
    for pixel in img.pixels() {
        let rgb = pixel.0;
        let index = match seen.get(&rgb) {
            Some(&i) => i,
            None => {
                if source.len() == 256 {
                    bail!("invalid terrain map: color image has more than 256 distinct colors");
                }
                let i = source.len() as u8;
                source.push([rgb[0] >> 2, rgb[1] >> 2, rgb[2] >> 2]);
                seen.insert(rgb, i);
                i
            }
        };
        indices.push(index);
    }
    Ok((indices, source))
}

/// Rolling sin/cos hills with an elevation-gradient palette, so the binary
/// runs without map assets.
pub fn generate(size: u32) -> Result<(TerrainMap, Palette)> {
    let cells = size as usize * size as usize;
    let mut height = Vec::with_capacity(cells);
    let mut color = Vec::with_capacity(cells);

    for y in 0..size {
        for x in 0..size {
            let h1 = (x as f32 * 0.01).sin() * (y as f32 * 0.01).cos();
            let h2 = (x as f32 * 0.004).sin() * (y as f32 * 0.004).cos();
            let t = ((h1 + h2) * 0.25 + 0.5).clamp(0.0, 1.0);
            height.push((t * 180.0) as u8);
            color.push((t * 63.0) as u8);
        }
    }

    // Lowland green through brown ridges to white peaks, 6-bit channels.
    let mut source = Vec::with_capacity(64);
    for i in 0..64u32 {
        let t = i as f32 / 63.0;
        if t < 0.6 {
            let s = t / 0.6;
            source.push([
                channel_at(6.0, 38.0, s),
                channel_at(26.0, 30.0, s),
                channel_at(8.0, 16.0, s),
            ]);
        } else {
            let s = (t - 0.6) / 0.4;
            source.push([
                channel_at(38.0, 60.0, s),
                channel_at(30.0, 60.0, s),
                channel_at(16.0, 60.0, s),
            ]);
        }
    }

    let map = TerrainMap::from_buffers(size, height, color)?;
    Ok((map, Palette::from_vga(&source)))
}

fn channel_at(low: f32, high: f32, t: f32) -> u8 {
    (low + (high - low) * t) as u8
}
