use crate::camera::Camera;
use crate::framebuffer::PixelSink;
use crate::palette::Palette;
use crate::terrain::TerrainMap;
use glam::Vec2;

/// Perspective scale applied to the height difference before the depth divide.
pub const SCALE_FACTOR: f32 = 40.0;
/// Sky fill, drawn wherever no terrain sample lands.
pub const SKY_COLOR: u32 = 0xFFFF_D085;

/// Rasterize one frame of the height field into `sink`.
///
/// Each screen column casts one ray from the camera toward the far plane.
/// Visibility is resolved with a single per-column scalar: `tallest` holds
/// the highest row already painted by a nearer sample, and a farther sample
/// only paints the rows above it that are still uncovered. That keeps every
/// (column, row) cell written at most once per frame with no depth buffer.
pub fn render_frame(
    camera: &Camera,
    map: &TerrainMap,
    palette: &Palette,
    sink: &mut impl PixelSink,
) {
    sink.clear(SKY_COLOR);

    let width = sink.width();
    let screen_height = sink.height() as i32;
    let zfar = camera.zfar;
    let heading = Vec2::from_angle(camera.angle);

    // FOV frustum endpoints at the far plane: the corners (zfar, ∓zfar)
    // rotated into the heading frame, bounding a 90° view symmetrically.
    let fov_left = heading.rotate(Vec2::new(zfar, -zfar));
    let fov_right = heading.rotate(Vec2::new(zfar, zfar));

    for col in 0..width {
        let endpoint = fov_left.lerp(fov_right, col as f32 / width as f32);
        let step = endpoint / zfar;

        let mut ray = camera.pos;
        let mut tallest = screen_height;

        for z in 1..zfar as i32 {
            ray += step;
            let (terrain_height, color_index) = map.sample(ray.x, ray.y);
            let proj = ((camera.height - terrain_height as f32) / z as f32 * SCALE_FACTOR
                + camera.horizon) as i32;

            // A farther sample only shows where it rises above everything
            // painted so far in this column.
            if proj < tallest {
                let color = palette.color(color_index);
                for row in proj.max(0)..tallest {
                    sink.set_pixel(col, row as u32, color);
                }
                tallest = proj;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::Framebuffer;
    use crate::terrain::TerrainMap;

    /// Sink that records every write for occlusion-invariant checks.
    struct RecordingSink {
        width: u32,
        height: u32,
        writes: Vec<(u32, u32, u32)>,
        cleared: Option<u32>,
    }

    impl RecordingSink {
        fn new(width: u32, height: u32) -> Self {
            Self { width, height, writes: Vec::new(), cleared: None }
        }

        fn column(&self, col: u32) -> Vec<(u32, u32)> {
            self.writes
                .iter()
                .filter(|w| w.0 == col)
                .map(|w| (w.1, w.2))
                .collect()
        }
    }

    impl PixelSink for RecordingSink {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn clear(&mut self, color: u32) {
            self.cleared = Some(color);
        }

        fn set_pixel(&mut self, col: u32, row: u32, color: u32) {
            assert!(col < self.width && row < self.height, "write out of bounds");
            self.writes.push((col, row, color));
        }
    }

    fn flat_map(size: u32, height: u8) -> TerrainMap {
        let cells = (size * size) as usize;
        TerrainMap::from_buffers(size, vec![height; cells], vec![0; cells]).unwrap()
    }

    fn grayscale_palette() -> Palette {
        let source: Vec<[u8; 3]> = (0..64).map(|i| [i, i, i]).collect();
        Palette::from_vga(&source)
    }

    fn level_camera() -> Camera {
        let mut camera = Camera::new(Vec2::new(32.0, 32.0));
        camera.angle = 0.0;
        camera
    }

    fn rugged_map(size: u32) -> TerrainMap {
        let cells = (size * size) as usize;
        let height: Vec<u8> = (0..cells).map(|i| ((i * 37) % 251) as u8).collect();
        let color: Vec<u8> = (0..cells).map(|i| (i % 61) as u8).collect();
        TerrainMap::from_buffers(size, height, color).unwrap()
    }

    #[test]
    fn render_is_deterministic() {
        let map = rugged_map(64);
        let palette = grayscale_palette();
        let camera = level_camera();
        let mut first = Framebuffer::new(40, 60);
        let mut second = Framebuffer::new(40, 60);
        render_frame(&camera, &map, &palette, &mut first);
        render_frame(&camera, &map, &palette, &mut second);
        assert_eq!(first.pixels(), second.pixels());
    }

    #[test]
    fn each_row_is_written_at_most_once_per_column() {
        let map = rugged_map(64);
        let palette = grayscale_palette();
        let camera = level_camera();
        let mut sink = RecordingSink::new(24, 80);
        render_frame(&camera, &map, &palette, &mut sink);

        for col in 0..24 {
            let mut seen = std::collections::HashSet::new();
            for (row, _) in sink.column(col) {
                assert!(seen.insert(row), "row {row} written twice in column {col}");
            }
        }
    }

    #[test]
    fn spans_descend_monotonically_within_a_column() {
        let map = rugged_map(64);
        let palette = grayscale_palette();
        let camera = level_camera();
        let mut sink = RecordingSink::new(16, 80);
        render_frame(&camera, &map, &palette, &mut sink);

        // Writes within a span ascend; every new span sits strictly above
        // the lowest row of everything painted before it.
        for col in 0..16 {
            let rows: Vec<u32> = sink.column(col).iter().map(|&(row, _)| row).collect();
            let mut floor = u32::MAX;
            let mut i = 0;
            while i < rows.len() {
                let span_start = rows[i];
                assert!(span_start < floor, "span did not rise above earlier paint");
                while i + 1 < rows.len() && rows[i + 1] == rows[i] + 1 {
                    i += 1;
                }
                floor = floor.min(span_start);
                i += 1;
            }
        }
    }

    #[test]
    fn flat_world_paints_one_band_below_the_horizon() {
        // Height 0 everywhere, camera height 100, horizon 100: the band
        // bottom is the first depth where (100/z)*40 + 100 < 200, and the
        // top converges to 100 + 4000/(zfar-1).
        let map = flat_map(64, 0);
        let palette = grayscale_palette();
        let camera = level_camera();
        let mut sink = RecordingSink::new(8, 200);
        render_frame(&camera, &map, &palette, &mut sink);
        assert_eq!(sink.cleared, Some(SKY_COLOR));

        let expected_top = (100.0 / 999.0 * SCALE_FACTOR + 100.0) as u32;
        for col in 0..8 {
            let mut rows: Vec<u32> = sink.column(col).iter().map(|&(row, _)| row).collect();
            rows.sort_unstable();
            let expected: Vec<u32> = (expected_top..200).collect();
            assert_eq!(rows, expected, "column {col} is not a single clean band");
        }
    }

    fn spike_map(size: u32) -> TerrainMap {
        // Flat height 5 with one height-80 cell at (42, 32), ten steps
        // ahead of a camera at (32, 32) heading along +x.
        let cells = (size * size) as usize;
        let mut height = vec![5u8; cells];
        let mut color = vec![0u8; cells];
        let spike = (32 * size + 42) as usize;
        height[spike] = 80;
        color[spike] = 1;
        TerrainMap::from_buffers(size, height, color).unwrap()
    }

    #[test]
    fn single_spike_occludes_the_terrain_behind_it() {
        let map = spike_map(64);
        let palette = grayscale_palette();
        let mut camera = level_camera();
        camera.horizon = 50.0;
        // Keep the march shorter than the map side so the spike cell is
        // sampled exactly once (no toroidal re-hit).
        camera.zfar = 60.0;

        let width = 64u32;
        let mut fb = Framebuffer::new(width, 200);
        render_frame(&camera, &map, &palette, &mut fb);

        // The center column marches straight along +x and crosses the spike
        // cell at z = 10: proj = (100 - 80) / 10 * 40 + 50 = 130 exactly.
        let center = (width / 2) as usize;
        let at = |row: usize| fb.pixels()[row * width as usize + center];
        assert_eq!(at(130), palette.color(1));
        assert_eq!(at(199), palette.color(1));
        // Rows just above the spike span belong to farther flat terrain,
        // down to the farthest sample: (95/59)*40 + 50 ≈ 114.4.
        assert_eq!(at(129), palette.color(0));
        assert_eq!(at(120), palette.color(0));
        assert_eq!(at(114), palette.color(0));
        assert_eq!(at(113), SKY_COLOR);
        assert_eq!(at(40), SKY_COLOR);

        // The leftmost ray diverges from the spike's bearing entirely.
        let edge = |row: usize| fb.pixels()[row * width as usize];
        for row in 0..200 {
            assert_ne!(edge(row), palette.color(1), "spike bled into column 0");
        }
    }

    #[test]
    fn march_past_the_map_edge_resamples_toroidally() {
        // With zfar beyond the map side the center ray wraps and crosses
        // the spike cell again at z = 74 (106 & 63 = 42), where it projects
        // to (100 - 80) / 74 * 40 + 50 ≈ 60.8 and repaints rows up to the
        // flat terrain painted so far.
        let map = spike_map(64);
        let palette = grayscale_palette();
        let mut camera = level_camera();
        camera.horizon = 50.0;

        let width = 64u32;
        let mut fb = Framebuffer::new(width, 200);
        render_frame(&camera, &map, &palette, &mut fb);

        let center = (width / 2) as usize;
        let at = |row: usize| fb.pixels()[row * width as usize + center];
        // First crossing at z = 10, exactly as in the short-march scenario.
        assert_eq!(at(130), palette.color(1));
        assert_eq!(at(199), palette.color(1));
        assert_eq!(at(129), palette.color(0));
        // Second crossing: rows between ~61 and the z = 73 flat sample
        // ((95/73)*40 + 50 ≈ 102.0) hold the spike color again.
        assert_eq!(at(100), palette.color(1));
        assert_eq!(at(70), palette.color(1));
    }

    #[test]
    fn tall_near_terrain_blanks_nothing_above_screen() {
        // Terrain far above the camera pushes proj negative; the fill must
        // clamp at row 0 and still cover the full column exactly once.
        let map = flat_map(64, 255);
        let palette = grayscale_palette();
        let mut camera = level_camera();
        camera.height = 50.0;
        camera.horizon = 10.0;
        let mut sink = RecordingSink::new(4, 64);
        render_frame(&camera, &map, &palette, &mut sink);

        for col in 0..4 {
            let mut rows: Vec<u32> = sink.column(col).iter().map(|&(row, _)| row).collect();
            rows.sort_unstable();
            rows.dedup();
            assert_eq!(rows, (0..64).collect::<Vec<u32>>());
        }
    }
}
