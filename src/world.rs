use crate::camera::Camera;
use crate::camera_controller::CameraController;
use crate::clock::FrameClock;
use crate::framebuffer::Framebuffer;
use crate::palette::Palette;
use crate::raycast;
use crate::terrain::{self, TerrainMap};
use anyhow::Result;
use std::path::Path;

pub const SCREEN_WIDTH: u32 = 320;
pub const SCREEN_HEIGHT: u32 = 200;
pub const MAP_SIZE: u32 = 1024;
pub const TARGET_FPS: u32 = 30;

/// Everything the frame loop owns: simulation state, the read-only terrain,
/// and the CPU framebuffer the ray caster writes into.
pub struct World {
    pub camera: Camera,
    pub controller: CameraController,
    pub framebuffer: Framebuffer,
    terrain: TerrainMap,
    palette: Palette,
    clock: FrameClock,
}

impl World {
    /// Build the world, loading map images when paths are given and falling
    /// back to procedural terrain otherwise.
    pub fn new(map_paths: Option<(&Path, &Path)>) -> Result<Self> {
        let (terrain, palette) = match map_paths {
            Some((height, color)) => terrain::load(height, color)?,
            None => {
                log::info!("no map arguments, generating {0}x{0} procedural terrain", MAP_SIZE);
                terrain::generate(MAP_SIZE)?
            }
        };
        Ok(Self {
            camera: Camera::default(),
            controller: CameraController::default(),
            framebuffer: Framebuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            terrain,
            palette,
            clock: FrameClock::new(TARGET_FPS),
        })
    }

    /// One frame step: pace the clock, integrate held input, rasterize.
    pub fn update(&mut self) {
        let dt = self.clock.tick();
        self.camera.update(self.controller.intent(), dt);
        raycast::render_frame(&self.camera, &self.terrain, &self.palette, &mut self.framebuffer);
    }
}
