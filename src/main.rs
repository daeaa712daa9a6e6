mod camera;
mod camera_controller;
mod clock;
mod framebuffer;
mod palette;
mod raycast;
mod renderer;
mod terrain;
mod world;

use anyhow::{Result, bail};
use renderer::State;
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};
use world::{SCREEN_HEIGHT, SCREEN_WIDTH, World};

struct App {
    window: Option<Arc<Window>>,
    state: Option<State>,
    world: World,
}

impl App {
    fn new(world: World) -> Self {
        Self { window: None, state: None, world }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title("Voxel Space")
                .with_inner_size(LogicalSize::new(SCREEN_WIDTH * 3, SCREEN_HEIGHT * 3));
            let window = match event_loop.create_window(window_attributes) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("failed to create window: {e:?}");
                    event_loop.exit();
                    return;
                }
            };
            self.window = Some(window.clone());

            match pollster::block_on(State::new(window, SCREEN_WIDTH, SCREEN_HEIGHT)) {
                Ok(state) => self.state = Some(state),
                Err(e) => {
                    log::error!("failed to create renderer: {e:?}");
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let window = match self.window.as_ref() {
            Some(w) => w,
            None => return,
        };
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        if id != window.id() {
            return;
        }

        if !self.world.controller.process_events(&event) {
            match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            logical_key: Key::Named(NamedKey::Escape),
                            ..
                        },
                    ..
                } => {
                    event_loop.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    state.resize(physical_size);
                    window.request_redraw();
                }
                WindowEvent::RedrawRequested => {
                    match state.present(&self.world.framebuffer) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => state.resize(state.size()),
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::warn!("present failed: {e:?}"),
                    }
                }
                _ => {}
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.world.update();
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn map_paths_from_args() -> Result<Option<(PathBuf, PathBuf)>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(None),
        [height, color] => Ok(Some((PathBuf::from(height), PathBuf::from(color)))),
        _ => bail!("usage: voxelspace [<height-map-image> <color-map-image>]"),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let paths = map_paths_from_args()?;
    let world = World::new(paths.as_ref().map(|(h, c)| (h.as_path(), c.as_path())))?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(world);
    event_loop.run_app(&mut app)?;
    Ok(())
}
