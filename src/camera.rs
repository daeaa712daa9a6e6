use crate::camera_controller::ControlIntent;
use glam::Vec2;
use std::f32::consts::PI;

pub const TURN_RATE: f32 = 0.4; // rad/s
pub const MOVE_SPEED: f32 = 50.0; // map units/s
pub const PITCH_RATE: f32 = 40.0; // horizon rows/s
pub const LIFT_RATE: f32 = 40.0; // height units/s

/// First-person camera over the height field.
///
/// All fields are unbounded accumulators: `angle` is never normalized and
/// `height`/`horizon` are never clamped. `angle` is the heading in radians,
/// increasing clockwise.
pub struct Camera {
    pub pos: Vec2,
    pub height: f32,
    pub horizon: f32,
    pub zfar: f32,
    pub angle: f32,
}

impl Camera {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            height: 100.0,
            horizon: 100.0,
            zfar: 1000.0,
            angle: 1.5 * PI,
        }
    }

    /// Integrate one frame of held input over `dt` seconds.
    ///
    /// Turning is applied before thrust so motion follows the new heading,
    /// and thrust always moves along the heading (no strafing).
    pub fn update(&mut self, intent: ControlIntent, dt: f32) {
        self.angle += intent.turn as f32 * TURN_RATE * dt;
        self.pos += Vec2::from_angle(self.angle) * (intent.thrust as f32 * MOVE_SPEED * dt);
        self.horizon += intent.pitch as f32 * PITCH_RATE * dt;
        self.height += intent.lift as f32 * LIFT_RATE * dt;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::new(512.0, 512.0))
    }
}
