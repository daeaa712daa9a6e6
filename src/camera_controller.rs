use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Held-input state, one signed unit per axis.
///
/// This is latched state, not an event stream: an axis is ±1 while its key
/// is held and 0 once released.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ControlIntent {
    pub thrust: i8,
    pub turn: i8,
    pub pitch: i8,
    pub lift: i8,
}

/// Maps keyboard events to the four control intents.
///
/// Arrow up/down = thrust, arrow right/left = turn, S/W = pitch, E/D = lift.
#[derive(Default)]
pub struct CameraController {
    intent: ControlIntent,
}

impl CameraController {
    pub fn intent(&self) -> ControlIntent {
        self.intent
    }

    /// Returns true if the event was consumed.
    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        let WindowEvent::KeyboardInput { event: key_event, .. } = event else {
            return false;
        };
        let KeyEvent { state, logical_key, .. } = key_event;
        let held = |direction: i8| -> i8 {
            if *state == ElementState::Pressed { direction } else { 0 }
        };
        match logical_key {
            Key::Named(NamedKey::ArrowUp) => self.intent.thrust = held(1),
            Key::Named(NamedKey::ArrowDown) => self.intent.thrust = held(-1),
            Key::Named(NamedKey::ArrowRight) => self.intent.turn = held(1),
            Key::Named(NamedKey::ArrowLeft) => self.intent.turn = held(-1),
            Key::Character(c) => match c.to_lowercase().as_str() {
                "s" => self.intent.pitch = held(1),
                "w" => self.intent.pitch = held(-1),
                "e" => self.intent.lift = held(1),
                "d" => self.intent.lift = held(-1),
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}
