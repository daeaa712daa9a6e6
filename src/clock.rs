use std::thread;
use std::time::{Duration, Instant};

/// Frame pacer and delta-time source.
///
/// `tick` blocks until at least the minimum frame duration has elapsed since
/// the previous tick, then reports the measured elapsed time in seconds.
/// Simulation code is parameterized purely by that dt, so tests can drive it
/// with fixed steps instead of a clock.
pub struct FrameClock {
    last: Instant,
    min_frame: Duration,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            last: Instant::now(),
            min_frame: Duration::from_secs(1) / target_fps.max(1),
        }
    }

    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.min_frame {
            thread::sleep(self.min_frame - elapsed);
        }
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt
    }
}
