//! Frame rate counter shown in the main menu.

use std::time::Duration;

/// How often the shown numbers are recalculated.
const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Default)]
pub struct FrameCounter {
    /// Frames since the last update.
    frames: u32,
    /// Time since the last update.
    elapsed: Duration,
    fps: f32,
    /// Average frame time in milliseconds.
    ms: f32,
}

impl FrameCounter {
    pub fn tick(&mut self, dt: Duration) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= UPDATE_INTERVAL {
            let secs = self.elapsed.as_secs_f32();
            self.fps = self.frames as f32 / secs;
            self.ms = secs * 1000.0 / self.frames as f32;
            self.frames = 0;
            self.elapsed = Duration::ZERO;
        }
    }

    pub fn text(&self) -> String {
        format!("{:.2} FPS ({:.2} ms)", self.fps, self.ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_frames() {
        let mut counter = FrameCounter::default();
        assert_eq!(counter.text(), "0.00 FPS (0.00 ms)");

        for _ in 0..30 {
            counter.tick(Duration::from_micros(16_667));
        }
        assert_eq!(counter.text(), "60.00 FPS (16.67 ms)");
    }

    #[test]
    fn waits_for_interval() {
        let mut counter = FrameCounter::default();
        counter.tick(Duration::from_millis(100));
        assert_eq!(counter.text(), "0.00 FPS (0.00 ms)");
    }
}
