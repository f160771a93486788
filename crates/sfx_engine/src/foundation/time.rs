//! Frame timing

use std::time::{Duration, Instant};

/// Frame timer
///
/// Measures the time between consecutive [`Timer::update`] calls.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Start a new frame and return the seconds since the previous one
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Time left in the current frame for a target frame rate
    ///
    /// `None` when uncapped (`target_fps == 0`) or already over budget.
    pub fn remaining_budget(&self, target_fps: u32) -> Option<Duration> {
        if target_fps == 0 {
            return None;
        }
        let budget = Duration::from_secs_f64(1.0 / f64::from(target_fps));
        budget.checked_sub(self.last_frame.elapsed())
    }

    /// Sleep out the rest of the frame for a target frame rate
    pub fn wait_for_next_frame(&self, target_fps: u32) {
        if let Some(remaining) = self.remaining_budget(target_fps) {
            std::thread::sleep(remaining);
        }
    }
}
