//! Wall-clock pacing for the simulation tick
//!
//! Every tick advances the world by the same fixed step. The accumulator
//! decides how many of those steps are due for the real time that has
//! passed. Headless runs skip this entirely and step as fast as the CPU
//! allows.

use std::time::{Duration, Instant};

const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Fixed timestep accumulator
pub struct TickLoop {
    accumulator: Duration,
    last_frame_time: Instant,
}

impl TickLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
        }
    }

    /// Begin a new frame, returns the number of fixed ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        self.accumulator += now.duration_since(self.last_frame_time);
        self.last_frame_time = now;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Drop whatever could not be caught up; the simulation runs slow instead
        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!(
                "Tick loop fell behind by {:?}, dropping backlog",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        ticks
    }

    /// Time until the next tick is due
    pub fn time_to_next_tick(&self) -> Duration {
        FIXED_TIMESTEP_DURATION.saturating_sub(self.accumulator)
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::FIXED_TIMESTEP;
    use std::thread;

    #[test]
    fn test_step_duration_matches_physics_timestep() {
        assert!((FIXED_TIMESTEP_DURATION.as_secs_f32() - FIXED_TIMESTEP).abs() < 1e-5);
    }

    #[test]
    fn test_no_tick_before_step_elapsed() {
        let mut tick_loop = TickLoop::new();
        assert_eq!(tick_loop.begin_frame(), 0);
        assert!(tick_loop.time_to_next_tick() <= FIXED_TIMESTEP_DURATION);
    }

    #[test]
    fn test_tick_after_one_step_of_sleep() {
        let mut tick_loop = TickLoop::new();
        thread::sleep(FIXED_TIMESTEP_DURATION);

        let ticks = tick_loop.begin_frame();
        assert!(ticks >= 1);
        assert!(ticks <= MAX_TICKS_PER_FRAME);
    }

    #[test]
    fn test_max_ticks_limit_drops_backlog() {
        let mut tick_loop = TickLoop::new();

        // 300ms would allow 18 ticks
        thread::sleep(Duration::from_millis(300));

        assert_eq!(tick_loop.begin_frame(), MAX_TICKS_PER_FRAME);
        assert_eq!(tick_loop.time_to_next_tick(), FIXED_TIMESTEP_DURATION);
    }
}
