// Fixed-timestep frame clock for the match loop
//
// One logical tick per rendered frame, with a fixed timestep so combat timing
// windows behave the same regardless of render rate. Catch-up is capped to
// avoid a spiral of death after a stall.

use std::time::{Duration, Instant};

/// Target update rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of catch-up ticks per frame
const MAX_STEPS: u32 = 5;

/// Frame clock driving the match.
pub struct GameLoop {
    /// Accumulated time waiting to be consumed by fixed ticks
    accumulator: Duration,
    /// Time of the previous frame
    last_frame_time: Instant,
    /// Time when the loop started
    start_time: Instant,
    /// Frames seen so far
    frame_count: u64,
    /// Fixed ticks executed so far
    tick_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: now,
            start_time: now,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Begin a new frame; returns how many fixed ticks to run.
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // A stall longer than the catch-up budget is dropped, not replayed
        if ticks == MAX_STEPS {
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks as u64;
        ticks
    }

    /// The fixed timestep in seconds, for forwarding into updates.
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Wall-clock time since the loop started.
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.tick_count(), 0);
    }

    #[test]
    fn test_fixed_timestep() {
        let game_loop = GameLoop::new();
        assert!((game_loop.fixed_timestep() - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_frame_counting() {
        let mut game_loop = GameLoop::new();
        game_loop.begin_frame();
        game_loop.begin_frame();
        assert_eq!(game_loop.frame_count(), 2);
    }

    #[test]
    fn test_tick_accumulation() {
        let mut game_loop = GameLoop::new();
        thread::sleep(FIXED_TIMESTEP_DURATION);
        let ticks = game_loop.begin_frame();
        assert!(ticks <= MAX_STEPS);
        assert_eq!(game_loop.tick_count(), ticks as u64);
    }

    #[test]
    fn test_max_steps_limit() {
        let mut game_loop = GameLoop::new();
        // A 300 ms stall would otherwise owe ~18 ticks
        thread::sleep(Duration::from_millis(300));
        let ticks = game_loop.begin_frame();
        assert!(ticks <= MAX_STEPS);
    }

    #[test]
    fn test_elapsed_time() {
        let game_loop = GameLoop::new();
        thread::sleep(Duration::from_millis(10));
        assert!(game_loop.elapsed() >= Duration::from_millis(10));
    }
}
