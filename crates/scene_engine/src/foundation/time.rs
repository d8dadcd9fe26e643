//! Time management utilities

use std::time::{Duration, Instant};

/// Application clock handing out the time value passed to `SceneGraph::update`.
///
/// In fixed-step mode every tick advances by the same amount, which keeps
/// controller-driven animation deterministic for headless runs.
pub struct FrameClock {
    last_frame: Instant,
    fixed_step: Option<f64>,
    delta_time: f64,
    total_time: f64,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock driven by wall time
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            fixed_step: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Create a clock that advances by `step` seconds per tick
    pub fn fixed(step: f64) -> Self {
        Self {
            fixed_step: Some(step),
            ..Self::new()
        }
    }

    /// Advance the clock (call once per frame) and return the new total time
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        self.delta_time = match self.fixed_step {
            Some(step) => step,
            None => now.duration_since(self.last_frame).as_secs_f64(),
        };
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.total_time
    }

    /// Time since the previous tick in seconds
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Total elapsed application time
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let running = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + running
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}
