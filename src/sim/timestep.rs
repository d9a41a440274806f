//! Frame timing: fixed-step accumulator, wall clock and FPS counter

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};

/// How simulation time relates to frame time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimestepMode {
    /// Constant steps from an accumulator, rendering interpolates between them
    #[default]
    Fixed,
    /// One step per frame using the measured frame time
    Variable,
    /// One constant step per frame, relying on vsync for pacing
    VsyncLocked,
}

impl TimestepMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestepMode::Fixed => "fixed",
            TimestepMode::Variable => "variable",
            TimestepMode::VsyncLocked => "vsync-locked",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Some(TimestepMode::Fixed),
            "variable" | "var" => Some(TimestepMode::Variable),
            "vsync-locked" | "vsync" => Some(TimestepMode::VsyncLocked),
            _ => None,
        }
    }
}

/// Accumulator for the fixed-step loop
///
/// Each frame adds its elapsed time; the simulation then runs as many whole
/// steps as fit. The leftover fraction of a step becomes the interpolation
/// factor for rendering.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_substeps: u32,
    max_frame_time: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS, MAX_FRAME_TIME)
    }
}

impl FixedTimestep {
    pub fn new(dt: f32, max_substeps: u32, max_frame_time: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_substeps,
            max_frame_time,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Add a frame's elapsed time and return how many steps to simulate
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, self.max_frame_time);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_substeps {
            self.accumulator -= self.dt;
            steps += 1;
        }

        if steps == self.max_substeps && self.accumulator >= self.dt {
            // Fell behind: drop whole steps we will never catch up on
            let dropped = (self.accumulator / self.dt) as u32;
            log::debug!("Timestep fell behind, dropping {} steps", dropped);
            self.accumulator %= self.dt;
        }

        steps
    }

    /// Interpolation factor between the previous and current state, in [0, 1)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }
}

/// Monotonic frame clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Time since the previous call (or since construction), in whole microseconds
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = micros_between(self.last, now);
        self.last = now;
        Duration::from_micros(elapsed)
    }
}

/// Whole microseconds between two instants (zero if `end` is earlier)
pub fn micros_between(start: Instant, end: Instant) -> u64 {
    end.saturating_duration_since(start).as_micros() as u64
}

/// Frames-per-second counter, reporting once per elapsed second
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame; returns the fps figure whenever a second has passed
    pub fn frame(&mut self, frame_time: Duration) -> Option<u32> {
        self.frames += 1;
        self.elapsed += frame_time;

        if self.elapsed >= Duration::from_secs(1) {
            self.elapsed -= Duration::from_secs(1);
            let fps = self.frames;
            self.frames = 0;
            Some(fps)
        } else {
            None
        }
    }
}
