//! Game configuration
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files work. Command-line flags are applied on top in `main`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PongError, Result};
use crate::sim::TimestepMode;

/// How frames reach the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Scene geometry drawn by the GPU pipeline
    #[default]
    Gpu,
    /// Scene rasterized on the CPU, then presented as one image
    Software,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Gpu => "gpu",
            Backend::Software => "software",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gpu" | "opengl" | "gl" => Some(Backend::Gpu),
            "software" | "soft" | "cpu" => Some(Backend::Software),
            _ => None,
        }
    }
}

/// What the window shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Demo {
    #[default]
    Pong,
    /// Centred checkerboard texture, no simulation
    Checkerboard,
}

impl Demo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Demo::Pong => "pong",
            Demo::Checkerboard => "checkerboard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pong" => Some(Demo::Pong),
            "checkerboard" | "checker" => Some(Demo::Checkerboard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Wait for vertical blank when presenting
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pong".to_string(),
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            vsync: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepConfig {
    pub mode: TimestepMode,
    /// Simulation rate for the fixed and vsync-locked loops
    pub sim_hz: f32,
    pub max_substeps: u32,
    /// Longest frame delta fed to the simulation (seconds)
    pub max_frame_time: f32,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            mode: TimestepMode::Fixed,
            sim_hz: 1.0 / SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            max_frame_time: MAX_FRAME_TIME,
        }
    }
}

impl TimestepConfig {
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.sim_hz
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub arena_width: u32,
    pub arena_height: u32,
    /// Paddle speed (pixels/s)
    pub paddle_speed: f32,
    /// Horizontal serve speed (pixels/s)
    pub serve_speed: f32,
    /// Left/right walls score a point; when off the ball bounces off them
    pub score_on_side_walls: bool,
    /// First to this score wins (0 = endless)
    pub winning_score: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            arena_width: SCREEN_WIDTH,
            arena_height: SCREEN_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            serve_speed: BALL_SERVE_VELOCITY.x,
            score_on_side_walls: true,
            winning_score: 11,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub timestep: TimestepConfig,
    pub backend: Backend,
    pub demo: Demo,
    pub rules: RulesConfig,
    /// Fixed RNG seed (random per run when absent)
    pub seed: Option<u64>,
}

impl Config {
    /// Load from a JSON file, falling back to defaults when it doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| PongError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json).map_err(|source| PongError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values the game loop can't run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(PongError::InvalidConfig(msg.to_string()));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window size must be non-zero");
        }
        if self.rules.arena_width == 0 || self.rules.arena_height == 0 {
            return invalid("arena size must be non-zero");
        }
        if !(self.timestep.sim_hz.is_finite() && self.timestep.sim_hz > 0.0) {
            return invalid("timestep.sim_hz must be positive");
        }
        if self.timestep.max_substeps == 0 {
            return invalid("timestep.max_substeps must be at least 1");
        }
        if !(self.timestep.max_frame_time > 0.0) {
            return invalid("timestep.max_frame_time must be positive");
        }
        if !(self.rules.paddle_speed.is_finite() && self.rules.paddle_speed >= 0.0) {
            return invalid("rules.paddle_speed must be non-negative");
        }
        if !self.rules.serve_speed.is_finite() {
            return invalid("rules.serve_speed must be finite");
        }
        Ok(())
    }
}
