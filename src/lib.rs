//! Pong - two paddles, one ball, fixed timestep
//!
//! Core modules:
//! - `sim`: Simulation (wall collision, paddles, ball, serve, scoring, timestep)
//! - `renderer`: Scene building, wgpu pipeline and software rasterizer
//! - `input`: Fixed keyboard bindings
//! - `config`: JSON settings plus CLI overrides
//! - `app`: winit event loop gluing the above together

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod math;
pub mod renderer;
pub mod sim;

pub use config::{Backend, Config, Demo};
pub use error::PongError;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Arena (and default window) size in pixels
    pub const SCREEN_WIDTH: u32 = 1280;
    pub const SCREEN_HEIGHT: u32 = 720;

    /// Ball rectangle (width, height)
    pub const BALL_SIZE: Vec2 = Vec2::new(10.0, 10.0);
    /// Paddle rectangle (width, height)
    pub const PADDLE_SIZE: Vec2 = Vec2::new(20.0, 50.0);
    /// Distance of each paddle centre from its side of the arena
    pub const PADDLE_INSET: f32 = 50.0;

    /// Paddle speed while a direction key is held (pixels/s)
    pub const PADDLE_SPEED: f32 = 200.0;
    /// Serve velocity, aimed at the receiving side (pixels/s)
    pub const BALL_SERVE_VELOCITY: Vec2 = Vec2::new(800.0, 0.0);
    /// Steepest paddle deflection as a fraction of horizontal speed
    pub const PADDLE_DEFLECTION: f32 = 0.75;

    /// Fixed simulation timestep (60 Hz, 16666 µs)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Checkerboard demo texture edge (texels)
    pub const CHECKERBOARD_SIZE: u32 = 128;
}
