//! Simulation module
//!
//! All gameplay logic lives here, free of windowing and rendering:
//! - Wall and paddle collision for axis-aligned rectangles
//! - Paddle movement, serve and scoring in `tick`
//! - Fixed/variable timestep bookkeeping and render interpolation

pub mod collision;
pub mod state;
pub mod tick;
pub mod timestep;

pub use collision::{Wall, collided_with_wall, reflect_off_wall};
pub use state::{
    Ball, ButtonState, GamePhase, GameState, Player, PlayerInput, Side, Snapshot, init_game_state,
};
pub use tick::{GameEvent, TickInput, tick};
pub use timestep::{FixedTimestep, FpsCounter, FrameClock, TimestepMode, micros_between};
