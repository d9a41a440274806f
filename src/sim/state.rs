//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::RulesConfig;
use crate::consts::*;
use crate::math::{Rect, lerp_vec2};

/// Which player (left paddle or right paddle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Horizontal direction pointing at this side's goal
    pub fn direction(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Ball resting at centre, waiting for the serve key
    Serve,
    /// Ball in motion
    Playing,
    /// A player reached the winning score
    GameOver { winner: Side },
}

/// One key's state over a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub ended_down: bool,
    pub half_transition_count: u32,
}

impl ButtonState {
    /// Record a key event
    pub fn process(&mut self, is_down: bool) {
        if self.ended_down != is_down {
            self.ended_down = is_down;
            self.half_transition_count += 1;
        }
    }

    /// Went down at some point during this frame, even if already released
    pub fn was_pressed(&self) -> bool {
        self.half_transition_count > 1 || (self.half_transition_count == 1 && self.ended_down)
    }
}

/// Direction keys for one paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub up: ButtonState,
    pub down: ButtonState,
}

/// A paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// (width, height)
    pub size: Vec2,
    pub score: u32,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    /// (width, height)
    pub size: Vec2,
    pub velocity: Vec2,
}

impl Ball {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub players: [Player; 2],
    pub ball: Ball,
    pub arena_width: u32,
    pub arena_height: u32,
    pub phase: GamePhase,
    /// Set once the serve key has fired; cleared when it is released
    pub serve_latched: bool,
    /// Side the next serve is aimed at
    pub server: Side,
    pub program_running: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Where the ball returns to on a reset
    ball_home: Vec2,
}

/// Initialise a game state with explicit positions and sizes
///
/// Scores start at zero, the ball is at rest and the program is running.
pub fn init_game_state(
    arena_width: u32,
    arena_height: u32,
    player1_pos: Vec2,
    player2_pos: Vec2,
    ball_pos: Vec2,
    player_size: Vec2,
    ball_size: Vec2,
) -> GameState {
    GameState {
        players: [
            Player {
                pos: player1_pos,
                size: player_size,
                score: 0,
            },
            Player {
                pos: player2_pos,
                size: player_size,
                score: 0,
            },
        ],
        ball: Ball {
            pos: ball_pos,
            size: ball_size,
            velocity: Vec2::ZERO,
        },
        arena_width,
        arena_height,
        phase: GamePhase::Serve,
        serve_latched: false,
        server: Side::Right,
        program_running: true,
        time_ticks: 0,
        ball_home: ball_pos,
    }
}

impl GameState {
    /// Standard layout: paddles inset from each side, ball in the centre
    ///
    /// The seed picks which side receives the first serve.
    pub fn new(rules: &RulesConfig, seed: u64) -> Self {
        let w = rules.arena_width;
        let h = rules.arena_height;
        let mid_y = h as f32 / 2.0;

        let mut state = init_game_state(
            w,
            h,
            Vec2::new(PADDLE_INSET, mid_y),
            Vec2::new(w as f32 - PADDLE_INSET, mid_y),
            Vec2::new(w as f32 / 2.0, mid_y),
            PADDLE_SIZE,
            BALL_SIZE,
        );

        let mut rng = Pcg32::seed_from_u64(seed);
        state.server = if rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        state
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    /// Recentre the ball at rest; the next serve goes toward `towards`
    pub fn reset_ball(&mut self, towards: Side) {
        self.ball.pos = self.ball_home;
        self.ball.velocity = Vec2::ZERO;
        self.server = towards;
        self.phase = GamePhase::Serve;
    }

    /// Reset scores and the ball for a new match
    pub fn restart_match(&mut self) {
        for player in &mut self.players {
            player.score = 0;
        }
        let mid_y = self.arena_height as f32 / 2.0;
        for player in &mut self.players {
            player.pos.y = mid_y;
        }
        let towards = self.server;
        self.reset_ball(towards);
    }

    /// Positions and sizes needed to draw a frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            paddles: [self.players[0].rect(), self.players[1].rect()],
            ball: self.ball.rect(),
            scores: [self.players[0].score, self.players[1].score],
        }
    }
}

/// Render-facing view of the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub paddles: [Rect; 2],
    pub ball: Rect,
    pub scores: [u32; 2],
}

impl Snapshot {
    /// Blend two simulation states; `alpha` = 0 is `prev`, 1 is `curr`
    pub fn interpolate(prev: &Snapshot, curr: &Snapshot, alpha: f32) -> Snapshot {
        let blend = |a: &Rect, b: &Rect| Rect::from_center(lerp_vec2(a.center, b.center, alpha), b.size);
        Snapshot {
            paddles: [
                blend(&prev.paddles[0], &curr.paddles[0]),
                blend(&prev.paddles[1], &curr.paddles[1]),
            ],
            ball: blend(&prev.ball, &curr.ball),
            scores: curr.scores,
        }
    }
}
