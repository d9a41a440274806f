//! Simulation tick
//!
//! Advances the game by one timestep. The same function serves the fixed,
//! variable and vsync-locked loops; only the `dt` passed in differs.

use glam::Vec2;

use super::collision::{
    Wall, collided_with_wall, deflect_off_paddle, paddle_hit, reflect_off_wall,
    separate_from_paddle, sweep_paddle,
};
use super::state::{GamePhase, GameState, PlayerInput, Side};
use crate::config::RulesConfig;
use crate::math::Rect;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Left paddle first, right paddle second
    pub players: [PlayerInput; 2],
    /// Serve key currently held
    pub serve: bool,
    /// Quit requested
    pub quit: bool,
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WallBounce(Wall),
    PaddleHit(Side),
    Scored(Side),
    Served(Side),
    MatchWon(Side),
    /// Scores cleared after a finished match
    NewMatch,
}

/// Advance the game state by `dt` seconds
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    rules: &RulesConfig,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.quit {
        state.program_running = false;
        return events;
    }

    state.time_ticks += 1;

    if !input.serve {
        state.serve_latched = false;
    }

    if let GamePhase::GameOver { .. } = state.phase {
        if input.serve && !state.serve_latched {
            state.serve_latched = true;
            state.restart_match();
            events.push(GameEvent::NewMatch);
            log::info!("New match");
        }
        return events;
    }

    update_ball(state, rules, dt, &mut events);

    for (index, player_input) in input.players.iter().enumerate() {
        move_paddle(state, index, player_input, rules.paddle_speed, dt);
    }

    if input.serve && !state.serve_latched && state.phase == GamePhase::Serve {
        let towards = state.server;
        state.ball.velocity =
            Vec2::new(towards.direction() * rules.serve_speed.abs(), 0.0);
        state.serve_latched = true;
        state.phase = GamePhase::Playing;
        events.push(GameEvent::Served(towards));
    }

    events
}

/// Wall response, integration and paddle bounces for the ball
fn update_ball(state: &mut GameState, rules: &RulesConfig, dt: f32, events: &mut Vec<GameEvent>) {
    // Check before integrating so a wall hit this tick affects this tick's move
    if let Some(wall) = collided_with_wall(
        state.ball.pos,
        state.ball.size,
        state.arena_width,
        state.arena_height,
    ) {
        if wall.is_side() && rules.score_on_side_walls && state.phase == GamePhase::Playing {
            let scorer = match wall {
                Wall::Left => Side::Right,
                _ => Side::Left,
            };
            award_point(state, scorer, rules, events);
            return;
        }

        let reflected = reflect_off_wall(state.ball.velocity, wall);
        if reflected != state.ball.velocity {
            events.push(GameEvent::WallBounce(wall));
        }
        state.ball.velocity = reflected;
    }

    let start = state.ball.pos;
    state.ball.pos += dt * state.ball.velocity;

    for side in [Side::Left, Side::Right] {
        let paddle = state.players[side.index()].rect();

        if let Some(contact) = sweep_paddle(start, state.ball.pos, state.ball.size, &paddle) {
            let ball = Rect::from_center(contact, state.ball.size);
            state.ball.velocity = deflect_off_paddle(state.ball.velocity, &ball, &paddle);
            state.ball.pos = contact;
            events.push(GameEvent::PaddleHit(side));
            break;
        }

        let ball = state.ball.rect();
        if !paddle_hit(&ball, &paddle) {
            continue;
        }
        // Only bounce when the ball is heading into the paddle's face
        let toward_paddle = (paddle.center.x - ball.center.x) * state.ball.velocity.x > 0.0;
        if toward_paddle {
            state.ball.velocity = deflect_off_paddle(state.ball.velocity, &ball, &paddle);
            state.ball.pos = separate_from_paddle(&ball, &paddle);
            events.push(GameEvent::PaddleHit(side));
        }
    }
}

fn award_point(
    state: &mut GameState,
    scorer: Side,
    rules: &RulesConfig,
    events: &mut Vec<GameEvent>,
) {
    let player = &mut state.players[scorer.index()];
    player.score += 1;
    events.push(GameEvent::Scored(scorer));

    // Next serve goes toward the player who conceded
    state.reset_ball(scorer.opponent());

    if rules.winning_score > 0 && player_score(state, scorer) >= rules.winning_score {
        state.phase = GamePhase::GameOver { winner: scorer };
        events.push(GameEvent::MatchWon(scorer));
    }
}

fn player_score(state: &GameState, side: Side) -> u32 {
    state.player(side).score
}

/// Move one paddle from its held keys
///
/// A paddle touching the top edge cannot move further up and one touching
/// the bottom edge cannot move further down.
fn move_paddle(state: &mut GameState, index: usize, input: &PlayerInput, speed: f32, dt: f32) {
    let wall = collided_with_wall(
        state.players[index].pos,
        state.players[index].size,
        state.arena_width,
        state.arena_height,
    );

    let mut velocity_up = Vec2::new(0.0, -speed);
    let mut velocity_down = Vec2::new(0.0, speed);
    match wall {
        Some(Wall::Up) => velocity_up = Vec2::ZERO,
        Some(Wall::Down) => velocity_down = Vec2::ZERO,
        _ => {}
    }

    let player = &mut state.players[index];
    if input.up.ended_down {
        player.pos += dt * velocity_up;
    }
    if input.down.ended_down {
        player.pos += dt * velocity_down;
    }
}
