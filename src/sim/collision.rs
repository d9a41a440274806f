//! Collision detection and response for axis-aligned rectangles
//!
//! Two checks drive the game: a rectangle against the arena boundary
//! (which edge was crossed, if any) and the ball against a paddle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PADDLE_DEFLECTION;
use crate::math::Rect;

/// Arena edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Up,
    Down,
}

impl Wall {
    /// Unit normal pointing back into the arena
    pub fn normal(self) -> Vec2 {
        match self {
            Wall::Left => Vec2::X,
            Wall::Right => Vec2::NEG_X,
            Wall::Up => Vec2::Y,
            Wall::Down => Vec2::NEG_Y,
        }
    }

    pub fn is_side(self) -> bool {
        matches!(self, Wall::Left | Wall::Right)
    }
}

/// Check which arena edge a (centre, size) rectangle has crossed
///
/// Edges are tested in a fixed priority order: left, up, right, down.
/// Touching an edge exactly is not a collision.
pub fn collided_with_wall(pos: Vec2, size: Vec2, width: u32, height: u32) -> Option<Wall> {
    let x_min = pos.x - 0.5 * size.x;
    let x_max = pos.x + 0.5 * size.x;
    let y_min = pos.y - 0.5 * size.y;
    let y_max = pos.y + 0.5 * size.y;

    if x_min < 0.0 {
        Some(Wall::Left)
    } else if y_min < 0.0 {
        Some(Wall::Up)
    } else if x_max > width as f32 {
        Some(Wall::Right)
    } else if y_max > height as f32 {
        Some(Wall::Down)
    } else {
        None
    }
}

/// Reflect velocity off an arena edge
///
/// The component along the wall normal always ends up pointing into the
/// arena, so a ball that is still outside on the next step keeps moving
/// inward instead of flipping back and forth.
pub fn reflect_off_wall(velocity: Vec2, wall: Wall) -> Vec2 {
    match wall {
        Wall::Left => Vec2::new(velocity.x.abs(), velocity.y),
        Wall::Right => Vec2::new(-velocity.x.abs(), velocity.y),
        Wall::Up => Vec2::new(velocity.x, velocity.y.abs()),
        Wall::Down => Vec2::new(velocity.x, -velocity.y.abs()),
    }
}

/// Whether the ball overlaps a paddle
#[inline]
pub fn paddle_hit(ball: &Rect, paddle: &Rect) -> bool {
    ball.intersects(paddle)
}

/// First point where a ball travelling from `start` to `end` touches the
/// paddle face it is moving toward
///
/// Returns the ball centre at contact. Covers steps long enough for the
/// ball to jump clean over the paddle, which an end-position overlap test
/// misses.
pub fn sweep_paddle(start: Vec2, end: Vec2, ball_size: Vec2, paddle: &Rect) -> Option<Vec2> {
    let dx = end.x - start.x;
    if dx == 0.0 {
        return None;
    }

    let gap = paddle.half_size().x + ball_size.x / 2.0;
    let face_x = if dx < 0.0 {
        paddle.center.x + gap
    } else {
        paddle.center.x - gap
    };

    let t = (face_x - start.x) / dx;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let y = start.y + (end.y - start.y) * t;
    let reach_y = paddle.half_size().y + ball_size.y / 2.0;
    if (y - paddle.center.y).abs() < reach_y {
        Some(Vec2::new(face_x, y))
    } else {
        None
    }
}

/// Send the ball back off a paddle
///
/// Horizontal speed is preserved and points away from the paddle centre.
/// The vertical component grows with the distance between the hit and the
/// paddle centre, up to `PADDLE_DEFLECTION` of the horizontal speed.
pub fn deflect_off_paddle(velocity: Vec2, ball: &Rect, paddle: &Rect) -> Vec2 {
    let speed_x = velocity.x.abs();
    let dir_x = if ball.center.x < paddle.center.x { -1.0 } else { 1.0 };

    let reach = paddle.half_size().y + ball.half_size().y;
    let offset = if reach > 0.0 {
        ((ball.center.y - paddle.center.y) / reach).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    Vec2::new(dir_x * speed_x, offset * speed_x * PADDLE_DEFLECTION)
}

/// Move the ball horizontally so it no longer overlaps the paddle
pub fn separate_from_paddle(ball: &Rect, paddle: &Rect) -> Vec2 {
    let gap = paddle.half_size().x + ball.half_size().x;
    let x = if ball.center.x < paddle.center.x {
        paddle.center.x - gap
    } else {
        paddle.center.x + gap
    };
    Vec2::new(x, ball.center.y)
}
