//! Backend-independent draw list for one frame

use glam::Vec2;

use super::vertex::colors;
use crate::math::Rect;
use crate::sim::Snapshot;

/// A straight line segment in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    pub color: [f32; 4],
}

/// Everything drawn in a frame, in pixel coordinates of the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub clear: [f32; 4],
    pub rects: Vec<(Rect, [f32; 4])>,
    pub lines: Vec<Line>,
}

impl Scene {
    pub fn new(width: u32, height: u32, clear: [f32; 4]) -> Self {
        Self {
            width,
            height,
            clear,
            rects: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// The Pong board: centre line, both paddles and the ball
    pub fn from_snapshot(snapshot: &Snapshot, width: u32, height: u32) -> Self {
        let mut scene = Self::new(width, height, colors::BACKGROUND);

        let mid_x = width as f32 / 2.0;
        scene.lines.push(Line {
            from: Vec2::new(mid_x, 0.0),
            to: Vec2::new(mid_x, height as f32),
            color: colors::CENTER_LINE,
        });

        for paddle in &snapshot.paddles {
            scene.rects.push((*paddle, colors::PADDLE));
        }
        scene.rects.push((snapshot.ball, colors::BALL));

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::sim::GameState;

    #[test]
    fn test_board_layout() {
        let state = GameState::new(&RulesConfig::default(), 0);
        let scene = Scene::from_snapshot(&state.snapshot(), 1280, 720);

        assert_eq!(scene.clear, colors::BACKGROUND);
        assert_eq!(scene.lines.len(), 1);
        assert_eq!(scene.lines[0].from, Vec2::new(640.0, 0.0));
        assert_eq!(scene.lines[0].to, Vec2::new(640.0, 720.0));

        assert_eq!(scene.rects.len(), 3);
        assert_eq!(scene.rects[0].0, state.players[0].rect());
        assert_eq!(scene.rects[1].0, state.players[1].rect());
        assert_eq!(scene.rects[2].0, state.ball.rect());
    }
}
