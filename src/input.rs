//! Keyboard bindings
//!
//! Player 1 uses W/S, player 2 uses I/K, Space serves and Escape quits.
//! Bindings are fixed.

use winit::keyboard::KeyCode;

use crate::sim::{ButtonState, PlayerInput, TickInput};

/// Game action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Player1Up,
    Player1Down,
    Player2Up,
    Player2Down,
    Serve,
    Quit,
}

impl Action {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            Action::Player1Up => 0,
            Action::Player1Down => 1,
            Action::Player2Up => 2,
            Action::Player2Down => 3,
            Action::Serve => 4,
            Action::Quit => 5,
        }
    }
}

/// Map a physical key to its action
pub fn map_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::KeyW => Some(Action::Player1Up),
        KeyCode::KeyS => Some(Action::Player1Down),
        KeyCode::KeyI => Some(Action::Player2Up),
        KeyCode::KeyK => Some(Action::Player2Down),
        KeyCode::Space => Some(Action::Serve),
        KeyCode::Escape => Some(Action::Quit),
        _ => None,
    }
}

/// Held-key state for every action
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    buttons: [ButtonState; Action::COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame: keep held state, forget transitions
    pub fn begin_frame(&mut self) {
        for button in &mut self.buttons {
            button.half_transition_count = 0;
        }
    }

    pub fn key_event(&mut self, action: Action, is_down: bool) {
        self.buttons[action.index()].process(is_down);
    }

    /// Forget everything held (e.g. on focus loss)
    pub fn release_all(&mut self) {
        self.buttons = Default::default();
    }

    pub fn button(&self, action: Action) -> ButtonState {
        self.buttons[action.index()]
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.button(action).ended_down
    }

    /// Build the simulation input for this frame
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            players: [
                PlayerInput {
                    up: self.button(Action::Player1Up),
                    down: self.button(Action::Player1Down),
                },
                PlayerInput {
                    up: self.button(Action::Player2Up),
                    down: self.button(Action::Player2Down),
                },
            ],
            // A tap shorter than a frame still serves
            serve: self.is_down(Action::Serve) || self.button(Action::Serve).was_pressed(),
            quit: self.is_down(Action::Quit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Action::Player1Up));
        assert_eq!(map_key(KeyCode::KeyS), Some(Action::Player1Down));
        assert_eq!(map_key(KeyCode::KeyI), Some(Action::Player2Up));
        assert_eq!(map_key(KeyCode::KeyK), Some(Action::Player2Down));
        assert_eq!(map_key(KeyCode::Space), Some(Action::Serve));
        assert_eq!(map_key(KeyCode::Escape), Some(Action::Quit));
        assert_eq!(map_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_tick_input_reflects_held_keys() {
        let mut keyboard = Keyboard::new();
        keyboard.key_event(Action::Player1Up, true);
        keyboard.key_event(Action::Player2Down, true);
        keyboard.key_event(Action::Serve, true);

        let input = keyboard.tick_input();
        assert!(input.players[0].up.ended_down);
        assert!(!input.players[0].down.ended_down);
        assert!(input.players[1].down.ended_down);
        assert!(input.serve);
        assert!(!input.quit);
    }

    #[test]
    fn test_begin_frame_keeps_held_keys() {
        let mut keyboard = Keyboard::new();
        keyboard.key_event(Action::Player1Down, true);
        assert!(keyboard.button(Action::Player1Down).was_pressed());

        keyboard.begin_frame();
        assert!(keyboard.is_down(Action::Player1Down));
        assert!(!keyboard.button(Action::Player1Down).was_pressed());

        keyboard.key_event(Action::Player1Down, false);
        assert!(!keyboard.is_down(Action::Player1Down));
    }

    #[test]
    fn test_tap_within_a_frame_serves() {
        let mut keyboard = Keyboard::new();
        keyboard.key_event(Action::Serve, true);
        keyboard.key_event(Action::Serve, false);
        assert!(keyboard.tick_input().serve);

        keyboard.begin_frame();
        assert!(!keyboard.tick_input().serve);
    }

    #[test]
    fn test_release_all() {
        let mut keyboard = Keyboard::new();
        keyboard.key_event(Action::Player2Up, true);
        keyboard.key_event(Action::Serve, true);
        keyboard.release_all();
        let input = keyboard.tick_input();
        assert!(!input.players[1].up.ended_down);
        assert!(!input.serve);
    }
}
