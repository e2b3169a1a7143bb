//! Key handling for terminal environments.
//!
//! Two handler sets exist with exactly one active at a time: gameplay keys,
//! and the reduced pause-menu set that blocks everything else. The held
//! state of the jump family is tracked with a timeout so terminals that
//! never emit key-release events still release the hold; key repeats
//! refresh the stamp.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::GameAction;

/// Hold expiry when no release events arrive. Longer than a terminal's
/// initial auto-repeat delay, so a genuinely held key never flickers.
const DEFAULT_HOLD_TIMEOUT_MS: u64 = 550;

const JUMP_KEYS: &[KeyCode] = &[
    KeyCode::Char(' '),
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
];

/// Which key map is live. Swapped when pausing/unpausing; the render task
/// only ever observes one set active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerSet {
    Gameplay,
    PauseMenu,
}

/// Global quit chord, honored in both handler sets.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL))
        || matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
}

#[derive(Debug, Clone)]
pub struct InputHandler {
    jump_down: bool,
    last_jump_event: Instant,
    hold_timeout_ms: u64,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            jump_down: false,
            last_jump_event: Instant::now(),
            hold_timeout_ms: DEFAULT_HOLD_TIMEOUT_MS,
        }
    }

    pub fn with_hold_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.hold_timeout_ms = timeout_ms;
        self
    }

    /// Map a key press through the active handler set.
    pub fn handle_key_press(&mut self, set: HandlerSet, code: KeyCode) -> Option<GameAction> {
        if JUMP_KEYS.contains(&code) {
            self.jump_down = true;
            self.last_jump_event = Instant::now();
        }

        match set {
            HandlerSet::Gameplay => match code {
                c if JUMP_KEYS.contains(&c) => Some(GameAction::Jump),
                KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(GameAction::Pause),
                KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameAction::CheckpointAdd),
                KeyCode::Char('x') | KeyCode::Char('X') => Some(GameAction::CheckpointRemove),
                KeyCode::Char('t') | KeyCode::Char('T') => Some(GameAction::TogglePractice),
                KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),
                _ => None,
            },
            // Paused: resume or quit, everything else is blocked.
            HandlerSet::PauseMenu => match code {
                KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc | KeyCode::Char(' ') => {
                    Some(GameAction::Pause)
                }
                _ => None,
            },
        }
    }

    /// Key repeats only refresh the hold stamp.
    pub fn handle_key_repeat(&mut self, code: KeyCode) {
        if JUMP_KEYS.contains(&code) {
            self.jump_down = true;
            self.last_jump_event = Instant::now();
        }
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if JUMP_KEYS.contains(&code) {
            self.jump_down = false;
        }
    }

    /// Polled held-state of the jump family, with auto-release when no
    /// events arrived within the timeout.
    pub fn jump_held(&mut self) -> bool {
        if self.jump_down
            && self.last_jump_event.elapsed().as_millis() as u64 > self.hold_timeout_ms
        {
            self.jump_down = false;
        }
        self.jump_down
    }

    pub fn reset(&mut self) {
        self.jump_down = false;
        self.last_jump_event = Instant::now();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
