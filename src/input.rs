//! Directional key state read once per frame by the game loop.

use std::time::{Duration, Instant};

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::types::Direction;

/// Last-write-wins map from direction to held state.
///
/// Every direction remembers when it was last pressed or repeated. Terminals with keyboard
/// enhancement report releases, which clear the entry; on other terminals a press keeps the
/// direction held for the latch window, and auto-repeat keeps refreshing it while the key stays
/// down.
#[derive(Clone, Debug)]
pub(crate) struct InputState {
    /// Last press of the up direction.
    up: Option<Instant>,
    /// Last press of the down direction.
    down: Option<Instant>,
    /// Last press of the left direction.
    left: Option<Instant>,
    /// Last press of the right direction.
    right: Option<Instant>,
    /// Whether release events arrive from the terminal.
    reports_release: bool,
    /// How long a press counts as held without a release event.
    latch: Duration,
}

impl InputState {
    /// Creates a state with no direction held.
    pub(crate) const fn new(reports_release: bool, latch: Duration) -> Self {
        Self {
            up: None,
            down: None,
            left: None,
            right: None,
            reports_release,
            latch,
        }
    }

    /// Applies a key event observed at `now`.
    ///
    /// Returns whether the key is bound to a direction; unbound keys leave the state untouched.
    pub(crate) fn apply(&mut self, key: KeyEvent, now: Instant) -> bool {
        let Some(direction) = direction_for(key.code) else {
            return false;
        };

        *self.slot(direction) = match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => Some(now),
            KeyEventKind::Release => None,
        };

        true
    }

    /// Returns whether the direction is held at `now`.
    pub(crate) fn is_held(&self, direction: Direction, now: Instant) -> bool {
        let pressed = match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        };

        pressed.is_some_and(|when| {
            self.reports_release || now.saturating_duration_since(when) < self.latch
        })
    }

    /// Returns every direction held at `now`, in resolution order.
    pub(crate) fn held(&self, now: Instant) -> Vec<Direction> {
        Direction::ORDER
            .into_iter()
            .filter(|&direction| self.is_held(direction, now))
            .collect()
    }

    /// Releases every direction.
    pub(crate) fn clear(&mut self) {
        for direction in Direction::ORDER {
            *self.slot(direction) = None;
        }
    }

    /// Returns the press slot of a direction.
    fn slot(&mut self, direction: Direction) -> &mut Option<Instant> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Maps a key to the direction it is bound to.
///
/// Arrow keys and `w`, `a`, `s`, `d` in either case are bound.
pub(crate) const fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Direction::Right),
        _ => None,
    }
}
