//! Fading history of recent player positions.

use std::collections::VecDeque;

use crate::types::Position;

/// Maximum number of positions kept in the trail.
pub(crate) const TRAIL_CAPACITY: usize = 5;

/// Bounded first-in first-out history of player positions.
///
/// The trail only feeds the renderer. It grows by one entry on frames where the player moved and
/// shrinks by one on frames where they did not, so it empties out after the player stands still
/// for a few frames.
#[derive(Clone, Debug, Default)]
pub(crate) struct Trail {
    /// Recorded positions, oldest first.
    positions: VecDeque<Position>,
}

impl Trail {
    /// Creates an empty trail.
    pub(crate) fn new() -> Self {
        Self {
            positions: VecDeque::with_capacity(TRAIL_CAPACITY + 1),
        }
    }

    /// Records the outcome of a frame.
    ///
    /// A moving frame appends the new position and evicts the oldest one once the trail holds more
    /// than [`TRAIL_CAPACITY`] entries. A still frame evicts the oldest entry, if any.
    pub(crate) fn record(&mut self, position: Position, moved: bool) {
        if moved {
            self.positions.push_back(position);
            if self.positions.len() > TRAIL_CAPACITY {
                let _ = self.positions.pop_front();
            }
        } else {
            let _ = self.positions.pop_front();
        }
    }

    /// Returns the number of recorded positions.
    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns an iterator over the recorded positions, oldest first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Position> + '_ {
        self.positions.iter()
    }
}
