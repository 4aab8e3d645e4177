//! # Navigator
//!
//! A cursor over a [`Deck`]. Every move saturates at the deck's ends: there
//! is no wraparound and no out-of-range error.

use super::deck::{Deck, Slide};

#[derive(Debug)]
pub struct Navigator {
    deck: Deck,
    cursor: usize,
}

impl Navigator {
    /// Creates a navigator positioned at `start` (0-based), clamped into range.
    pub fn new(deck: Deck, start: i64) -> Self {
        let mut nav = Self { deck, cursor: 0 };
        nav.go_to(start);
        nav
    }

    pub fn index(&self) -> usize {
        self.cursor
    }

    /// Number of slides in the deck; never zero.
    pub fn slide_count(&self) -> usize {
        self.deck.len()
    }

    /// The slide under the cursor.
    pub fn current(&self) -> &Slide {
        // The cursor is clamped on every move, so this slot always exists.
        &self.deck.slides()[self.cursor]
    }

    /// Advances one slide. Returns whether the cursor moved.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.move_to(self.cursor.saturating_add(1).min(self.deck.last_index()))
    }

    /// Steps back one slide. Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        self.move_to(self.cursor.saturating_sub(1))
    }

    /// Jumps to `index`, clamped into `[0, len - 1]`. Returns whether the
    /// cursor moved.
    pub fn go_to(&mut self, index: i64) -> bool {
        let last = self.deck.last_index() as i64;
        let target = index.clamp(0, last) as usize;
        if target as i64 != index {
            log::debug!("Clamped slide jump {} to {}", index, target);
        }
        self.move_to(target)
    }

    fn move_to(&mut self, target: usize) -> bool {
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }
}
