//! # Presentation State
//!
//! One explicit session object per loaded deck. Nothing here is global, so
//! tests (or several decks) can each own a `Presentation`.
//!
//! ```text
//! Presentation
//! ├── navigator: Navigator          // deck + cursor
//! ├── evaluating: bool              // run +exec blocks when shown
//! ├── results: HashMap<usize, EvaluationResult>  // current slide only
//! ├── status_message: String        // footer text
//! └── show_help: bool               // key help overlay
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs,
//! plus `store_result` from the event loop once the bridge answers.

use std::collections::HashMap;

use crate::core::deck::{Deck, Slide};
use crate::core::navigator::Navigator;
use crate::eval::EvaluationResult;

pub struct Presentation {
    pub navigator: Navigator,
    pub evaluating: bool,
    /// Results for the current slide, keyed by segment index.
    pub results: HashMap<usize, EvaluationResult>,
    pub status_message: String,
    pub show_help: bool,
}

impl Presentation {
    /// `start` is a 0-based slide index; it is clamped into the deck.
    pub fn new(deck: Deck, start: i64, evaluating: bool) -> Self {
        Self {
            navigator: Navigator::new(deck, start),
            evaluating,
            results: HashMap::new(),
            status_message: String::from("Press ? for help"),
            show_help: false,
        }
    }

    pub fn current_slide(&self) -> &Slide {
        self.navigator.current()
    }

    /// Records the result for one code block of the current slide.
    pub fn store_result(&mut self, segment: usize, result: EvaluationResult) {
        self.results.insert(segment, result);
    }

    /// Drops every cached result. Called whenever they stop describing
    /// what is on screen.
    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    /// `n/total` position label, 1-based.
    pub fn position_label(&self) -> String {
        format!("{}/{}", self.navigator.index() + 1, self.navigator.slide_count())
    }
}
