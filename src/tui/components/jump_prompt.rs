//! # Jump Prompt
//!
//! Collects typed digits so the presenter can jump straight to a slide:
//! `1` `2` Enter goes to slide 12. Slide numbers are 1-based here and
//! converted to indices by the caller.

use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Digits beyond this are ignored; no deck is that long.
const MAX_DIGITS: usize = 6;

#[derive(Debug, Default)]
pub struct JumpPrompt {
    digits: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum JumpEvent {
    /// Go to this 1-based slide number.
    Go(i64),
    Cancelled,
}

impl JumpPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.digits.is_empty()
    }

    pub fn input(&self) -> Option<String> {
        self.is_active().then(|| self.digits.clone())
    }
}

impl EventHandler for JumpPrompt {
    type Event = JumpEvent;

    /// Consumes digits, and Enter/Backspace/Esc while a number is being typed.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<JumpEvent> {
        match event {
            TuiEvent::Digit(c) => {
                if self.digits.len() < MAX_DIGITS {
                    self.digits.push(*c);
                }
                None
            }
            TuiEvent::Submit if self.is_active() => {
                let number = self.digits.parse::<i64>().unwrap_or(1);
                self.digits.clear();
                Some(JumpEvent::Go(number))
            }
            TuiEvent::Backspace if self.is_active() => {
                self.digits.pop();
                None
            }
            TuiEvent::Escape if self.is_active() => {
                self.digits.clear();
                Some(JumpEvent::Cancelled)
            }
            _ => None,
        }
    }
}
