use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Navigation (passed to core::update)
    Next,
    Previous,
    First,
    Last,

    // Evaluation and overlays
    ToggleEvaluation,
    Rerun,
    ToggleHelp,

    // Jump-to-slide prompt
    Digit(char),
    Submit,
    Backspace,

    // TUI-local
    ScrollUp,
    ScrollDown,
    Escape,
    Quit,
    ForceQuit, // Ctrl+C always quits
    Resize,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(ev) => map_event(ev),
            Err(e) => {
                log::warn!("Failed to read terminal event: {}", e);
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            log::warn!("Failed to poll terminal events: {}", e);
            None
        }
    }
}

/// Translate a raw crossterm event into a `TuiEvent`.
pub fn map_event(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key) => map_key(key),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<TuiEvent> {
    // Only presses; some terminals also report releases and repeats
    if key.kind != KeyEventKind::Press {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (_, KeyCode::Right | KeyCode::PageDown) => Some(TuiEvent::Next),
        (_, KeyCode::Left | KeyCode::PageUp) => Some(TuiEvent::Previous),
        (_, KeyCode::Home) => Some(TuiEvent::First),
        (_, KeyCode::End) => Some(TuiEvent::Last),
        (_, KeyCode::Up) => Some(TuiEvent::ScrollUp),
        (_, KeyCode::Down) => Some(TuiEvent::ScrollDown),
        (_, KeyCode::Enter) => Some(TuiEvent::Submit),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        (_, KeyCode::Char(c)) => match c {
            ' ' | 'l' | 'n' => Some(TuiEvent::Next),
            'h' | 'p' => Some(TuiEvent::Previous),
            'g' => Some(TuiEvent::First),
            'G' => Some(TuiEvent::Last),
            'j' => Some(TuiEvent::ScrollDown),
            'k' => Some(TuiEvent::ScrollUp),
            'e' => Some(TuiEvent::ToggleEvaluation),
            'r' => Some(TuiEvent::Rerun),
            '?' => Some(TuiEvent::ToggleHelp),
            'q' => Some(TuiEvent::Quit),
            '0'..='9' => Some(TuiEvent::Digit(c)),
            _ => None,
        },
        _ => None,
    }
}
