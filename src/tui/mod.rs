//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders slides,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One event at a time, each processed to completion:
//!
//! ```text
//! draw ──► pending evaluations? ──yes──► Bridge (bounded by timeout) ──► draw again
//!   │              │
//!   │              no
//!   ▼              ▼
//! wait for key ◄───┘
//! ```
//!
//! Keys pressed while code is running stay queued in the terminal and are
//! handled once the evaluation has finished or timed out, so output never
//! lands on the wrong slide.

mod component;
mod components;
mod event;
pub mod highlight;
pub mod render;
mod ui;
pub mod wrap;

use log::{debug, info};
use std::io::stdout;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::state::Presentation;
use crate::eval::Bridge;
use crate::tui::component::EventHandler;
use crate::tui::components::{JumpEvent, JumpPrompt};
use crate::tui::event::{TuiEvent, poll_event_timeout};

/// How long to wait for a key before looping again.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core state)
pub struct TuiState {
    /// Vertical scroll within the current slide
    pub scroll: u16,
    pub jump: JumpPrompt,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            jump: JumpPrompt::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), Hide)?;
        info!("Terminal modes enabled (hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// Presents the deck until the presenter quits.
///
/// Must be called from inside a multi-threaded tokio runtime; evaluations
/// block this thread via `block_in_place`.
pub fn run(mut presentation: Presentation, bridge: Bridge, min_width: u16) -> std::io::Result<()> {
    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    let mut tui = TuiState::new();
    let mut needs_redraw = true;

    let result = loop {
        if needs_redraw {
            let mut pending = Vec::new();
            if let Err(e) =
                terminal.draw(|f| pending = ui::draw_ui(f, &presentation, &mut tui, min_width))
            {
                break Err(e);
            }
            if !pending.is_empty() {
                // The "running…" frame is on screen; evaluate, then draw again.
                evaluate_pending(&mut presentation, &bridge, &pending);
                continue;
            }
            needs_redraw = false;
        }

        let Some(event) = poll_event_timeout(IDLE_POLL) else {
            continue;
        };

        match handle_event(&mut presentation, &mut tui, event) {
            Effect::Quit => break Ok(()),
            Effect::Redraw => needs_redraw = true,
            Effect::None => {}
        }
    };

    ratatui::restore();
    result
}

/// Routes one input event. Returns what the loop should do next.
fn handle_event(presentation: &mut Presentation, tui: &mut TuiState, event: TuiEvent) -> Effect {
    if matches!(event, TuiEvent::ForceQuit) {
        return update(presentation, Action::Quit);
    }
    if matches!(event, TuiEvent::Resize) {
        return Effect::Redraw;
    }

    // The jump prompt gets first look at digits, Enter, Backspace and Esc.
    let was_typing = tui.jump.is_active();
    if let Some(jump) = tui.jump.handle_event(&event) {
        return match jump {
            JumpEvent::Go(number) => navigate(presentation, tui, Action::GoTo(number - 1)),
            JumpEvent::Cancelled => Effect::Redraw,
        };
    }
    if matches!(event, TuiEvent::Digit(_)) || (was_typing && matches!(event, TuiEvent::Backspace)) {
        return Effect::Redraw;
    }

    let action = match event {
        TuiEvent::Next => Action::Next,
        TuiEvent::Previous | TuiEvent::Backspace => Action::Previous,
        TuiEvent::First => Action::First,
        TuiEvent::Last => Action::Last,
        TuiEvent::ToggleEvaluation => Action::ToggleEvaluation,
        TuiEvent::Rerun => Action::Rerun,
        TuiEvent::ToggleHelp => Action::ToggleHelp,
        TuiEvent::Escape if presentation.show_help => Action::ToggleHelp,
        TuiEvent::Escape | TuiEvent::Quit => Action::Quit,
        TuiEvent::ScrollUp => {
            tui.scroll = tui.scroll.saturating_sub(1);
            return Effect::Redraw;
        }
        TuiEvent::ScrollDown => {
            // Clamped against the slide height on the next draw.
            tui.scroll = tui.scroll.saturating_add(1);
            return Effect::Redraw;
        }
        TuiEvent::Submit
        | TuiEvent::Digit(_)
        | TuiEvent::ForceQuit
        | TuiEvent::Resize => return Effect::None,
    };
    navigate(presentation, tui, action)
}

/// Applies an action, resetting the scroll when the slide changes.
fn navigate(presentation: &mut Presentation, tui: &mut TuiState, action: Action) -> Effect {
    let before = presentation.navigator.index();
    let effect = update(presentation, action);
    if presentation.navigator.index() != before {
        tui.scroll = 0;
    }
    effect
}

/// Evaluates the given code blocks of the current slide through the bridge,
/// one at a time, storing each result.
fn evaluate_pending(presentation: &mut Presentation, bridge: &Bridge, pending: &[usize]) {
    let slide = presentation.current_slide().clone();
    for &index in pending {
        let Some(crate::core::deck::Segment::CodeBlock(block)) = slide.segments.get(index) else {
            continue;
        };
        debug!("Evaluating segment {} of slide {}", index, slide.index);
        let result = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(bridge.evaluate(block))
        });
        presentation.store_result(index, result);
    }
}
