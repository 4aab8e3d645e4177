//! # Actions
//!
//! Everything the presenter can do becomes an `Action`.
//! Right arrow? That's `Action::Next`. Pressing `e`? `Action::ToggleEvaluation`.
//!
//! `update()` applies an action to the [`Presentation`] and returns an
//! [`Effect`] telling the event loop what to do next. No I/O happens here;
//! evaluations are requested by the renderer, not by actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::state::Presentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    First,
    Last,
    /// Jump to a 0-based slide index. Out-of-range values clamp.
    GoTo(i64),
    ToggleEvaluation,
    /// Forget the current slide's results so they are evaluated again.
    Rerun,
    ToggleHelp,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Redraw,
    Quit,
}

pub fn update(state: &mut Presentation, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Next => slide_changed(state, |s| s.navigator.next()),
        Action::Previous => slide_changed(state, |s| s.navigator.previous()),
        Action::First => slide_changed(state, |s| s.navigator.go_to(0)),
        Action::Last => slide_changed(state, |s| s.navigator.go_to(i64::MAX)),
        Action::GoTo(index) => slide_changed(state, |s| s.navigator.go_to(index)),
        Action::ToggleEvaluation => {
            state.evaluating = !state.evaluating;
            if !state.evaluating {
                state.clear_results();
            }
            state.status_message = if state.evaluating {
                String::from("Evaluation on")
            } else {
                String::from("Evaluation off")
            };
            Effect::Redraw
        }
        Action::Rerun => {
            if !state.evaluating {
                state.status_message = String::from("Evaluation is off (press e)");
                return Effect::Redraw;
            }
            state.clear_results();
            state.status_message = String::from("Re-running code");
            Effect::Redraw
        }
        Action::ToggleHelp => {
            state.show_help = !state.show_help;
            Effect::Redraw
        }
        Action::Quit => Effect::Quit,
    }
}

/// Runs a navigator move; results belong to one slide, so a real move drops them.
fn slide_changed(state: &mut Presentation, mv: impl FnOnce(&mut Presentation) -> bool) -> Effect {
    if mv(state) {
        state.clear_results();
        state.show_help = false;
        state.status_message.clear();
        Effect::Redraw
    } else {
        Effect::None
    }
}
