//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `StatusBar`: bottom line with slide position, exec mode and status
//! - `SlideView`: the rendered slide, vertically scrollable
//! - `HelpOverlay`: key binding popup
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `JumpPrompt`: collects digits for "go to slide N"

pub mod help_overlay;
pub mod jump_prompt;
pub mod slide_view;
pub mod status_bar;

pub use help_overlay::HelpOverlay;
pub use jump_prompt::{JumpEvent, JumpPrompt};
pub use slide_view::SlideView;
pub use status_bar::StatusBar;
