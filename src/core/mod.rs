//! # Core Presentation Logic
//!
//! Everything Podium knows about decks, independent of any terminal.
//!
//! ```text
//!   deck file ──► loader ──► parser ──► Deck
//!                                         │
//!                                         ▼
//!                    ┌─────────────────────────────────┐
//!                    │  Presentation (state)           │
//!                    │   • Navigator (cursor)          │
//!                    │   • evaluation mode + results   │
//!                    │                                 │
//!                    │  update(Action) -> Effect       │
//!                    └───────────────┬─────────────────┘
//!                                    │
//!                                    ▼
//!                          TUI adapter (ratatui)
//! ```
//!
//! ## Modules
//!
//! - [`deck`]: `Deck`, `Slide`, `Segment` and styled text
//! - [`parser`]: text → `Deck`
//! - [`navigator`]: the clamped slide cursor
//! - [`state`]: the `Presentation` struct, all session state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: `~/.podium/config.toml` plus env and CLI overrides

pub mod action;
pub mod config;
pub mod deck;
pub mod loader;
pub mod navigator;
pub mod parser;
pub mod state;
