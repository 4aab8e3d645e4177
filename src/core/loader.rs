//! Reads a deck file from disk and parses it.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::core::deck::Deck;
use crate::core::parser::{ParseError, parse};

#[derive(Debug)]
pub enum LoadError {
    NotFound(PathBuf),
    Io(io::Error),
    Parse(ParseError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "deck not found: {}", path.display()),
            LoadError::Io(e) => write!(f, "could not read deck: {e}"),
            LoadError::Parse(e) => write!(f, "malformed deck: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

/// Load and parse the deck at `path`.
pub fn load_deck(path: &Path) -> Result<Deck, LoadError> {
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io(e),
    })?;
    let deck = parse(&contents)?;
    info!("Loaded {} slides from {}", deck.len(), path.display());
    Ok(deck)
}
