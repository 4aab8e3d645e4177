//! Word wrapping for colored prose.
//!
//! Words are built from [`StyledText`] runs, so a single word may carry
//! several colors, and handed to textwrap's first-fit algorithm as
//! fragments. Each piece keeps its own color, which is what lets a color
//! run continue on the line after a wrap.

use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;
use unicode_width::UnicodeWidthChar;

use crate::core::deck::{Color, StyledText};

/// Tabs in prose are laid out as this many spaces.
pub const TAB_WIDTH: usize = 4;

/// A word plus the spaces that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledWord {
    pub pieces: Vec<(String, Color)>,
    pub width: usize,
    pub whitespace: usize,
}

impl StyledWord {
    fn push_char(&mut self, c: char, color: Color) {
        self.width += c.width().unwrap_or(0);
        match self.pieces.last_mut() {
            Some((text, last)) if *last == color => text.push(c),
            _ => self.pieces.push((c.to_string(), color)),
        }
    }

    fn is_blank(&self) -> bool {
        self.pieces.is_empty() && self.whitespace == 0
    }

    /// Splits a word wider than `max` into chunks of at most `max` columns.
    /// Only the final chunk keeps the trailing whitespace.
    fn split_to_width(self, max: usize) -> Vec<StyledWord> {
        if self.width <= max {
            return vec![self];
        }
        let mut chunks = Vec::new();
        let mut current = StyledWord::default();
        for (text, color) in self.pieces {
            for c in text.chars() {
                let w = c.width().unwrap_or(0);
                if current.width + w > max && current.width > 0 {
                    chunks.push(std::mem::take(&mut current));
                }
                current.push_char(c, color);
            }
        }
        current.whitespace = self.whitespace;
        chunks.push(current);
        chunks
    }
}

impl Fragment for StyledWord {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn whitespace_width(&self) -> f64 {
        self.whitespace as f64
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Breaks one line of styled text into words.
///
/// Leading indentation becomes a zero-width word whose whitespace is the
/// indent, so it survives on the first wrapped line.
pub fn split_words(text: &StyledText) -> Vec<StyledWord> {
    let mut words = Vec::new();
    let mut current = StyledWord::default();

    for run in &text.runs {
        for c in run.text.chars() {
            let spaces = match c {
                ' ' => 1,
                '\t' => TAB_WIDTH,
                _ => 0,
            };
            if spaces > 0 {
                current.whitespace += spaces;
                continue;
            }
            if current.whitespace > 0 {
                words.push(std::mem::take(&mut current));
            }
            current.push_char(c, run.color);
        }
    }
    if !current.is_blank() {
        words.push(current);
    }
    words
}

/// Wraps styled text to `width` columns. An empty input yields one empty line.
///
/// Every returned line is a list of (text, color) pieces; adjacent pieces of
/// the same color are merged. Trailing whitespace on a line is dropped.
pub fn wrap_styled(text: &StyledText, width: usize) -> Vec<Vec<(String, Color)>> {
    let width = width.max(1);
    let mut words: Vec<StyledWord> = split_words(text)
        .into_iter()
        .flat_map(|w| w.split_to_width(width))
        .collect();
    if words.is_empty() {
        return vec![Vec::new()];
    }
    // Indentation shrinks so the first word still starts on the first line.
    if let [indent, first, ..] = words.as_mut_slice()
        && indent.pieces.is_empty()
    {
        indent.whitespace = indent.whitespace.min(width.saturating_sub(first.width));
    }

    wrap_first_fit(&words, &[width as f64])
        .into_iter()
        .map(|line| {
            let mut pieces: Vec<(String, Color)> = Vec::new();
            for (i, word) in line.iter().enumerate() {
                for (text, color) in &word.pieces {
                    push_piece(&mut pieces, text, *color);
                }
                if i + 1 < line.len() && word.whitespace > 0 {
                    let color = word.pieces.last().map(|(_, c)| *c).unwrap_or_default();
                    push_piece(&mut pieces, &" ".repeat(word.whitespace), color);
                }
            }
            pieces
        })
        .collect()
}

fn push_piece(pieces: &mut Vec<(String, Color)>, text: &str, color: Color) {
    match pieces.last_mut() {
        Some((last, c)) if *c == color => last.push_str(text),
        _ => pieces.push((text.to_string(), color)),
    }
}
