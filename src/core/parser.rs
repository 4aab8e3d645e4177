//! # Deck Parser
//!
//! Turns raw deck text into a [`Deck`]. The scan is a two-state machine:
//!
//! ```text
//!            "```lang"                       "```"
//!   Normal ─────────────► InFence ─────────────────► Normal
//!     │                     │
//!     │ "---"               │ "---" or end of input
//!     ▼                     ▼
//!   close slide          ParseError::UnterminatedFence
//! ```
//!
//! Markup recognized in `Normal`:
//!
//! - `---` alone on a line closes the current slide
//! - `|Title` sets the slide title (first one wins, later ones are prose)
//! - `\g`, `\r`, ... switch the color until the next directive or end of line
//! - `\\` is a literal backslash

use std::fmt;

use super::deck::{CodeBlock, Color, Deck, Segment, Slide, StyledText};

pub const SLIDE_DELIMITER: &str = "---";
pub const TITLE_MARKER: char = '|';
pub const FENCE: &str = "```";
pub const COLOR_MARKER: char = '\\';
/// Info-string attribute that marks a code block as evaluable.
pub const EXEC_ATTRIBUTE: &str = "+exec";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A fence was opened but the slide or input ended first.
    UnterminatedFence,
    /// A color directive used a code that maps to no color.
    UnknownColor(char),
    /// A color marker was the last character on its line.
    DanglingColorMarker,
}

/// A malformed deck. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::UnterminatedFence => {
                write!(f, "line {}: code fence is never closed", self.line)
            }
            ParseErrorKind::UnknownColor(code) => {
                write!(f, "line {}: unknown color code '{code}'", self.line)
            }
            ParseErrorKind::DanglingColorMarker => {
                write!(f, "line {}: color marker at end of line", self.line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

enum ScanState {
    Normal,
    InFence {
        opened_at: usize,
        language: Option<String>,
        evaluable: bool,
        lines: Vec<String>,
    },
}

/// Accumulates the lines of the slide currently being scanned.
#[derive(Default)]
struct SlideBuilder {
    title: Option<StyledText>,
    segments: Vec<Segment>,
}

impl SlideBuilder {
    fn finish(self, index: usize) -> Slide {
        Slide {
            index,
            title: self.title,
            segments: self.segments,
        }
    }
}

/// Parse a whole deck.
pub fn parse(input: &str) -> Result<Deck, ParseError> {
    let mut slides = Vec::new();
    let mut current = SlideBuilder::default();
    let mut state = ScanState::Normal;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        state = match state {
            ScanState::Normal => {
                if line == SLIDE_DELIMITER {
                    let done = std::mem::take(&mut current);
                    slides.push(done.finish(slides.len()));
                    ScanState::Normal
                } else if let Some(info) = line.strip_prefix(FENCE) {
                    let (language, evaluable) = parse_info_string(info);
                    ScanState::InFence {
                        opened_at: line_no,
                        language,
                        evaluable,
                        lines: Vec::new(),
                    }
                } else if current.title.is_none()
                    && let Some(title) = line.strip_prefix(TITLE_MARKER)
                {
                    current.title = Some(resolve_colors(title.trim(), line_no)?);
                    ScanState::Normal
                } else {
                    let text = resolve_colors(line, line_no)?;
                    current.segments.push(Segment::PlainText(text));
                    ScanState::Normal
                }
            }
            ScanState::InFence {
                opened_at,
                language,
                evaluable,
                mut lines,
            } => {
                if line.trim_end() == FENCE {
                    current.segments.push(Segment::CodeBlock(CodeBlock {
                        language,
                        lines,
                        evaluable,
                    }));
                    ScanState::Normal
                } else if line == SLIDE_DELIMITER {
                    return Err(ParseError {
                        line: opened_at,
                        kind: ParseErrorKind::UnterminatedFence,
                    });
                } else {
                    lines.push(line.to_string());
                    ScanState::InFence {
                        opened_at,
                        language,
                        evaluable,
                        lines,
                    }
                }
            }
        };
    }

    if let ScanState::InFence { opened_at, .. } = state {
        return Err(ParseError {
            line: opened_at,
            kind: ParseErrorKind::UnterminatedFence,
        });
    }

    slides.push(current.finish(slides.len()));
    log::debug!("Parsed deck with {} slides", slides.len());
    Ok(Deck::from_nonempty(slides))
}

/// Splits a fence info string into its language tag and evaluable flag.
///
/// `rust +exec` → (`Some("rust")`, true); `+exec` alone has no language.
fn parse_info_string(info: &str) -> (Option<String>, bool) {
    let mut language = None;
    let mut evaluable = false;
    for word in info.split_whitespace() {
        if word == EXEC_ATTRIBUTE {
            evaluable = true;
        } else if language.is_none() {
            language = Some(word.to_string());
        }
    }
    (language, evaluable)
}

/// Resolves the color directives of one line. Color never carries over to
/// the next line; every line starts in `Color::Default`.
pub fn resolve_colors(text: &str, line: usize) -> Result<StyledText, ParseError> {
    let mut styled = StyledText::default();
    let mut color = Color::Default;
    let mut pending = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != COLOR_MARKER {
            pending.push(c);
            continue;
        }
        match chars.next() {
            None => {
                return Err(ParseError {
                    line,
                    kind: ParseErrorKind::DanglingColorMarker,
                });
            }
            Some(COLOR_MARKER) => pending.push(COLOR_MARKER),
            Some(code) => {
                let next = Color::from_code(code).ok_or(ParseError {
                    line,
                    kind: ParseErrorKind::UnknownColor(code),
                })?;
                styled.push(&pending, color);
                pending.clear();
                color = next;
            }
        }
    }
    styled.push(&pending, color);
    Ok(styled)
}
