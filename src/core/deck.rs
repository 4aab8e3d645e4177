//! # Deck Model
//!
//! The parsed, read-only representation of a presentation.
//!
//! ```text
//! Deck
//! └── slides: Vec<Slide>
//!     ├── index: usize                // 0-based position in the deck
//!     ├── title: Option<StyledText>
//!     └── segments: Vec<Segment>
//!         ├── PlainText(StyledText)   // one source line, blank lines included
//!         └── CodeBlock(CodeBlock)    // raw lines, exact whitespace
//! ```
//!
//! Nothing in here changes after `parser::parse` returns. The only mutable
//! presentation state is the navigator's cursor.

/// Colors a color directive can select. `Default` means "whatever the
/// terminal's foreground is".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// Maps a directive code character (the letter after `\`) to a color.
    pub fn from_code(code: char) -> Option<Color> {
        match code {
            'd' => Some(Color::Default),
            'k' => Some(Color::Black),
            'r' => Some(Color::Red),
            'g' => Some(Color::Green),
            'y' => Some(Color::Yellow),
            'b' => Some(Color::Blue),
            'm' => Some(Color::Magenta),
            'c' => Some(Color::Cyan),
            'w' => Some(Color::White),
            _ => None,
        }
    }
}

/// A run of text drawn in a single color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub color: Color,
}

/// One line of prose after its color directives have been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    pub runs: Vec<StyledRun>,
}

impl StyledText {
    /// Appends text in the given color, merging with the previous run when
    /// the color is unchanged.
    pub fn push(&mut self, text: &str, color: Color) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut()
            && last.color == color
        {
            last.text.push_str(text);
            return;
        }
        self.runs.push(StyledRun {
            text: text.to_string(),
            color,
        });
    }

    /// The text with all color information dropped.
    pub fn plain(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A fenced code block. `lines` hold the source exactly as written between
/// the fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub lines: Vec<String>,
    pub evaluable: bool,
}

impl CodeBlock {
    /// The block's source, lines re-joined with `\n`.
    pub fn source(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    PlainText(StyledText),
    CodeBlock(CodeBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub index: usize,
    pub title: Option<StyledText>,
    pub segments: Vec<Segment>,
}

impl Slide {
    /// Evaluable code blocks on this slide, with their segment indices.
    pub fn evaluable_blocks(&self) -> impl Iterator<Item = (usize, &CodeBlock)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, seg)| match seg {
                Segment::CodeBlock(block) if block.evaluable => Some((i, block)),
                _ => None,
            })
    }
}

/// An ordered, non-empty list of slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    slides: Vec<Slide>,
}

#[allow(clippy::len_without_is_empty)]
impl Deck {
    /// Used by the parser, which always closes a final slide.
    pub(crate) fn from_nonempty(slides: Vec<Slide>) -> Self {
        debug_assert!(!slides.is_empty());
        Self { slides }
    }

    /// Never zero.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn last_index(&self) -> usize {
        self.slides.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_codes_resolve() {
        assert_eq!(Color::from_code('g'), Some(Color::Green));
        assert_eq!(Color::from_code('d'), Some(Color::Default));
        assert_eq!(Color::from_code('x'), None);
        assert_eq!(Color::from_code('G'), None);
    }

    #[test]
    fn styled_text_merges_same_color_runs() {
        let mut text = StyledText::default();
        text.push("Hel", Color::Red);
        text.push("lo", Color::Red);
        text.push("", Color::Blue);
        text.push("!", Color::Blue);
        assert_eq!(text.runs.len(), 2);
        assert_eq!(text.runs[0].text, "Hello");
        assert_eq!(text.plain(), "Hello!");
    }

    #[test]
    fn evaluable_blocks_reports_segment_indices() {
        let slide = Slide {
            index: 0,
            title: None,
            segments: vec![
                Segment::PlainText(StyledText::default()),
                Segment::CodeBlock(CodeBlock {
                    language: Some("sh".into()),
                    lines: vec!["echo hi".into()],
                    evaluable: true,
                }),
                Segment::CodeBlock(CodeBlock {
                    language: None,
                    lines: vec![],
                    evaluable: false,
                }),
            ],
        };
        let found: Vec<usize> = slide.evaluable_blocks().map(|(i, _)| i).collect();
        assert_eq!(found, vec![1]);
    }
}
