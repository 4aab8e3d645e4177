//! # Slide Renderer
//!
//! Turns a [`Slide`] into the exact lines to put on screen. This is a pure
//! function of (slide, width, evaluation mode, cached results): calling it
//! twice with the same inputs gives the same lines and never runs code.
//!
//! ```text
//!              Centered Title
//!
//! Prose wrapped to the terminal width, colors
//! carried across the wrap.
//!
//! ╭── python ── +exec
//! │ print("hi")
//! ├── output
//! │ hi
//! ╰──
//! ```
//!
//! Code is never reflowed. Lines wider than the frame are cut and marked
//! with `…`.

use std::collections::HashMap;
use std::sync::LazyLock;

use ratatui::style::{Color as TermColor, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;
use unicode_width::UnicodeWidthStr;

use super::highlight::highlight;
use super::wrap::wrap_styled;
use crate::core::deck::{CodeBlock, Color, Segment, Slide, StyledText};
use crate::eval::EvaluationResult;

/// CSI and OSC escape sequences, plus the short two-byte escapes.
static ESCAPE_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-_]")
        .expect("escape sequence pattern is valid")
});

/// Narrowest width a slide is laid out for. Narrower terminals get this
/// width and clip, rather than an empty screen.
pub const MIN_RENDER_WIDTH: u16 = 20;

const FRAME: Style = Style::new().fg(TermColor::DarkGray);
const CODE_PREFIX: &str = "│ ";
const ELLIPSIS: &str = "…";

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlide {
    pub lines: Vec<Line<'static>>,
    /// Segment indices of evaluable blocks that still need a result.
    pub pending: Vec<usize>,
}

/// Maps a deck color to a terminal style. `Default` leaves the foreground unset.
pub fn color_style(color: Color) -> Style {
    let fg = match color {
        Color::Default => return Style::default(),
        Color::Black => TermColor::Black,
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Yellow => TermColor::Yellow,
        Color::Blue => TermColor::Blue,
        Color::Magenta => TermColor::Magenta,
        Color::Cyan => TermColor::Cyan,
        Color::White => TermColor::White,
    };
    Style::default().fg(fg)
}

pub fn render_slide(
    slide: &Slide,
    width: u16,
    evaluating: bool,
    results: &HashMap<usize, EvaluationResult>,
) -> RenderedSlide {
    let width = width.max(MIN_RENDER_WIDTH) as usize;
    let mut lines = Vec::new();
    let mut pending = Vec::new();

    if let Some(title) = &slide.title {
        lines.extend(render_title(title, width));
        lines.push(Line::default());
    }

    for (index, segment) in slide.segments.iter().enumerate() {
        match segment {
            Segment::PlainText(text) => lines.extend(render_prose(text, width, Style::default())),
            Segment::CodeBlock(block) => {
                let result = results.get(&index);
                let awaiting = evaluating && block.evaluable && result.is_none();
                if awaiting {
                    pending.push(index);
                }
                lines.extend(render_code_block(block, width, result, awaiting));
            }
        }
    }

    RenderedSlide { lines, pending }
}

fn render_prose(text: &StyledText, width: usize, base: Style) -> Vec<Line<'static>> {
    wrap_styled(text, width)
        .into_iter()
        .map(|pieces| {
            Line::from(
                pieces
                    .into_iter()
                    .map(|(t, c)| Span::styled(t, base.patch(color_style(c))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn render_title(title: &StyledText, width: usize) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    render_prose(title, width, bold)
        .into_iter()
        .map(|mut line| {
            let pad = width.saturating_sub(line.width()) / 2;
            if pad > 0 {
                line.spans.insert(0, Span::raw(" ".repeat(pad)));
            }
            line
        })
        .collect()
}

fn render_code_block(
    block: &CodeBlock,
    width: usize,
    result: Option<&EvaluationResult>,
    awaiting: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(block.lines.len() + 4);

    let mut top = vec![Span::styled("╭──", FRAME)];
    if let Some(lang) = &block.language {
        top.push(Span::styled(" ", FRAME));
        top.push(Span::styled(lang.clone(), FRAME.add_modifier(Modifier::BOLD)));
        top.push(Span::styled(" ──", FRAME));
    }
    if block.evaluable {
        top.push(Span::styled(" +exec", FRAME.add_modifier(Modifier::ITALIC)));
    }
    lines.push(truncate_line(Line::from(top), width));

    let inner = width.saturating_sub(CODE_PREFIX.width());
    for spans in highlight(block.language.as_deref(), &block.lines) {
        lines.push(framed(spans, inner));
    }

    if awaiting {
        lines.push(Line::from(Span::styled("├── running…", FRAME)));
    } else if let Some(result) = result {
        lines.extend(render_result(result, inner));
    }

    lines.push(Line::from(Span::styled("╰──", FRAME)));
    lines
}

fn render_result(result: &EvaluationResult, inner: usize) -> Vec<Line<'static>> {
    let (label, style) = match result {
        EvaluationResult::Success { .. } => ("├── output", Style::default()),
        EvaluationResult::Failed { timed_out: true, .. } => {
            ("├── timed out", Style::default().fg(TermColor::Red))
        }
        EvaluationResult::Failed { .. } => ("├── error", Style::default().fg(TermColor::Red)),
    };
    let mut lines = vec![Line::from(Span::styled(label, FRAME))];

    let text = result.text();
    if text.is_empty() {
        let dim = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);
        lines.push(framed(vec![Span::styled("(no output)", dim)], inner));
        return lines;
    }
    for line in text.lines() {
        lines.push(framed(vec![Span::styled(clean_output_line(line), style)], inner));
    }
    lines
}

/// Makes one line of evaluator output safe to draw: escape sequences are
/// removed, a carriage return keeps only what was written after it, and
/// other control characters are dropped.
fn clean_output_line(line: &str) -> String {
    let visible = line.rsplit('\r').next().unwrap_or(line);
    ESCAPE_SEQUENCE
        .replace_all(visible, "")
        .chars()
        .filter_map(|c| match c {
            '\t' => Some("    ".to_string()),
            c if c.is_control() => None,
            c => Some(c.to_string()),
        })
        .collect()
}

/// Prefixes a code line with the frame border, cutting it to `inner` columns.
fn framed(spans: Vec<Span<'static>>, inner: usize) -> Line<'static> {
    let mut out = vec![Span::styled(CODE_PREFIX, FRAME)];
    out.extend(truncate_line(Line::from(spans), inner).spans);
    Line::from(out)
}

/// Cuts a line to `max` display columns, ending in `…` when anything was dropped.
fn truncate_line(line: Line<'static>, max: usize) -> Line<'static> {
    if line.width() <= max {
        return line;
    }
    let budget = max.saturating_sub(ELLIPSIS.width());
    let mut used = 0;
    let mut spans = Vec::new();
    let mut last_style = Style::default();

    for span in line.spans {
        last_style = span.style;
        let mut kept = String::new();
        for c in span.content.chars() {
            let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            kept.push(c);
        }
        let full = kept.len() == span.content.len();
        if !kept.is_empty() {
            spans.push(Span::styled(kept, span.style));
        }
        if !full {
            break;
        }
    }
    spans.push(Span::styled(ELLIPSIS, last_style));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn texts(rendered: &RenderedSlide) -> Vec<String> {
        rendered.lines.iter().map(line_text).collect()
    }

    fn first_slide(src: &str) -> Slide {
        parse(src).unwrap().slide(0).unwrap().clone()
    }

    #[test]
    fn title_is_centered_and_bold() {
        let slide = first_slide("| Hi\nbody");
        let out = render_slide(&slide, 20, false, &HashMap::new());
        let lines = texts(&out);
        assert_eq!(lines[0], format!("{}Hi", " ".repeat(9)));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "body");
        let title_span = out.lines[0].spans.last().unwrap();
        assert!(title_span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn late_title_is_drawn_first() {
        let slide = first_slide("Body\n|Title");
        let lines = texts(&render_slide(&slide, 20, false, &HashMap::new()));
        assert_eq!(lines, vec![format!("{}Title", " ".repeat(7)), String::new(), "Body".to_string()]);
    }

    #[test]
    fn title_keeps_its_color() {
        let slide = first_slide("|\\rAlert");
        let out = render_slide(&slide, 40, false, &HashMap::new());
        let title_span = out.lines[0].spans.last().unwrap();
        assert_eq!(title_span.style.fg, Some(TermColor::Red));
    }

    #[test]
    fn directives_leave_no_marker_characters() {
        let slide = first_slide("\\gHello\\rWorld");
        let out = render_slide(&slide, 40, false, &HashMap::new());
        assert_eq!(texts(&out), vec!["HelloWorld"]);
        assert_eq!(out.lines[0].spans[0].style.fg, Some(TermColor::Green));
        assert_eq!(out.lines[0].spans[1].style.fg, Some(TermColor::Red));
    }

    #[test]
    fn blank_lines_are_reproduced() {
        let slide = first_slide("a\n\nb");
        let out = render_slide(&slide, 40, false, &HashMap::new());
        assert_eq!(texts(&out), vec!["a", "", "b"]);
    }

    #[test]
    fn degenerate_width_falls_back_to_minimum() {
        let slide = first_slide("the quick brown fox jumps over the lazy dog");
        let narrow = render_slide(&slide, 3, false, &HashMap::new());
        let minimum = render_slide(&slide, MIN_RENDER_WIDTH, false, &HashMap::new());
        assert_eq!(narrow, minimum);
        assert!(narrow.lines.iter().all(|l| l.width() <= MIN_RENDER_WIDTH as usize));
        assert!(!narrow.lines.is_empty());
    }

    #[test]
    fn rewrap_follows_width() {
        let slide = first_slide("alpha beta gamma delta epsilon zeta");
        let wide = render_slide(&slide, 80, false, &HashMap::new());
        let narrow = render_slide(&slide, 20, false, &HashMap::new());
        assert_eq!(wide.lines.len(), 1);
        assert!(narrow.lines.len() > 1);
    }

    #[test]
    fn code_block_is_framed_not_wrapped() {
        let long = "x".repeat(60);
        let slide = first_slide(&format!("```\nshort\n{long}\n```"));
        let out = render_slide(&slide, 30, false, &HashMap::new());
        let lines = texts(&out);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "╭──");
        assert_eq!(lines[1], "│ short");
        assert!(lines[2].starts_with("│ xxx"));
        assert!(lines[2].ends_with('…'));
        assert_eq!(out.lines[2].width(), 30);
        assert_eq!(lines[3], "╰──");
    }

    #[test]
    fn code_whitespace_is_preserved() {
        let slide = first_slide("```\n  two  spaces\n```");
        let out = render_slide(&slide, 40, false, &HashMap::new());
        assert_eq!(texts(&out)[1], "│   two  spaces");
    }

    #[test]
    fn header_shows_language_and_exec() {
        let slide = first_slide("```sh +exec\necho hi\n```");
        let out = render_slide(&slide, 40, false, &HashMap::new());
        assert_eq!(texts(&out)[0], "╭── sh ── +exec");
    }

    #[test]
    fn evaluation_off_requests_nothing() {
        let slide = first_slide("```sh +exec\necho hi\n```");
        let out = render_slide(&slide, 40, false, &HashMap::new());
        assert!(out.pending.is_empty());
        assert!(!texts(&out).iter().any(|l| l.contains("running")));
    }

    #[test]
    fn evaluation_on_requests_missing_results() {
        let slide = first_slide("intro\n```sh +exec\necho hi\n```\n```sh\nnot evaluable\n```");
        let out = render_slide(&slide, 40, true, &HashMap::new());
        assert_eq!(out.pending, vec![1]);
        assert!(texts(&out).contains(&"├── running…".to_string()));
    }

    #[test]
    fn cached_result_is_rendered_and_not_requested() {
        let slide = first_slide("```sh +exec\necho hi\n```");
        let mut results = HashMap::new();
        results.insert(
            0,
            EvaluationResult::Success {
                output: "hi\nthere".into(),
            },
        );
        let first = render_slide(&slide, 40, true, &results);
        let second = render_slide(&slide, 40, true, &results);
        assert_eq!(first, second);
        assert!(first.pending.is_empty());
        assert_eq!(
            texts(&first),
            vec!["╭── sh ── +exec", "│ echo hi", "├── output", "│ hi", "│ there", "╰──"]
        );
    }

    #[test]
    fn failed_result_is_red() {
        let slide = first_slide("```sh +exec\nexit 3\n```");
        let mut results = HashMap::new();
        results.insert(
            0,
            EvaluationResult::Failed {
                message: "evaluation timed out after 1s".into(),
                timed_out: true,
            },
        );
        let out = render_slide(&slide, 40, true, &results);
        let lines = texts(&out);
        assert_eq!(lines[2], "├── timed out");
        assert_eq!(lines[3], "│ evaluation timed out after 1s");
        assert_eq!(out.lines[3].spans[1].style.fg, Some(TermColor::Red));
    }

    #[test]
    fn empty_output_is_labelled() {
        let slide = first_slide("```sh +exec\ntrue\n```");
        let mut results = HashMap::new();
        results.insert(0, EvaluationResult::Success { output: String::new() });
        let out = render_slide(&slide, 40, true, &results);
        assert!(texts(&out).contains(&"│ (no output)".to_string()));
    }

    #[test]
    fn control_sequences_stripped_from_output() {
        let slide = first_slide("```sh +exec\nprogress\n```");
        let mut results = HashMap::new();
        results.insert(
            0,
            EvaluationResult::Success {
                output: "10%\r100%\x1b[31mred\x1b[0m\n\x1b]0;title\x07done\x07!".into(),
            },
        );
        let lines = texts(&render_slide(&slide, 40, true, &results));
        assert_eq!(lines[3], "│ 100%red");
        assert_eq!(lines[4], "│ done!");
    }

    #[test]
    fn clean_output_keeps_tabs_as_spaces() {
        assert_eq!(clean_output_line("a\tb"), "a    b");
        assert_eq!(clean_output_line("\x1b[2Kcleared"), "cleared");
        assert_eq!(clean_output_line("old\r"), "");
    }

    #[test]
    fn truncate_handles_wide_chars() {
        let line = Line::from("日本語日本語");
        let cut = truncate_line(line, 7);
        assert_eq!(line_text(&cut), "日本語…");
        assert!(cut.width() <= 7);
    }
}
