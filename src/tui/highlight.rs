//! Syntax highlighting for code blocks (syntect).

use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME_NAME: &str = "base16-ocean.dark";
const PLAIN_CODE: Style = Style::new().fg(Color::White);

/// Highlights code lines, one `Vec<Span>` per input line. Tabs expand to
/// four spaces. Unknown or missing languages come back in plain white.
pub fn highlight(language: Option<&str>, lines: &[String]) -> Vec<Vec<Span<'static>>> {
    let syntax = language.and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang));
    let theme = THEME_SET.themes.get(THEME_NAME);

    let (Some(syntax), Some(theme)) = (syntax, theme) else {
        return lines.iter().map(|l| plain_line(l)).collect();
    };

    let mut hl = HighlightLines::new(syntax, theme);
    lines
        .iter()
        .map(|line| {
            // The newline-aware syntaxes expect each line to end in '\n'.
            let with_newline = format!("{line}\n");
            match hl.highlight_line(&with_newline, &SYNTAX_SET) {
                Ok(ranges) => ranges
                    .into_iter()
                    .filter_map(|(style, frag)| {
                        let content = frag.trim_end_matches('\n').replace('\t', "    ");
                        if content.is_empty() {
                            return None;
                        }
                        let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                        Some(Span::styled(content, Style::default().fg(fg)))
                    })
                    .collect(),
                Err(e) => {
                    log::debug!("Highlighting failed, falling back to plain: {}", e);
                    plain_line(line)
                }
            }
        })
        .collect()
}

fn plain_line(line: &str) -> Vec<Span<'static>> {
    if line.is_empty() {
        return Vec::new();
    }
    vec![Span::styled(line.replace('\t', "    "), PLAIN_CODE)]
}
