//! # Help Overlay
//!
//! Centered popup listing the key bindings. Toggled with `?`, closed with
//! `?`, Esc, or any slide change.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::tui::component::Component;

pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("→ PgDn space l n", "next slide"),
    ("← PgUp Bksp h p", "previous slide"),
    ("Home g / End G", "first / last slide"),
    ("digits Enter", "go to slide number"),
    ("↑ ↓ / j k", "scroll a tall slide"),
    ("e", "toggle code evaluation"),
    ("r", "re-run code on this slide"),
    ("?", "toggle this help"),
    ("q Esc Ctrl+C", "quit"),
];

pub struct HelpOverlay;

impl Component for HelpOverlay {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let height = KEY_BINDINGS.len() as u16 + 4;
        let overlay = centered_rect(50, height, area);
        frame.render_widget(Clear, overlay);

        let key_width = KEY_BINDINGS.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        let lines: Vec<Line> = KEY_BINDINGS
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(
                        format!("{key:<key_width$}  "),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*action),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Keys ")
            .padding(Padding::uniform(1));
        frame.render_widget(Paragraph::new(lines).block(block), overlay);
    }
}

/// A rect `percent_x` wide and `height` rows tall, centered in `outer`.
fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(outer.height)),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
