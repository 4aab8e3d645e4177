//! # StatusBar Component
//!
//! Bottom line showing where the presenter is in the deck.
//!
//! ```text
//!  3/12  ▶ exec  Evaluation on                              go to: 7_
//! ```
//!
//! Purely presentational: every field is a prop copied from `Presentation`
//! or `TuiState` right before rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct StatusBar {
    /// `n/total`, 1-based
    pub position: String,
    pub evaluating: bool,
    pub status_message: String,
    /// Digits typed so far for a jump, if any
    pub jump_input: Option<String>,
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = vec![Span::styled(
            format!(" {} ", self.position),
            Style::default().add_modifier(Modifier::BOLD),
        )];

        if self.evaluating {
            spans.push(Span::styled(" ▶ exec ", Style::default().fg(Color::Green)));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::styled(format!(" {}", self.status_message), dim));
        }
        frame.render_widget(Line::from(spans), area);

        if let Some(digits) = &self.jump_input {
            let prompt = Line::from(Span::styled(
                format!("go to: {digits}_ "),
                Style::default().fg(Color::Yellow),
            ))
            .right_aligned();
            frame.render_widget(prompt, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(bar: &mut StatusBar) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_status_bar_shows_position_and_status() {
        let mut bar = StatusBar {
            position: "3/12".into(),
            evaluating: false,
            status_message: "Press ? for help".into(),
            jump_input: None,
        };
        let text = draw(&mut bar);
        assert!(text.contains("3/12"));
        assert!(text.contains("Press ? for help"));
        assert!(!text.contains("exec"));
        assert!(!text.contains("go to"));
    }

    #[test]
    fn test_status_bar_exec_and_jump() {
        let mut bar = StatusBar {
            position: "1/2".into(),
            evaluating: true,
            status_message: String::new(),
            jump_input: Some("12".into()),
        };
        let text = draw(&mut bar);
        assert!(text.contains("exec"));
        assert!(text.contains("go to: 12_"));
    }
}
