//! # SlideView Component
//!
//! Draws already-rendered slide lines, scrolled vertically when the slide is
//! taller than the screen. Lines arrive pre-wrapped from `render_slide`, so
//! no ratatui wrapping is applied here.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct SlideView<'a> {
    pub lines: &'a [Line<'static>],
    /// Requested scroll offset; clamped on render and written back.
    pub scroll: &'a mut u16,
}

impl<'a> SlideView<'a> {
    pub fn new(lines: &'a [Line<'static>], scroll: &'a mut u16) -> Self {
        Self { lines, scroll }
    }
}

/// Largest useful scroll offset for `total` lines in a `height`-row area.
pub fn max_scroll(total: usize, height: u16) -> u16 {
    let total = u16::try_from(total).unwrap_or(u16::MAX);
    total.saturating_sub(height)
}

impl Component for SlideView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        *self.scroll = (*self.scroll).min(max_scroll(self.lines.len(), area.height));
        let text = Text::from(self.lines.to_vec());
        frame.render_widget(Paragraph::new(text).scroll((*self.scroll, 0)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_max_scroll() {
        assert_eq!(max_scroll(5, 10), 0);
        assert_eq!(max_scroll(30, 10), 20);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let lines: Vec<Line<'static>> = (0..5).map(|i| Line::from(format!("line {i}"))).collect();
        let mut scroll = 99;
        let backend = TestBackend::new(20, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| SlideView::new(&lines, &mut scroll).render(f, f.area()))
            .unwrap();
        assert_eq!(scroll, 2);
        let first_row: String = terminal.backend().buffer().content()[..20]
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(first_row.starts_with("line 2"));
    }
}
