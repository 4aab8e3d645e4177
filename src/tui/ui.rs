use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::Presentation;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{HelpOverlay, SlideView, StatusBar};
use crate::tui::render::render_slide;

/// Columns kept free on each side of the slide.
const SIDE_MARGIN: u16 = 2;
/// Rows kept free above the slide.
const TOP_MARGIN: u16 = 1;

/// Draws one frame and returns the segment indices that still need an
/// evaluation result before the slide is complete.
pub fn draw_ui(
    frame: &mut Frame,
    presentation: &Presentation,
    tui: &mut TuiState,
    min_width: u16,
) -> Vec<usize> {
    use Constraint::{Length, Min};
    let [slide_area, status_area] = Layout::vertical([Min(0), Length(1)]).areas(frame.area());
    let content = slide_content_area(slide_area);

    // Wrap width is recomputed every frame, so a resize simply re-wraps.
    let rendered = render_slide(
        presentation.current_slide(),
        content.width.max(min_width),
        presentation.evaluating,
        &presentation.results,
    );
    SlideView::new(&rendered.lines, &mut tui.scroll).render(frame, content);

    StatusBar {
        position: presentation.position_label(),
        evaluating: presentation.evaluating,
        status_message: presentation.status_message.clone(),
        jump_input: tui.jump.input(),
    }
    .render(frame, status_area);

    if presentation.show_help {
        HelpOverlay.render(frame, frame.area());
    }

    rendered.pending
}

fn slide_content_area(area: Rect) -> Rect {
    Rect {
        x: area.x + SIDE_MARGIN.min(area.width / 2),
        y: area.y + TOP_MARGIN.min(area.height),
        width: area.width.saturating_sub(SIDE_MARGIN * 2),
        height: area.height.saturating_sub(TOP_MARGIN),
    }
}
