use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
};

use crate::state::app_state::AppState;
use crate::state::focus::Focus;
use super::super::layout::{ACCENT_BLUE, BORDER_INACTIVE, TEXT_MUTED};

/// Read-only render of the content with defaults substituted. The text
/// is highlighted once when the tab opens; this only blits and scrolls.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(editor) = &state.editor else {
        return;
    };

    let focused = state.focus == Focus::ContentEditor;
    let border = if focused { ACCENT_BLUE } else { BORDER_INACTIVE };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &editor.preview {
        Some(text) => frame.render_widget(
            Paragraph::new(text.clone()).scroll((editor.preview_scroll, 0)),
            inner,
        ),
        None => frame.render_widget(
            Paragraph::new(Span::styled(
                "nothing to preview yet",
                Style::default().fg(TEXT_MUTED),
            )),
            inner,
        ),
    }
}
