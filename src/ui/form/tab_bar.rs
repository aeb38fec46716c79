use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::app_state::AppState;
use crate::state::editor::EditorTab;
use super::super::layout::{BORDER_INACTIVE, CYAN};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(editor) = &state.editor else {
        return;
    };

    let tabs = [("Content", EditorTab::Content), ("Preview", EditorTab::Preview)];

    let mut spans: Vec<Span<'static>> = vec![Span::raw(" ")];
    for (i, (name, tab)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if editor.active_tab == *tab {
            Style::default().fg(CYAN).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(BORDER_INACTIVE)
        };
        spans.push(Span::styled(*name, style));
    }
    spans.push(Span::styled(
        "   [ ] switches",
        Style::default().fg(BORDER_INACTIVE).add_modifier(Modifier::DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
