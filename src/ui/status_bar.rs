use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::app_state::{AppState, NoticeKind};
use crate::state::mode::Mode;
use super::layout::{ACCENT_BLUE, CYAN, GREEN, PURPLE, RED, SPINNER_FRAMES, TEXT_MUTED, YELLOW};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let (mode_label, mode_color) = match state.mode {
        Mode::Normal => ("NORMAL", ACCENT_BLUE),
        Mode::Insert => ("INSERT", GREEN),
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", mode_label),
        Style::default()
            .fg(Color::Black)
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    )];

    if state.readonly {
        spans.push(Span::styled(
            " RO ",
            Style::default()
                .fg(Color::Black)
                .bg(PURPLE)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(editor) = &state.editor {
        let label = if editor.is_edit() { " EDIT " } else { " NEW " };
        spans.push(Span::styled(
            label,
            Style::default().fg(Color::Black).bg(CYAN),
        ));
    }

    if state.is_busy() {
        let frame_idx = state.spinner_tick as usize % SPINNER_FRAMES.len();
        spans.push(Span::styled(
            format!(" {}", SPINNER_FRAMES[frame_idx]),
            Style::default().fg(YELLOW),
        ));
    }

    match &state.notice {
        Some(notice) => {
            let (sigil, color) = match notice.kind {
                NoticeKind::Success => ("✓", GREEN),
                NoticeKind::Error => ("✗", RED),
            };
            spans.push(Span::styled(
                format!("  {sigil} {}", notice.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        None => spans.push(hints(state)),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hints(state: &AppState) -> Span<'static> {
    let text = match (state.editor.is_some(), state.readonly) {
        (true, false) => "  · Ctrl+S:save · Tab:focus · [ ]:content/preview · Esc:close · q:quit",
        (true, true) => "  · Tab:focus · [ ]:content/preview · Esc:close · q:quit",
        (false, false) => "  · Enter:open · n:new · r:refresh · /:filter · q:quit",
        (false, true) => "  · Enter:open · r:refresh · /:filter · q:quit",
    };
    Span::styled(text, Style::default().fg(TEXT_MUTED))
}
