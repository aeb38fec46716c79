use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::app_state::AppState;
use crate::state::editor::EditorState;
use crate::state::focus::Focus;
use crate::state::mode::Mode;
use super::super::layout::{ACCENT_BLUE, BORDER_INACTIVE, GREEN, TEXT_MUTED, TEXT_PRIMARY};

/// Name, description and default-flag boxes above the content editor.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(editor) = &state.editor else {
        return;
    };

    // [name] [description] [default toggle]
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(38),
            Constraint::Min(0),
            Constraint::Length(13),
        ])
        .split(area);

    render_text_field(frame, chunks[0], state, editor, Focus::NameField);
    render_text_field(frame, chunks[1], state, editor, Focus::DescriptionField);
    render_default_toggle(frame, chunks[2], state, editor);
}

fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    editor: &EditorState,
    slot: Focus,
) {
    let (title, text, cursor, placeholder) = match slot {
        Focus::NameField => (
            " Name ",
            &editor.form.name,
            editor.form.name_cursor,
            "layout name",
        ),
        _ => (
            " Description ",
            &editor.form.description,
            editor.form.description_cursor,
            "optional",
        ),
    };

    let focused = state.focus == slot;
    let border = if focused { ACCENT_BLUE } else { BORDER_INACTIVE };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = if editor.loading {
        Line::from(Span::styled("…", Style::default().fg(TEXT_MUTED)))
    } else if text.is_empty() {
        Line::from(Span::styled(placeholder, Style::default().fg(TEXT_MUTED)))
    } else {
        Line::from(Span::styled(text.clone(), Style::default().fg(TEXT_PRIMARY)))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if focused && state.mode == Mode::Insert && inner.width > 0 {
        let col = text[..cursor.min(text.len())].chars().count() as u16;
        frame.set_cursor_position(Position {
            x: (inner.x + col).min(inner.x + inner.width - 1),
            y: inner.y,
        });
    }
}

fn render_default_toggle(frame: &mut Frame, area: Rect, state: &AppState, editor: &EditorState) {
    let focused = state.focus == Focus::DefaultToggle;
    let border = if focused { ACCENT_BLUE } else { BORDER_INACTIVE };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Default ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (mark, color) = if editor.form.is_default {
        ("[✓] yes", GREEN)
    } else {
        ("[ ] no", TEXT_MUTED)
    };
    let style = if focused {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    frame.render_widget(Paragraph::new(Span::styled(mark, style)), inner);
}
