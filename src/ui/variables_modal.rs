use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::state::app_state::AppState;
use crate::state::layout::VariableType;
use super::layout::{
    ACCENT_BLUE, BG, CYAN, GREEN, PURPLE, SURFACE, TEXT_MUTED, TEXT_PRIMARY, YELLOW,
};
use super::popup::centered_rect;

/// Table of the layout's variables. Names and types come from the
/// content and are read-only here; defaults and the required flag are
/// the user's to edit.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(editor) = &state.editor else {
        return;
    };

    let popup_area = centered_rect(70, 60, area);
    frame.render_widget(Clear, popup_area);

    let name = if editor.form.name.is_empty() {
        "untitled"
    } else {
        editor.form.name.as_str()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT_BLUE))
        .title(format!(" Variables · {name} "))
        .style(Style::default().bg(BG));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if inner.height < 3 {
        return;
    }

    // [header] [rows] [hints]
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let req_width: u16 = 4;
    let type_width: u16 = 9;
    let rest = inner.width.saturating_sub(req_width + type_width);
    let name_width = rest * 2 / 5;
    let default_width = rest.saturating_sub(name_width);

    let header = Line::from(vec![
        Span::raw("    "),
        Span::styled(pad("Name", name_width), Style::default().fg(YELLOW)),
        Span::styled(pad("Type", type_width), Style::default().fg(YELLOW)),
        Span::styled(pad("Default", default_width), Style::default().fg(YELLOW)),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let body = chunks[1];
    for (i, var) in editor.form.variables.iter().enumerate() {
        let y = body.y + i as u16;
        if y >= body.y + body.height {
            break;
        }
        let selected = i == editor.modal.row;
        let row_bg = if selected { SURFACE } else { BG };

        let req = if var.required { "[✓] " } else { "[ ] " };
        let req_color = if var.required { GREEN } else { TEXT_MUTED };

        let (type_label, type_color) = match var.var_type {
            VariableType::String => ("String", CYAN),
            VariableType::Array => ("Array", YELLOW),
            VariableType::Boolean => ("Boolean", PURPLE),
        };

        let editing_this = selected && editor.modal.editing;
        let default_text = var.default_value.clone().unwrap_or_default();
        let shown_default = if default_text.is_empty() && !editing_this {
            "·".to_string()
        } else {
            default_text
        };
        let default_color = if editing_this {
            Color::White
        } else if var.default_value.is_none() {
            TEXT_MUTED
        } else {
            TEXT_PRIMARY
        };

        let name_color = if selected { Color::White } else { TEXT_PRIMARY };
        let line = Line::from(vec![
            Span::styled(req, Style::default().fg(req_color).bg(row_bg)),
            Span::styled(
                pad(&var.name, name_width),
                Style::default().fg(name_color).bg(row_bg),
            ),
            Span::styled(
                pad(type_label, type_width),
                Style::default().fg(type_color).bg(row_bg),
            ),
            Span::styled(
                pad(&shown_default, default_width),
                Style::default().fg(default_color).bg(row_bg),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), Rect { y, height: 1, ..body });
    }

    if editor.modal.editing {
        if let Some(var) = editor.form.variables.get(editor.modal.row) {
            let y = body.y + editor.modal.row as u16;
            if y < body.y + body.height {
                let text = var.default_value.as_deref().unwrap_or("");
                let col = text[..editor.modal.cursor.min(text.len())].chars().count() as u16;
                frame.set_cursor_position(Position {
                    x: body.x + req_width + name_width + type_width + col,
                    y,
                });
            }
        }
    }

    let hint = if editor.modal.editing {
        Line::from(vec![
            Span::styled("Enter/Esc", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" done editing", Style::default().fg(TEXT_MUTED)),
        ])
    } else if state.readonly {
        Line::from(vec![
            Span::styled("y", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" copy tag  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("Esc", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" close", Style::default().fg(TEXT_MUTED)),
        ])
    } else {
        Line::from(vec![
            Span::styled("e/Enter", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" edit default  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("Space", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" required  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("y", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" copy tag  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("Esc", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" close", Style::default().fg(TEXT_MUTED)),
        ])
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().add_modifier(Modifier::DIM)),
        chunks[2],
    );
}

/// Pads or truncates to exactly `width` chars so the columns line up.
fn pad(text: &str, width: u16) -> String {
    let width = width as usize;
    if width == 0 {
        return String::new();
    }
    let count = text.chars().count();
    if count >= width {
        text.chars().take(width).collect()
    } else {
        let mut padded = String::with_capacity(text.len() + width - count);
        padded.push_str(text);
        padded.push_str(&" ".repeat(width - count));
        padded
    }
}
