use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::app_state::AppState;
use crate::state::focus::Focus;
use crate::state::layout::VariableType;
use super::layout::{
    ACCENT_BLUE, BORDER_INACTIVE, CYAN, PURPLE, RED, SURFACE, TEXT_MUTED, TEXT_PRIMARY, YELLOW,
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(editor) = &state.editor else {
        return;
    };

    let focused = state.focus == Focus::VariablesPanel;
    let border = if focused { ACCENT_BLUE } else { BORDER_INACTIVE };
    let block = Block::default()
        .title(format!(" Variables ({}) ", editor.form.variables.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 1 {
        return;
    }

    if editor.form.variables.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "{{tags}} referenced in the",
                    Style::default().fg(TEXT_MUTED),
                )),
                Line::from(Span::styled(
                    "content show up here.",
                    Style::default().fg(TEXT_MUTED),
                )),
            ]),
            inner,
        );
        return;
    }

    let visible = inner.height.saturating_sub(1) as usize;
    let first = editor.selected_var.saturating_sub(visible.saturating_sub(1));

    for (row, var) in editor
        .form
        .variables
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
    {
        let y = inner.y + (row - first) as u16;
        let selected = row == editor.selected_var;

        let (badge, badge_color) = type_badge(var.var_type);
        let name_style = if selected && focused {
            Style::default()
                .fg(Color::White)
                .bg(SURFACE)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_PRIMARY)
        };

        let mut spans = vec![
            Span::styled(format!("{badge} "), Style::default().fg(badge_color)),
            Span::styled(var.name.clone(), name_style),
        ];
        if var.required {
            spans.push(Span::styled("*", Style::default().fg(RED)));
        }
        if let Some(default) = &var.default_value {
            spans.push(Span::styled(
                format!(" = {default}"),
                Style::default().fg(TEXT_MUTED),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect { y, height: 1, ..inner },
        );
    }

    let hint = if focused {
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" manage  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("y", Style::default().fg(TEXT_PRIMARY)),
            Span::styled(" copy tag", Style::default().fg(TEXT_MUTED)),
        ])
    } else {
        Line::from(Span::styled(
            "Tab here to manage",
            Style::default().fg(TEXT_MUTED),
        ))
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().add_modifier(Modifier::DIM)),
        Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        },
    );
}

fn type_badge(var_type: VariableType) -> (&'static str, Color) {
    match var_type {
        VariableType::String => ("s", CYAN),
        VariableType::Array => ("a", YELLOW),
        VariableType::Boolean => ("b", PURPLE),
    }
}
