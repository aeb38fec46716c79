use std::time::Duration;

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::app_state::AppState;
use crate::state::focus::Focus;
use crate::state::mode::Mode;
use super::layout::{
    ACCENT_BLUE, BORDER_INACTIVE, SPINNER_FRAMES, SURFACE, TEXT_MUTED, TEXT_PRIMARY, YELLOW,
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = matches!(state.focus, Focus::Sidebar);
    let border_color = if focused { ACCENT_BLUE } else { BORDER_INACTIVE };

    let title = if state.layouts.loading {
        let frame_idx = state.spinner_tick as usize % SPINNER_FRAMES.len();
        format!(" stencil {} ", SPINNER_FRAMES[frame_idx])
    } else {
        " stencil ".to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    // [filter] [list] [hints]
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    render_filter(frame, chunks[0], state, focused);
    render_list(frame, chunks[1], state, focused);
    render_hints(frame, chunks[2], state);
}

fn render_filter(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let filter = &state.layouts.filter;
    let typing = focused && state.mode == Mode::Insert;

    let line = if filter.is_empty() && !typing {
        Line::from(Span::styled("/ filter", Style::default().fg(TEXT_MUTED)))
    } else {
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(ACCENT_BLUE)),
            Span::styled(filter.clone(), Style::default().fg(TEXT_PRIMARY)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);

    if typing {
        let col = filter[..state.layouts.filter_cursor.min(filter.len())]
            .chars()
            .count() as u16;
        frame.set_cursor_position(Position { x: area.x + 2 + col, y: area.y });
    }
}

fn render_list(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let rows = state.layouts.filtered();
    if rows.is_empty() {
        let text = if state.layouts.loading {
            "fetching layouts"
        } else if state.layouts.filter.is_empty() {
            "no layouts yet"
        } else {
            "nothing matches"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(TEXT_MUTED))),
            area,
        );
        return;
    }

    // Keep the selection visible on short terminals.
    let visible = area.height as usize;
    let first = state.layouts.selected.saturating_sub(visible.saturating_sub(1));

    for (row, (_, layout)) in rows.iter().enumerate().skip(first).take(visible) {
        let y = area.y + (row - first) as u16;
        let selected = row == state.layouts.selected;

        let badge = if layout.is_default { "★ " } else { "  " };
        let name_style = if selected && focused {
            Style::default()
                .fg(Color::White)
                .bg(SURFACE)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().fg(TEXT_PRIMARY).bg(SURFACE)
        } else {
            Style::default().fg(TEXT_PRIMARY)
        };

        let age = layout
            .updated_at
            .or(layout.created_at)
            .map(age_of)
            .unwrap_or_default();
        let name_width = (area.width as usize).saturating_sub(2 + age.chars().count() + 1);

        let line = Line::from(vec![
            Span::styled(badge, Style::default().fg(YELLOW)),
            Span::styled(
                format!("{:<width$.width$}", layout.name, width = name_width),
                name_style,
            ),
            Span::styled(format!(" {age}"), Style::default().fg(TEXT_MUTED)),
        ]);
        frame.render_widget(Paragraph::new(line), Rect { y, height: 1, ..area });
    }
}

fn render_hints(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled("Enter", Style::default().fg(TEXT_PRIMARY)),
        Span::styled(" open  ", Style::default().fg(TEXT_MUTED)),
    ];
    if !state.readonly {
        spans.push(Span::styled("n", Style::default().fg(TEXT_PRIMARY)));
        spans.push(Span::styled(" new  ", Style::default().fg(TEXT_MUTED)));
    }
    spans.push(Span::styled("r", Style::default().fg(TEXT_PRIMARY)));
    spans.push(Span::styled(" refresh", Style::default().fg(TEXT_MUTED)));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().add_modifier(Modifier::DIM)),
        area,
    );
}

/// Age of a timestamp truncated to its largest unit, "now" under a minute.
fn age_of(stamp: DateTime<Utc>) -> String {
    let Ok(elapsed) = (Utc::now() - stamp).to_std() else {
        return String::new();
    };
    let secs = elapsed.as_secs();
    if secs < 60 {
        return "now".to_string();
    }
    let unit = if secs < 3600 {
        60
    } else if secs < 86_400 {
        3_600
    } else {
        86_400
    };
    humantime::format_duration(Duration::from_secs(secs - secs % unit)).to_string()
}
