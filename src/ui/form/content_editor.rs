use humansize::{DECIMAL, format_size};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::app_state::AppState;
use crate::state::focus::Focus;
use crate::state::layout::TemplateVariable;
use crate::state::mode::Mode;
use crate::template::spans::{TagKind, tag_spans};
use super::super::layout::{
    ACCENT_BLUE, BORDER_INACTIVE, CYAN, GREEN, PURPLE, TEXT_MUTED, TEXT_PRIMARY, YELLOW,
};

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

    if inner.height < 2 {
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let inserting = focused && state.mode == Mode::Insert;
    let content = &editor.form.content;

    if content.is_empty() && !inserting {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "HTML with {{placeholders}} goes here. Press i to type.",
                    Style::default().fg(TEXT_MUTED),
                )),
                Line::from(Span::styled(
                    "{{{body}}} marks where each message lands.",
                    Style::default().fg(TEXT_MUTED),
                )),
            ]),
            chunks[0],
        );
    } else {
        let cursor = editor.form.content_cursor;
        let cursor_row = content[..cursor].matches('\n').count();
        let line_start = content[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);

        let mut lines = Vec::with_capacity(content.lines().count() + 1);
        for (row, raw) in content.split('\n').enumerate() {
            let local_cursor = (inserting && row == cursor_row).then(|| cursor - line_start);
            lines.push(content_line(raw, &editor.form.variables, local_cursor));
        }
        frame.render_widget(
            Paragraph::new(Text::from(lines)).scroll((editor.form.content_scroll, 0)),
            chunks[0],
        );
    }

    render_footer(frame, chunks[1], state);
}

/// One content line with `{{tag}}` coloring and, on the cursor's line,
/// a block cursor at `cursor` (a byte offset into `raw`).
fn content_line(
    raw: &str,
    variables: &[TemplateVariable],
    cursor: Option<usize>,
) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut placed = cursor.is_none();
    let mut last = 0;

    for (start, end, kind) in tag_spans(raw) {
        if start > last {
            push_text(&raw[last..start], last, cursor, &mut placed, &mut spans);
        }
        let style = match &kind {
            TagKind::Variable(path) if user_defined(variables, path) => {
                Style::default().fg(CYAN)
            }
            TagKind::Variable(_) => Style::default().fg(PURPLE),
            TagKind::Keyword => Style::default().fg(YELLOW),
            TagKind::Comment => Style::default().fg(TEXT_MUTED).add_modifier(Modifier::DIM),
        };
        // Cursor inside a tag backlights the whole tag.
        let style = match cursor {
            Some(c) if !placed && c >= start && c < end => {
                placed = true;
                style.bg(Color::Rgb(60, 60, 80))
            }
            _ => style,
        };
        spans.push(Span::styled(raw[start..end].to_string(), style));
        last = end;
    }
    if last < raw.len() {
        push_text(&raw[last..], last, cursor, &mut placed, &mut spans);
    }
    if !placed {
        spans.push(Span::styled(
            " ",
            Style::default().bg(Color::White).fg(Color::Black),
        ));
    }
    Line::from(spans)
}

fn push_text(
    segment: &str,
    segment_start: usize,
    cursor: Option<usize>,
    placed: &mut bool,
    spans: &mut Vec<Span<'static>>,
) {
    let base = Style::default().fg(TEXT_PRIMARY);
    let local = match cursor {
        Some(c) if !*placed && c >= segment_start && c < segment_start + segment.len() => {
            c - segment_start
        }
        _ => {
            if !segment.is_empty() {
                spans.push(Span::styled(segment.to_string(), base));
            }
            return;
        }
    };
    *placed = true;

    let ch = segment[local..].chars().next().unwrap_or(' ');
    let after = local + ch.len_utf8();
    if local > 0 {
        spans.push(Span::styled(segment[..local].to_string(), base));
    }
    spans.push(Span::styled(
        ch.to_string(),
        Style::default().bg(Color::White).fg(Color::Black),
    ));
    if after < segment.len() {
        spans.push(Span::styled(segment[after..].to_string(), base));
    }
}

/// Whether the tag names one of the layout's own variables. The list
/// carries full dotted paths, so `order.total` is matched whole; paths
/// not in it are service-provided namespaces and render differently.
fn user_defined(variables: &[TemplateVariable], path: &str) -> bool {
    variables.iter().any(|v| v.name == path)
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(editor) = &state.editor else {
        return;
    };
    if editor.loading {
        frame.render_widget(
            Paragraph::new(Span::styled(
                " fetching layout",
                Style::default().fg(TEXT_MUTED),
            )),
            area,
        );
        return;
    }

    let size = format_size(editor.form.content.len() as u64, DECIMAL);
    let count = editor.form.variables.len();
    let mut spans = vec![Span::styled(
        format!(
            " {size} · {count} variable{} · ",
            if count == 1 { "" } else { "s" }
        ),
        Style::default().fg(TEXT_MUTED),
    )];
    if editor.parse_ok {
        spans.push(Span::styled("tags ✓", Style::default().fg(GREEN)));
    } else {
        spans.push(Span::styled("unclosed tag", Style::default().fg(YELLOW)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
