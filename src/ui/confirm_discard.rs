use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::state::app_state::{AppState, DiscardTarget};
use super::layout::{BG, RED, TEXT_MUTED, TEXT_PRIMARY};
use super::popup::centered_prompt;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_prompt(44, 5, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(RED))
        .title(" Unsaved Changes ")
        .style(Style::default().bg(BG));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if inner.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let message = match &state.discard_target {
        DiscardTarget::Quit => "Quit without saving?",
        DiscardTarget::OpenLayout(_) => "Open it and drop your edits?",
        DiscardTarget::NewLayout => "Start new and drop your edits?",
        DiscardTarget::CloseEditor => "Close and drop your edits?",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(message, Style::default().fg(TEXT_PRIMARY))),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            "─".repeat(inner.width as usize),
            Style::default().fg(TEXT_MUTED),
        )),
        chunks[1],
    );

    let hint = Line::from(vec![
        Span::styled("y/Enter", Style::default().fg(RED)),
        Span::styled(" Discard  ", Style::default().fg(TEXT_MUTED)),
        Span::styled("n/Esc", Style::default().fg(TEXT_PRIMARY)),
        Span::styled(" Keep editing", Style::default().fg(TEXT_MUTED)),
    ]);
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().add_modifier(Modifier::DIM)),
        chunks[2],
    );
}
