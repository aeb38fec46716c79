use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::app_state::{ActivePopup, AppState};
use crate::state::editor::EditorTab;
use super::{
    confirm_discard, sidebar, status_bar, variables_modal, variables_panel,
    form::{content_editor, fields, preview, tab_bar},
};

// TokyoNight palette
pub const ACCENT_BLUE: Color = Color::Rgb(122, 162, 247);   // #7aa2f7
pub const BORDER_INACTIVE: Color = Color::Rgb(65, 72, 104); // #414868
pub const BG: Color = Color::Rgb(26, 27, 38);               // #1a1b26
pub const SURFACE: Color = Color::Rgb(36, 40, 59);          // #24283b
pub const TEXT_PRIMARY: Color = Color::Rgb(192, 202, 245);  // #c0caf5
pub const TEXT_MUTED: Color = Color::Rgb(86, 95, 137);      // #565f89
pub const GREEN: Color = Color::Rgb(158, 206, 106);         // #9ece6a
pub const RED: Color = Color::Rgb(247, 118, 142);           // #f7768e
pub const YELLOW: Color = Color::Rgb(224, 175, 104);        // #e0af68
pub const PURPLE: Color = Color::Rgb(187, 154, 247);        // #bb9af7
pub const CYAN: Color = Color::Rgb(42, 195, 222);           // #2ac3de

pub const SPINNER_FRAMES: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Split off status bar at bottom
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let main_area = vertical[0];
    let status_area = vertical[1];

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(main_area);

    sidebar::render(frame, horiz[0], state);

    match &state.editor {
        Some(editor) => {
            // [form column flex] [variables panel 30]
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(30)])
                .split(horiz[1]);

            // chunks[0] = fields row (Length 3)
            // chunks[1] = tab bar (Length 1)
            // chunks[2] = content / preview (flexible)
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(columns[0]);

            fields::render(frame, rows[0], state);
            tab_bar::render(frame, rows[1], state);
            match editor.active_tab {
                EditorTab::Content => content_editor::render(frame, rows[2], state),
                EditorTab::Preview => preview::render(frame, rows[2], state),
            }
            variables_panel::render(frame, columns[1], state);
        }
        None => render_welcome(frame, horiz[1], state),
    }

    status_bar::render(frame, status_area, state);

    // Popups paint over everything else.
    match &state.active_popup {
        ActivePopup::None => {}
        ActivePopup::VariablesModal => variables_modal::render(frame, area, state),
        ActivePopup::ConfirmDiscard => confirm_discard::render(frame, area, state),
    }
}

/// Shown in place of the editor pane while no layout is open.
fn render_welcome(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_INACTIVE));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 4 {
        return;
    }

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "  stencil: notification layouts, over there in the sidebar",
            Style::default().fg(TEXT_PRIMARY),
        )),
        Line::default(),
        Line::from(Span::styled(
            "  Enter  open the selected layout",
            Style::default().fg(TEXT_MUTED),
        )),
    ];
    if !state.readonly {
        lines.push(Line::from(Span::styled(
            "  n      start a new one",
            Style::default().fg(TEXT_MUTED),
        )));
    }
    lines.push(Line::from(Span::styled(
        "  q      quit",
        Style::default().fg(TEXT_MUTED),
    )));
    if state.readonly {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  read-only session: browsing only",
            Style::default().fg(PURPLE).add_modifier(Modifier::DIM),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
