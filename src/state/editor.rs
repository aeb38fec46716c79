//! State for the open layout editor.

use ratatui::text::Text;

use crate::template::pipeline::ContentPipeline;

use super::layout::{Layout, LayoutPayload, TemplateVariable};

/// What submitting the form will ask the service to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorIntent {
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorTab {
    #[default]
    Content,
    Preview,
}

impl EditorTab {
    pub fn toggle(self) -> Self {
        match self {
            EditorTab::Content => EditorTab::Preview,
            EditorTab::Preview => EditorTab::Content,
        }
    }
}

/// Form fields mirroring the layout resource, plus text cursors.
/// Cursors are byte offsets and always sit on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct LayoutForm {
    pub name: String,
    pub name_cursor: usize,
    pub description: String,
    pub description_cursor: usize,
    pub is_default: bool,
    pub content: String,
    pub content_cursor: usize,
    pub content_scroll: u16,
    pub variables: Vec<TemplateVariable>,
}

impl LayoutForm {
    pub fn to_payload(&self) -> LayoutPayload {
        LayoutPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            is_default: self.is_default,
            variables: self.variables.clone(),
        }
    }
}

/// Cursor state inside the variables modal. `editing` means keystrokes go
/// into the selected row's default value.
#[derive(Debug, Clone, Default)]
pub struct VariablesModalState {
    pub row: usize,
    pub cursor: usize,
    pub editing: bool,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    /// Monotonic id distinguishing this editor from earlier ones whose
    /// responses may still arrive.
    pub session: u64,
    pub intent: EditorIntent,
    pub form: LayoutForm,
    pub pipeline: ContentPipeline,
    /// Fetch of the edited layout has not landed yet.
    pub loading: bool,
    /// A submit is running; further submits are ignored until it settles.
    pub in_flight: bool,
    pub modified: bool,
    /// Latest content parsed cleanly. Cleared on the keystroke that broke
    /// it, set again once the tags balance.
    pub parse_ok: bool,
    pub active_tab: EditorTab,
    /// Highlighted preview, computed when the tab opens so the renderer
    /// never runs syntect. `None` after any edit that invalidates it.
    pub preview: Option<Text<'static>>,
    pub preview_scroll: u16,
    pub selected_var: usize,
    pub modal: VariablesModalState,
}

impl EditorState {
    pub fn create(session: u64) -> Self {
        Self {
            session,
            intent: EditorIntent::Create,
            form: LayoutForm::default(),
            pipeline: ContentPipeline::new(),
            loading: false,
            in_flight: false,
            modified: false,
            parse_ok: true,
            active_tab: EditorTab::default(),
            preview: None,
            preview_scroll: 0,
            selected_var: 0,
            modal: VariablesModalState::default(),
        }
    }

    pub fn edit(session: u64, id: String) -> Self {
        Self {
            intent: EditorIntent::Edit { id },
            loading: true,
            ..Self::create(session)
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.intent, EditorIntent::Edit { .. })
    }

    /// Populates the form from a fetched layout, field by field. Empty
    /// strings from the service leave the field as it is. The user may
    /// have typed while the fetch ran, so every cursor is snapped back
    /// onto a char boundary of whichever text won.
    pub fn apply_layout(&mut self, layout: &Layout) {
        if !layout.content.is_empty() {
            self.form.content = layout.content.clone();
        }
        if !layout.name.is_empty() {
            self.form.name = layout.name.clone();
        }
        if !layout.description.is_empty() {
            self.form.description = layout.description.clone();
        }
        self.form.is_default = layout.is_default;
        self.form.variables = layout.variables.clone();
        self.loading = false;
        self.modified = false;
        self.refresh_variables();

        self.form.name_cursor = clamp_cursor(&self.form.name, self.form.name_cursor);
        self.form.description_cursor =
            clamp_cursor(&self.form.description, self.form.description_cursor);
        self.form.content_cursor = clamp_cursor(&self.form.content, self.form.content_cursor);
        let default = self
            .form
            .variables
            .get(self.modal.row)
            .and_then(|v| v.default_value.as_deref())
            .unwrap_or("");
        self.modal.cursor = clamp_cursor(default, self.modal.cursor);
    }

    /// Re-runs the content pipeline. On a successful parse the variable
    /// list is replaced with the reconciled one; otherwise it is left
    /// untouched.
    pub fn refresh_variables(&mut self) {
        let current = std::mem::take(&mut self.form.variables);
        match self.pipeline.content_changed(&self.form.content, &current) {
            Some(reconciled) => {
                self.form.variables = reconciled;
                self.parse_ok = true;
            }
            None => {
                self.form.variables = current;
                self.parse_ok = false;
            }
        }
        self.preview = None;
        let last = self.form.variables.len().saturating_sub(1);
        self.selected_var = self.selected_var.min(last);
        self.modal.row = self.modal.row.min(last);
    }
}

/// Largest char boundary of `text` at or below `cursor`, for cursors
/// that outlived the text they pointed into.
fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut at = cursor.min(text.len());
    while at > 0 && !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

/// Largest byte index `<= idx - 1` that is a char boundary of `s`.
pub(crate) fn prev_char_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx.saturating_sub(1);
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest byte index `> idx` that is a char boundary, capped at `s.len()`.
pub(crate) fn next_char_boundary(s: &str, idx: usize) -> usize {
    let mut i = (idx + 1).min(s.len());
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

pub(crate) fn insert_at(text: &mut String, cursor: &mut usize, c: char) {
    text.insert(*cursor, c);
    *cursor += c.len_utf8();
}

pub(crate) fn backspace_at(text: &mut String, cursor: &mut usize) {
    if *cursor == 0 {
        return;
    }
    let prev = prev_char_boundary(text, *cursor);
    text.remove(prev);
    *cursor = prev;
}

pub(crate) fn delete_at(text: &mut String, cursor: usize) {
    if cursor < text.len() {
        text.remove(cursor);
    }
}

/// Byte offset of the `col`-th char of `line`, or the line's end.
fn byte_at_col(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

/// Moves a multiline cursor one line up, keeping the column where the
/// upper line is long enough.
pub(crate) fn line_up(text: &str, cursor: usize) -> usize {
    let line_start = text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if line_start == 0 {
        return cursor;
    }
    let col = text[line_start..cursor].chars().count();
    let prev_start = text[..line_start - 1].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prev_line = &text[prev_start..line_start - 1];
    prev_start + byte_at_col(prev_line, col)
}

/// Moves a multiline cursor one line down. No-op on the last line.
pub(crate) fn line_down(text: &str, cursor: usize) -> usize {
    let line_start = text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let Some(rel_end) = text[cursor..].find('\n') else {
        return cursor;
    };
    let col = text[line_start..cursor].chars().count();
    let next_start = cursor + rel_end + 1;
    let next_end = text[next_start..]
        .find('\n')
        .map(|i| next_start + i)
        .unwrap_or(text.len());
    next_start + byte_at_col(&text[next_start..next_end], col)
}
