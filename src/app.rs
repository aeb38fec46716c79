use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::client::ApiClient;
use crate::api::executor;
use crate::config::Config;
use crate::event::{ApiEvent, Event};
use crate::state::app_state::{ActivePopup, AppState, DiscardTarget, Notice};
use crate::state::editor::{
    EditorIntent, EditorState, EditorTab, backspace_at, delete_at, insert_at, line_down, line_up,
    next_char_boundary, prev_char_boundary,
};
use crate::state::focus::Focus;
use crate::state::mode::Mode;
use crate::template::render::render_preview;
use crate::ui::highlight::highlight_html;

pub struct App {
    pub state: AppState,
    client: ApiClient,
    tx: UnboundedSender<Event>,
    /// Cancels the fetch of the current editor session, if one is running.
    fetch_cancel: Option<CancellationToken>,
    /// Monotonic editor session counter; stamps fetches and submits.
    sessions: u64,
}

impl App {
    pub fn new(config: &Config, tx: UnboundedSender<Event>) -> Self {
        Self {
            state: AppState {
                readonly: config.ui.readonly,
                dirty: true,
                ..Default::default()
            },
            client: ApiClient::new(&config.api),
            tx,
            fetch_cancel: None,
            sessions: 0,
        }
    }

    /// Kicks off the initial list fetch and, when asked, opens one layout
    /// straight into the editor.
    pub fn bootstrap(&mut self, open: Option<String>) {
        self.refresh_layouts();
        if let Some(id) = open {
            self.start_edit_session(id);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.state.dirty = true;
                // Ctrl+S fires globally regardless of mode or focus
                if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    self.submit_layout();
                    return;
                }
                match self.state.active_popup {
                    ActivePopup::ConfirmDiscard => self.handle_confirm_discard_key(key),
                    ActivePopup::VariablesModal => self.handle_modal_key(key),
                    ActivePopup::None => match self.state.mode {
                        Mode::Normal => self.handle_normal_key(key),
                        Mode::Insert => self.handle_insert_key(key),
                    },
                }
            }
            Event::Key(_) => {}
            Event::Api(api) => {
                self.state.dirty = true;
                self.handle_api_event(api);
            }
            // Tick: only dirty when something animated or expiring changed.
            Event::Tick => self.handle_tick(),
            Event::Mouse(mouse) => {
                self.state.dirty = true;
                self.handle_mouse(mouse);
            }
            // Terminal resize always requires a full redraw.
            Event::Resize(_, _) => self.state.dirty = true,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.request_discard(DiscardTarget::Quit);
                return;
            }
            KeyCode::Tab if self.state.editor.is_some() => {
                self.state.focus = self.state.focus.next();
                return;
            }
            KeyCode::BackTab if self.state.editor.is_some() => {
                self.state.focus = self.state.focus.prev();
                return;
            }
            KeyCode::Char('[') | KeyCode::Char(']') if self.state.editor.is_some() => {
                self.toggle_editor_tab();
                return;
            }
            KeyCode::Esc => {
                self.handle_escape();
                return;
            }
            _ => {}
        }
        match self.state.focus {
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::NameField | Focus::DescriptionField => {
                if matches!(key.code, KeyCode::Char('i') | KeyCode::Enter) {
                    self.enter_insert();
                }
            }
            Focus::DefaultToggle => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    self.toggle_default();
                }
            }
            Focus::ContentEditor => self.handle_content_normal_key(key),
            Focus::VariablesPanel => self.handle_variables_panel_key(key),
        }
    }

    /// Esc: clear the sidebar filter first, then close the editor (with a
    /// confirm step when the form has unsaved changes).
    fn handle_escape(&mut self) {
        if self.state.focus == Focus::Sidebar && !self.state.layouts.filter.is_empty() {
            self.state.layouts.filter.clear();
            self.state.layouts.filter_cursor = 0;
            self.state.layouts.clamp_selection();
            return;
        }
        if self.state.editor.is_some() {
            self.request_discard(DiscardTarget::CloseEditor);
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let last = self.state.layouts.filtered().len().saturating_sub(1);
                let list = &mut self.state.layouts;
                list.selected = (list.selected + 1).min(last);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.layouts.selected = self.state.layouts.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(id) = self.state.layouts.selected_layout().map(|l| l.id.clone()) {
                    self.request_discard(DiscardTarget::OpenLayout(id));
                }
            }
            KeyCode::Char('n') if !self.state.readonly => {
                self.request_discard(DiscardTarget::NewLayout);
            }
            KeyCode::Char('r') => self.refresh_layouts(),
            KeyCode::Char('/') => {
                self.state.layouts.filter_cursor = self.state.layouts.filter.len();
                self.state.mode = Mode::Insert;
            }
            _ => {}
        }
    }

    fn handle_content_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('i') | KeyCode::Enter => self.enter_insert(),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_editor(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_editor(-1),
            _ => {}
        }
    }

    fn handle_variables_panel_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('y') {
            let tag = self
                .state
                .editor
                .as_ref()
                .and_then(|e| e.form.variables.get(e.selected_var))
                .map(|v| v.tag());
            if let Some(tag) = tag {
                self.copy_tag(tag);
            }
            return;
        }
        let Some(editor) = &mut self.state.editor else {
            return;
        };
        let last = editor.form.variables.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                editor.selected_var = (editor.selected_var + 1).min(last);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                editor.selected_var = editor.selected_var.saturating_sub(1);
            }
            KeyCode::Enter => {
                if !editor.form.variables.is_empty() {
                    editor.modal.row = editor.selected_var;
                    editor.modal.editing = false;
                    self.state.active_popup = ActivePopup::VariablesModal;
                }
            }
            _ => {}
        }
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.state.mode = Mode::Normal;
            return;
        }
        match self.state.focus {
            Focus::Sidebar => self.handle_filter_insert_key(key),
            Focus::NameField | Focus::DescriptionField => self.handle_field_insert_key(key),
            Focus::ContentEditor => self.handle_content_insert_key(key),
            _ => {}
        }
    }

    fn handle_filter_insert_key(&mut self, key: KeyEvent) {
        let list = &mut self.state.layouts;
        match key.code {
            KeyCode::Char(c) => {
                insert_at(&mut list.filter, &mut list.filter_cursor, c);
                list.selected = 0;
            }
            KeyCode::Backspace => {
                backspace_at(&mut list.filter, &mut list.filter_cursor);
                list.selected = 0;
            }
            KeyCode::Delete => {
                delete_at(&mut list.filter, list.filter_cursor);
                list.selected = 0;
            }
            KeyCode::Left => {
                list.filter_cursor = prev_char_boundary(&list.filter, list.filter_cursor);
            }
            KeyCode::Right => {
                list.filter_cursor = next_char_boundary(&list.filter, list.filter_cursor);
            }
            KeyCode::Home => list.filter_cursor = 0,
            KeyCode::End => list.filter_cursor = list.filter.len(),
            KeyCode::Enter => self.state.mode = Mode::Normal,
            _ => {}
        }
        self.state.layouts.clamp_selection();
    }

    /// Single-line editing for the name and description fields.
    fn handle_field_insert_key(&mut self, key: KeyEvent) {
        let focus = self.state.focus.clone();
        let Some(editor) = &mut self.state.editor else {
            return;
        };
        let form = &mut editor.form;
        let (text, cursor) = match focus {
            Focus::NameField => (&mut form.name, &mut form.name_cursor),
            _ => (&mut form.description, &mut form.description_cursor),
        };
        match key.code {
            KeyCode::Char(c) => {
                insert_at(text, cursor, c);
                editor.modified = true;
            }
            KeyCode::Backspace => {
                backspace_at(text, cursor);
                editor.modified = true;
            }
            KeyCode::Delete => {
                delete_at(text, *cursor);
                editor.modified = true;
            }
            KeyCode::Left => *cursor = prev_char_boundary(text, *cursor),
            KeyCode::Right => *cursor = next_char_boundary(text, *cursor),
            KeyCode::Home => *cursor = 0,
            KeyCode::End => *cursor = text.len(),
            KeyCode::Enter => self.state.mode = Mode::Normal,
            _ => {}
        }
    }

    /// Multiline editing for the content tab. Every text mutation runs the
    /// content pipeline so the variables panel tracks the keystroke.
    fn handle_content_insert_key(&mut self, key: KeyEvent) {
        let Some(editor) = &mut self.state.editor else {
            return;
        };
        let form = &mut editor.form;
        let mut changed = true;
        match key.code {
            KeyCode::Char(c) => insert_at(&mut form.content, &mut form.content_cursor, c),
            KeyCode::Enter => insert_at(&mut form.content, &mut form.content_cursor, '\n'),
            KeyCode::Backspace => backspace_at(&mut form.content, &mut form.content_cursor),
            KeyCode::Delete => delete_at(&mut form.content, form.content_cursor),
            KeyCode::Left => {
                form.content_cursor = prev_char_boundary(&form.content, form.content_cursor);
                changed = false;
            }
            KeyCode::Right => {
                form.content_cursor = next_char_boundary(&form.content, form.content_cursor);
                changed = false;
            }
            KeyCode::Up => {
                form.content_cursor = line_up(&form.content, form.content_cursor);
                changed = false;
            }
            KeyCode::Down => {
                form.content_cursor = line_down(&form.content, form.content_cursor);
                changed = false;
            }
            KeyCode::Home => {
                form.content_cursor = form.content[..form.content_cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                changed = false;
            }
            KeyCode::End => {
                form.content_cursor = form.content[form.content_cursor..]
                    .find('\n')
                    .map(|i| form.content_cursor + i)
                    .unwrap_or(form.content.len());
                changed = false;
            }
            _ => changed = false,
        }
        if changed {
            editor.modified = true;
            editor.refresh_variables();
        }
    }

    fn handle_confirm_discard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.apply_discard(),
            KeyCode::Char('n') | KeyCode::Esc => {
                self.state.active_popup = ActivePopup::None;
                self.state.discard_target = DiscardTarget::default();
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let editing = self.state.editor.as_ref().is_some_and(|e| e.modal.editing);
        if !editing && key.code == KeyCode::Char('y') {
            let tag = self
                .state
                .editor
                .as_ref()
                .and_then(|e| e.form.variables.get(e.modal.row))
                .map(|v| v.tag());
            if let Some(tag) = tag {
                self.copy_tag(tag);
            }
            return;
        }
        let readonly = self.state.readonly;
        let Some(editor) = &mut self.state.editor else {
            self.state.active_popup = ActivePopup::None;
            return;
        };
        if editing {
            Self::handle_modal_edit_key(editor, key);
            self.ensure_preview();
            return;
        }
        let last = editor.form.variables.len().saturating_sub(1);
        match key.code {
            KeyCode::Esc => {
                editor.selected_var = editor.modal.row;
                self.state.active_popup = ActivePopup::None;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                editor.modal.row = (editor.modal.row + 1).min(last);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                editor.modal.row = editor.modal.row.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char('e') if !readonly => {
                if let Some(var) = editor.form.variables.get(editor.modal.row) {
                    editor.modal.cursor = var.default_value.as_deref().map_or(0, str::len);
                    editor.modal.editing = true;
                }
            }
            KeyCode::Char(' ') if !readonly => {
                if let Some(var) = editor.form.variables.get_mut(editor.modal.row) {
                    var.required = !var.required;
                    editor.modified = true;
                }
            }
            _ => {}
        }
    }

    /// Keystrokes while the modal edits a default value in place. Default
    /// values feed the preview, so mutations drop the cached one.
    fn handle_modal_edit_key(editor: &mut EditorState, key: KeyEvent) {
        let row = editor.modal.row;
        let Some(var) = editor.form.variables.get_mut(row) else {
            editor.modal.editing = false;
            return;
        };
        let text = var.default_value.get_or_insert_with(String::new);
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                // An emptied default reads as "no default".
                if text.is_empty() {
                    var.default_value = None;
                }
                editor.modal.editing = false;
            }
            KeyCode::Char(c) => {
                insert_at(text, &mut editor.modal.cursor, c);
                editor.modified = true;
                editor.preview = None;
            }
            KeyCode::Backspace => {
                backspace_at(text, &mut editor.modal.cursor);
                editor.modified = true;
                editor.preview = None;
            }
            KeyCode::Delete => {
                delete_at(text, editor.modal.cursor);
                editor.modified = true;
                editor.preview = None;
            }
            KeyCode::Left => editor.modal.cursor = prev_char_boundary(text, editor.modal.cursor),
            KeyCode::Right => editor.modal.cursor = next_char_boundary(text, editor.modal.cursor),
            KeyCode::Home => editor.modal.cursor = 0,
            KeyCode::End => editor.modal.cursor = text.len(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let delta: i16 = match mouse.kind {
            MouseEventKind::ScrollDown => 3,
            MouseEventKind::ScrollUp => -3,
            _ => return,
        };
        if self.state.active_popup != ActivePopup::None {
            return;
        }
        if self.state.editor.is_some() {
            self.scroll_editor(delta);
        } else if delta > 0 {
            let last = self.state.layouts.filtered().len().saturating_sub(1);
            self.state.layouts.selected = (self.state.layouts.selected + 1).min(last);
        } else {
            self.state.layouts.selected = self.state.layouts.selected.saturating_sub(1);
        }
    }

    fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::LayoutsListed(result) => {
                self.state.layouts.loading = false;
                match result {
                    Ok(items) => {
                        self.state.layouts.items = items;
                        self.state.layouts.clamp_selection();
                    }
                    Err(err) => self.state.notice = Some(Notice::error(err.to_string())),
                }
            }
            ApiEvent::LayoutFetched { session, result } => {
                let Some(editor) = &mut self.state.editor else {
                    return;
                };
                if editor.session != session {
                    debug!(session, "dropped fetch result for a closed editor");
                    return;
                }
                match result {
                    Ok(Some(layout)) => editor.apply_layout(&layout),
                    Ok(None) => {
                        editor.loading = false;
                        warn!(session, "layout missing remotely, editing an empty form");
                    }
                    Err(err) => {
                        editor.loading = false;
                        self.state.notice = Some(Notice::error(err.to_string()));
                    }
                }
            }
            ApiEvent::SubmitCompleted {
                session,
                intent,
                result,
            } => match result {
                Ok(_) => {
                    // Notice and refetch fire even if the editor is gone;
                    // the write happened either way.
                    let text = match intent {
                        EditorIntent::Create => "Layout Created!",
                        EditorIntent::Edit { .. } => "Layout Updated!",
                    };
                    self.state.notice = Some(Notice::success(text));
                    self.refresh_layouts();
                    if self.state.editor.as_ref().is_some_and(|e| e.session == session) {
                        self.close_editor_now();
                    }
                }
                Err(err) => {
                    if let Some(editor) = &mut self.state.editor {
                        if editor.session == session {
                            editor.in_flight = false;
                        }
                    }
                    self.state.notice = Some(Notice::error(err.to_string()));
                }
            },
        }
    }

    fn handle_tick(&mut self) {
        if self.state.is_busy() {
            self.state.spinner_tick = self.state.spinner_tick.wrapping_add(1);
            self.state.dirty = true;
        }
        if self.state.notice.as_ref().is_some_and(Notice::is_expired) {
            self.state.notice = None;
            self.state.dirty = true;
        }
    }

    /// Saves the open form. Ignored while read-only, while the discard
    /// prompt is up, before the edited layout arrived, and while an earlier
    /// submit is still in flight.
    pub fn submit_layout(&mut self) {
        if self.state.readonly || self.state.active_popup == ActivePopup::ConfirmDiscard {
            return;
        }
        let Some(editor) = &mut self.state.editor else {
            return;
        };
        if editor.in_flight || editor.loading {
            return;
        }
        if editor.form.name.trim().is_empty() {
            self.state.notice = Some(Notice::error("Layout name is required"));
            return;
        }
        editor.in_flight = true;
        executor::spawn_submit(
            self.client.clone(),
            editor.intent.clone(),
            editor.form.to_payload(),
            editor.session,
            self.tx.clone(),
        );
    }

    fn refresh_layouts(&mut self) {
        self.state.layouts.loading = true;
        executor::spawn_list(self.client.clone(), self.tx.clone());
    }

    fn start_edit_session(&mut self, id: String) {
        self.sessions += 1;
        if let Some(token) = self.fetch_cancel.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        self.fetch_cancel = Some(token.clone());
        self.state.editor = Some(EditorState::edit(self.sessions, id.clone()));
        self.state.focus = Focus::NameField;
        self.state.mode = Mode::Normal;
        self.state.active_popup = ActivePopup::None;
        executor::spawn_fetch(self.client.clone(), id, self.sessions, self.tx.clone(), token);
    }

    fn start_create_session(&mut self) {
        self.sessions += 1;
        if let Some(token) = self.fetch_cancel.take() {
            token.cancel();
        }
        self.state.editor = Some(EditorState::create(self.sessions));
        self.state.focus = Focus::NameField;
        self.state.mode = Mode::Normal;
        self.state.active_popup = ActivePopup::None;
    }

    fn close_editor_now(&mut self) {
        if let Some(token) = self.fetch_cancel.take() {
            token.cancel();
        }
        self.state.editor = None;
        self.state.active_popup = ActivePopup::None;
        self.state.focus = Focus::Sidebar;
        self.state.mode = Mode::Normal;
    }

    /// Runs `target` immediately when the form has no unsaved changes,
    /// otherwise parks it behind the confirm-discard prompt.
    fn request_discard(&mut self, target: DiscardTarget) {
        self.state.discard_target = target;
        let unsaved = self.state.editor.as_ref().is_some_and(|e| e.modified);
        if unsaved {
            self.state.active_popup = ActivePopup::ConfirmDiscard;
        } else {
            self.apply_discard();
        }
    }

    fn apply_discard(&mut self) {
        self.state.active_popup = ActivePopup::None;
        match std::mem::take(&mut self.state.discard_target) {
            DiscardTarget::CloseEditor => self.close_editor_now(),
            DiscardTarget::Quit => {
                self.close_editor_now();
                self.state.should_quit = true;
            }
            DiscardTarget::OpenLayout(id) => {
                self.close_editor_now();
                self.start_edit_session(id);
            }
            DiscardTarget::NewLayout => {
                self.close_editor_now();
                self.start_create_session();
            }
        }
    }

    /// Puts the cursor at the end of the focused field and enters insert
    /// mode. Read-only sessions never leave normal mode.
    fn enter_insert(&mut self) {
        if self.state.readonly {
            return;
        }
        let focus = self.state.focus.clone();
        let Some(editor) = &mut self.state.editor else {
            return;
        };
        match focus {
            Focus::NameField => editor.form.name_cursor = editor.form.name.len(),
            Focus::DescriptionField => {
                editor.form.description_cursor = editor.form.description.len();
            }
            Focus::ContentEditor => {
                editor.form.content_cursor =
                    editor.form.content_cursor.min(editor.form.content.len());
            }
            _ => return,
        }
        self.state.mode = Mode::Insert;
    }

    fn toggle_default(&mut self) {
        if self.state.readonly {
            return;
        }
        if let Some(editor) = &mut self.state.editor {
            editor.form.is_default = !editor.form.is_default;
            editor.modified = true;
        }
    }

    /// Flips between the content and preview tabs.
    fn toggle_editor_tab(&mut self) {
        if let Some(editor) = &mut self.state.editor {
            editor.active_tab = editor.active_tab.toggle();
        }
        self.ensure_preview();
    }

    /// Renders and highlights the preview when the tab is showing and the
    /// cached copy is gone. Runs outside the draw loop so the renderer
    /// never invokes syntect.
    fn ensure_preview(&mut self) {
        let Some(editor) = &mut self.state.editor else {
            return;
        };
        if editor.active_tab == EditorTab::Preview && editor.preview.is_none() {
            let sample = render_preview(editor.pipeline.ast(), &editor.form.variables);
            editor.preview = Some(highlight_html(&sample));
        }
    }

    fn scroll_editor(&mut self, delta: i16) {
        let Some(editor) = &mut self.state.editor else {
            return;
        };
        let scroll = match editor.active_tab {
            EditorTab::Content => &mut editor.form.content_scroll,
            EditorTab::Preview => &mut editor.preview_scroll,
        };
        *scroll = if delta >= 0 {
            scroll.saturating_add(delta as u16)
        } else {
            scroll.saturating_sub(delta.unsigned_abs())
        };
    }

    fn copy_tag(&mut self, tag: String) {
        let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(tag.clone()));
        match copied {
            Ok(()) => self.state.notice = Some(Notice::success(format!("Copied {tag}"))),
            Err(err) => {
                warn!(%err, "clipboard unavailable");
                self.state.notice = Some(Notice::error("Clipboard unavailable"));
            }
        }
    }
}
