use std::time::{Duration, Instant};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::{editor::EditorState, focus::Focus, layout::Layout, mode::Mode};

/// Which overlay popup (if any) is currently visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActivePopup {
    #[default]
    None,
    VariablesModal,
    ConfirmDiscard,
}

/// What a confirmed discard should do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DiscardTarget {
    #[default]
    CloseEditor,
    Quit,
    /// Discard, then open this layout for editing.
    OpenLayout(String),
    /// Discard, then start a fresh layout.
    NewLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message in the status bar. Expires on a tick.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub raised_at: Instant,
}

const NOTICE_TTL: Duration = Duration::from_secs(4);

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() >= NOTICE_TTL
    }
}

/// Sidebar list of layouts known to the service.
#[derive(Debug, Clone, Default)]
pub struct LayoutList {
    pub items: Vec<Layout>,
    /// Index into the filtered view, not into `items`.
    pub selected: usize,
    pub filter: String,
    pub filter_cursor: usize,
    pub loading: bool,
}

impl LayoutList {
    /// Rows matching the filter, best match first, as indices into
    /// `items` paired with the layout. An empty filter keeps service
    /// order.
    pub fn filtered(&self) -> Vec<(usize, &Layout)> {
        if self.filter.is_empty() {
            return self.items.iter().enumerate().collect();
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, usize, &Layout)> = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(idx, layout)| {
                matcher
                    .fuzzy_match(&layout.name, &self.filter)
                    .map(|score| (score, idx, layout))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, idx, layout)| (idx, layout)).collect()
    }

    /// Layout under the selection bar, honoring the filter.
    pub fn selected_layout(&self) -> Option<&Layout> {
        self.filtered().get(self.selected).map(|(_, layout)| *layout)
    }

    pub fn clamp_selection(&mut self) {
        let visible = self.filtered().len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub mode: Mode,
    pub focus: Focus,
    pub layouts: LayoutList,
    /// `None` while no layout form is open.
    pub editor: Option<EditorState>,
    pub active_popup: ActivePopup,
    pub discard_target: DiscardTarget,
    pub notice: Option<Notice>,
    /// Environment does not permit changes; editing and saving are off.
    pub readonly: bool,
    pub spinner_tick: u8,
    pub should_quit: bool,
    /// Set to `true` whenever visible state changes. The render loop skips
    /// `terminal.draw()` when `false`, avoiding redundant work on idle ticks.
    pub dirty: bool,
}

impl AppState {
    /// Anything remote in flight. Drives the spinner.
    pub fn is_busy(&self) -> bool {
        self.layouts.loading
            || self
                .editor
                .as_ref()
                .is_some_and(|e| e.loading || e.in_flight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(name: &str) -> Layout {
        Layout {
            id: name.to_string(),
            name: name.to_string(),
            description: String::new(),
            content: String::new(),
            is_default: false,
            variables: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn empty_filter_keeps_service_order() {
        let list = LayoutList {
            items: vec![layout("b"), layout("a")],
            ..LayoutList::default()
        };
        let names: Vec<&str> = list.filtered().iter().map(|(_, l)| l.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn filter_narrows_and_ranks() {
        let list = LayoutList {
            items: vec![layout("Digest weekly"), layout("Welcome"), layout("Billing")],
            filter: "wel".to_string(),
            ..LayoutList::default()
        };
        let filtered = list.filtered();
        assert!(!filtered.is_empty());
        assert_eq!(filtered[0].1.name, "Welcome");
        assert!(filtered.iter().all(|(_, l)| l.name != "Billing"));
    }

    #[test]
    fn selection_clamps_to_filtered_view() {
        let mut list = LayoutList {
            items: vec![layout("a"), layout("b"), layout("c")],
            selected: 2,
            filter: "a".to_string(),
            ..LayoutList::default()
        };
        list.clamp_selection();
        assert_eq!(list.selected, 0);
        assert_eq!(list.selected_layout().map(|l| l.name.as_str()), Some("a"));
    }

    #[test]
    fn notices_expire_after_their_ttl() {
        let fresh = Notice::success("saved");
        assert!(!fresh.is_expired());

        let mut stale = Notice::error("nope");
        if let Some(past) = Instant::now().checked_sub(NOTICE_TTL) {
            stale.raised_at = past;
            assert!(stale.is_expired());
        }
    }
}
