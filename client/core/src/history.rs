//! History Panel
//!
//! Lists past analyses from the service and replays one back into the session
//! controller. The list is rebuilt from the service on every load; items are
//! addressed by their index in the last loaded list.
//!
//! Failures here are never surfaced as errors. They only change the
//! placeholder text.

use std::fmt;

use crate::controller::{SessionObserver, SessionStateController};
use crate::modal::{ConfirmStyle, ModalRequest, ModalService};
use crate::model::{display_timestamp, HistoryEntry};
use crate::render::AppTab;
use crate::service::AnalysisService;
use crate::source::SourceForm;

/// Placeholder for an empty history
pub const NO_HISTORY_TEXT: &str = "No history yet.";

/// Placeholder after a failed load
pub const LOAD_FAILED_TEXT: &str = "Failed to load history.";

/// Placeholder after a failed clear
pub const CLEAR_FAILED_TEXT: &str = "Failed to clear history.";

/// One row of the history list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryItemView {
    /// Position in the loaded list (the replay handle)
    pub index: usize,
    /// Language display name
    pub language: String,
    /// Formatted timestamp
    pub timestamp: String,
    /// Truncated explanation
    pub explanation: String,
    /// `"1 bug"` or `"N bugs"`
    pub bug_label: String,
    /// Whether to highlight the bug count
    pub has_bugs: bool,
}

impl HistoryItemView {
    fn from_entry(index: usize, entry: &HistoryEntry) -> Self {
        let bug_label = if entry.bug_count == 1 {
            "1 bug".to_string()
        } else {
            format!("{} bugs", entry.bug_count)
        };

        Self {
            index,
            language: entry.language.clone(),
            timestamp: display_timestamp(&entry.timestamp),
            explanation: entry.explanation.clone(),
            bug_label,
            has_bugs: entry.bug_count > 0,
        }
    }
}

/// What the history panel shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HistoryView {
    /// Never loaded
    #[default]
    NotLoaded,
    /// A single message instead of items
    Placeholder(String),
    /// Items in service order
    Items(Vec<HistoryItemView>),
}

impl fmt::Display for HistoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded => Ok(()),
            Self::Placeholder(text) => writeln!(f, "{text}"),
            Self::Items(items) => {
                for item in items {
                    writeln!(
                        f,
                        "[{}] {}  {}  ({})",
                        item.index, item.language, item.timestamp, item.bug_label
                    )?;
                    if !item.explanation.is_empty() {
                        writeln!(f, "    {}", item.explanation)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Loaded history and its projection
#[derive(Debug, Default)]
pub struct HistoryService {
    entries: Vec<HistoryEntry>,
    view: HistoryView,
}

impl HistoryService {
    /// Empty, not yet loaded
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch from the service and rebuild the list
    pub async fn list<S>(&mut self, service: &S) -> &HistoryView
    where
        S: AnalysisService + ?Sized,
    {
        match service.history().await {
            Ok(entries) => self.show(entries),
            Err(e) => {
                tracing::warn!(error = %e, service = service.name(), "Failed to load history");
                self.entries.clear();
                self.view = HistoryView::Placeholder(LOAD_FAILED_TEXT.to_string());
            }
        }
        &self.view
    }

    /// Current projection
    #[must_use]
    pub fn view(&self) -> &HistoryView {
        &self.view
    }

    /// Entries from the last successful load
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entry at `index` in the last loaded list
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Replay the entry at `index`
    ///
    /// Switches to the analysis tab and restores the source form. Returns
    /// `false` when `index` is out of range.
    pub fn replay_selected(
        &self,
        index: usize,
        controller: &mut SessionStateController,
        observer: &mut dyn SessionObserver,
        form: &mut SourceForm,
        active_tab: &mut AppTab,
    ) -> bool {
        let Some(entry) = self.entries.get(index) else {
            tracing::warn!(index, loaded = self.entries.len(), "No history entry at index");
            return false;
        };

        controller.replay(entry.full_data.clone(), observer);
        *active_tab = AppTab::Analyze;
        form.restore(&entry.full_data);
        true
    }

    /// Ask for confirmation before clearing
    pub fn request_clear<A>(&self, modal: &mut ModalService<A>, on_confirm: A) {
        modal.open(
            ModalRequest::new(
                "Clear History",
                "Are you sure you want to clear all analysis history? This cannot be undone.",
                on_confirm,
            )
            .confirm_label("Clear All")
            .confirm_style(ConfirmStyle::Danger),
        );
    }

    /// Clear on the service, then reload
    pub async fn confirm_clear<S>(&mut self, service: &S) -> &HistoryView
    where
        S: AnalysisService + ?Sized,
    {
        if let Err(e) = service.clear_history().await {
            tracing::warn!(error = %e, service = service.name(), "Failed to clear history");
            self.view = HistoryView::Placeholder(CLEAR_FAILED_TEXT.to_string());
            return &self.view;
        }

        tracing::info!("History cleared");
        self.list(service).await
    }

    fn show(&mut self, entries: Vec<HistoryEntry>) {
        self.view = if entries.is_empty() {
            HistoryView::Placeholder(NO_HISTORY_TEXT.to_string())
        } else {
            HistoryView::Items(
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| HistoryItemView::from_entry(index, entry))
                    .collect(),
            )
        };
        tracing::debug!(entries = entries.len(), "History loaded");
        self.entries = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnalysisSession;

    fn entry(bug_count: u32) -> HistoryEntry {
        HistoryEntry {
            id: None,
            language: "Python".to_string(),
            timestamp: "2024-05-01T10:00:00".to_string(),
            explanation: "Looks fine".to_string(),
            bug_count,
            full_data: AnalysisSession {
                code: "x = 1".to_string(),
                language: "Python".to_string(),
                language_mime: "python".to_string(),
                explanation: Some("Looks fine".to_string()),
                corrected_code: None,
                bugs: vec![],
                suggestions: vec![],
                timestamp: "2024-05-01T10:00:00".to_string(),
            },
        }
    }

    #[test]
    fn test_bug_labels() {
        assert_eq!(HistoryItemView::from_entry(0, &entry(1)).bug_label, "1 bug");
        let none = HistoryItemView::from_entry(0, &entry(0));
        assert_eq!(none.bug_label, "0 bugs");
        assert!(!none.has_bugs);
        let many = HistoryItemView::from_entry(3, &entry(4));
        assert_eq!(many.bug_label, "4 bugs");
        assert!(many.has_bugs);
        assert_eq!(many.index, 3);
        assert_eq!(many.timestamp, "2024-05-01 10:00:00");
    }

    #[test]
    fn test_show_empty_and_items() {
        let mut history = HistoryService::new();
        assert_eq!(history.view(), &HistoryView::NotLoaded);

        history.show(vec![]);
        assert_eq!(
            history.view(),
            &HistoryView::Placeholder("No history yet.".to_string())
        );

        history.show(vec![entry(2), entry(1)]);
        let HistoryView::Items(items) = history.view() else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(
            history.view().to_string(),
            "[0] Python  2024-05-01 10:00:00  (2 bugs)\n    Looks fine\n\
             [1] Python  2024-05-01 10:00:00  (1 bug)\n    Looks fine\n"
        );
    }

    #[test]
    fn test_request_clear_dialog() {
        let history = HistoryService::new();
        let mut modal = ModalService::new();
        history.request_clear(&mut modal, 7_u8);

        let view = modal.view().unwrap();
        assert_eq!(view.title, "Clear History");
        assert_eq!(view.confirm_label, "Clear All");
        assert_eq!(view.confirm_style, ConfirmStyle::Danger);
        assert_eq!(modal.confirm(), Some(7));
    }
}
