//! Result Rendering
//!
//! Projects a [`ViewState`] into a [`ResultsView`]: which panel is visible,
//! what the summary says, which code tab is active, the findings table and
//! the suggestions list.
//!
//! # Design Philosophy
//!
//! [`project`] is a pure function of the view state. [`ViewRenderer`] wraps it
//! with the two read-only code viewers, which are the only widgets that hold
//! their own text. Everything else is rebuilt from scratch on every render so
//! no stale row can survive a transition.

use std::fmt;

use crate::capabilities::Editor;
use crate::controller::{SessionObserver, ViewState};
use crate::model::{AnalysisSession, Severity};

/// Submit button label while idle
pub const SUBMIT_LABEL: &str = "Analyze Code";

/// Submit button label while a request is in flight
pub const LOADING_LABEL: &str = "Analyzing...";

/// Summary text when the service sent no explanation
pub const NO_EXPLANATION_TEXT: &str = "No explanation provided.";

/// Findings message when there are no bugs
pub const NO_BUGS_TEXT: &str = "No bugs found.";

/// Suggestions message when there are none
pub const NO_SUGGESTIONS_TEXT: &str = "No suggestions were provided.";

/// Corrected-code placeholder
pub const NO_CORRECTED_CODE_TEXT: &str = "No corrected code was provided.";

/// Syntax mode used when the session has none
pub const PLAIN_TEXT_MODE: &str = "text/plain";

/// Top-level application tab
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppTab {
    /// Code input and results
    #[default]
    Analyze,
    /// Past analyses
    History,
}

/// Which result panel is visible (exactly one at a time)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    /// Initial hint
    Placeholder,
    /// Spinner
    Loading,
    /// Error message
    Error,
    /// Analysis results
    Content,
}

/// Code viewer tab
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CodeTab {
    /// Corrected code
    #[default]
    Corrected,
    /// Code as submitted
    Analyzed,
}

impl CodeTab {
    /// Tab label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Corrected => "Corrected Code",
            Self::Analyzed => "Analyzed Code",
        }
    }
}

/// Badge class for a severity
#[must_use]
pub fn badge_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "bg-gray-700 text-gray-300",
        Severity::Medium => "bg-yellow-700 text-yellow-200",
        Severity::High => "bg-red-700 text-red-200",
    }
}

/// One row of the findings table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FindingRow {
    /// Line number, or `"N/A"`
    pub line: String,
    /// Normalized severity
    pub severity: Severity,
    /// Badge class for the severity
    pub badge_class: &'static str,
    /// Description, or `"No description"`
    pub description: String,
}

/// Findings section
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FindingsView {
    /// Table hidden, "no bugs" message shown
    NoBugs,
    /// One row per finding, in service order
    Table(Vec<FindingRow>),
}

/// Suggestions section
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuggestionsView {
    /// List hidden, "no suggestions" message shown
    NoSuggestions,
    /// One item per suggestion, in service order
    List(Vec<String>),
}

/// Corrected-code tab body
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorrectedPane {
    /// Viewer hidden, placeholder shown
    Placeholder,
    /// Viewer showing this code
    Viewer(String),
}

/// Copy button state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CopyFeedback {
    /// Copy icon
    #[default]
    Ready,
    /// Check mark after a successful copy
    Copied,
}

/// Everything shown in the content panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentView {
    /// Summary text
    pub summary: String,
    /// Language label
    pub language_label: String,
    /// Syntax mode handed to both viewers
    pub syntax_mode: String,
    /// Visible code tab
    pub active_code_tab: CodeTab,
    /// Corrected tab body
    pub corrected: CorrectedPane,
    /// Code as submitted
    pub analyzed_code: String,
    /// Whether the copy action is shown
    pub copy_visible: bool,
    /// Copy button state
    pub copy_feedback: CopyFeedback,
    /// Findings section
    pub findings: FindingsView,
    /// Suggestions section
    pub suggestions: SuggestionsView,
}

impl ContentView {
    fn from_session(session: &AnalysisSession) -> Self {
        let summary = session
            .explanation
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_EXPLANATION_TEXT)
            .to_string();

        let language_label = if session.language.is_empty() {
            "code".to_string()
        } else {
            session.language.clone()
        };

        let syntax_mode = if session.language_mime.is_empty() {
            PLAIN_TEXT_MODE.to_string()
        } else {
            session.language_mime.clone()
        };

        let corrected = match session.corrected_code_text() {
            Some(code) => CorrectedPane::Viewer(code.to_string()),
            None => CorrectedPane::Placeholder,
        };

        let findings = if session.bugs.is_empty() {
            FindingsView::NoBugs
        } else {
            FindingsView::Table(
                session
                    .bugs
                    .iter()
                    .map(|bug| FindingRow {
                        line: bug
                            .line
                            .map_or_else(|| "N/A".to_string(), |line| line.to_string()),
                        severity: bug.severity,
                        badge_class: badge_class(bug.severity),
                        description: bug.description_or_default().to_string(),
                    })
                    .collect(),
            )
        };

        let suggestions = if session.suggestions.is_empty() {
            SuggestionsView::NoSuggestions
        } else {
            SuggestionsView::List(session.suggestions.clone())
        };

        Self {
            summary,
            language_label,
            syntax_mode,
            active_code_tab: CodeTab::Corrected,
            copy_visible: matches!(corrected, CorrectedPane::Viewer(_)),
            corrected,
            analyzed_code: session.code.clone(),
            copy_feedback: CopyFeedback::Ready,
            findings,
            suggestions,
        }
    }
}

/// Full projection of the results area
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsView {
    /// Visible panel
    pub panel: Panel,
    /// Whether the submit trigger is enabled
    pub submit_enabled: bool,
    /// Submit trigger label
    pub submit_label: &'static str,
    /// Error panel text
    pub error_message: Option<String>,
    /// Whether "download report" is offered
    pub export_available: bool,
    /// Whether "read bugs" is offered
    pub narration_available: bool,
    /// Content panel, only in `Success`
    pub content: Option<ContentView>,
}

impl Default for ResultsView {
    fn default() -> Self {
        project(&ViewState::Idle)
    }
}

/// Project a view state
#[must_use]
pub fn project(state: &ViewState) -> ResultsView {
    let idle = ResultsView {
        panel: Panel::Placeholder,
        submit_enabled: true,
        submit_label: SUBMIT_LABEL,
        error_message: None,
        export_available: false,
        narration_available: false,
        content: None,
    };

    match state {
        ViewState::Idle => idle,
        ViewState::Loading => ResultsView {
            panel: Panel::Loading,
            submit_enabled: false,
            submit_label: LOADING_LABEL,
            ..idle
        },
        ViewState::Error(message) => ResultsView {
            panel: Panel::Error,
            error_message: Some(message.clone()),
            ..idle
        },
        ViewState::Success(session) => ResultsView {
            panel: Panel::Content,
            export_available: true,
            narration_available: true,
            content: Some(ContentView::from_session(session)),
            ..idle
        },
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.panel {
            Panel::Placeholder => {
                return writeln!(f, "Submit code to see the analysis results.");
            }
            Panel::Loading => return writeln!(f, "{LOADING_LABEL}"),
            Panel::Error => {
                return writeln!(f, "Error: {}", self.error_message.as_deref().unwrap_or(""));
            }
            Panel::Content => {}
        }

        let Some(ref content) = self.content else {
            return Ok(());
        };

        writeln!(f, "Language: {}", content.language_label)?;
        writeln!(f)?;
        writeln!(f, "Summary")?;
        writeln!(f, "{}", content.summary)?;
        writeln!(f)?;

        writeln!(f, "== {} ==", content.active_code_tab.label())?;
        match content.active_code_tab {
            CodeTab::Corrected => match content.corrected {
                CorrectedPane::Viewer(ref code) => writeln!(f, "{code}")?,
                CorrectedPane::Placeholder => writeln!(f, "{NO_CORRECTED_CODE_TEXT}")?,
            },
            CodeTab::Analyzed => writeln!(f, "{}", content.analyzed_code)?,
        }
        writeln!(f)?;

        writeln!(f, "Bugs Found")?;
        match content.findings {
            FindingsView::NoBugs => writeln!(f, "{NO_BUGS_TEXT}")?,
            FindingsView::Table(ref rows) => {
                writeln!(f, "{:<6} {:<8} Description", "Line", "Severity")?;
                for row in rows {
                    writeln!(f, "{:<6} {:<8} {}", row.line, row.severity, row.description)?;
                }
            }
        }
        writeln!(f)?;

        writeln!(f, "Suggestions")?;
        match content.suggestions {
            SuggestionsView::NoSuggestions => writeln!(f, "{NO_SUGGESTIONS_TEXT}"),
            SuggestionsView::List(ref items) => {
                for item in items {
                    writeln!(f, "- {item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Keeps the result widgets in sync with the controller
pub struct ViewRenderer {
    corrected_viewer: Box<dyn Editor>,
    analyzed_viewer: Box<dyn Editor>,
    view: ResultsView,
}

impl ViewRenderer {
    /// Renderer driving the two code viewers
    pub fn new(corrected_viewer: Box<dyn Editor>, analyzed_viewer: Box<dyn Editor>) -> Self {
        Self {
            corrected_viewer,
            analyzed_viewer,
            view: ResultsView::default(),
        }
    }

    /// Re-project from `state`
    pub fn render(&mut self, state: &ViewState) {
        self.view = project(state);

        let Some(ref content) = self.view.content else {
            self.analyzed_viewer.set_value("");
            self.corrected_viewer.set_value("");
            return;
        };

        let mode = Some(content.syntax_mode.as_str());
        self.analyzed_viewer.set_value(&content.analyzed_code);
        self.analyzed_viewer.set_mode(mode);

        match content.corrected {
            CorrectedPane::Viewer(ref code) => self.corrected_viewer.set_value(code),
            CorrectedPane::Placeholder => self.corrected_viewer.set_value(""),
        }
        self.corrected_viewer.set_mode(mode);

        self.corrected_viewer.refresh();
        self.analyzed_viewer.refresh();
    }

    /// Current projection
    #[must_use]
    pub fn view(&self) -> &ResultsView {
        &self.view
    }

    /// Show the other code tab
    pub fn switch_code_tab(&mut self, tab: CodeTab) {
        let Some(ref mut content) = self.view.content else {
            return;
        };
        content.active_code_tab = tab;
        match tab {
            CodeTab::Corrected => self.corrected_viewer.refresh(),
            CodeTab::Analyzed => self.analyzed_viewer.refresh(),
        }
    }

    /// Flip the copy button to its "copied" state until the next render
    pub fn mark_copied(&mut self) {
        if let Some(ref mut content) = self.view.content {
            content.copy_feedback = CopyFeedback::Copied;
        }
    }

    /// Text currently in the corrected viewer
    #[must_use]
    pub fn corrected_text(&self) -> String {
        self.corrected_viewer.value()
    }
}

impl SessionObserver for ViewRenderer {
    fn session_changed(&mut self, state: &ViewState) {
        self.render(state);
    }
}
