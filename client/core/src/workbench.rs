//! Workbench
//!
//! The application object. It owns one of every component and routes
//! [`UiEvent`]s from a surface to them, the way a page script would wire
//! buttons to handlers, but without any shared globals.
//!
//! # Event Flow
//!
//! ```text
//!  Surface ──UiEvent──► Workbench::handle_event
//!                          │
//!                          ├─► SessionStateController ──notify──► ReadAloudController (stop)
//!                          │                               └────► ViewRenderer (re-project)
//!                          ├─► HistoryService ──replay──► SessionStateController
//!                          ├─► ReportExporter ──► DocumentSink
//!                          └─► ModalService (notices, confirmations)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::capabilities::{Clipboard, DocumentSink, SpeechEvent, Surfaces};
use crate::controller::{SessionObserver, SessionStateController, ViewState};
use crate::export::{ReportDocument, ReportExporter};
use crate::history::{HistoryService, HistoryView};
use crate::modal::{ModalService, ModalView};
use crate::model::AnalysisSession;
use crate::narration::{ReadAloudController, ReadingState};
use crate::render::{AppTab, CodeTab, ResultsView, ViewRenderer};
use crate::service::AnalysisService;
use crate::source::SourceForm;

/// What confirming the open dialog does
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PendingAction {
    /// Close an informational notice
    #[default]
    Acknowledge,
    /// Clear the whole history
    ClearHistory,
}

/// Everything a surface can ask for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Source editor text changed
    SetCode(String),
    /// Language selector changed (syntax-mode key or `"other"`)
    SelectLanguage(String),
    /// Free-text language name changed
    SetOtherLanguage(String),
    /// "Analyze Code" pressed
    Submit,
    /// Top-level tab clicked
    SwitchTab(AppTab),
    /// Code tab clicked
    SwitchCodeTab(CodeTab),
    /// History item clicked
    SelectHistory(usize),
    /// "Clear History" pressed
    RequestClearHistory,
    /// Dialog confirm pressed
    ConfirmModal,
    /// Dialog cancel pressed
    CancelModal,
    /// "Read Bugs" / "Stop Reading" pressed
    ToggleNarration,
    /// Speech engine callback
    Speech(SpeechEvent),
    /// Copy button pressed
    CopyCorrectedCode,
    /// "Download Report" pressed
    DownloadReport,
}

/// Fans one transition out to the narrator and the renderer
struct Presenters<'a> {
    narrator: &'a mut ReadAloudController,
    renderer: &'a mut ViewRenderer,
}

impl SessionObserver for Presenters<'_> {
    fn session_changed(&mut self, state: &ViewState) {
        self.narrator.session_changed(state);
        self.renderer.session_changed(state);
    }
}

/// The BugAI client, minus its surface
pub struct Workbench<S: AnalysisService + ?Sized> {
    service: Arc<S>,
    controller: SessionStateController,
    renderer: ViewRenderer,
    narrator: ReadAloudController,
    history: HistoryService,
    modal: ModalService<PendingAction>,
    form: SourceForm,
    exporter: ReportExporter,
    clipboard: Box<dyn Clipboard>,
    sink: Box<dyn DocumentSink>,
    active_tab: AppTab,
    last_report: Option<PathBuf>,
}

impl<S: AnalysisService + ?Sized> Workbench<S> {
    /// Assemble a workbench over `service` and a surface's capabilities
    pub fn new(service: Arc<S>, surfaces: Surfaces) -> Self {
        tracing::debug!(service = service.name(), "Workbench created");
        Self {
            service,
            controller: SessionStateController::new(),
            renderer: ViewRenderer::new(surfaces.corrected_editor, surfaces.analyzed_editor),
            narrator: ReadAloudController::new(surfaces.speech),
            history: HistoryService::new(),
            modal: ModalService::new(),
            form: SourceForm::new(surfaces.source_editor),
            exporter: ReportExporter::today(),
            clipboard: surfaces.clipboard,
            sink: surfaces.sink,
            active_tab: AppTab::Analyze,
            last_report: None,
        }
    }

    /// Use a fixed report date
    #[must_use]
    pub fn with_exporter(mut self, exporter: ReportExporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// Route one surface event
    pub async fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::SetCode(code) => self.form.set_code(&code),
            UiEvent::SelectLanguage(mime) => {
                self.form.select_language(&mime);
            }
            UiEvent::SetOtherLanguage(name) => self.form.set_other_name(&name),
            UiEvent::Submit => {
                self.submit().await;
            }
            UiEvent::SwitchTab(tab) => self.switch_tab(tab).await,
            UiEvent::SwitchCodeTab(tab) => self.renderer.switch_code_tab(tab),
            UiEvent::SelectHistory(index) => {
                self.select_history(index);
            }
            UiEvent::RequestClearHistory => self.request_clear_history(),
            UiEvent::ConfirmModal => self.confirm_modal().await,
            UiEvent::CancelModal => self.modal.cancel(),
            UiEvent::ToggleNarration => {
                self.toggle_narration();
            }
            UiEvent::Speech(speech_event) => self.narrator.handle_event(&speech_event),
            UiEvent::CopyCorrectedCode => self.copy_corrected_code().await,
            UiEvent::DownloadReport => {
                self.download_report().await;
            }
        }
    }

    /// Submit the form's code and language
    ///
    /// Ignored while a request is in flight.
    pub async fn submit(&mut self) -> ViewState {
        if self.controller.is_loading() {
            tracing::debug!("Submit ignored while loading");
            return self.controller.view_state();
        }

        let code = self.form.code();
        let language_name = self.form.language_name();
        let language_mime = self.form.language_mime();

        let mut presenters = Presenters {
            narrator: &mut self.narrator,
            renderer: &mut self.renderer,
        };
        self.controller
            .submit(
                &*self.service,
                &code,
                &language_name,
                language_mime,
                &mut presenters,
            )
            .await
    }

    /// Change the top-level tab; the history tab reloads the list
    pub async fn switch_tab(&mut self, tab: AppTab) {
        self.active_tab = tab;
        if tab == AppTab::History {
            self.history.list(&*self.service).await;
        }
    }

    /// Reload the history list
    pub async fn refresh_history(&mut self) -> &HistoryView {
        self.history.list(&*self.service).await
    }

    /// Replay the history item at `index`
    pub fn select_history(&mut self, index: usize) -> bool {
        let mut presenters = Presenters {
            narrator: &mut self.narrator,
            renderer: &mut self.renderer,
        };
        self.history.replay_selected(
            index,
            &mut self.controller,
            &mut presenters,
            &mut self.form,
            &mut self.active_tab,
        )
    }

    /// Open the "Clear History" confirmation
    pub fn request_clear_history(&mut self) {
        self.history
            .request_clear(&mut self.modal, PendingAction::ClearHistory);
    }

    /// Confirm the open dialog and run its action
    pub async fn confirm_modal(&mut self) {
        match self.modal.confirm() {
            Some(PendingAction::ClearHistory) => {
                self.history.confirm_clear(&*self.service).await;
            }
            Some(PendingAction::Acknowledge) | None => {}
        }
    }

    /// Dismiss the open dialog
    pub fn cancel_modal(&mut self) {
        self.modal.cancel();
    }

    /// "Read Bugs" / "Stop Reading"
    pub fn toggle_narration(&mut self) -> ReadingState {
        let session = self.controller.current().map(|session| &**session);
        self.narrator.toggle(session, &mut self.modal)
    }

    /// Copy the corrected code, falling back to the secondary clipboard path
    pub async fn copy_corrected_code(&mut self) {
        let copy_visible = self
            .renderer
            .view()
            .content
            .as_ref()
            .is_some_and(|content| content.copy_visible);
        if !copy_visible {
            return;
        }
        let text = self.renderer.corrected_text();
        if text.is_empty() {
            return;
        }

        match self.clipboard.write_text(&text).await {
            Ok(()) => {
                self.renderer.mark_copied();
                return;
            }
            Err(e) => tracing::warn!(error = %e, "Clipboard write failed, trying fallback"),
        }

        match self.clipboard.write_text_fallback(&text) {
            Ok(()) => self.renderer.mark_copied(),
            Err(e) => {
                tracing::warn!(error = %e, "Fallback clipboard write failed");
                self.modal.notice(
                    "Copy Failed",
                    "Could not copy code to clipboard. Please copy it manually.",
                );
            }
        }
    }

    /// Lay out the current session and hand it to the sink
    pub async fn download_report(&mut self) -> Option<PathBuf> {
        let Some(document) = self.report() else {
            self.modal.notice(
                "No Data",
                "No analysis data to download. Please run an analysis first.",
            );
            return None;
        };

        match self.sink.persist(&document).await {
            Ok(path) => {
                self.last_report = Some(path.clone());
                Some(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, file = %document.file_name(), "Failed to save report");
                self.modal.notice("Export Failed", format!("{e:#}"));
                None
            }
        }
    }

    /// The report for the current session, without saving it
    #[must_use]
    pub fn report(&self) -> Option<ReportDocument> {
        self.controller
            .current()
            .map(|session| self.exporter.export(session))
    }

    /// Current view state
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.controller.view_state()
    }

    /// Current results projection
    #[must_use]
    pub fn view(&self) -> &ResultsView {
        self.renderer.view()
    }

    /// Current session, if any
    #[must_use]
    pub fn current_session(&self) -> Option<&Arc<AnalysisSession>> {
        self.controller.current()
    }

    /// History panel projection
    #[must_use]
    pub fn history_view(&self) -> &HistoryView {
        self.history.view()
    }

    /// The open dialog, if any
    #[must_use]
    pub fn modal_view(&self) -> Option<ModalView> {
        self.modal.view()
    }

    /// Narration state
    #[must_use]
    pub fn narration_state(&self) -> ReadingState {
        self.narrator.state()
    }

    /// Narration toggle label
    #[must_use]
    pub fn narration_label(&self) -> &'static str {
        self.narrator.label()
    }

    /// Active top-level tab
    #[must_use]
    pub fn active_tab(&self) -> AppTab {
        self.active_tab
    }

    /// Source form
    #[must_use]
    pub fn form(&self) -> &SourceForm {
        &self.form
    }

    /// Source form, for surfaces that edit it directly
    pub fn form_mut(&mut self) -> &mut SourceForm {
        &mut self.form
    }

    /// Where the last report was saved
    #[must_use]
    pub fn last_report(&self) -> Option<&PathBuf> {
        self.last_report.as_ref()
    }
}
