//! Session State Controller
//!
//! Owns the single current [`AnalysisSession`] and derives the view state from
//! it.
//!
//! # State Machine
//!
//! ```text
//!            submit (valid)            response ok
//!   Idle ───────────────────► Loading ─────────────► Success(session)
//!     │                          │                        │  ▲
//!     │ submit (invalid)         │ response err           │  │ replay
//!     ▼                          ▼                        ▼  │
//!   Error(msg) ◄──────────── Error(msg)               Success(session)
//! ```
//!
//! The view state is never stored. It is recomputed from
//! `(current, in_flight, last_error)` so it cannot drift from the data.
//!
//! # Design Philosophy
//!
//! Every transition notifies a [`SessionObserver`] before returning, so
//! presentations are re-projected in the same turn that changed the data.
//! Responses are matched to the ticket that requested them; only the most
//! recently issued ticket may land.

use std::sync::Arc;

use chrono::Utc;

use crate::error::AnalysisError;
use crate::model::{AnalysisSession, AnalyzeRequest, AnalyzeResponse};
use crate::service::AnalysisService;

/// Which top-level result panel is showing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing submitted yet
    Idle,
    /// Waiting for the service
    Loading,
    /// Last attempt failed with this message
    Error(String),
    /// Showing this session
    Success(Arc<AnalysisSession>),
}

impl ViewState {
    /// Short name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Error(_) => "error",
            Self::Success(_) => "success",
        }
    }

    /// The session, when in `Success`
    #[must_use]
    pub fn session(&self) -> Option<&Arc<AnalysisSession>> {
        match self {
            Self::Success(session) => Some(session),
            _ => None,
        }
    }
}

/// Notified synchronously after every transition
pub trait SessionObserver {
    /// The view state changed to `state`
    fn session_changed(&mut self, state: &ViewState);
}

impl SessionObserver for () {
    fn session_changed(&mut self, _state: &ViewState) {}
}

/// Ticket for a submission that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAnalysis {
    request_id: u64,
    request: AnalyzeRequest,
}

impl PendingAnalysis {
    /// Monotonic id of this submission
    #[must_use]
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Exactly what will be sent
    #[must_use]
    pub fn request(&self) -> &AnalyzeRequest {
        &self.request
    }
}

/// Owner of the current analysis session
#[derive(Debug, Default)]
pub struct SessionStateController {
    current: Option<Arc<AnalysisSession>>,
    in_flight: Option<u64>,
    last_error: Option<String>,
    next_request_id: u64,
}

impl SessionStateController {
    /// Controller in `Idle`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view state
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        if self.in_flight.is_some() {
            ViewState::Loading
        } else if let Some(ref message) = self.last_error {
            ViewState::Error(message.clone())
        } else if let Some(ref session) = self.current {
            ViewState::Success(Arc::clone(session))
        } else {
            ViewState::Idle
        }
    }

    /// The current session, if any
    ///
    /// Kept during `Loading`; cleared by an error.
    #[must_use]
    pub fn current(&self) -> Option<&Arc<AnalysisSession>> {
        self.current.as_ref()
    }

    /// Whether a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate input and move to `Loading`
    ///
    /// Invalid input moves straight to `Error` and no ticket is issued. Either
    /// way, any ticket issued earlier becomes stale.
    pub fn begin_submit(
        &mut self,
        code: &str,
        language_name: &str,
        language_mime: &str,
        observer: &mut dyn SessionObserver,
    ) -> Result<PendingAnalysis, AnalysisError> {
        let validation = if code.trim().is_empty() {
            Err(AnalysisError::EmptyCode)
        } else if language_name.trim().is_empty() {
            Err(AnalysisError::EmptyLanguage)
        } else {
            Ok(())
        };

        if let Err(err) = validation {
            tracing::debug!(error = %err, "Submission rejected");
            self.fail(&err, observer);
            return Err(err);
        }

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.in_flight = Some(request_id);
        self.last_error = None;
        tracing::debug!(request_id, language = language_name, "Analysis started");
        self.publish(observer);

        Ok(PendingAnalysis {
            request_id,
            request: AnalyzeRequest::new(code, language_name, language_mime),
        })
    }

    /// Apply the outcome of a ticket
    ///
    /// Returns `false` (and changes nothing) when the ticket is no longer the
    /// latest one.
    pub fn finish_submit(
        &mut self,
        ticket: PendingAnalysis,
        outcome: Result<AnalyzeResponse, AnalysisError>,
        observer: &mut dyn SessionObserver,
    ) -> bool {
        if self.in_flight != Some(ticket.request_id) {
            tracing::warn!(
                request_id = ticket.request_id,
                latest = ?self.in_flight,
                "Discarding stale analysis outcome"
            );
            return false;
        }

        self.in_flight = None;
        match outcome {
            Ok(response) => {
                let session = AnalysisSession::compose(ticket.request, response, Utc::now());
                tracing::debug!(
                    request_id = ticket.request_id,
                    bugs = session.bugs.len(),
                    suggestions = session.suggestions.len(),
                    "Analysis succeeded"
                );
                self.current = Some(Arc::new(session));
                self.last_error = None;
                self.publish(observer);
            }
            Err(err) => {
                tracing::warn!(request_id = ticket.request_id, error = %err, "Analysis failed");
                self.fail(&err, observer);
            }
        }
        true
    }

    /// Validate, call the service, apply the outcome
    pub async fn submit<S>(
        &mut self,
        service: &S,
        code: &str,
        language_name: &str,
        language_mime: &str,
        observer: &mut dyn SessionObserver,
    ) -> ViewState
    where
        S: AnalysisService + ?Sized,
    {
        let Ok(ticket) = self.begin_submit(code, language_name, language_mime, observer) else {
            return self.view_state();
        };

        let outcome = service.analyze(ticket.request()).await;
        self.finish_submit(ticket, outcome, observer);
        self.view_state()
    }

    /// Show a past session directly, without a request
    pub fn replay(
        &mut self,
        session: impl Into<Arc<AnalysisSession>>,
        observer: &mut dyn SessionObserver,
    ) {
        let session = session.into();
        if let Some(request_id) = self.in_flight.take() {
            tracing::debug!(request_id, "Replay supersedes in-flight analysis");
        }
        tracing::debug!(
            language = %session.language,
            timestamp = %session.timestamp,
            "Replaying session"
        );
        self.current = Some(session);
        self.last_error = None;
        self.publish(observer);
    }

    fn fail(&mut self, err: &AnalysisError, observer: &mut dyn SessionObserver) {
        self.in_flight = None;
        self.current = None;
        self.last_error = Some(err.to_string());
        self.publish(observer);
    }

    fn publish(&self, observer: &mut dyn SessionObserver) {
        let state = self.view_state();
        tracing::debug!(state = state.name(), "View state changed");
        observer.session_changed(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BugFinding, Severity};

    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl SessionObserver for Recorder {
        fn session_changed(&mut self, state: &ViewState) {
            self.0.push(state.name());
        }
    }

    fn response(explanation: &str) -> AnalyzeResponse {
        AnalyzeResponse {
            explanation: Some(explanation.to_string()),
            bugs: vec![BugFinding::new(Some(1), Severity::High, "boom")],
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_idle() {
        let controller = SessionStateController::new();
        assert_eq!(controller.view_state(), ViewState::Idle);
        assert!(controller.current().is_none());
    }

    #[test]
    fn test_empty_code_is_rejected_locally() {
        let mut controller = SessionStateController::new();
        let mut recorder = Recorder::default();

        let err = controller
            .begin_submit("   \n", "Python", "python", &mut recorder)
            .unwrap_err();

        assert_eq!(err, AnalysisError::EmptyCode);
        assert_eq!(
            controller.view_state(),
            ViewState::Error("Please enter some code to analyze.".to_string())
        );
        assert_eq!(recorder.0, vec!["error"]);
    }

    #[test]
    fn test_empty_language_is_rejected_locally() {
        let mut controller = SessionStateController::new();
        let err = controller
            .begin_submit("x = 1", "", "other", &mut ())
            .unwrap_err();
        assert_eq!(err, AnalysisError::EmptyLanguage);
    }

    #[test]
    fn test_success_flow() {
        let mut controller = SessionStateController::new();
        let mut recorder = Recorder::default();

        let ticket = controller
            .begin_submit("x = 1/0", "Python", "python", &mut recorder)
            .unwrap();
        assert_eq!(controller.view_state(), ViewState::Loading);

        assert!(controller.finish_submit(ticket, Ok(response("risky")), &mut recorder));

        let state = controller.view_state();
        let session = state.session().unwrap();
        assert_eq!(session.code, "x = 1/0");
        assert_eq!(session.explanation.as_deref(), Some("risky"));
        assert_eq!(recorder.0, vec!["loading", "success"]);
    }

    #[test]
    fn test_error_clears_current_session() {
        let mut controller = SessionStateController::new();
        let ticket = controller
            .begin_submit("x", "Python", "python", &mut ())
            .unwrap();
        controller.finish_submit(ticket, Ok(response("ok")), &mut ());
        assert!(controller.current().is_some());

        let ticket = controller
            .begin_submit("y", "Python", "python", &mut ())
            .unwrap();
        // Previous session survives while loading
        assert!(controller.current().is_some());

        controller.finish_submit(
            ticket,
            Err(AnalysisError::Api {
                status: 500,
                detail: None,
            }),
            &mut (),
        );
        assert_eq!(
            controller.view_state(),
            ViewState::Error("API Error: 500".to_string())
        );
        assert!(controller.current().is_none());
    }

    #[test]
    fn test_latest_request_wins() {
        let mut controller = SessionStateController::new();
        let first = controller
            .begin_submit("a", "Python", "python", &mut ())
            .unwrap();
        let second = controller
            .begin_submit("b", "Python", "python", &mut ())
            .unwrap();
        assert!(second.request_id() > first.request_id());

        assert!(controller.finish_submit(second, Ok(response("second")), &mut ()));
        assert!(!controller.finish_submit(first, Ok(response("first")), &mut ()));

        assert_eq!(controller.current().unwrap().code, "b");
    }

    #[test]
    fn test_replay_supersedes_in_flight() {
        let mut controller = SessionStateController::new();
        let ticket = controller
            .begin_submit("a", "Python", "python", &mut ())
            .unwrap();

        let replayed = AnalysisSession::compose(
            AnalyzeRequest::new("old", "Rust", "rust"),
            response("from history"),
            Utc::now(),
        );
        let mut recorder = Recorder::default();
        controller.replay(replayed, &mut recorder);

        assert_eq!(recorder.0, vec!["success"]);
        assert!(!controller.finish_submit(ticket, Ok(response("late")), &mut ()));
        assert_eq!(controller.current().unwrap().code, "old");
    }
}
