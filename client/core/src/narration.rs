//! Read-Aloud Narration
//!
//! Turns the current session's findings into one spoken paragraph and tracks
//! whether it is being read.
//!
//! Narration is independent of the view state, except that any session
//! transition stops it. Every utterance gets its own [`UtteranceId`]; engine
//! events for anything but the latest utterance are ignored.

use crate::capabilities::{SpeechEngine, SpeechEvent, UtteranceId};
use crate::controller::{SessionObserver, ViewState};
use crate::modal::ModalService;
use crate::model::AnalysisSession;

/// Spoken when the session has no findings
pub const NO_BUGS_NARRATION: &str = "No bugs were found.";

/// Spoken when there is no session at all
pub const NO_DATA_NARRATION: &str = "No analysis data found.";

/// Whether narration is playing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadingState {
    /// Silent
    #[default]
    Stopped,
    /// Speaking the findings
    Reading,
}

/// Narration text for a session
#[must_use]
pub fn narration_text(session: &AnalysisSession) -> String {
    let bugs = &session.bugs;
    if bugs.is_empty() {
        return NO_BUGS_NARRATION.to_string();
    }

    let noun = if bugs.len() == 1 { "bug" } else { "bugs" };
    let mut text = format!("Found {} {noun}. ", bugs.len());
    for (index, bug) in bugs.iter().enumerate() {
        let line = bug
            .line
            .map_or_else(|| "unknown".to_string(), |line| line.to_string());
        text.push_str(&format!(
            "Bug {}: On line {line}, severity {}. {} ... ",
            index + 1,
            bug.severity,
            bug.description
        ));
    }
    text
}

/// Drives the speech engine for the "Read Bugs" action
pub struct ReadAloudController {
    speech: Box<dyn SpeechEngine>,
    state: ReadingState,
    active: Option<UtteranceId>,
    next_utterance: u64,
}

impl ReadAloudController {
    /// Narrator over `speech`
    pub fn new(speech: Box<dyn SpeechEngine>) -> Self {
        Self {
            speech,
            state: ReadingState::Stopped,
            active: None,
            next_utterance: 0,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> ReadingState {
        self.state
    }

    /// Toggle button label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.state {
            ReadingState::Stopped => "Read Bugs",
            ReadingState::Reading => "Stop Reading",
        }
    }

    /// Latest utterance handed to the engine, if still live
    #[must_use]
    pub fn active_utterance(&self) -> Option<UtteranceId> {
        self.active
    }

    /// The toggle action
    ///
    /// Without a speech engine a notice is opened instead. Without a session
    /// a short "no data" line is spoken and the state stays `Stopped`.
    pub fn toggle<A: Default>(
        &mut self,
        session: Option<&AnalysisSession>,
        modal: &mut ModalService<A>,
    ) -> ReadingState {
        if !self.speech.is_available() {
            modal.notice(
                "TTS Not Supported",
                "Sorry, your environment does not support text-to-speech.",
            );
            return self.state;
        }

        if self.state == ReadingState::Reading {
            self.stop();
            return self.state;
        }

        match session {
            Some(session) => {
                let text = narration_text(session);
                self.start(&text);
                self.state = ReadingState::Reading;
                tracing::debug!(bugs = session.bugs.len(), "Narration started");
            }
            None => self.start(NO_DATA_NARRATION),
        }
        self.state
    }

    /// Cancel anything playing
    pub fn stop(&mut self) {
        if let Some(id) = self.active.take() {
            self.speech.cancel();
            tracing::debug!(utterance = id.as_u64(), "Narration cancelled");
        }
        self.state = ReadingState::Stopped;
    }

    /// Engine reported completion or failure
    pub fn handle_event(&mut self, event: &SpeechEvent) {
        if self.active != Some(event.utterance()) {
            tracing::debug!(
                utterance = event.utterance().as_u64(),
                "Ignoring event for superseded utterance"
            );
            return;
        }

        if let SpeechEvent::Failed { error, .. } = event {
            tracing::warn!(error = %error, "Speech synthesis failed");
        }
        self.active = None;
        self.state = ReadingState::Stopped;
    }

    fn start(&mut self, text: &str) {
        self.stop();
        self.next_utterance += 1;
        let id = UtteranceId::new(self.next_utterance);
        self.speech.speak(id, text);
        self.active = Some(id);
    }
}

impl SessionObserver for ReadAloudController {
    fn session_changed(&mut self, _state: &ViewState) {
        self.stop();
    }
}
