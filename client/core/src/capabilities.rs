//! Surface Capabilities
//!
//! The session core never touches a widget, a speech engine, the system
//! clipboard or the filesystem directly. Each surface (CLI, GUI, tests)
//! supplies these through the traits below.
//!
//! # Provided Implementations
//!
//! | Capability       | In-memory          | Real                |
//! |------------------|--------------------|---------------------|
//! | [`Editor`]       | [`MemoryEditor`]   | surface-specific    |
//! | [`SpeechEngine`] | [`TranscriptSpeech`] | surface-specific  |
//! | [`Clipboard`]    | [`MemoryClipboard`]  | surface-specific  |
//! | [`DocumentSink`] | [`MemorySink`]     | [`ReportFileSink`]  |
//!
//! The in-memory types are cheap clonable handles over shared state, so a
//! caller can keep one clone for inspection while the workbench owns another.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::ReportDocument;

// ============================================================================
// Editor
// ============================================================================

/// A text editor widget
pub trait Editor: Send {
    /// Current text
    fn value(&self) -> String;

    /// Replace the text
    fn set_value(&mut self, text: &str);

    /// Current syntax-mode key (`None` for plain text)
    fn mode(&self) -> Option<String>;

    /// Change the syntax-mode key
    fn set_mode(&mut self, mode: Option<&str>);

    /// Recompute layout after the widget became visible or changed size
    fn refresh(&mut self);
}

#[derive(Debug, Default)]
struct EditorState {
    value: String,
    mode: Option<String>,
    refreshes: usize,
}

/// Editor backed by a string
#[derive(Clone, Debug, Default)]
pub struct MemoryEditor {
    state: Arc<Mutex<EditorState>>,
}

impl MemoryEditor {
    /// Create an empty editor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the layout was refreshed
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.state.lock().refreshes
    }
}

impl Editor for MemoryEditor {
    fn value(&self) -> String {
        self.state.lock().value.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.state.lock().value = text.to_string();
    }

    fn mode(&self) -> Option<String> {
        self.state.lock().mode.clone()
    }

    fn set_mode(&mut self, mode: Option<&str>) {
        self.state.lock().mode = mode.map(str::to_string);
    }

    fn refresh(&mut self) {
        self.state.lock().refreshes += 1;
    }
}

// ============================================================================
// Speech
// ============================================================================

/// Identifies one `speak` call so late engine events can be matched
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtteranceId(u64);

impl UtteranceId {
    /// Wrap a raw id
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Engine notifications delivered back to the narrator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechEvent {
    /// The utterance was spoken to the end
    Finished(UtteranceId),
    /// The engine gave up on the utterance
    Failed {
        /// Which utterance
        id: UtteranceId,
        /// Engine message
        error: String,
    },
}

impl SpeechEvent {
    /// Utterance the event belongs to
    #[must_use]
    pub fn utterance(&self) -> UtteranceId {
        match self {
            Self::Finished(id) | Self::Failed { id, .. } => *id,
        }
    }
}

/// Speech synthesis engine
pub trait SpeechEngine: Send {
    /// Whether the engine can speak at all
    fn is_available(&self) -> bool;

    /// Queue `text` under `id`
    fn speak(&mut self, id: UtteranceId, text: &str);

    /// Drop everything queued or playing
    fn cancel(&mut self);
}

#[derive(Debug, Default)]
struct TranscriptState {
    spoken: Vec<(UtteranceId, String)>,
    queued: Vec<UtteranceId>,
    cancels: usize,
}

/// Speech engine that records what it was asked to say
///
/// Utterances stay queued until [`TranscriptSpeech::finish_next`] or a
/// cancel, so tests can deliver completion events explicitly.
#[derive(Clone, Debug)]
pub struct TranscriptSpeech {
    available: bool,
    state: Arc<Mutex<TranscriptState>>,
}

impl TranscriptSpeech {
    /// An engine that can speak
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: true,
            state: Arc::default(),
        }
    }

    /// An engine that reports itself unavailable
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            state: Arc::default(),
        }
    }

    /// Everything spoken so far, in order
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        self.state
            .lock()
            .spoken
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Utterances still queued or playing
    #[must_use]
    pub fn queued(&self) -> Vec<UtteranceId> {
        self.state.lock().queued.clone()
    }

    /// Number of `cancel` calls
    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.state.lock().cancels
    }

    /// Complete the oldest queued utterance and return its event
    pub fn finish_next(&self) -> Option<SpeechEvent> {
        let mut state = self.state.lock();
        if state.queued.is_empty() {
            return None;
        }
        let id = state.queued.remove(0);
        Some(SpeechEvent::Finished(id))
    }
}

impl Default for TranscriptSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for TranscriptSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, id: UtteranceId, text: &str) {
        let mut state = self.state.lock();
        state.spoken.push((id, text.to_string()));
        state.queued.push(id);
    }

    fn cancel(&mut self) {
        let mut state = self.state.lock();
        state.queued.clear();
        state.cancels += 1;
    }
}

// ============================================================================
// Clipboard
// ============================================================================

/// Clipboard write failures
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard exists on this surface
    #[error("clipboard unavailable")]
    Unavailable,

    /// The write was refused
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

/// System clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Primary write path
    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Secondary write path, tried when the primary one fails
    fn write_text_fallback(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Default)]
struct ClipboardState {
    contents: Option<String>,
    primary_fails: bool,
    fallback_fails: bool,
    fallback_used: bool,
}

/// Clipboard held in memory, with switchable failures
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<ClipboardState>>,
}

impl MemoryClipboard {
    /// A working clipboard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the primary and/or fallback path fail
    pub fn set_failures(&self, primary: bool, fallback: bool) {
        let mut state = self.state.lock();
        state.primary_fails = primary;
        state.fallback_fails = fallback;
    }

    /// Last successfully written text
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.state.lock().contents.clone()
    }

    /// Whether the last successful write went through the fallback
    #[must_use]
    pub fn fallback_used(&self) -> bool {
        self.state.lock().fallback_used
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.state.lock();
        if state.primary_fails {
            return Err(ClipboardError::Rejected("primary write disabled".to_string()));
        }
        state.contents = Some(text.to_string());
        state.fallback_used = false;
        Ok(())
    }

    fn write_text_fallback(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.state.lock();
        if state.fallback_fails {
            return Err(ClipboardError::Unavailable);
        }
        state.contents = Some(text.to_string());
        state.fallback_used = true;
        Ok(())
    }
}

// ============================================================================
// Document Sink
// ============================================================================

/// Where exported reports go
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Persist `document` and return the path of what was written
    ///
    /// The extension matches the format the sink produces: plain-text sinks
    /// use [`ReportDocument::text_file_name`], PDF renderers
    /// [`ReportDocument::file_name`].
    async fn persist(&self, document: &ReportDocument) -> anyhow::Result<PathBuf>;
}

/// Writes the plain-text rendition into a directory as `<stem>.txt`
#[derive(Clone, Debug)]
pub struct ReportFileSink {
    dir: PathBuf,
}

impl ReportFileSink {
    /// Sink writing into `dir` (created on first use)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    #[must_use]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl DocumentSink for ReportFileSink {
    async fn persist(&self, document: &ReportDocument) -> anyhow::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create report directory {}", self.dir.display()))?;

        let path = self.dir.join(document.text_file_name());
        tokio::fs::write(&path, document.to_plain_text())
            .await
            .with_context(|| format!("Failed to write report {}", path.display()))?;

        tracing::info!(path = %path.display(), pages = document.pages.len(), "Report saved");
        Ok(path)
    }
}

/// Keeps persisted documents in memory
///
/// Reports the same `<stem>.txt` name [`ReportFileSink`] would write.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    documents: Arc<Mutex<Vec<ReportDocument>>>,
}

impl MemorySink {
    /// Empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents persisted so far
    #[must_use]
    pub fn documents(&self) -> Vec<ReportDocument> {
        self.documents.lock().clone()
    }
}

#[async_trait]
impl DocumentSink for MemorySink {
    async fn persist(&self, document: &ReportDocument) -> anyhow::Result<PathBuf> {
        self.documents.lock().push(document.clone());
        Ok(PathBuf::from(document.text_file_name()))
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Every capability a workbench needs
pub struct Surfaces {
    /// Editable source input
    pub source_editor: Box<dyn Editor>,
    /// Read-only viewer for the corrected code
    pub corrected_editor: Box<dyn Editor>,
    /// Read-only viewer for the analyzed code
    pub analyzed_editor: Box<dyn Editor>,
    /// Narration engine
    pub speech: Box<dyn SpeechEngine>,
    /// Clipboard
    pub clipboard: Box<dyn Clipboard>,
    /// Report destination
    pub sink: Box<dyn DocumentSink>,
}

impl Surfaces {
    /// In-memory editors, a silent-but-available speech engine, an
    /// in-memory clipboard and a file sink writing into `report_dir`
    pub fn headless(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_editor: Box::new(MemoryEditor::new()),
            corrected_editor: Box::new(MemoryEditor::new()),
            analyzed_editor: Box::new(MemoryEditor::new()),
            speech: Box::new(TranscriptSpeech::new()),
            clipboard: Box::new(MemoryClipboard::new()),
            sink: Box::new(ReportFileSink::new(report_dir)),
        }
    }
}
