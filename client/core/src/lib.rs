//! BugAI Core - Headless Session Core for the BugAI Code Analysis Client
//!
//! This crate holds everything the BugAI client does except drawing pixels.
//! It submits code to the analysis service, owns the single "current
//! analysis" record and keeps every presentation of that record in sync: the
//! results panel, the read-aloud narrator, the report exporter and the
//! history list.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         Surfaces                                 │
//! │   ┌──────────┐   ┌──────────────┐   ┌────────────────────────┐   │
//! │   │ bugai CLI│   │  GUI / Web   │   │   Tests (in-memory)    │   │
//! │   └────┬─────┘   └──────┬───────┘   └───────────┬────────────┘   │
//! │        └────────────────┴───────────────────────┘                │
//! │                 UiEvent (up)   capabilities (down)               │
//! └─────────────────────────────┬────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────┼────────────────────────────────────┐
//! │                        BUGAI CORE                                │
//! │  ┌──────────────────────────┴─────────────────────────────────┐  │
//! │  │                       Workbench                            │  │
//! │  │ ┌────────────┐ ┌──────────┐ ┌──────────┐ ┌───────────────┐ │  │
//! │  │ │  Session   │ │   View   │ │ ReadAloud│ │    History    │ │  │
//! │  │ │ Controller │ │ Renderer │ │Controller│ │    Service    │ │  │
//! │  │ └─────┬──────┘ └──────────┘ └──────────┘ └───────┬───────┘ │  │
//! │  │       └──────────── AnalysisService ─────────────┘         │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Workbench`]: owns every component and routes [`UiEvent`]s
//! - [`SessionStateController`]: the current session and its [`ViewState`]
//! - [`ViewRenderer`]: projects the view state into a [`ResultsView`]
//! - [`ReadAloudController`]: narration of the findings
//! - [`HistoryService`]: past sessions and replay
//! - [`ReportExporter`]: paginated report layout
//! - [`ModalService`]: the single confirm/cancel dialog
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use bugai_core::{
//!     load_config, ConfigOverrides, HttpAnalysisService, Surfaces, UiEvent, Workbench,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let loaded = load_config(&ConfigOverrides::default())?;
//!     let service = Arc::new(HttpAnalysisService::from_config(&loaded.config)?);
//!     let mut workbench = Workbench::new(service, Surfaces::headless(&loaded.config.report_dir));
//!
//!     workbench.handle_event(UiEvent::SetCode("print(1/0)".into())).await;
//!     workbench.handle_event(UiEvent::SelectLanguage("python".into())).await;
//!     workbench.handle_event(UiEvent::Submit).await;
//!
//!     println!("{}", workbench.view());
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`model`]: wire records (`AnalysisSession`, `BugFinding`, `HistoryEntry`)
//! - [`error`]: user-facing analysis errors
//! - [`config`]: layered client configuration
//! - [`service`]: the remote service boundary and its HTTP client
//! - [`capabilities`]: editor, speech, clipboard and document-sink traits
//! - [`controller`]: the session state machine
//! - [`render`]: results projection
//! - [`narration`]: read-aloud
//! - [`source`]: code editor and language selector
//! - [`history`]: history list and replay
//! - [`export`]: report layout
//! - [`modal`]: dialogs
//! - [`workbench`]: the application object
//!
//! # No UI Dependencies
//!
//! Nothing here depends on a widget toolkit, a terminal library or a speech
//! API. Surfaces plug in through [`capabilities`].

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capabilities;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod history;
pub mod modal;
pub mod model;
pub mod narration;
pub mod render;
pub mod service;
pub mod source;
pub mod workbench;

// Re-exports for convenience
pub use capabilities::{
    Clipboard, ClipboardError, DocumentSink, Editor, MemoryClipboard, MemoryEditor, MemorySink,
    ReportFileSink, SpeechEngine, SpeechEvent, Surfaces, TranscriptSpeech, UtteranceId,
};
pub use config::{
    default_config_path, load_config, load_config_from_path, ClientConfig, ConfigError,
    ConfigOverrides, ConfigSource, LoadedConfig,
};
pub use controller::{PendingAnalysis, SessionObserver, SessionStateController, ViewState};
pub use error::AnalysisError;
pub use export::{Element, ReportDocument, ReportExporter};
pub use history::{HistoryItemView, HistoryService, HistoryView};
pub use modal::{ConfirmStyle, ModalRequest, ModalService, ModalView};
pub use model::{
    display_timestamp, AnalysisSession, AnalyzeRequest, AnalyzeResponse, BugFinding,
    HistoryEntry, Severity,
};
pub use narration::{narration_text, ReadAloudController, ReadingState};
pub use render::{
    badge_class, project, AppTab, CodeTab, FindingsView, Panel, ResultsView, SuggestionsView,
    ViewRenderer,
};
pub use service::{AnalysisService, HttpAnalysisService};
pub use source::{LanguageChoice, SourceForm, LANGUAGES, OTHER_MIME};
pub use workbench::{PendingAction, UiEvent, Workbench};
