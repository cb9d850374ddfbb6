//! Error Types
//!
//! Every failure in the session core ends up as a displayable message in the
//! error panel. The `Display` text of each variant is exactly what the user
//! sees.

use thiserror::Error;

/// Fallback text when a transport error carries no message
pub const UNKNOWN_ERROR_TEXT: &str = "An unknown error occurred.";

/// Why an analysis did not produce a session
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// Submitted code was empty or whitespace
    #[error("Please enter some code to analyze.")]
    EmptyCode,

    /// No language name was given
    #[error("Please specify the programming language.")]
    EmptyLanguage,

    /// The service answered with a non-2xx status
    #[error("{}", api_message(.status, .detail))]
    Api {
        /// HTTP status code
        status: u16,
        /// `detail` field of the error body, if present
        detail: Option<String>,
    },

    /// The request never produced a usable response
    #[error("{0}")]
    Transport(String),

    /// Failure without any message
    #[error("An unknown error occurred.")]
    Unknown,
}

impl AnalysisError {
    /// Wrap a transport failure, falling back to [`AnalysisError::Unknown`]
    /// when it has no text
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Unknown
        } else {
            Self::Transport(message)
        }
    }

    /// Whether the failure was detected locally, before any request
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyCode | Self::EmptyLanguage)
    }
}

fn api_message(status: &u16, detail: &Option<String>) -> String {
    match detail.as_deref() {
        Some(detail) if !detail.is_empty() => detail.to_string(),
        _ => format!("API Error: {status}"),
    }
}
