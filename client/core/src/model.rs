//! Analysis Data Model
//!
//! Records exchanged with the analysis service and shared by every
//! presentation (renderer, narrator, exporter, history list).
//!
//! # Design Philosophy
//!
//! An [`AnalysisSession`] is assembled once and never mutated afterwards. The
//! session controller hands it out as an `Arc` so every reader sees the same
//! record. Fields that originate from the request (`code`, `language`,
//! `languageMime`) are taken from what the client sent, never from the
//! service response.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Severity of a reported bug
///
/// Parsing is case-insensitive; anything unrecognized (or missing) falls back
/// to [`Severity::Low`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor issue
    #[default]
    Low,
    /// Should be fixed
    Medium,
    /// Likely to break at runtime
    High,
}

impl Severity {
    /// Normalize a raw severity string from the service
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            other => {
                tracing::debug!(severity = other, "Unrecognized severity, defaulting to low");
                Self::Low
            }
        }
    }

    /// Lowercase label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => Self::normalize(&s),
            _ => Self::Low,
        })
    }
}

/// Accept `12`, `"12"` or `null` for a line number. Zero counts as absent.
fn lenient_line<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let line = match raw {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(line
        .filter(|l| *l > 0)
        .and_then(|l| u32::try_from(l).ok()))
}

/// One reported issue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugFinding {
    /// 1-based line number, if the service reported one
    #[serde(default, deserialize_with = "lenient_line")]
    pub line: Option<u32>,
    /// Normalized severity
    #[serde(default)]
    pub severity: Severity,
    /// What is wrong
    #[serde(default)]
    pub description: String,
}

impl BugFinding {
    /// Create a finding
    pub fn new(line: Option<u32>, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            line,
            severity,
            description: description.into(),
        }
    }

    /// Description with the "No description" fallback applied
    #[must_use]
    pub fn description_or_default(&self) -> &str {
        if self.description.trim().is_empty() {
            "No description"
        } else {
            &self.description
        }
    }
}

/// Body of `POST /api/analyze`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Source code to analyze
    pub code: String,
    /// Display name of the language
    pub language: String,
    /// Syntax-mode key, or `"other"`
    pub language_mime: String,
}

impl AnalyzeRequest {
    /// Create a request
    pub fn new(
        code: impl Into<String>,
        language: impl Into<String>,
        language_mime: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            language_mime: language_mime.into(),
        }
    }
}

/// Successful body of `POST /api/analyze`
///
/// Only analysis fields are read; any `code`/`language` keys the service may
/// echo back are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Summary of the code's quality
    #[serde(default)]
    pub explanation: Option<String>,
    /// Fixed version of the code, if any
    #[serde(default)]
    pub corrected_code: Option<String>,
    /// Findings, in service order
    #[serde(default)]
    pub bugs: Vec<BugFinding>,
    /// Improvement suggestions, in service order
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// The single current analysis record driving all views
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSession {
    /// Code that was submitted
    #[serde(default)]
    pub code: String,
    /// Language display name that was submitted
    #[serde(default)]
    pub language: String,
    /// Syntax-mode key that was submitted
    #[serde(default)]
    pub language_mime: String,
    /// Summary text
    #[serde(default)]
    pub explanation: Option<String>,
    /// Fixed version of the code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_code: Option<String>,
    /// Findings, in service order
    #[serde(default)]
    pub bugs: Vec<BugFinding>,
    /// Suggestions, in service order
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// ISO-8601 creation time (client clock)
    #[serde(default)]
    pub timestamp: String,
}

impl AnalysisSession {
    /// Compose a session from what was sent and what came back
    ///
    /// Request fields always win over same-named response fields.
    #[must_use]
    pub fn compose(
        request: AnalyzeRequest,
        response: AnalyzeResponse,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code: request.code,
            language: request.language,
            language_mime: request.language_mime,
            explanation: response.explanation,
            corrected_code: response.corrected_code,
            bugs: response.bugs,
            suggestions: response.suggestions,
            timestamp: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Corrected code, unless absent or blank
    #[must_use]
    pub fn corrected_code_text(&self) -> Option<&str> {
        self.corrected_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }
}

/// A stored past session plus its display summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Opaque service identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Language display name
    pub language: String,
    /// ISO-8601 time of the analysis
    pub timestamp: String,
    /// Truncated explanation
    #[serde(default)]
    pub explanation: String,
    /// Number of bugs found
    #[serde(default)]
    pub bug_count: u32,
    /// Replay payload
    pub full_data: AnalysisSession,
}

/// Format an ISO-8601 timestamp for display, keeping its own offset
///
/// Offset-less timestamps (as written by the history service) are accepted
/// too. Unparseable input is shown as-is.
#[must_use]
pub fn display_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format(DISPLAY).to_string();
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ts| ts.format(DISPLAY).to_string())
        .unwrap_or_else(|_| raw.to_string())
}
