//! HTTP Analysis Service
//!
//! `reqwest` client for the BugAI backend.
//!
//! # Endpoints
//!
//! - `POST /api/analyze` - analyze code, JSON in and out
//! - `GET /api/history` - list past analyses
//! - `DELETE /api/history` - clear all past analyses

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::traits::AnalysisService;
use crate::config::ClientConfig;
use crate::error::AnalysisError;
use crate::model::{AnalyzeRequest, AnalyzeResponse, HistoryEntry};

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Only string details are shown; structured ones fall back to the
    /// status-coded message.
    fn into_detail(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(detail)) => Some(detail),
            _ => None,
        }
    }
}

/// Analysis service client over HTTP
#[derive(Clone)]
pub struct HttpAnalysisService {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpAnalysisService {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Create from loaded configuration
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    /// Base URL this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn analyze_url(&self) -> String {
        format!("{}/api/analyze", self.base_url)
    }

    fn history_url(&self) -> String {
        format!("{}/api/history", self.base_url)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    fn name(&self) -> &'static str {
        "BugAI HTTP"
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        let response = self
            .http_client
            .post(self.analyze_url())
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(ApiErrorBody::into_detail);
            tracing::warn!(status = status.as_u16(), detail = ?detail, "Analyze request failed");
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<AnalyzeResponse>()
            .await
            .map_err(|e| AnalysisError::transport(e.to_string()))
    }

    async fn history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        let entries = self
            .http_client
            .get(self.history_url())
            .send()
            .await
            .context("Failed to fetch history")?
            .error_for_status()
            .context("Failed to fetch history")?
            .json::<Vec<HistoryEntry>>()
            .await
            .context("Malformed history response")?;

        Ok(entries)
    }

    async fn clear_history(&self) -> anyhow::Result<()> {
        self.http_client
            .delete(self.history_url())
            .send()
            .await
            .context("Failed to clear history")?
            .error_for_status()
            .context("Failed to clear history")?;

        Ok(())
    }
}
