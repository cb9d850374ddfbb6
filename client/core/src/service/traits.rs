//! Analysis Service Trait
//!
//! The boundary between the session core and the remote service. The three
//! operations mirror the service's endpoints:
//!
//! - `POST /api/analyze` → [`AnalysisService::analyze`]
//! - `GET /api/history` → [`AnalysisService::history`]
//! - `DELETE /api/history` → [`AnalysisService::clear_history`]

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::model::{AnalyzeRequest, AnalyzeResponse, HistoryEntry};

/// Remote analysis/history service
///
/// Implement this trait to point the client at a different service or to
/// script responses in tests.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Service name for logs
    fn name(&self) -> &str;

    /// Submit code for analysis
    ///
    /// Errors carry the user-facing message (server `detail`, status-coded
    /// fallback, or transport text).
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError>;

    /// Fetch past sessions, in service order
    async fn history(&self) -> anyhow::Result<Vec<HistoryEntry>>;

    /// Remove all past sessions (idempotent)
    async fn clear_history(&self) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: AnalysisService + ?Sized> AnalysisService for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        (**self).analyze(request).await
    }

    async fn history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        (**self).history().await
    }

    async fn clear_history(&self) -> anyhow::Result<()> {
        (**self).clear_history().await
    }
}
