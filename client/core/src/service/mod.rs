//! Analysis Service Integration
//!
//! Abstracted access to the remote analysis/history service through a common
//! trait, so the session core can run against the real HTTP API or a scripted
//! stand-in.
//!
//! # Usage
//!
//! ```ignore
//! use bugai_core::service::{AnalysisService, HttpAnalysisService};
//! use bugai_core::AnalyzeRequest;
//!
//! let service = HttpAnalysisService::new("http://localhost:8000", Duration::from_secs(30))?;
//! let response = service.analyze(&AnalyzeRequest::new("x = 1", "Python", "python")).await?;
//! ```

mod http;
mod traits;

pub use http::HttpAnalysisService;
pub use traits::AnalysisService;
