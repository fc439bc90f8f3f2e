#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! REST client for the civic complaint portal API.
//!
//! The [`PortalApi`] trait is the seam between the report store and the
//! remote server: [`HttpPortalApi`] talks to a real server over `reqwest`,
//! while tests substitute an in-memory implementation.
//!
//! Every operation fails with [`PortalError::Network`] when the server
//! answers with a non-2xx status (whatever the body says) and with
//! [`PortalError::Transport`] when the request never completes. Nothing is
//! retried.

pub mod config;
pub mod http;

use async_trait::async_trait;
use civic_portal_models::{
    AssistanceCase, AssistanceDraft, BestPractice, Comment, CommentDraft, OfficialLink, Report,
    ReportDraft,
};
use thiserror::Error;

pub use config::ApiConfig;
pub use http::HttpPortalApi;

/// Errors that can occur while talking to the portal API.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The request could not be sent or its response could not be read
    /// (DNS, connection refused, timeout, reset).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of what went wrong.
        message: String,
    },

    /// The server responded with a non-success status.
    #[error("Network error: HTTP {status}")]
    Network {
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// A client-side precondition failed; no request was sent.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the failed precondition.
        message: String,
    },

    /// A success response carried a body that is not the expected JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a local file (e.g. an image attachment) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The client configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the invalid setting.
        message: String,
    },
}

impl From<reqwest::Error> for PortalError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport {
            message: e.to_string(),
        }
    }
}

impl PortalError {
    /// Returns the HTTP status for [`PortalError::Network`] errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status } => Some(*status),
            _ => None,
        }
    }
}

/// Operations offered by the portal's REST API.
///
/// Paths are relative to the API base (see [`ApiConfig`]).
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// `GET /reports`
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn list_reports(&self) -> Result<Vec<Report>, PortalError>;

    /// `POST /reports` as `multipart/form-data`; returns the created record.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn create_report(&self, draft: &ReportDraft) -> Result<Report, PortalError>;

    /// `POST /reports/{id}/like`; returns the updated record with the
    /// server's like count and like state.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn like_report(&self, report_id: &str) -> Result<Report, PortalError>;

    /// `GET /reports/{id}/comments`
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn list_comments(&self, report_id: &str) -> Result<Vec<Comment>, PortalError>;

    /// `POST /reports/{id}/comments`
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn create_comment(
        &self,
        report_id: &str,
        draft: &CommentDraft,
    ) -> Result<Comment, PortalError>;

    /// `GET /official-links`
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn list_official_links(&self) -> Result<Vec<OfficialLink>, PortalError>;

    /// `GET /best-practices`
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn list_best_practices(&self) -> Result<Vec<BestPractice>, PortalError>;

    /// `GET /assistance-cases`
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn list_assistance_cases(&self) -> Result<Vec<AssistanceCase>, PortalError>;

    /// `POST /assistance-cases`
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    async fn create_assistance_case(
        &self,
        draft: &AssistanceDraft,
    ) -> Result<AssistanceCase, PortalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_for_network_errors() {
        assert_eq!(PortalError::Network { status: 500 }.status(), Some(500));
        assert_eq!(
            PortalError::Transport {
                message: "connection refused".to_string()
            }
            .status(),
            None
        );
    }

    #[test]
    fn error_messages_name_the_kind() {
        assert_eq!(
            PortalError::Network { status: 404 }.to_string(),
            "Network error: HTTP 404"
        );
        assert_eq!(
            PortalError::Validation {
                message: "comment is empty".to_string()
            }
            .to_string(),
            "Validation error: comment is empty"
        );
    }
}
