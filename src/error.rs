//! Error taxonomy shared by every fetch and reshaping path.
//!
//! A superseded run is not an error: it is reported as
//! [`RunOutcome::Stale`](crate::orchestrator::RunOutcome::Stale) and dropped.

use thiserror::Error;

pub const MSG_INVALID_INPUT: &str = "Please select or enter a valid value.";
pub const MSG_NO_ARTICLES: &str = "No articles found for this input.";
pub const MSG_RETRY: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Empty or invalid user input; no request was issued.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The backend has no matching data. An empty state, not a fault.
    #[error("no data for {0}")]
    NotFound(String),

    /// Network failure or undecodable body.
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// Non-success HTTP status. `message` is the backend's own `message` field, if any.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },

    /// Payload decoded but did not match the expected report shape.
    #[error("report {report} is malformed: {reason}")]
    MalformedReport { report: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    pub fn transport(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(report: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedReport {
            report: report.into(),
            reason: reason.to_string(),
        }
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(_) => MSG_NO_ARTICLES.to_string(),
            _ => MSG_RETRY.to_string(),
        }
    }

    /// Backend-provided reason, falling back to the generic retry text.
    pub fn server_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            other => other.user_message(),
        }
    }
}
