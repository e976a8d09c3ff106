//! Domain error types
//!
//! This module defines error types specific to domain operations:
//! field validation failures for destination forms and the error taxonomy
//! surfaced by the destination management use cases.

use thiserror::Error;

use super::newtypes::DestinationId;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Cell row is not a positive integer
    #[error("Invalid cell row: {0}")]
    InvalidRow(String),

    /// Cell column is not 1-3 ASCII letters
    #[error("Invalid cell column: {0}")]
    InvalidColumn(String),

    /// A required form field is empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A destination with the same name already exists for the query
    #[error("Destination with same name already exists: {0}")]
    DuplicateName(String),

    /// The selected visualization cannot feed a destination
    #[error("Visualization {0} is not a table")]
    NotTabular(String),

    /// Export format is not one the server understands
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Invalid state transition attempt
    #[error("Invalid state transition from {from} to {to}")]
    InvalidState {
        /// The current state
        from: String,
        /// The attempted target state
        to: String,
    },

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

/// Errors surfaced by the destination management flow
///
/// Every variant is caught at the use-case boundary and reported to the
/// user through the notification port; none of them is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DestinationError {
    /// Network failure or non-2xx response from the backend
    #[error("Request failed: {0}")]
    Fetch(String),

    /// Client-side validation rejected the input before any request
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// A sync for this destination is already in flight
    #[error("A sync is already running for destination {0}")]
    AlreadyRunning(DestinationId),

    /// The sync job reached the failed terminal state
    #[error("Sync job {job_id} failed: {message}")]
    JobFailed {
        /// Server-side job identifier
        job_id: String,
        /// Server-supplied error text
        message: String,
    },

    /// The poller gave up before the job reached a terminal state
    #[error("Sync job {job_id} did not finish after {attempts} status checks")]
    Timeout {
        /// Server-side job identifier
        job_id: String,
        /// Number of status requests issued
        attempts: u32,
    },

    /// The owning view was closed while the operation was in flight
    #[error("Operation cancelled")]
    Cancelled,

    /// The user or the query does not allow the operation
    #[error("Not permitted: {0}")]
    NotPermitted(String),
}

impl DestinationError {
    /// Builds a `Fetch` error from any error chain, keeping its full context
    pub fn fetch(err: impl std::fmt::Display) -> Self {
        DestinationError::Fetch(format!("{err:#}"))
    }

    /// Returns true for errors raised before any network request was made
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            DestinationError::Validation(_) | DestinationError::AlreadyRunning(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidRow("abc".to_string());
        assert_eq!(err.to_string(), "Invalid cell row: abc");

        let err = DomainError::MissingField("name");
        assert_eq!(err.to_string(), "Missing required field: name");

        let err = DomainError::InvalidState {
            from: "Idle".to_string(),
            to: "Polling".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid state transition from Idle to Polling");
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: DestinationError = DomainError::DuplicateName("Sheet A".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Destination with same name already exists: Sheet A"
        );
        assert!(err.is_client_side());
    }

    #[test]
    fn test_fetch_keeps_context_chain() {
        let inner = anyhow::anyhow!("connection refused").context("GET /api/queries/1/destinations");
        let err = DestinationError::fetch(inner);
        assert_eq!(
            err,
            DestinationError::Fetch(
                "GET /api/queries/1/destinations: connection refused".to_string()
            )
        );
        assert!(!err.is_client_side());
    }

    #[test]
    fn test_job_failed_display() {
        let err = DestinationError::JobFailed {
            job_id: "job-1".to_string(),
            message: "sheet not shared".to_string(),
        };
        assert_eq!(err.to_string(), "Sync job job-1 failed: sheet not shared");
    }

    #[test]
    fn test_not_permitted_display() {
        let err = DestinationError::NotPermitted("only admins can create destinations".to_string());
        assert_eq!(
            err.to_string(),
            "Not permitted: only admins can create destinations"
        );
        assert!(!err.is_client_side());
    }
}
