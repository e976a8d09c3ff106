//! vizsync API - REST client for the dashboard server
//!
//! Provides async client for:
//! - Destination CRUD per visualization
//! - Manual sync jobs and their status
//! - Data-catalog dataset lookups
//! - Spreadsheet export of query results
//!
//! ## Modules
//!
//! - [`auth`] - API key storage in the system keyring
//! - [`client`] - HTTP client with key authentication and 429 retry
//! - [`destinations`] - Destination and sync job endpoints
//! - [`catalog`] - Data-catalog endpoint
//! - [`export`] - Spreadsheet export endpoint
//! - [`provider`] - Port implementations over the client

pub mod auth;
pub mod catalog;
pub mod client;
pub mod destinations;
pub mod export;
pub mod provider;
pub mod retry;

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when communicating with the server
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API key is missing or invalid
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The key's user lacks permission for the requested operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the request, e.g. a duplicate destination name
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limit exceeded; retry after the specified duration
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Duration to wait before retrying
        retry_after: Duration,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Maps a non-success status and the server's message to an error
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let message = if message.trim().is_empty() {
            status.to_string()
        } else {
            message
        };
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ApiError::TooManyRequests {
                retry_after: retry::DEFAULT_RETRY_AFTER,
            },
            s if s.is_server_error() => ApiError::ServerError(message),
            _ => ApiError::BadRequest(message),
        }
    }
}
