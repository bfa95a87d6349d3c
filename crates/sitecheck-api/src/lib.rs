//! SiteCheck API - HTTP adapter for the quality control backend
//!
//! Implements the core's provider ports over the backend's REST API:
//! - Paginated, date-filterable photo feed
//! - The photo assignment mutation (never retried)
//! - Folder directory listing and the before-photo precondition query
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client and status mapping
//! - [`photos`] - Photo feed and assignment endpoints
//! - [`folders`] - Folder directory endpoints
//! - [`provider`] - Port implementations used by the stores

pub mod client;
pub mod folders;
pub mod photos;
pub mod provider;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when communicating with the SiteCheck API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, invalid or expired bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token is valid but lacks permission for the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The photo or folder does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server refused the request as it stands (409 or 422)
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// A server-side error occurred (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum number of body characters kept when the body is not JSON
const MAX_RAW_MESSAGE_LEN: usize = 200;

/// Error body shape used by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Maps a non-success status and its body to an error
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(status, body);
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Rejected(message)
            }
            s if s.is_server_error() => ApiError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => ApiError::UnexpectedStatus {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// HTTP status behind this error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::ServerError { status, .. } | ApiError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            ApiError::Rejected(_) | ApiError::InvalidResponse(_) => None,
        }
    }
}

fn extract_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error) {
            return message;
        }
    }
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }
    body.chars().take(MAX_RAW_MESSAGE_LEN).collect()
}
