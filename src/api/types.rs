//! Wire envelopes and error definitions for the backend API.

use serde::Deserialize;
use thiserror::Error;

/// One page of a collection listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> ListResult<T> {
    /// Whether another page follows this one.
    pub fn has_more(&self) -> bool {
        i64::from(self.page) < self.total_pages
    }
}

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Base URL or path could not form a request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (connect, TLS, body read).
    #[error("Request to {path} failed: {message}")]
    Transport { path: String, message: String },

    /// Request exceeded the configured deadline.
    #[error("Request to {path} timed out after {secs} seconds")]
    Timeout { path: String, secs: u64 },

    /// Backend answered with a non-success status.
    #[error("Backend returned {status} for {path}: {body}")]
    Status { path: String, status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    /// The requesting store was unmounted before the fetch could run.
    #[error("Fetch of {path} cancelled: store unmounted")]
    Cancelled { path: String },
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend operations.
pub type ApiResult<T> = Result<T, ApiError>;
