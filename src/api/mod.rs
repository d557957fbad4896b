//! Remote inference-server API
//!
//! HTTP client for a TabbyAPI-compatible server plus the streaming glue:
//! SSE line splitting, the completion decoder, and the load-progress tracker.

pub mod client;
pub mod sse;
pub mod stream;

pub use client::ApiClient;

use thiserror::Error;

/// API call errors
///
/// Every request converts transport and status failures into one of these;
/// nothing is retried and nothing propagates uncaught into the UI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),
    #[error("Request failed, status code: {status}")]
    Server { status: reqwest::StatusCode },
    #[error("Malformed response: {0}")]
    MalformedStream(String),
    #[error("Model load ended before finishing")]
    LoadIncomplete,
}
