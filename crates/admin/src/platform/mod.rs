//! Platform API client for the operator endpoints.
//!
//! The console is a thin relay: every data operation here forwards the
//! operator's upstream session and body to the platform API and returns the
//! result. Menu rules, order-state legality, and stats aggregation are all
//! enforced upstream.

mod client;
pub mod types;

pub use client::OperatorClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the platform's operator endpoints.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found upstream.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The relayed operator session was rejected upstream.
    #[error("Unauthorized by platform API")]
    Unauthorized,

    /// Upstream returned a non-success status with a message body.
    #[error("Platform API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Upstream response was missing an expected part.
    #[error("Malformed platform response: {0}")]
    MalformedResponse(String),
}
