//! Platform API client.
//!
//! # Architecture
//!
//! - The platform API is source of truth - NO local sync, direct HTTP/JSON calls
//! - Every handler in this app is a thin relay to it
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//! - Authenticated calls relay the shopper's upstream session cookie
//!
//! # Example
//!
//! ```rust,ignore
//! use tavola_storefront::platform::PlatformClient;
//!
//! let client = PlatformClient::new(&config.platform);
//!
//! // Browse the catalog
//! let restaurant = client.get_restaurant(&restaurant_id).await?;
//! let meals = client.list_meals(&restaurant_id).await?;
//!
//! // Place an order with the shopper's relayed session
//! let order = client.create_order(&token, order_request).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::PlatformClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the platform API.
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

    /// The relayed session was rejected upstream.
    #[error("Unauthorized by platform API")]
    Unauthorized,

    /// Rate limited by the platform.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Upstream returned a non-success status with a message body.
    #[error("Platform API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Upstream response was missing an expected part (e.g., session cookie).
    #[error("Malformed platform response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_display() {
        let err = PlatformError::NotFound("restaurant rest_9".to_string());
        assert_eq!(err.to_string(), "Not found: restaurant rest_9");

        let err = PlatformError::Upstream {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Platform API error (503): maintenance");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = PlatformError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
