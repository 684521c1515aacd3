//! Provider traits and errors

use std::future::Future;

use bytes::Bytes;
use thiserror::Error;

use super::TileLayer;
use crate::coord::TileIndex;

/// Errors raised while requesting tile bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The request did not complete within the client timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl ProviderError {
    /// Whether a retry might succeed.
    ///
    /// Timeouts, transport failures and 5xx responses are transient.
    /// Client errors (4xx, including 403 and 429) are not retried.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::HttpStatus { status, .. } => *status >= 500,
            ProviderError::Timeout { .. } | ProviderError::Request(_) => true,
            ProviderError::ClientBuild(_) => false,
        }
    }
}

/// A remote source of encoded tile images.
///
/// Implementations return the raw body bytes; decoding happens in the
/// mosaic builder.
pub trait TileSource: Send + Sync {
    /// Fetches the encoded image for one tile.
    fn fetch_tile(
        &self,
        tile: TileIndex,
        layer: TileLayer,
    ) -> impl Future<Output = Result<Bytes, ProviderError>> + Send;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        let err = ProviderError::HttpStatus {
            status: 503,
            url: "http://x".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_client_errors_are_permanent() {
        for status in [400, 403, 404, 429] {
            let err = ProviderError::HttpStatus {
                status,
                url: "http://x".to_string(),
            };
            assert!(!err.is_transient(), "status {} should not retry", status);
        }
    }

    #[test]
    fn test_timeout_and_transport_are_transient() {
        assert!(ProviderError::Timeout {
            url: "http://x".to_string()
        }
        .is_transient());
        assert!(ProviderError::Request("reset".to_string()).is_transient());
        assert!(!ProviderError::ClientBuild("tls".to_string()).is_transient());
    }

    #[test]
    fn test_display() {
        let err = ProviderError::HttpStatus {
            status: 404,
            url: "https://mt0.google.com/vt".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://mt0.google.com/vt");
    }
}
