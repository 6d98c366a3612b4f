//! Error types for upstream calls.
//!
//! None of these ever reach the caller of the catalog/stream operations:
//! the pipeline logs them and degrades to an empty contribution. Keeping
//! them typed lets tests tell "no content" apart from "upstream failed".

use thiserror::Error;

/// Failure of a single upstream request.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Request could not be sent or the response body could not be read.
    #[error("upstream unavailable at {endpoint}: {reason}")]
    Unavailable {
        /// Endpoint that was requested
        endpoint: String,
        /// Transport-level reason
        reason: String,
    },

    /// Upstream answered with a non-success HTTP status.
    #[error("upstream {endpoint} returned status {status}")]
    Status {
        /// Endpoint that was requested
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// Payload could not be decoded into the expected shape.
    #[error("malformed response from {endpoint}: {reason}")]
    Malformed {
        /// Endpoint that was requested
        endpoint: String,
        /// Decoder message
        reason: String,
    },
}

impl UpstreamError {
    /// Map a `reqwest` failure, separating body-decoding errors from
    /// transport errors.
    ///
    /// The request URL is stripped first: query strings may carry
    /// credentials and must not reach messages or logs.
    pub fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            Self::Malformed {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Unavailable {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }

    pub fn malformed(endpoint: &str, err: &serde_json::Error) -> Self {
        Self::Malformed {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }
}
