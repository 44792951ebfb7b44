use bytes::Bytes;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use vitalnet_core::constants::{MIME_AUTH, MIME_SETTLE};

/// Which kind of request a payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Authorization,
    Settlement,
}

impl ContentType {
    /// MIME type sent with the request
    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Authorization => MIME_AUTH,
            ContentType::Settlement => MIME_SETTLE,
        }
    }
}

/// Errors that can occur while exchanging a request with the host
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP client failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Host answered with a non-success status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Exchange did not finish in time
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// Peer closed the connection before a response arrived
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Low-level I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing error from the stream codec
    #[error("Codec error: {0}")]
    Codec(#[from] vitalnet_core::Error),
}

impl TransportError {
    /// Timeout carrying the limit in milliseconds, saturating at `u64::MAX`.
    pub fn timeout(limit: Duration) -> Self {
        TransportError::Timeout(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX))
    }
}

/// A request/response exchange with the authorization host.
///
/// The payload is already parity-encoded; the returned bytes are the raw
/// response as received, parity bits included. One call is one exchange:
/// implementations do not retry.
pub trait Transport: Send + Sync {
    fn exchange(
        &self,
        payload: Bytes,
        content_type: ContentType,
    ) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}
