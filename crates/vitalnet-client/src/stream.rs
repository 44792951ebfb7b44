//! Point-to-point stream transport.
//!
//! Opens one TCP connection per exchange, writes the request through
//! [`VitalNetCodec`], waits for a single response frame and closes.
//!
//! ```text
//! Gateway ──> StreamTransport ───(TCP)───> host
//!                   │
//!                   └─> VitalNetCodec (parity + STX/ETX framing)
//! ```
//!
//! The payload handed in is already parity-encoded. It is stripped back to
//! text and re-encoded by the codec; even parity is idempotent, so the bytes
//! on the wire are the same.
//!
//! # Example Usage
//!
//! ```no_run
//! use bytes::Bytes;
//! use std::time::Duration;
//! use vitalnet_client::{ContentType, StreamConfig, StreamTransport, Transport};
//!
//! # async fn example(payload: Bytes) -> Result<(), Box<dyn std::error::Error>> {
//! let transport = StreamTransport::new(StreamConfig {
//!     server_addr: "10.0.0.5:5003".parse()?,
//!     timeout: Duration::from_secs(30),
//! });
//!
//! let response = transport.exchange(payload, ContentType::Authorization).await?;
//! # Ok(())
//! # }
//! ```

use crate::transport::{ContentType, Transport, TransportError};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, trace, warn};
use vitalnet_core::constants::DEFAULT_EXCHANGE_TIMEOUT;
use vitalnet_protocol::{VitalNetCodec, decode};

/// Configuration for the stream transport
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Host address to connect to
    pub server_addr: SocketAddr,

    /// Timeout for each I/O step (connect, send, recv)
    pub timeout: Duration,
}

impl StreamConfig {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            timeout: Duration::from_millis(DEFAULT_EXCHANGE_TIMEOUT),
        }
    }
}

/// Transport over a raw TCP link
#[derive(Debug, Clone)]
pub struct StreamTransport {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl StreamTransport {
    pub fn new(config: StreamConfig) -> Self {
        debug!("Creating stream transport for {}", config.server_addr);

        Self {
            server_addr: config.server_addr,
            timeout: config.timeout,
        }
    }

    async fn connect(&self) -> Result<Framed<TcpStream, VitalNetCodec>, TransportError> {
        info!("Connecting to host at {}", self.server_addr);

        let stream =
            match tokio::time::timeout(self.timeout, TcpStream::connect(self.server_addr)).await {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => {
                    error!("Connection failed: {}", e);
                    return Err(e.into());
                }
                Err(_) => {
                    warn!("Connection timeout after {}ms", self.timeout.as_millis());
                    return Err(TransportError::timeout(self.timeout));
                }
            };

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        Ok(Framed::new(stream, VitalNetCodec::new()))
    }
}

impl Transport for StreamTransport {
    async fn exchange(
        &self,
        payload: Bytes,
        content_type: ContentType,
    ) -> Result<Bytes, TransportError> {
        let mut framed = self.connect().await?;

        trace!(
            content_type = content_type.mime(),
            size = payload.len(),
            "Sending request"
        );

        match tokio::time::timeout(self.timeout, framed.send(decode(&payload))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("Failed to send request: {}", e);
                return Err(TransportError::Codec(e));
            }
            Err(_) => {
                warn!("Send timeout after {}ms", self.timeout.as_millis());
                return Err(TransportError::timeout(self.timeout));
            }
        }

        match tokio::time::timeout(self.timeout, framed.next()).await {
            Ok(Some(Ok(text))) => {
                trace!(size = text.len(), "Received response");
                Ok(Bytes::from(text.into_bytes()))
            }
            Ok(Some(Err(e))) => {
                error!("Failed to decode response: {}", e);
                Err(TransportError::Codec(e))
            }
            Ok(None) => {
                warn!("Connection closed by host");
                Err(TransportError::ConnectionLost(
                    "Host closed connection".to_string(),
                ))
            }
            Err(_) => {
                warn!("Receive timeout after {}ms", self.timeout.as_millis());
                Err(TransportError::timeout(self.timeout))
            }
        }
    }
}
