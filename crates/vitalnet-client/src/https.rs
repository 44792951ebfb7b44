//! HTTPS transport to the acquirer gateway.
//!
//! Each exchange is one POST of the parity-encoded request with the
//! request's MIME type as `Content-Type`. The response body is returned
//! untouched.

use crate::transport::{ContentType, Transport, TransportError};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, warn};
use vitalnet_core::constants::{DEFAULT_EXCHANGE_TIMEOUT, DEFAULT_GATEWAY_URL};

/// Configuration for the HTTPS transport
///
/// # Example
///
/// ```
/// use vitalnet_client::HttpsConfig;
/// use std::time::Duration;
///
/// let config = HttpsConfig {
///     url: "https://gateway.example.com/transact".to_string(),
///     timeout: Duration::from_secs(10),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct HttpsConfig {
    /// Gateway endpoint
    pub url: String,

    /// Timeout for the whole exchange
    pub timeout: Duration,
}

impl Default for HttpsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_EXCHANGE_TIMEOUT),
        }
    }
}

/// Transport that POSTs each request to the gateway over HTTPS
#[derive(Debug, Clone)]
pub struct HttpsTransport {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpsTransport {
    /// # Errors
    /// Returns `TransportError::Http` if the HTTP client cannot be built.
    pub fn new(config: HttpsConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        debug!(url = %config.url, "Created HTTPS transport");
        Ok(Self {
            client,
            url: config.url,
            timeout: config.timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpsTransport {
    async fn exchange(
        &self,
        payload: Bytes,
        content_type: ContentType,
    ) -> Result<Bytes, TransportError> {
        debug!(
            url = %self.url,
            content_type = content_type.mime(),
            size = payload.len(),
            "Posting request"
        );

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, content_type.mime())
            .body(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Gateway rejected request");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        debug!(size = body.len(), "Received response");
        Ok(body)
    }
}

impl HttpsTransport {
    fn classify(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            warn!("Gateway timeout after {}ms", self.timeout.as_millis());
            TransportError::timeout(self.timeout)
        } else {
            TransportError::Http(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpsConfig::default();
        assert_eq!(
            config.url,
            "https://ssl1.tsysacquiring.net/scripts/gateway.dll?transact"
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_new_keeps_url() {
        let transport = HttpsTransport::new(HttpsConfig {
            url: "https://localhost:8443/transact".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(transport.url(), "https://localhost:8443/transact");
    }
}
