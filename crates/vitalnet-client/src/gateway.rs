//! Request/response flow against the authorization host.
//!
//! ```text
//! build -> apply parity -> Transport::exchange -> strip parity -> parse
//! ```
//!
//! A response that matches none of the known shapes is not an error: the
//! reply carries the raw text and no structured response.

use crate::transport::{ContentType, Transport, TransportError};
use bytes::Bytes;
use chrono::Local;
use thiserror::Error;
use tracing::{debug, info, warn};
use vitalnet_core::{Error as ProtocolError, Merchant};
use vitalnet_protocol::field::mask_card;
use vitalnet_protocol::{
    AuthorizationRequest, Response, ResponseParser, SettlementRequest, apply_even_parity, decode,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request could not be built
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The exchange with the host failed
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// What came back from one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Parity-stripped response text
    pub raw: String,
    /// Parsed response, `None` when the text matched no known shape
    pub response: Option<Response>,
}

impl Reply {
    pub fn is_approved(&self) -> bool {
        self.response.as_ref().is_some_and(Response::is_approved)
    }

    pub fn is_accepted(&self) -> bool {
        self.response.as_ref().is_some_and(Response::is_accepted)
    }
}

/// Authorizes and settles cards for one merchant over a transport.
#[derive(Debug)]
pub struct Gateway<T> {
    merchant: Merchant,
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(merchant: Merchant, transport: T) -> Self {
        Self {
            merchant,
            transport,
        }
    }

    pub fn merchant(&self) -> &Merchant {
        &self.merchant
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a "D" format authorization request.
    ///
    /// # Errors
    /// `GatewayError::Protocol` if the request does not fit its record,
    /// `GatewayError::Transport` if the exchange fails.
    pub async fn authorize(&self, request: &AuthorizationRequest) -> Result<Reply, GatewayError> {
        let message = request.build(&self.merchant)?;

        info!(
            card = %mask_card(&request.card_number),
            sequence = %request.transaction_sequence,
            amount = %request.amount,
            "Authorizing"
        );

        self.send(message, ContentType::Authorization).await
    }

    /// Send a single-card "K" format settlement batch.
    ///
    /// The transmission time defaults to local now when the request has none.
    ///
    /// # Errors
    /// `GatewayError::Protocol` if a mandatory field is missing or a record
    /// does not fit, `GatewayError::Transport` if the exchange fails.
    pub async fn settle(&self, request: &SettlementRequest) -> Result<Reply, GatewayError> {
        let message = match request.at {
            Some(_) => request.build(&self.merchant)?,
            None => {
                let stamped = SettlementRequest {
                    at: Some(Local::now().naive_local()),
                    ..request.clone()
                };
                stamped.build(&self.merchant)?
            }
        };

        info!(
            card = %mask_card(&request.card_number),
            batch = %request.batch_number,
            "Settling"
        );

        self.send(message, ContentType::Settlement).await
    }

    async fn send(&self, message: String, content_type: ContentType) -> Result<Reply, GatewayError> {
        let payload = Bytes::from(apply_even_parity(message.as_bytes()));
        let received = self.transport.exchange(payload, content_type).await?;

        let raw = decode(&received);
        debug!(size = raw.len(), "Decoded response");

        let response = match ResponseParser::parse(&raw) {
            Ok(response) => {
                info!(kind = %response.kind(), "Parsed response");
                Some(response)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        Ok(Reply { raw, response })
    }
}
