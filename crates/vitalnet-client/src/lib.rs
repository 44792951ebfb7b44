//! Host communication for VitalNet authorization and settlement.
//!
//! This crate moves the encoded requests built by `vitalnet-protocol` to the
//! acquirer and hands the parsed response back.
//!
//! # Components
//!
//! - **Transport**: one request/response exchange, no retries
//! - **HttpsTransport**: POST to the acquirer gateway
//! - **StreamTransport**: framed TCP link using `VitalNetCodec`
//! - **Gateway**: build, encode, exchange, decode and parse
//!
//! # Example
//!
//! ```no_run
//! use vitalnet_client::{Gateway, HttpsConfig, HttpsTransport};
//! use vitalnet_core::Merchant;
//! use vitalnet_protocol::AuthorizationRequest;
//!
//! # async fn example(merchant: Merchant, request: AuthorizationRequest) -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpsTransport::new(HttpsConfig::default())?;
//! let gateway = Gateway::new(merchant, transport);
//!
//! let reply = gateway.authorize(&request).await?;
//! if reply.is_approved() {
//!     println!("approved");
//! }
//! # Ok(())
//! # }
//! ```

mod gateway;
mod https;
mod stream;
mod transport;

pub use gateway::{Gateway, GatewayError, Reply};
pub use https::{HttpsConfig, HttpsTransport};
pub use stream::{StreamConfig, StreamTransport};
pub use transport::{ContentType, Transport, TransportError};
