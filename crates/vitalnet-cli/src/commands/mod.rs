//! Subcommands and the pieces they share.

pub mod auth;
pub mod parse;
pub mod settle;

use bytes::Bytes;
use serde_json::{Value, json};
use vitalnet_client::{
    ContentType, HttpsTransport, Reply, StreamTransport, Transport, TransportError,
};
use vitalnet_protocol::{Response, apply_even_parity};

use crate::config::GatewayConfig;

/// HTTPS or direct stream, picked from the configuration.
pub enum HostTransport {
    Https(HttpsTransport),
    Stream(StreamTransport),
}

impl HostTransport {
    pub fn from_config(gateway: &GatewayConfig) -> Result<Self, TransportError> {
        match gateway.stream() {
            Some(stream) => Ok(Self::Stream(StreamTransport::new(stream))),
            None => Ok(Self::Https(HttpsTransport::new(gateway.https())?)),
        }
    }
}

impl Transport for HostTransport {
    async fn exchange(
        &self,
        payload: Bytes,
        content_type: ContentType,
    ) -> Result<Bytes, TransportError> {
        match self {
            Self::Https(transport) => transport.exchange(payload, content_type).await,
            Self::Stream(transport) => transport.exchange(payload, content_type).await,
        }
    }
}

/// Parity-encoded wire bytes as lowercase hex.
pub fn wire_hex(message: &str) -> String {
    hex::encode(apply_even_parity(message.as_bytes()))
}

pub fn response_json(response: &Response) -> Value {
    json!({
        "kind": response.kind(),
        "approved": response.is_approved(),
        "accepted": response.is_accepted(),
        "fields": response,
    })
}

pub fn reply_json(reply: &Reply) -> Value {
    match &reply.response {
        Some(response) => {
            let mut value = response_json(response);
            value["raw"] = Value::String(reply.raw.clone());
            value
        }
        None => json!({ "raw": reply.raw, "kind": Value::Null }),
    }
}

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
